//! Quasi-Arithmetic Scoring System (QASS) for peer assessment.
//!
//! Turns a group's peer-rating matrix and instructor-assigned group score
//! into one individual score per student, and checks scoring model
//! configurations for internal consistency.

pub mod assessment;
pub mod bounds;
pub mod config;
pub mod logging;
pub mod matrix;
pub mod output;
pub mod scoring;

pub use matrix::{GroupScore, PeerRatingMatrix, ScoringError};
