pub mod config;
pub mod normalize;
pub mod engine;
pub mod validation;

pub use config::*;
pub use normalize::{normalize_rating, MAX_PROBABILITY, MIN_PROBABILITY};
pub use engine::{
    aggregate_group_rating, calculate_contribution, calculate_scores, calculate_scores_from_rows,
    project_score, resolve_student_rating, resolve_student_ratings, score_group, GroupResult,
    Rating, StudentScore,
};
pub use validation::validate_scoring;
