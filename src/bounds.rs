//! Consistency checks for a configurable scoring model's bounds, group size
//! and total-score constraint.
//!
//! Every check is a pure function of its arguments. [`ModelConfig::check`]
//! runs them all over one configuration and reports every failure at once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scoring model selected for an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ScoringModel {
    #[default]
    #[serde(rename = "QASS", alias = "qass")]
    Qass,
    #[serde(rename = "WebAVALIA", alias = "webavalia")]
    WebAvalia,
}

impl std::fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringModel::Qass => write!(f, "QASS"),
            ScoringModel::WebAvalia => write!(f, "WebAVALIA"),
        }
    }
}

impl std::str::FromStr for ScoringModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qass" => Ok(ScoringModel::Qass),
            "webavalia" => Ok(ScoringModel::WebAvalia),
            other => Err(format!("unknown scoring model '{}' (use QASS or WebAVALIA)", other)),
        }
    }
}

/// Model parameters entered by an instructor.
///
/// Example YAML:
/// ```yaml
/// model:
///   selected_model: QASS
///   lower_bound: 10
///   upper_bound: 20
///   group_size: 5
///   is_total_score_constrained: true
///   score_constraint: 100
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    #[serde(default)]
    pub selected_model: ScoringModel,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub group_size: u32,
    #[serde(default)]
    pub is_total_score_constrained: bool,
    #[serde(default)]
    pub score_constraint: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundsIssue {
    #[error("lower bound {lower} must be below upper bound {upper}")]
    BoundConflict { lower: f64, upper: f64 },

    #[error("total score is constrained but no score constraint is set")]
    MissingScoreConstraint,

    #[error("score constraint must lie between {min} and {max} for a group of {group_size}")]
    ConstraintConflict { min: f64, max: f64, group_size: u32 },

    #[error("derived group size range is empty (min {min}, max {max})")]
    GroupSizeConflict { min: i64, max: i64 },
}

pub fn validate_bound_conflict(lower: f64, upper: f64) -> bool {
    lower < upper
}

pub fn validate_score_constraint(is_constrained: bool, constraint: Option<f64>) -> bool {
    !(is_constrained && constraint.is_none())
}

/// A constrained total must be reachable: `lower * n <= constraint <= upper * n`.
/// A constrained config without a constraint fails here too.
pub fn validate_constraint_conflict(
    lower: f64,
    upper: f64,
    group_size: u32,
    is_constrained: bool,
    constraint: Option<f64>,
) -> bool {
    if !is_constrained {
        return true;
    }
    let Some(constraint) = constraint else {
        return false;
    };
    let n = f64::from(group_size);
    upper * n >= constraint && constraint >= lower * n
}

pub fn validate_group_size_conflict(
    is_constrained: bool,
    min_group_size: i64,
    max_group_size: i64,
) -> bool {
    !is_constrained || max_group_size > min_group_size
}

/// Largest group the constraint admits: `floor(constraint / lower)`.
///
/// `None` for models other than QASS, when no constraint is given, or when
/// the quotient is not finite (e.g. a zero lower bound) or does not fit in
/// an `i64`.
pub fn calculate_max_group_size(
    model: ScoringModel,
    constraint: Option<f64>,
    lower: f64,
) -> Option<i64> {
    if model != ScoringModel::Qass {
        return None;
    }
    to_group_size((constraint? / lower).floor())
}

/// Smallest group the constraint admits: `ceil(constraint / upper)`.
pub fn calculate_min_group_size(
    model: ScoringModel,
    constraint: Option<f64>,
    upper: f64,
) -> Option<i64> {
    if model != ScoringModel::Qass {
        return None;
    }
    to_group_size((constraint? / upper).ceil())
}

/// Whole-number quotient as a group size; `None` when it is not finite or
/// does not fit in an `i64`.
fn to_group_size(size: f64) -> Option<i64> {
    // i64::MIN as f64 is exact; i64::MAX as f64 rounds up to 2^63
    let in_range = size >= i64::MIN as f64 && size < i64::MAX as f64;
    (size.is_finite() && in_range).then_some(size as i64)
}

impl ModelConfig {
    /// Derived (min, max) group sizes, when the model defines them.
    pub fn group_size_range(&self) -> (Option<i64>, Option<i64>) {
        (
            calculate_min_group_size(self.selected_model, self.score_constraint, self.upper_bound),
            calculate_max_group_size(self.selected_model, self.score_constraint, self.lower_bound),
        )
    }

    /// Run every check and return all failures (not just the first).
    pub fn check(&self) -> Result<(), Vec<BoundsIssue>> {
        let mut issues = Vec::new();

        if !validate_bound_conflict(self.lower_bound, self.upper_bound) {
            issues.push(BoundsIssue::BoundConflict {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }

        if !validate_score_constraint(self.is_total_score_constrained, self.score_constraint) {
            issues.push(BoundsIssue::MissingScoreConstraint);
        } else if !validate_constraint_conflict(
            self.lower_bound,
            self.upper_bound,
            self.group_size,
            self.is_total_score_constrained,
            self.score_constraint,
        ) {
            let n = f64::from(self.group_size);
            issues.push(BoundsIssue::ConstraintConflict {
                min: self.lower_bound * n,
                max: self.upper_bound * n,
                group_size: self.group_size,
            });
        }

        if let (Some(min), Some(max)) = self.group_size_range() {
            if !validate_group_size_conflict(self.is_total_score_constrained, min, max) {
                issues.push(BoundsIssue::GroupSizeConflict { min, max });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}
