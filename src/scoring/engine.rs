use serde::Serialize;

use super::config::ScoringConfig;
use super::normalize::{from_log_odds, log_odds_bounds, mean_log_odds, normalize_rating, to_log_odds};
use crate::matrix::{GroupScore, PeerRatingMatrix, ScoringError};

/// A rating held in log-odds form.
///
/// Every constructor clamps, so the probability stays inside
/// [`MIN_PROBABILITY`](super::normalize::MIN_PROBABILITY),
/// [`MAX_PROBABILITY`](super::normalize::MAX_PROBABILITY).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating {
    log_odds: f64,
}

impl Rating {
    pub fn from_probability(p: f64) -> Self {
        Self {
            log_odds: to_log_odds(p),
        }
    }

    pub fn from_log_odds(log_odds: f64) -> Self {
        let (low, high) = log_odds_bounds();
        Self {
            log_odds: log_odds.clamp(low, high),
        }
    }

    pub fn log_odds(self) -> f64 {
        self.log_odds
    }

    pub fn probability(self) -> f64 {
        from_log_odds(self.log_odds)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentScore {
    pub rating: f64,       // Aggregate rating on the 0-1 scale
    pub contribution: f64, // Signed position relative to the group mean, in [-1, 1]
    pub score: f64,        // Final individual score
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupResult {
    pub group_score: f64,
    /// Mean rating across the group; `None` only for an empty group.
    pub group_rating: Option<f64>,
    pub students: Vec<StudentScore>,
}

impl GroupResult {
    pub fn scores(&self) -> Vec<f64> {
        self.students.iter().map(|s| s.score).collect()
    }
}

/// Mean log-odds of the ratings `rater` gave to peers, or `None` when the
/// row holds no peer ratings.
fn row_log_odds(matrix: &PeerRatingMatrix, rater: usize) -> Option<f64> {
    mean_log_odds(
        matrix
            .peer_ratings(rater)
            .map(|raw| to_log_odds(normalize_rating(raw))),
    )
}

/// Rating for students who rated nobody: the log-odds mean over every
/// student who did. `None` when nobody in the group rated anyone.
fn fallback_log_odds(row_means: &[Option<f64>]) -> Option<f64> {
    mean_log_odds(row_means.iter().flatten().copied())
}

/// Resolve every student's aggregate rating, in matrix order.
///
/// A student counts as a rater when their own row holds at least one peer
/// rating; the diagonal (self-rating) is never read. Raters get the
/// geometric mean of their row's odds mapped back to a probability.
/// Non-raters get the geometric mean of the raters' row means, each row
/// using the `p / (1 - p)` odds of its ratings. If nobody rated anyone,
/// every student gets the group score.
///
/// Both rules differ from the legacy scorer, which decided rater status from
/// row 0 alone and divided the non-rater odds by `1 - sr` instead of `1 - p`.
pub fn resolve_student_ratings(matrix: &PeerRatingMatrix, group_score: GroupScore) -> Vec<Rating> {
    let row_means: Vec<Option<f64>> = (0..matrix.len())
        .map(|rater| row_log_odds(matrix, rater))
        .collect();

    match fallback_log_odds(&row_means) {
        None => vec![Rating::from_probability(group_score.value()); matrix.len()],
        Some(fallback) => row_means
            .into_iter()
            .map(|mean| Rating::from_log_odds(mean.unwrap_or(fallback)))
            .collect(),
    }
}

/// Resolve a single student's aggregate rating, or `None` when `student` is
/// not a row of `matrix`. Same rules as [`resolve_student_ratings`].
pub fn resolve_student_rating(
    matrix: &PeerRatingMatrix,
    group_score: GroupScore,
    student: usize,
) -> Option<Rating> {
    resolve_student_ratings(matrix, group_score).get(student).copied()
}

/// Geometric mean of the ratings in log-odds space. `None` for an empty slice.
pub fn aggregate_group_rating(ratings: &[Rating]) -> Option<Rating> {
    mean_log_odds(ratings.iter().map(|r| r.log_odds())).map(Rating::from_log_odds)
}

/// Signed, impact-scaled position of `student` relative to `mean`, in [-1, 1].
///
/// `sc = ((s (1 - m)) / ((1 - s) m))^impact`, contribution `(sc - 1) / (sc + 1)`.
/// With `x = impact * (logit(s) - logit(m))` that is `tanh(x / 2)`, which
/// saturates at ±1 instead of overflowing for large impacts. Equal ratings
/// give exactly zero.
pub fn calculate_contribution(student: Rating, mean: Rating, impact: f64) -> f64 {
    (impact * (student.log_odds() - mean.log_odds()) / 2.0).tanh()
}

/// `group_score ^ (tolerance ^ -contribution)`.
///
/// Zero contribution returns the group score unchanged; positive
/// contributions pull it toward 1, negative ones toward 0.
pub fn project_score(group_score: GroupScore, tolerance: f64, contribution: f64) -> f64 {
    group_score.value().powf(tolerance.powf(-contribution))
}

/// Run the full pipeline for one group and keep the per-student breakdown.
pub fn score_group(
    matrix: &PeerRatingMatrix,
    group_score: GroupScore,
    config: &ScoringConfig,
) -> GroupResult {
    let impact = config.impact();
    let tolerance = config.tolerance();

    let ratings = resolve_student_ratings(matrix, group_score);
    let Some(mean) = aggregate_group_rating(&ratings) else {
        return GroupResult {
            group_score: group_score.value(),
            group_rating: None,
            students: Vec::new(),
        };
    };

    tracing::debug!(
        students = ratings.len(),
        group_rating = mean.probability(),
        impact,
        tolerance,
        "aggregated group rating"
    );

    let students = ratings
        .iter()
        .enumerate()
        .map(|(idx, rating)| {
            let contribution = calculate_contribution(*rating, mean, impact);
            let score = project_score(group_score, tolerance, contribution);
            tracing::debug!(
                student = idx,
                rating = rating.probability(),
                contribution,
                score,
                "scored student"
            );
            StudentScore {
                rating: rating.probability(),
                contribution,
                score,
            }
        })
        .collect();

    GroupResult {
        group_score: group_score.value(),
        group_rating: Some(mean.probability()),
        students,
    }
}

/// Final scores for one group, index-aligned with the matrix rows.
pub fn calculate_scores(
    matrix: &PeerRatingMatrix,
    group_score: GroupScore,
    config: &ScoringConfig,
) -> Vec<f64> {
    score_group(matrix, group_score, config).scores()
}

/// Boundary entry point for unchecked input: validates shape, rating range
/// and group score before scoring.
pub fn calculate_scores_from_rows(
    rows: Vec<Vec<Option<u8>>>,
    group_score: f64,
    config: &ScoringConfig,
) -> Result<Vec<f64>, ScoringError> {
    let matrix = PeerRatingMatrix::from_rows(rows)?;
    let group_score = GroupScore::new(group_score)?;
    Ok(calculate_scores(&matrix, group_score, config))
}
