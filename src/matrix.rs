use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest rating a student can give a peer.
pub const MAX_RATING: u8 = 5;

/// Errors raised when engine inputs fail the boundary checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("rating matrix is not square: row {row} has {found} entries, expected {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("rating {value} at row {row}, column {column} is outside 0-{max}", max = MAX_RATING)]
    RatingOutOfRange { row: usize, column: usize, value: u8 },

    #[error("group score {0} must lie strictly between 0 and 1")]
    GroupScoreOutOfRange(f64),
}

/// Square grid of optional peer ratings.
///
/// Row `i` holds the ratings student `i` gave; column `j` holds the ratings
/// student `j` received. `None` marks a missing rating (an unrated peer or
/// an empty self-rating slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<u8>>>", into = "Vec<Vec<Option<u8>>>")]
pub struct PeerRatingMatrix {
    size: usize,
    cells: Vec<Option<u8>>,
}

impl PeerRatingMatrix {
    /// Build a matrix from rows, rejecting ragged, non-square or out-of-range input.
    pub fn from_rows(rows: Vec<Vec<Option<u8>>>) -> Result<Self, ScoringError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);

        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != size {
                return Err(ScoringError::ShapeMismatch {
                    row,
                    expected: size,
                    found: entries.len(),
                });
            }
            for (column, entry) in entries.into_iter().enumerate() {
                if let Some(value) = entry {
                    if value > MAX_RATING {
                        return Err(ScoringError::RatingOutOfRange { row, column, value });
                    }
                }
                cells.push(entry);
            }
        }

        Ok(Self { size, cells })
    }

    /// Matrix with every entry missing.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Number of students in the group.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, rater: usize, rated: usize) -> Option<u8> {
        if rater >= self.size || rated >= self.size {
            return None;
        }
        self.cells[rater * self.size + rated]
    }

    pub fn row(&self, rater: usize) -> &[Option<u8>] {
        let start = rater * self.size;
        &self.cells[start..start + self.size]
    }

    /// Ratings student `rater` gave to other students, skipping the diagonal
    /// and missing entries.
    pub fn peer_ratings(&self, rater: usize) -> impl Iterator<Item = u8> + '_ {
        self.row(rater)
            .iter()
            .enumerate()
            .filter(move |(rated, _)| *rated != rater)
            .filter_map(|(_, entry)| *entry)
    }

    /// True when student `rater` rated at least one peer.
    pub fn has_rated_peers(&self, rater: usize) -> bool {
        self.peer_ratings(rater).next().is_some()
    }
}

impl TryFrom<Vec<Vec<Option<u8>>>> for PeerRatingMatrix {
    type Error = ScoringError;

    fn try_from(rows: Vec<Vec<Option<u8>>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<PeerRatingMatrix> for Vec<Vec<Option<u8>>> {
    fn from(matrix: PeerRatingMatrix) -> Self {
        if matrix.size == 0 {
            return Vec::new();
        }
        matrix
            .cells
            .chunks(matrix.size)
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Instructor-assigned group quality, strictly inside (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct GroupScore(f64);

impl GroupScore {
    pub fn new(value: f64) -> Result<Self, ScoringError> {
        if value.is_finite() && value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(ScoringError::GroupScoreOutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for GroupScore {
    type Error = ScoringError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupScore> for f64 {
    fn from(score: GroupScore) -> Self {
        score.0
    }
}
