use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::matrix::{GroupScore, PeerRatingMatrix};
use crate::scoring::{score_group, ScoringConfig};

/// A batch of groups to score together.
///
/// Example YAML:
/// ```yaml
/// max_score: 100
/// groups:
///   - name: Team A
///     students: [ana, ben]
///     group_score: 75
///     ratings:
///       - [null, 4]
///       - [3, null]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Assessment {
    /// Mark scale for `group_score`; scores are divided by it before scoring
    /// and multiplied back afterwards (default: 1, i.e. already 0-1)
    #[serde(default)]
    pub max_score: Option<f64>,
    pub groups: Vec<GroupInput>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroupInput {
    pub name: String,
    /// Student names in matrix order; defaults to "Student N"
    #[serde(default)]
    pub students: Option<Vec<String>>,
    pub group_score: f64,
    pub ratings: PeerRatingMatrix,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredStudent {
    pub name: String,
    pub rating: f64,
    pub contribution: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredGroup {
    pub name: String,
    pub group_score: f64,
    pub group_rating: Option<f64>,
    pub students: Vec<ScoredStudent>,
}

impl Assessment {
    fn scale(&self) -> f64 {
        self.max_score.unwrap_or(1.0)
    }
}

/// Load an assessment file. `.json` files are read as JSON, anything else
/// as YAML.
pub fn load_assessment(path: &Path) -> Result<Assessment> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read assessment file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let assessment: Assessment = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse assessment: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse assessment: invalid YAML in {}", path.display()))?
    };

    validate_assessment(&assessment)?;
    Ok(assessment)
}

fn validate_assessment(assessment: &Assessment) -> Result<()> {
    let scale = assessment.scale();
    if !scale.is_finite() || scale <= 0.0 {
        anyhow::bail!("max_score must be a positive number, got {}", scale);
    }

    for group in &assessment.groups {
        if let Some(ref students) = group.students {
            if students.len() != group.ratings.len() {
                anyhow::bail!(
                    "group '{}': {} student names for a {}x{} rating matrix",
                    group.name,
                    students.len(),
                    group.ratings.len(),
                    group.ratings.len()
                );
            }
        }
    }
    Ok(())
}

/// Score every group in the assessment, in file order.
pub fn score_assessment(assessment: &Assessment, config: &ScoringConfig) -> Result<Vec<ScoredGroup>> {
    let scale = assessment.scale();

    assessment
        .groups
        .iter()
        .map(|group| -> Result<ScoredGroup> {
            let group_score = GroupScore::new(group.group_score / scale)
                .with_context(|| format!("group '{}'", group.name))?;
            let result = score_group(&group.ratings, group_score, config);
            tracing::debug!(group = %group.name, students = result.students.len(), "scored group");

            let students = result
                .students
                .iter()
                .enumerate()
                .map(|(idx, student)| ScoredStudent {
                    name: group
                        .students
                        .as_ref()
                        .and_then(|names| names.get(idx).cloned())
                        .unwrap_or_else(|| format!("Student {}", idx + 1)),
                    rating: student.rating,
                    contribution: student.contribution,
                    score: student.score * scale,
                })
                .collect();

            Ok(ScoredGroup {
                name: group.name.clone(),
                group_score: group.group_score,
                group_rating: result.group_rating,
                students,
            })
        })
        .collect()
}
