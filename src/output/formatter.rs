use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::assessment::ScoredGroup;
use crate::bounds::{BoundsIssue, ModelConfig};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with up to two decimals, trimming trailing zeros
/// ("75", "72.5", "0.83")
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.2}", score);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format a contribution as a signed, right-aligned value with three decimals
fn format_contribution(contribution: f64, use_colors: bool) -> String {
    // Pad before coloring so ANSI codes don't break alignment
    let text = format!("{:>7}", format!("{:+.3}", contribution));
    if !use_colors {
        return text;
    }
    if contribution > 0.0005 {
        text.green().to_string()
    } else if contribution < -0.0005 {
        text.red().to_string()
    } else {
        text.dimmed().to_string()
    }
}

/// Format scored groups as one block per group: a header line, then one
/// row per student with columns Name, Rating, Contribution, Score.
pub fn format_scored_groups(groups: &[ScoredGroup], use_colors: bool) -> String {
    if groups.is_empty() {
        return "No groups found.".to_string();
    }

    groups
        .iter()
        .map(|group| format_group(group, use_colors))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_group(group: &ScoredGroup, use_colors: bool) -> String {
    let mean = group
        .group_rating
        .map(|r| format!("{:.3}", r))
        .unwrap_or_else(|| "-".to_string());
    let header = format!(
        "{}  (group score {}, mean rating {})",
        group.name,
        format_score(group.group_score),
        mean
    );
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let name_width = group
        .students
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut lines = vec![header];
    for student in &group.students {
        let contribution = format_contribution(student.contribution, use_colors);
        lines.push(format!(
            "  {:<name_width$}  {:>6.3}  {}  {:>7}",
            student.name,
            student.rating,
            contribution,
            format_score(student.score),
            name_width = name_width
        ));
    }
    lines.join("\n")
}

/// Serialize scored groups as pretty JSON
pub fn format_scored_groups_json(groups: &[ScoredGroup]) -> Result<String> {
    serde_json::to_string_pretty(groups).context("Failed to serialize scores")
}

/// Format a model config check: derived group-size range plus every issue
pub fn format_bounds_report(
    config: &ModelConfig,
    outcome: &Result<(), Vec<BoundsIssue>>,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();

    let (min, max) = config.group_size_range();
    let range = match (min, max) {
        (Some(min), Some(max)) => format!("{}-{}", min, max),
        _ => "n/a".to_string(),
    };
    lines.push(format!(
        "Model {}: bounds {}-{}, group size {}, derived group size range {}",
        config.selected_model,
        format_score(config.lower_bound),
        format_score(config.upper_bound),
        config.group_size,
        range
    ));

    match outcome {
        Ok(()) => {
            let ok = "Model configuration is consistent.";
            lines.push(if use_colors { ok.green().to_string() } else { ok.to_string() });
        }
        Err(issues) => {
            for issue in issues {
                let line = format!("  - {}", issue);
                lines.push(if use_colors { line.red().to_string() } else { line });
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::ScoredStudent;
    use crate::bounds::ScoringModel;

    fn sample_group() -> ScoredGroup {
        ScoredGroup {
            name: "Team A".to_string(),
            group_score: 75.0,
            group_rating: Some(0.6),
            students: vec![
                ScoredStudent {
                    name: "ana".to_string(),
                    rating: 0.7,
                    contribution: 0.2173,
                    score: 81.234,
                },
                ScoredStudent {
                    name: "benedict".to_string(),
                    rating: 0.5,
                    contribution: -0.2,
                    score: 68.5,
                },
            ],
        }
    }

    fn sample_model() -> ModelConfig {
        ModelConfig {
            selected_model: ScoringModel::Qass,
            lower_bound: 10.0,
            upper_bound: 20.0,
            group_size: 5,
            is_total_score_constrained: true,
            score_constraint: Some(100.0),
        }
    }

    #[test]
    fn test_format_score_integer() {
        assert_eq!(format_score(75.0), "75");
    }

    #[test]
    fn test_format_score_decimal() {
        assert_eq!(format_score(72.5), "72.5");
        assert_eq!(format_score(0.8333), "0.83");
    }

    #[test]
    fn test_format_score_zero() {
        assert_eq!(format_score(0.0), "0");
        assert_eq!(format_score(0.001), "0");
    }

    #[test]
    fn test_format_scored_groups_empty() {
        assert_eq!(format_scored_groups(&[], false), "No groups found.");
    }

    #[test]
    fn test_format_scored_groups_plain() {
        let output = format_scored_groups(&[sample_group()], false);
        assert!(output.starts_with("Team A  (group score 75, mean rating 0.600)"));
        assert!(output.contains("ana"));
        assert!(output.contains("+0.217"));
        assert!(output.contains("81.23"));
        assert!(output.contains("-0.200"));
        assert!(output.contains("68.5"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_format_scored_groups_aligned() {
        let output = format_scored_groups(&[sample_group()], false);
        let rows: Vec<&str> = output.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), rows[1].len());
    }

    #[test]
    fn test_format_scored_groups_json() {
        let json = format_scored_groups_json(&[sample_group()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "Team A");
        assert_eq!(value[0]["students"][1]["name"], "benedict");
    }

    #[test]
    fn test_format_bounds_report_ok() {
        let config = sample_model();
        let report = format_bounds_report(&config, &config.check(), false);
        assert!(report.contains("Model QASS"));
        assert!(report.contains("derived group size range 5-10"));
        assert!(report.contains("consistent"));
    }

    #[test]
    fn test_format_bounds_report_issues() {
        let config = ModelConfig {
            score_constraint: None,
            ..sample_model()
        };
        let report = format_bounds_report(&config, &config.check(), false);
        assert!(report.contains("range n/a"));
        assert!(report.contains("  - total score is constrained but no score constraint is set"));
    }
}
