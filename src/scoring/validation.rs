use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(impact) = config.impact {
        if !impact.is_finite() || impact <= 0.0 {
            errors.push(format!("scoring.impact: must be a positive number, got {}", impact));
        }
    }

    if let Some(tolerance) = config.tolerance {
        if !tolerance.is_finite() || tolerance <= 1.0 {
            errors.push(format!(
                "scoring.tolerance: must be greater than 1, got {}",
                tolerance
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
