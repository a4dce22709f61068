use crate::matrix::MAX_RATING;

/// Lowest probability any rating is allowed to reach.
pub const MIN_PROBABILITY: f64 = 0.001;
/// Highest probability any rating is allowed to reach.
pub const MAX_PROBABILITY: f64 = 0.999;

/// Clamp a probability into [`MIN_PROBABILITY`, `MAX_PROBABILITY`] so its
/// log-odds stay finite.
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        return MIN_PROBABILITY;
    }
    p.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Map a raw 0-5 rating onto the clamped probability scale.
pub fn normalize_rating(raw: u8) -> f64 {
    clamp_probability(f64::from(raw) / f64::from(MAX_RATING))
}

/// ln(p / (1 - p)) of the clamped probability.
pub fn to_log_odds(p: f64) -> f64 {
    let p = clamp_probability(p);
    (p / (1.0 - p)).ln()
}

/// Inverse of [`to_log_odds`]: e^l / (1 + e^l).
pub fn from_log_odds(log_odds: f64) -> f64 {
    let odds = log_odds.exp();
    odds / (1.0 + odds)
}

/// Log-odds bounds matching the probability clamp.
pub fn log_odds_bounds() -> (f64, f64) {
    (to_log_odds(MIN_PROBABILITY), to_log_odds(MAX_PROBABILITY))
}

/// Arithmetic mean of log-odds values, i.e. the log of the geometric mean of
/// the odds.
///
/// Accumulates offsets from the first value, so identical inputs give back
/// that value bit for bit. Returns `None` for an empty input.
pub fn mean_log_odds<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut iter = values.into_iter();
    let first = iter.next()?;
    let mut offset_sum = 0.0;
    let mut count = 1usize;
    for value in iter {
        offset_sum += value - first;
        count += 1;
    }
    Some(first + offset_sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range_for_all_ratings() {
        for raw in 0..=MAX_RATING {
            let p = normalize_rating(raw);
            assert!(p >= MIN_PROBABILITY && p <= MAX_PROBABILITY, "rating {raw} -> {p}");
        }
    }

    #[test]
    fn test_normalize_clamps_extremes() {
        assert_eq!(normalize_rating(0), MIN_PROBABILITY);
        assert_eq!(normalize_rating(5), MAX_PROBABILITY);
        assert!((normalize_rating(3) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_log_odds_finite_at_edges() {
        assert!(to_log_odds(0.0).is_finite());
        assert!(to_log_odds(1.0).is_finite());
        assert_eq!(to_log_odds(0.5), 0.0);
    }

    #[test]
    fn test_log_odds_round_trip() {
        let p = 0.73;
        assert!((from_log_odds(to_log_odds(p)) - p).abs() < 1e-12);
    }

    #[test]
    fn test_mean_log_odds_identical_values_exact() {
        let x = to_log_odds(0.6);
        assert_eq!(mean_log_odds(vec![x, x, x]), Some(x));
    }

    #[test]
    fn test_mean_log_odds_matches_geometric_mean() {
        // odds 1.5 and 4.0 -> geometric mean sqrt(6)
        let mean = mean_log_odds(vec![1.5f64.ln(), 4.0f64.ln()]).unwrap();
        assert!((mean.exp() - 6.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mean_log_odds_empty() {
        assert_eq!(mean_log_odds(Vec::new()), None);
    }

    #[test]
    fn test_nan_clamps_low() {
        assert_eq!(clamp_probability(f64::NAN), MIN_PROBABILITY);
    }
}
