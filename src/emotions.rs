//! Emotion Catalog
//!
//! The closed set of emotion categories with their display glyphs and
//! colors, plus the pure derivations shared by the stat cards and charts.

use std::collections::HashMap;

use crate::state::global::EmotionBucket;

/// The seven categories the detector reports, in display order.
pub const EMOTION_CATEGORIES: [&str; 7] = [
    "Enojo",
    "Asco",
    "Miedo",
    "Felicidad",
    "Tristeza",
    "Sorpresa",
    "Neutral",
];

/// Glyph shown for labels outside the closed set.
pub const FALLBACK_EMOJI: &str = "❓";

/// Color used for labels outside the closed set.
pub const FALLBACK_COLOR: &str = "#6b7280";

/// Display glyph for an emotion label.
pub fn emoji_for(label: &str) -> &'static str {
    match label {
        "Enojo" => "😠",
        "Asco" => "🤢",
        "Miedo" => "😨",
        "Felicidad" => "😊",
        "Tristeza" => "😢",
        "Sorpresa" => "😮",
        "Neutral" => "😐",
        _ => FALLBACK_EMOJI,
    }
}

/// Chart/accent color for an emotion label.
pub fn color_for(label: &str) -> &'static str {
    match label {
        "Enojo" => "#ef4444",
        "Asco" => "#22c55e",
        "Miedo" => "#f59e0b",
        "Felicidad" => "#3b82f6",
        "Tristeza" => "#8b5cf6",
        "Sorpresa" => "#ec4899",
        "Neutral" => "#6b7280",
        _ => FALLBACK_COLOR,
    }
}

/// Position of a label in the fixed category order; unknown labels sort last.
pub fn category_rank(label: &str) -> usize {
    EMOTION_CATEGORIES
        .iter()
        .position(|c| *c == label)
        .unwrap_or(EMOTION_CATEGORIES.len())
}

/// Sort labels by the fixed category order, unknown labels lexically after.
pub fn sort_labels(labels: &mut [String]) {
    labels.sort_by(|a, b| {
        category_rank(a)
            .cmp(&category_rank(b))
            .then_with(|| a.cmp(b))
    });
}

/// Confidence in [0,1] as an integer percentage, clamped to 0..=100.
pub fn confidence_percent(confidence: f64) -> u32 {
    (confidence * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Average confidence across all buckets, weighted by detection count.
///
/// Returns an integer percentage; an empty mapping or one with only
/// zero counts yields 0 rather than a division error.
pub fn weighted_avg_confidence(emotions: &HashMap<String, EmotionBucket>) -> u32 {
    let total: u64 = emotions.values().map(|b| b.count).sum();
    if total == 0 {
        return 0;
    }

    let weighted: f64 = emotions
        .values()
        .map(|b| b.avg_confidence * b.count as f64)
        .sum();

    confidence_percent(weighted / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(count: u64, avg_confidence: f64) -> EmotionBucket {
        EmotionBucket {
            count,
            avg_confidence,
        }
    }

    #[test]
    fn test_confidence_percent_rounds() {
        assert_eq!(confidence_percent(0.0), 0);
        assert_eq!(confidence_percent(0.754), 75);
        assert_eq!(confidence_percent(0.755), 76);
        assert_eq!(confidence_percent(1.0), 100);
    }

    #[test]
    fn test_confidence_percent_clamps_out_of_range() {
        assert_eq!(confidence_percent(-0.2), 0);
        assert_eq!(confidence_percent(1.7), 100);
    }

    #[test]
    fn test_weighted_avg_confidence() {
        let mut emotions = HashMap::new();
        emotions.insert("Felicidad".to_string(), bucket(2, 0.5));
        emotions.insert("Tristeza".to_string(), bucket(2, 1.0));

        assert_eq!(weighted_avg_confidence(&emotions), 75);
    }

    #[test]
    fn test_weighted_avg_confidence_empty() {
        assert_eq!(weighted_avg_confidence(&HashMap::new()), 0);
    }

    #[test]
    fn test_weighted_avg_confidence_zero_counts() {
        let mut emotions = HashMap::new();
        emotions.insert("Neutral".to_string(), bucket(0, 0.9));

        assert_eq!(weighted_avg_confidence(&emotions), 0);
    }

    #[test]
    fn test_unknown_label_fallbacks() {
        assert_eq!(emoji_for("Aburrimiento"), FALLBACK_EMOJI);
        assert_eq!(color_for("Aburrimiento"), FALLBACK_COLOR);
    }

    #[test]
    fn test_sort_labels_fixed_order_then_lexical() {
        let mut labels = vec![
            "Zzz".to_string(),
            "Neutral".to_string(),
            "Abc".to_string(),
            "Enojo".to_string(),
        ];
        sort_labels(&mut labels);

        assert_eq!(labels, vec!["Enojo", "Neutral", "Abc", "Zzz"]);
    }
}
