//! Confidence tiers used for transcript styling.
//!
//! Both renderers share one threshold ladder: strict greater-than comparisons
//! against 0.5, 0.6, 0.7, 0.8 and 0.9. The top tier renders without annotation.

/// Discrete confidence bucket, ordered from least to most confident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// `c <= 0.5`
    Unsure,
    /// `0.5 < c <= 0.6`
    Five,
    /// `0.6 < c <= 0.7`
    Six,
    /// `0.7 < c <= 0.8`
    Seven,
    /// `0.8 < c <= 0.9`
    Eight,
    /// `c > 0.9`, rendered plain.
    Certain,
}

/// Lower bounds (exclusive) for every tier above `Unsure`.
const LADDER: [(f64, Tier); 5] = [
    (0.9, Tier::Certain),
    (0.8, Tier::Eight),
    (0.7, Tier::Seven),
    (0.6, Tier::Six),
    (0.5, Tier::Five),
];

/// Maps a confidence in `[0, 1]` to its tier.
pub fn classify(confidence: f64) -> Tier {
    LADDER
        .iter()
        .find(|(bound, _)| confidence > *bound)
        .map(|(_, tier)| *tier)
        .unwrap_or(Tier::Unsure)
}

impl Tier {
    /// Text colour for the annotated HTML transcript.
    pub fn html_color(self) -> Option<&'static str> {
        match self {
            Tier::Unsure => Some("#999"),
            Tier::Five => Some("#aaa"),
            Tier::Six => Some("#999"),
            Tier::Seven => Some("#666"),
            Tier::Eight => Some("#333"),
            Tier::Certain => None,
        }
    }

    /// WebVTT cue class (`<c.class>`).
    pub fn caption_class(self) -> Option<&'static str> {
        match self {
            Tier::Unsure => Some("unsure"),
            Tier::Five => Some("five"),
            Tier::Six => Some("six"),
            Tier::Seven => Some("seven"),
            Tier::Eight => Some("eight"),
            Tier::Certain => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_strict() {
        assert_eq!(classify(0.5), Tier::Unsure);
        assert_eq!(classify(0.500001), Tier::Five);
        assert_eq!(classify(0.6), Tier::Five);
        assert_eq!(classify(0.61), Tier::Six);
        assert_eq!(classify(0.7), Tier::Six);
        assert_eq!(classify(0.71), Tier::Seven);
        assert_eq!(classify(0.8), Tier::Seven);
        assert_eq!(classify(0.81), Tier::Eight);
        assert_eq!(classify(0.9), Tier::Eight);
        assert_eq!(classify(0.91), Tier::Certain);
        assert_eq!(classify(1.0), Tier::Certain);
        assert_eq!(classify(0.0), Tier::Unsure);
    }

    #[test]
    fn classify_is_monotonic() {
        let mut previous = classify(0.0);
        for step in 0..=1000 {
            let tier = classify(step as f64 / 1000.0);
            assert!(tier >= previous, "tier dropped at {}", step);
            previous = tier;
        }
    }

    #[test]
    fn only_certain_is_unstyled() {
        assert_eq!(Tier::Certain.html_color(), None);
        assert_eq!(Tier::Certain.caption_class(), None);
        assert!(Tier::Eight.html_color().is_some());
    }

    #[test]
    fn styling_tables() {
        assert_eq!(Tier::Unsure.html_color(), Some("#999"));
        assert_eq!(Tier::Five.html_color(), Some("#aaa"));
        assert_eq!(Tier::Eight.html_color(), Some("#333"));
        assert_eq!(Tier::Unsure.caption_class(), Some("unsure"));
        assert_eq!(Tier::Seven.caption_class(), Some("seven"));
    }
}
