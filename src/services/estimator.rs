// src/services/estimator.rs
//! Complexity estimation for uploaded images.
//!
//! The tier is a pure function of byte size and file name. Colour count and
//! the gradient/detail flags are cosmetic and drawn from a [`RandomSource`],
//! so tests can pin them while production uses a seeded `StdRng`.

use crate::models::{AnalysisResult, Complexity};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Uniform samples in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Size bands, highest first. Only the first match applies.
const SIZE_BANDS: [(usize, i32); 4] = [
    (1_000_000, 4),
    (500_000, 3),
    (200_000, 2),
    (50_000, 1),
];

/// Each hint group contributes once if any of its needles appears in the name.
const NAME_HINTS: [(&[&str], i32); 5] = [
    (&["photo", "realistic"], 3),
    (&["illustration", "mascot"], 2),
    (&["complex", "detailed"], 2),
    (&["logo", "icon"], -1),
    (&["simple", "basic"], -2),
];

pub fn complexity_score(size: usize, filename: &str) -> i32 {
    let size_score = SIZE_BANDS
        .iter()
        .find(|(threshold, _)| size > *threshold)
        .map(|(_, weight)| *weight)
        .unwrap_or(0);

    let name = filename.to_lowercase();
    let name_score: i32 = NAME_HINTS
        .iter()
        .filter(|(needles, _)| needles.iter().any(|n| name.contains(n)))
        .map(|(_, weight)| *weight)
        .sum();

    size_score + name_score
}

pub fn tier_for_score(score: i32) -> Complexity {
    if score >= 5 {
        Complexity::HighlyComplex
    } else if score >= 3 {
        Complexity::Complex
    } else if score >= 1 {
        Complexity::Moderate
    } else {
        Complexity::Simple
    }
}

fn draw_colors(tier: Complexity, rng: &mut dyn RandomSource) -> u32 {
    let (min, max) = tier.color_range();
    let span = max - min + 1;
    let offset = (rng.next_unit() * span as f64).floor() as u32;
    (min + offset).min(max)
}

/// Classifies an image and fills in the tier's price and turnaround.
pub fn estimate(size: usize, filename: &str, rng: &mut dyn RandomSource) -> AnalysisResult {
    let score = complexity_score(size, filename);
    let complexity = tier_for_score(score);
    let estimated_colors = draw_colors(complexity, rng);

    let (has_gradients, has_details) = match complexity {
        Complexity::Simple => (false, false),
        Complexity::Moderate => {
            let gradients = rng.next_unit() > 0.7;
            (gradients, rng.next_unit() > 0.5)
        }
        Complexity::Complex => (rng.next_unit() > 0.4, true),
        Complexity::HighlyComplex => (true, true),
    };

    log::debug!(
        "Scored {} ({} bytes) at {} -> {}",
        filename,
        size,
        score,
        complexity.as_str()
    );

    AnalysisResult {
        complexity,
        estimated_colors,
        has_gradients,
        has_details,
        base_price: complexity.base_price(),
        turnaround_hours: complexity.turnaround_hours(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::VecDeque;

    struct ScriptedRandom(VecDeque<f64>);

    impl ScriptedRandom {
        fn new(values: &[f64]) -> Self {
            Self(values.iter().copied().collect())
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_unit(&mut self) -> f64 {
            self.0.pop_front().unwrap_or(0.0)
        }
    }

    #[test]
    fn large_photo_is_highly_complex() {
        assert_eq!(complexity_score(1_200_000, "photo123.jpg"), 7);

        let result = estimate(1_200_000, "photo123.jpg", &mut SeededRandom::from_seed(1));
        assert_eq!(result.complexity, Complexity::HighlyComplex);
        assert_eq!(result.base_price, Decimal::from(50));
        assert_eq!(result.turnaround_hours, 48);
        assert!(result.has_gradients && result.has_details);
    }

    #[test]
    fn small_simple_icon_is_simple() {
        assert_eq!(complexity_score(10_000, "simple-icon.png"), -3);

        let result = estimate(10_000, "simple-icon.png", &mut SeededRandom::from_seed(1));
        assert_eq!(result.complexity, Complexity::Simple);
        assert_eq!(result.base_price, Decimal::from(5));
        assert_eq!(result.turnaround_hours, 24);
        assert!(!result.has_gradients && !result.has_details);
    }

    #[test]
    fn size_bands_are_exclusive() {
        assert_eq!(complexity_score(50_000, "a.png"), 0);
        assert_eq!(complexity_score(50_001, "a.png"), 1);
        assert_eq!(complexity_score(200_001, "a.png"), 2);
        assert_eq!(complexity_score(500_001, "a.png"), 3);
        assert_eq!(complexity_score(1_000_000, "a.png"), 3);
        assert_eq!(complexity_score(1_000_001, "a.png"), 4);
    }

    #[test]
    fn name_hints_are_case_insensitive_and_additive() {
        assert_eq!(complexity_score(0, "REALISTIC_Mascot.PNG"), 5);
        assert_eq!(complexity_score(0, "detailed-illustration.png"), 4);
        // Both needles of one group only count once.
        assert_eq!(complexity_score(0, "logo-icon.png"), -1);
        assert_eq!(complexity_score(0, "basic-logo.png"), -3);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(tier_for_score(-3), Complexity::Simple);
        assert_eq!(tier_for_score(0), Complexity::Simple);
        assert_eq!(tier_for_score(1), Complexity::Moderate);
        assert_eq!(tier_for_score(2), Complexity::Moderate);
        assert_eq!(tier_for_score(3), Complexity::Complex);
        assert_eq!(tier_for_score(4), Complexity::Complex);
        assert_eq!(tier_for_score(5), Complexity::HighlyComplex);
        assert_eq!(tier_for_score(12), Complexity::HighlyComplex);
    }

    #[test]
    fn tier_is_monotonic_in_score() {
        let mut previous = tier_for_score(-10);
        for score in -9..=20 {
            let tier = tier_for_score(score);
            assert!(tier >= previous, "score {score} dropped from {previous:?} to {tier:?}");
            previous = tier;
        }
    }

    #[test]
    fn price_and_turnaround_depend_only_on_tier() {
        let mut rng = SeededRandom::from_seed(7);
        let names = ["a.png", "logo.png", "photo.jpg", "detailed-mascot.webp", "basic.gif"];
        let sizes = [1_000, 60_000, 250_000, 700_000, 2_000_000];
        for name in names {
            for size in sizes {
                let result = estimate(size, name, &mut rng);
                assert_eq!(result.base_price, result.complexity.base_price());
                assert_eq!(result.turnaround_hours, result.complexity.turnaround_hours());
            }
        }
    }

    #[test]
    fn colors_stay_within_tier_range() {
        let mut rng = SeededRandom::from_seed(42);
        let cases = [
            (1_000, "icon.png"),
            (60_000, "a.png"),
            (250_000, "mascot.png"),
            (2_000_000, "photo.jpg"),
        ];
        for (size, name) in cases {
            for _ in 0..500 {
                let result = estimate(size, name, &mut rng);
                let (min, max) = result.complexity.color_range();
                assert!(
                    (min..=max).contains(&result.estimated_colors),
                    "{} colors outside {}..={} for {:?}",
                    result.estimated_colors,
                    min,
                    max,
                    result.complexity
                );
            }
        }
    }

    #[test]
    fn color_draw_covers_both_ends_of_range() {
        let low = estimate(700_000, "a.png", &mut ScriptedRandom::new(&[0.0]));
        assert_eq!(low.complexity, Complexity::Complex);
        assert_eq!(low.estimated_colors, 6);

        let high = estimate(700_000, "a.png", &mut ScriptedRandom::new(&[0.999]));
        assert_eq!(high.estimated_colors, 10);

        // A source returning exactly 1.0 must not escape the range.
        let clamped = estimate(700_000, "a.png", &mut ScriptedRandom::new(&[1.0]));
        assert_eq!(clamped.estimated_colors, 10);
    }

    #[test]
    fn scripted_source_pins_moderate_flags() {
        let result = estimate(60_000, "a.png", &mut ScriptedRandom::new(&[0.5, 0.71, 0.2]));
        assert_eq!(result.complexity, Complexity::Moderate);
        assert_eq!(result.estimated_colors, 4);
        assert!(result.has_gradients);
        assert!(!result.has_details);
    }

    #[test]
    fn complex_always_has_details() {
        let result = estimate(700_000, "a.png", &mut ScriptedRandom::new(&[0.1, 0.3]));
        assert!(!result.has_gradients);
        assert!(result.has_details);
    }

    #[test]
    fn flag_probabilities_roughly_match_tier() {
        let mut rng = SeededRandom::from_seed(2024);
        let draws = 10_000;

        let (mut gradients, mut details) = (0, 0);
        for _ in 0..draws {
            let r = estimate(60_000, "a.png", &mut rng);
            gradients += r.has_gradients as u32;
            details += r.has_details as u32;
        }
        let g = gradients as f64 / draws as f64;
        let d = details as f64 / draws as f64;
        assert!((0.25..0.35).contains(&g), "moderate gradients at {g}");
        assert!((0.45..0.55).contains(&d), "moderate details at {d}");

        let mut gradients = 0;
        for _ in 0..draws {
            gradients += estimate(700_000, "a.png", &mut rng).has_gradients as u32;
        }
        let g = gradients as f64 / draws as f64;
        assert!((0.55..0.65).contains(&g), "complex gradients at {g}");
    }
}
