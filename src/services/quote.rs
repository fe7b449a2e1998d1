// src/services/quote.rs
use crate::models::{AddOn, AnalysisResult, Complexity, PricingTier, Quote};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeSet;
use std::num::NonZeroU32;

pub const RUSH_ADD_ON: &str = "rush";

pub fn add_on_catalog() -> Vec<AddOn> {
    vec![
        AddOn {
            id: RUSH_ADD_ON,
            name: "Rush Delivery",
            description: "Get your files in half the time",
            price: Decimal::from(5),
        },
        AddOn {
            id: "multiFormat",
            name: "Multiple Formats",
            description: "AI, EPS, SVG, PDF + PNG files",
            price: Decimal::from(3),
        },
        AddOn {
            id: "colorVariants",
            name: "Color Variants",
            description: "Get 3 color variations of your design",
            price: Decimal::from(8),
        },
        AddOn {
            id: "sourceLayers",
            name: "Organized Layers",
            description: "Properly named and organized layers",
            price: Decimal::from(3),
        },
        AddOn {
            id: "priority",
            name: "Priority Support",
            description: "Direct communication with designer",
            price: Decimal::from(5),
        },
    ]
}

pub fn add_on_price(id: &str) -> Option<Decimal> {
    add_on_catalog()
        .into_iter()
        .find(|a| a.id == id)
        .map(|a| a.price)
}

pub fn pricing_tiers() -> Vec<PricingTier> {
    let features: [&'static [&'static str]; 4] = [
        &[
            "1-2 colors",
            "Clean outlines only",
            "24-hour delivery",
            "AI & EPS format",
            "1 revision",
        ],
        &[
            "3-5 colors",
            "Moderate detail",
            "18-hour delivery",
            "AI, EPS & SVG format",
            "2 revisions",
        ],
        &[
            "6-10 colors",
            "High detail & curves",
            "24-hour delivery",
            "All formats included",
            "3 revisions",
        ],
        &[
            "Unlimited colors",
            "Gradients & effects",
            "48-hour delivery",
            "All formats + source",
            "Unlimited revisions",
        ],
    ];
    let descriptions = [
        "Simple logos, icons, text-based designs",
        "Detailed logos, badges, emblems",
        "Complex illustrations, mascots",
        "Photo-realistic, intricate artwork",
    ];

    Complexity::ALL
        .iter()
        .zip(descriptions)
        .zip(features)
        .map(|((&complexity, description), features)| PricingTier {
            name: complexity.label(),
            complexity,
            description,
            price: complexity.base_price(),
            turnaround_hours: complexity.turnaround_hours(),
            features,
            popular: complexity == Complexity::Moderate,
        })
        .collect()
}

/// Bulk discount as `(percentage, label)`. Higher counts win.
pub fn bulk_discount(image_count: u32) -> (u32, Option<&'static str>) {
    if image_count >= 10 {
        (20, Some("20% Bulk Discount (10+ images)"))
    } else if image_count >= 5 {
        (10, Some("10% Bulk Discount (5+ images)"))
    } else {
        (0, None)
    }
}

/// Turnaround shown to the customer; rush halves it, rounding up.
pub fn displayed_turnaround(turnaround_hours: u32, rush: bool) -> u32 {
    if rush {
        turnaround_hours.div_ceil(2)
    } else {
        turnaround_hours
    }
}

/// Prices an analysed image. Add-on ids are treated as a set and ids missing
/// from the catalog contribute nothing.
pub fn calculate_quote<S: AsRef<str>>(
    analysis: &AnalysisResult,
    image_count: NonZeroU32,
    add_ons: &[S],
) -> Quote {
    let selected: BTreeSet<&str> = add_ons.iter().map(|s| s.as_ref()).collect();

    let add_on_total: Decimal = selected.iter().filter_map(|id| add_on_price(id)).sum();

    let count = image_count.get();
    let subtotal = analysis.base_price * Decimal::from(count) + add_on_total;

    let (discount_percentage, discount_label) = bulk_discount(count);
    let multiplier = Decimal::ONE - Decimal::new(discount_percentage as i64, 2);
    let total = (subtotal * multiplier)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Quote {
        complexity: analysis.complexity,
        image_count: count,
        add_ons: selected.iter().map(|id| id.to_string()).collect(),
        base_price: analysis.base_price,
        add_on_total,
        subtotal,
        discount_percentage,
        discount_label,
        discount_amount: subtotal - total,
        total,
        turnaround_hours: displayed_turnaround(
            analysis.turnaround_hours,
            selected.contains(RUSH_ADD_ON),
        ),
    }
}
