//! Rule-based health and sustainability scores.
//!
//! Both scores start at [`BASE_SCORE`], add one adjustment per criterion and
//! clamp to `0..=100`. A criterion is an ordered list of threshold bands;
//! the first band whose threshold the value crosses applies and the rest
//! are skipped. Missing signals are scored as `0.0`, which can only trigger
//! the "below" bands.

use ecoscan_core::{NutritionalProfile, PackagingType};

pub const BASE_SCORE: i32 = 50;

#[derive(Debug, Clone, Copy)]
enum Threshold {
    Above(f64),
    Below(f64),
}

#[derive(Debug, Clone, Copy)]
struct Band {
    threshold: Threshold,
    adjustment: i32,
}

impl Band {
    const fn above(limit: f64, adjustment: i32) -> Self {
        Self {
            threshold: Threshold::Above(limit),
            adjustment,
        }
    }

    const fn below(limit: f64, adjustment: i32) -> Self {
        Self {
            threshold: Threshold::Below(limit),
            adjustment,
        }
    }

    fn applies_to(&self, value: f64) -> bool {
        match self.threshold {
            Threshold::Above(limit) => value > limit,
            Threshold::Below(limit) => value < limit,
        }
    }
}

/// kg CO2 per unit.
const CARBON_BANDS: &[Band] = &[
    Band::above(2.0, -30),
    Band::above(1.0, -15),
    Band::below(0.5, 20),
];

/// Litres per unit.
const WATER_BANDS: &[Band] = &[
    Band::above(300.0, -20),
    Band::above(200.0, -10),
    Band::below(100.0, 15),
];

const ORIGIN_BONUS: i32 = 15;

const CALORIE_BANDS: &[Band] = &[
    Band::above(400.0, -20),
    Band::above(300.0, -10),
    Band::below(100.0, 10),
];

const SUGAR_BANDS: &[Band] = &[
    Band::above(30.0, -25),
    Band::above(20.0, -15),
    Band::below(10.0, 10),
];

const SODIUM_BANDS: &[Band] = &[Band::above(500.0, -20), Band::above(300.0, -10)];

const PROTEIN_BANDS: &[Band] = &[Band::above(15.0, 15), Band::above(10.0, 10)];

const FIBER_BANDS: &[Band] = &[Band::above(8.0, 10), Band::above(5.0, 5)];

const BIODEGRADABLE_TOKENS: &[&str] = &["biodegrad"];
const RECYCLABLE_TOKENS: &[&str] = &["recic", "recycl"];
const GLASS_TOKENS: &[&str] = &["vidro", "glass"];
const PAPER_TOKENS: &[&str] = &["papel", "paper", "cartão", "cardboard"];

fn band_adjustment(value: f64, bands: &[Band]) -> i32 {
    bands
        .iter()
        .find(|band| band.applies_to(value))
        .map_or(0, |band| band.adjustment)
}

fn clamp_score(raw: i32) -> u8 {
    // Infallible after the clamp.
    u8::try_from(raw.clamp(0, 100)).unwrap_or(0)
}

fn contains_any(haystack: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| haystack.contains(token))
}

/// Sustainability score from carbon per unit, water per unit and origin text.
///
/// Origin text mentioning recycling or biodegradability earns a flat bonus.
#[must_use]
pub fn sustainability_score(carbon_footprint: f64, water_usage: f64, origin: &str) -> u8 {
    let origin = origin.to_lowercase();
    let origin_bonus = if contains_any(&origin, RECYCLABLE_TOKENS)
        || contains_any(&origin, BIODEGRADABLE_TOKENS)
    {
        ORIGIN_BONUS
    } else {
        0
    };

    clamp_score(
        BASE_SCORE
            + band_adjustment(carbon_footprint, CARBON_BANDS)
            + band_adjustment(water_usage, WATER_BANDS)
            + origin_bonus,
    )
}

/// Health score from a nutritional profile.
///
/// Calories, sugar, sodium, protein and fiber each contribute independently.
#[must_use]
pub fn health_score(profile: &NutritionalProfile) -> u8 {
    clamp_score(
        BASE_SCORE
            + band_adjustment(profile.calories, CALORIE_BANDS)
            + band_adjustment(profile.sugar, SUGAR_BANDS)
            + band_adjustment(profile.sodium, SODIUM_BANDS)
            + band_adjustment(profile.protein, PROTEIN_BANDS)
            + band_adjustment(profile.fiber, FIBER_BANDS),
    )
}

/// Packaging classification from free-text origin, `Plastic` when unknown.
#[must_use]
pub fn classify_packaging(origin: &str) -> PackagingType {
    let origin = origin.to_lowercase();
    if contains_any(&origin, BIODEGRADABLE_TOKENS) {
        PackagingType::Biodegradable
    } else if contains_any(&origin, RECYCLABLE_TOKENS) {
        PackagingType::Recyclable
    } else if contains_any(&origin, GLASS_TOKENS) {
        PackagingType::Glass
    } else if contains_any(&origin, PAPER_TOKENS) {
        PackagingType::Paper
    } else {
        PackagingType::Plastic
    }
}
