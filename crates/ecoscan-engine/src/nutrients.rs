//! Fold of free-text nutrient observations into a [`NutritionalProfile`].
//!
//! Each observation key is lower-cased and matched against an ordered table
//! of `(canonical field, keywords)` rules. The first rule with a keyword
//! contained in the key decides the bucket, so a key such as
//! `"calorias de gordura"` lands in calories, not fat. Later observations for
//! the same bucket overwrite earlier ones.

use ecoscan_core::{KeywordsFile, NutrientField, NutritionalProfile};

use crate::raw::RawNutrientObservation;

/// Built-in keyword groups, Portuguese and English, in priority order.
const BUILTIN_KEYWORDS: &[(NutrientField, &[&str])] = &[
    (NutrientField::Calories, &["calor", "kcal"]),
    (NutrientField::Protein, &["prote"]),
    (NutrientField::Carbohydrates, &["carb", "hidrat"]),
    (NutrientField::Fat, &["gordura", "lipid", "lipíd", "fat"]),
    (
        NutrientField::Sugar,
        &["açúcar", "açucar", "acucar", "sugar"],
    ),
    (NutrientField::Sodium, &["sódio", "sodio", "sodium"]),
    (NutrientField::Fiber, &["fibra", "fiber", "fibre"]),
];

/// Markers that disqualify a key from a group even when a keyword matches.
/// Labels list energy in both kcal and kJ; only kcal belongs in calories.
const BUILTIN_EXCLUSIONS: &[(NutrientField, &[&str])] = &[(NutrientField::Calories, &["kj"])];

#[derive(Debug, Clone)]
struct NutrientRule {
    field: NutrientField,
    keywords: Vec<String>,
    excludes: &'static [&'static str],
}

impl NutrientRule {
    fn matches(&self, lower_key: &str) -> bool {
        self.keywords.iter().any(|kw| lower_key.contains(kw.as_str()))
            && !self.excludes.iter().any(|marker| lower_key.contains(marker))
    }
}

/// Ordered keyword table driving the nutrient fold.
#[derive(Debug, Clone)]
pub struct NutrientKeywords {
    rules: Vec<NutrientRule>,
}

impl Default for NutrientKeywords {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NutrientKeywords {
    /// The built-in Portuguese/English keyword table.
    #[must_use]
    pub fn builtin() -> Self {
        let rules = BUILTIN_KEYWORDS
            .iter()
            .map(|(field, keywords)| NutrientRule {
                field: *field,
                keywords: keywords.iter().map(|kw| (*kw).to_string()).collect(),
                excludes: BUILTIN_EXCLUSIONS
                    .iter()
                    .find(|(excluded, _)| excluded == field)
                    .map_or(&[], |(_, markers)| *markers),
            })
            .collect();
        Self { rules }
    }

    /// The built-in table with configured keywords appended per field.
    ///
    /// Field priority is unchanged; extra keywords only widen the group they
    /// are attached to.
    #[must_use]
    pub fn with_extensions(extensions: &KeywordsFile) -> Self {
        let mut table = Self::builtin();
        for rule in &mut table.rules {
            for keyword in extensions.extra_keywords(rule.field) {
                let keyword = keyword.to_lowercase();
                if !keyword.is_empty() && !rule.keywords.contains(&keyword) {
                    rule.keywords.push(keyword);
                }
            }
        }
        table
    }

    /// Canonical field for a raw nutrient key, or `None` if nothing matches.
    #[must_use]
    pub fn classify(&self, key: &str) -> Option<NutrientField> {
        let lower = key.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.field)
    }

    /// Keywords currently attached to `field`.
    #[must_use]
    pub fn keywords_for(&self, field: NutrientField) -> &[String] {
        self.rules
            .iter()
            .find(|rule| rule.field == field)
            .map_or(&[], |rule| rule.keywords.as_slice())
    }
}

/// Folds `observations` into a profile with the built-in keyword table.
///
/// `fallback_calories` seeds the calories field before the fold; an
/// observation that maps to calories overwrites it.
#[must_use]
pub fn build_profile(
    observations: &[RawNutrientObservation],
    fallback_calories: f64,
) -> NutritionalProfile {
    NutrientKeywords::builtin().build_profile(observations, fallback_calories)
}

impl NutrientKeywords {
    /// Folds `observations` into a profile using this keyword table.
    #[must_use]
    pub fn build_profile(
        &self,
        observations: &[RawNutrientObservation],
        fallback_calories: f64,
    ) -> NutritionalProfile {
        observations.iter().fold(
            NutritionalProfile::with_calories(fallback_calories),
            |mut profile, observation| {
                match self.classify(&observation.key) {
                    Some(field) => profile.set(field, observation.numeric_value()),
                    None => {
                        tracing::debug!(key = %observation.key, "dropping unrecognized nutrient key");
                    }
                }
                profile
            },
        )
    }
}
