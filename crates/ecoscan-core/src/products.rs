use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One of the seven canonical nutrient buckets of a [`NutritionalProfile`].
///
/// [`NutrientField::ALL`] is also the priority order used when a free-text
/// nutrient key matches keywords of more than one field: the earliest field
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientField {
    Calories,
    Protein,
    Carbohydrates,
    Fat,
    Sugar,
    Sodium,
    Fiber,
}

impl NutrientField {
    /// All fields, in match-priority order.
    pub const ALL: [NutrientField; 7] = [
        NutrientField::Calories,
        NutrientField::Protein,
        NutrientField::Carbohydrates,
        NutrientField::Fat,
        NutrientField::Sugar,
        NutrientField::Sodium,
        NutrientField::Fiber,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NutrientField::Calories => "calories",
            NutrientField::Protein => "protein",
            NutrientField::Carbohydrates => "carbohydrates",
            NutrientField::Fat => "fat",
            NutrientField::Sugar => "sugar",
            NutrientField::Sodium => "sodium",
            NutrientField::Fiber => "fiber",
        }
    }
}

impl std::fmt::Display for NutrientField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NutrientField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NutrientField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::UnknownNutrientField(s.to_string()))
    }
}

/// Fixed-shape nutritional breakdown of a product.
///
/// Values are carried verbatim from the catalog; nothing here is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionalProfile {
    /// Energy in kcal.
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub sugar: f64,
    /// Sodium in mg.
    pub sodium: f64,
    pub fiber: f64,
}

impl NutritionalProfile {
    /// A profile with every field at zero except `calories`.
    #[must_use]
    pub fn with_calories(calories: f64) -> Self {
        Self {
            calories,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn get(&self, field: NutrientField) -> f64 {
        match field {
            NutrientField::Calories => self.calories,
            NutrientField::Protein => self.protein,
            NutrientField::Carbohydrates => self.carbohydrates,
            NutrientField::Fat => self.fat,
            NutrientField::Sugar => self.sugar,
            NutrientField::Sodium => self.sodium,
            NutrientField::Fiber => self.fiber,
        }
    }

    pub fn set(&mut self, field: NutrientField, value: f64) {
        let slot = match field {
            NutrientField::Calories => &mut self.calories,
            NutrientField::Protein => &mut self.protein,
            NutrientField::Carbohydrates => &mut self.carbohydrates,
            NutrientField::Fat => &mut self.fat,
            NutrientField::Sugar => &mut self.sugar,
            NutrientField::Sodium => &mut self.sodium,
            NutrientField::Fiber => &mut self.fiber,
        };
        *slot = value;
    }
}

/// Closed packaging classification used for sustainability display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingType {
    Recyclable,
    Biodegradable,
    #[default]
    Plastic,
    Glass,
    Paper,
}

impl PackagingType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PackagingType::Recyclable => "recyclable",
            PackagingType::Biodegradable => "biodegradable",
            PackagingType::Plastic => "plastic",
            PackagingType::Glass => "glass",
            PackagingType::Paper => "paper",
        }
    }
}

impl std::fmt::Display for PackagingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackagingType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recyclable" => Ok(PackagingType::Recyclable),
            "biodegradable" => Ok(PackagingType::Biodegradable),
            "plastic" => Ok(PackagingType::Plastic),
            "glass" => Ok(PackagingType::Glass),
            "paper" => Ok(PackagingType::Paper),
            other => Err(CoreError::InvalidPackagingType(other.to_string())),
        }
    }
}

/// Environmental signals for a product plus the derived sustainability score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    /// kg CO2 per unit.
    pub carbon_footprint: f64,
    /// Litres of water per unit.
    pub water_usage: f64,
    pub packaging_type: PackagingType,
    /// Always within `0..=100`.
    pub sustainability_score: u8,
}

/// A catalog product normalized for display and history snapshots.
///
/// Built fresh by the normalizer on every call and never mutated in place;
/// [`Product::with_alternatives`] returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Upstream catalog identity.
    pub id: String,
    pub name: String,
    /// Category label shown where a brand would be.
    pub brand: String,
    pub barcode: String,
    /// Display image URL.
    pub image: String,
    pub nutritional_info: NutritionalProfile,
    pub environmental_impact: EnvironmentalImpact,
    /// Always within `0..=100`.
    pub health_score: u8,
    /// Mirrors `environmental_impact.sustainability_score`.
    pub sustainability_score: u8,
    /// Catalog identities of suggested alternatives, in display order.
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl Product {
    /// Returns a copy of this product carrying the given alternative identities.
    ///
    /// The product's own identity is never listed as its own alternative.
    #[must_use]
    pub fn with_alternatives(self, alternatives: Vec<String>) -> Self {
        let alternatives = alternatives
            .into_iter()
            .filter(|alt| *alt != self.id)
            .collect();
        Self {
            alternatives,
            ..self
        }
    }

    /// Rating band for the health score.
    #[must_use]
    pub fn health_rating(&self) -> ScoreRating {
        ScoreRating::from_score(self.health_score)
    }

    /// Rating band for the sustainability score.
    #[must_use]
    pub fn sustainability_rating(&self) -> ScoreRating {
        ScoreRating::from_score(self.sustainability_score)
    }
}

/// Display band for a `0..=100` score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreRating {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreRating::Excellent,
            60..=79 => ScoreRating::Good,
            40..=59 => ScoreRating::Fair,
            _ => ScoreRating::Poor,
        }
    }
}

impl std::fmt::Display for ScoreRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreRating::Excellent => write!(f, "excellent"),
            ScoreRating::Good => write!(f, "good"),
            ScoreRating::Fair => write!(f, "fair"),
            ScoreRating::Poor => write!(f, "poor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: "Granola Artesanal".to_string(),
            brand: "Cereais".to_string(),
            barcode: "7891234567892".to_string(),
            image: "https://cdn.example.com/granola.png".to_string(),
            nutritional_info: NutritionalProfile::with_calories(410.0),
            environmental_impact: EnvironmentalImpact {
                carbon_footprint: 1.2,
                water_usage: 150.0,
                packaging_type: PackagingType::Paper,
                sustainability_score: 35,
            },
            health_score: 72,
            sustainability_score: 35,
            alternatives: Vec::new(),
        }
    }

    #[test]
    fn nutrient_field_all_is_priority_order() {
        assert_eq!(NutrientField::ALL[0], NutrientField::Calories);
        assert_eq!(NutrientField::ALL[6], NutrientField::Fiber);
    }

    #[test]
    fn nutrient_field_parses_canonical_names() {
        for field in NutrientField::ALL {
            assert_eq!(field.as_str().parse::<NutrientField>().unwrap(), field);
        }
    }

    #[test]
    fn nutrient_field_rejects_unknown_name() {
        let err = "vitamin_c".parse::<NutrientField>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownNutrientField(ref v) if v == "vitamin_c"));
    }

    #[test]
    fn with_calories_zeroes_other_fields() {
        let profile = NutritionalProfile::with_calories(250.0);
        assert_eq!(profile.calories, 250.0);
        for field in &NutrientField::ALL[1..] {
            assert_eq!(profile.get(*field), 0.0, "{field} should default to zero");
        }
    }

    #[test]
    fn set_then_get_targets_the_same_bucket() {
        let mut profile = NutritionalProfile::default();
        profile.set(NutrientField::Sodium, 480.0);
        assert_eq!(profile.sodium, 480.0);
        assert_eq!(profile.get(NutrientField::Sodium), 480.0);
        assert_eq!(profile.sugar, 0.0);
    }

    #[test]
    fn packaging_type_defaults_to_plastic() {
        assert_eq!(PackagingType::default(), PackagingType::Plastic);
    }

    #[test]
    fn packaging_type_serializes_lowercase() {
        let json = serde_json::to_string(&PackagingType::Biodegradable).unwrap();
        assert_eq!(json, "\"biodegradable\"");
    }

    #[test]
    fn packaging_type_rejects_unknown_name() {
        assert!(matches!(
            "styrofoam".parse::<PackagingType>(),
            Err(CoreError::InvalidPackagingType(_))
        ));
    }

    #[test]
    fn with_alternatives_returns_new_product_with_ids() {
        let product = make_product("3");
        let updated = product
            .clone()
            .with_alternatives(vec!["1".to_string(), "2".to_string()]);
        assert!(product.alternatives.is_empty());
        assert_eq!(updated.alternatives, vec!["1", "2"]);
        assert_eq!(updated.id, product.id);
    }

    #[test]
    fn with_alternatives_drops_self_reference() {
        let product = make_product("3").with_alternatives(vec!["3".to_string(), "4".to_string()]);
        assert_eq!(product.alternatives, vec!["4"]);
    }

    #[test]
    fn score_rating_bands() {
        assert_eq!(ScoreRating::from_score(100), ScoreRating::Excellent);
        assert_eq!(ScoreRating::from_score(80), ScoreRating::Excellent);
        assert_eq!(ScoreRating::from_score(79), ScoreRating::Good);
        assert_eq!(ScoreRating::from_score(60), ScoreRating::Good);
        assert_eq!(ScoreRating::from_score(59), ScoreRating::Fair);
        assert_eq!(ScoreRating::from_score(40), ScoreRating::Fair);
        assert_eq!(ScoreRating::from_score(39), ScoreRating::Poor);
        assert_eq!(ScoreRating::from_score(0), ScoreRating::Poor);
    }

    #[test]
    fn product_ratings_follow_scores() {
        let product = make_product("3");
        assert_eq!(product.health_rating(), ScoreRating::Good);
        assert_eq!(product.sustainability_rating(), ScoreRating::Poor);
    }

    #[test]
    fn serde_roundtrip_product() {
        let product = make_product("3").with_alternatives(vec!["1".to_string()]);
        let json = serde_json::to_string(&product).expect("serialization failed");
        let decoded: Product = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded, product);
    }

    #[test]
    fn product_without_alternatives_field_deserializes() {
        let mut value = serde_json::to_value(make_product("9")).unwrap();
        value.as_object_mut().unwrap().remove("alternatives");
        let decoded: Product = serde_json::from_value(value).unwrap();
        assert!(decoded.alternatives.is_empty());
    }
}
