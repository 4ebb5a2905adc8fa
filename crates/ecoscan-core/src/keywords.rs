//! Optional YAML file that extends the built-in nutrient keyword groups.
//!
//! ```yaml
//! keywords:
//!   sodium: ["salt", "sal"]
//!   fiber: ["dietary fibre"]
//! ```
//!
//! Keywords are appended to the group of the named canonical field; they
//! never change the priority order between fields.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::products::NutrientField;
use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordsFile {
    #[serde(default)]
    pub keywords: HashMap<NutrientField, Vec<String>>,
}

impl KeywordsFile {
    /// Extra keywords configured for `field`, already trimmed and lower-cased.
    #[must_use]
    pub fn extra_keywords(&self, field: NutrientField) -> &[String] {
        self.keywords.get(&field).map_or(&[], Vec::as_slice)
    }
}

/// Load and validate nutrient keyword extensions from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_keywords(path: &Path) -> Result<KeywordsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_keywords(&content)
}

/// Parse and validate keyword extensions from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_keywords(content: &str) -> Result<KeywordsFile, ConfigError> {
    let mut file: KeywordsFile =
        serde_yaml::from_str(content).map_err(ConfigError::KeywordsFileParse)?;

    for keywords in file.keywords.values_mut() {
        for keyword in keywords.iter_mut() {
            *keyword = keyword.trim().to_lowercase();
        }
    }

    validate_keywords(&file)?;

    Ok(file)
}

fn validate_keywords(file: &KeywordsFile) -> Result<(), ConfigError> {
    for (field, keywords) in &file.keywords {
        let mut seen = HashSet::new();
        for keyword in keywords {
            if keyword.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "blank keyword configured for '{field}'"
                )));
            }
            if !seen.insert(keyword.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate keyword '{keyword}' for '{field}'"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "keywords_test.rs"]
mod tests;
