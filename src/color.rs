//! Label to color lookup.
//!
//! A [`ColorTable`] maps entity labels to display colors and falls back to a
//! neutral gray for anything it does not know. Two built-in tables exist, one
//! per [`Domain`]; which one is active is always the caller's choice.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Color used for labels missing from a table.
pub const FALLBACK_COLOR: &str = "#666666";

/// A CSS hex color (`#RGB` or `#RRGGBB`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Parse a hex color, returning `None` if it is not `#RGB` or `#RRGGBB`.
    pub fn parse(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#')?;
        let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
        if valid {
            Some(Color(value.to_string()))
        } else {
            None
        }
    }

    pub fn fallback() -> Self {
        Color(FALLBACK_COLOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can pick a color for a label.
///
/// Implementations must be total: unknown labels get a color too.
pub trait ColorResolver {
    fn resolve(&self, label: &str) -> Color;
}

impl<F> ColorResolver for F
where
    F: Fn(&str) -> Color,
{
    fn resolve(&self, label: &str) -> Color {
        self(label)
    }
}

/// A label to color table with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    colors: BTreeMap<String, Color>,
    fallback: Color,
}

#[derive(Deserialize)]
struct ColorTableFile {
    fallback: Option<String>,
    #[serde(default)]
    colors: BTreeMap<String, String>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self {
            colors: BTreeMap::new(),
            fallback: Color::fallback(),
        }
    }

    /// Build from static `(label, hex)` pairs.
    ///
    /// Pairs whose color does not parse are skipped.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let colors = pairs
            .into_iter()
            .filter_map(|(label, hex)| Color::parse(hex).map(|color| (label.to_string(), color)))
            .collect();
        Self {
            colors,
            fallback: Color::fallback(),
        }
    }

    /// Parse a table from TOML:
    ///
    /// ```toml
    /// fallback = "#999999"
    ///
    /// [colors]
    /// SIGN_SYMPTOM = "#FF0000"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ColorTableFile = toml::from_str(content)?;

        let fallback = match file.fallback {
            Some(value) => Color::parse(&value).ok_or_else(|| ConfigError::InvalidColor {
                key: "fallback".to_string(),
                value,
            })?,
            None => Color::fallback(),
        };

        let mut colors = BTreeMap::new();
        for (label, value) in file.colors {
            match Color::parse(&value) {
                Some(color) => {
                    colors.insert(label, color);
                }
                None => return Err(ConfigError::InvalidColor { key: label, value }),
            }
        }

        Ok(Self { colors, fallback })
    }

    /// Load a TOML table from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_color(mut self, label: impl Into<String>, color: Color) -> Self {
        self.colors.insert(label.into(), color);
        self
    }

    pub fn with_fallback(mut self, fallback: Color) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn get(&self, label: &str) -> Option<&Color> {
        self.colors.get(label)
    }

    pub fn fallback_color(&self) -> &Color {
        &self.fallback
    }

    /// Configured labels in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Color)> {
        self.colors.iter().map(|(label, color)| (label.as_str(), color))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorResolver for ColorTable {
    fn resolve(&self, label: &str) -> Color {
        match self.colors.get(label) {
            Some(color) => color.clone(),
            None => {
                tracing::trace!(label, fallback = %self.fallback, "no color for label");
                self.fallback.clone()
            }
        }
    }
}

/// Vocabulary profile selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Medical,
    Financial,
}

impl Domain {
    /// `"financial"` selects [`Domain::Financial`]; anything else is medical.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("financial") {
            Domain::Financial
        } else {
            Domain::Medical
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Domain::Medical => "medical",
            Domain::Financial => "financial",
        }
    }

    pub fn color_table(self) -> &'static ColorTable {
        match self {
            Domain::Medical => &MEDICAL_COLORS,
            Domain::Financial => &FINANCIAL_COLORS,
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Domain::Medical
    }
}

static MEDICAL_COLORS: Lazy<ColorTable> = Lazy::new(|| {
    ColorTable::from_pairs(vec![
        ("DATE", "#FF9800"),
        ("AGE", "#E91E63"),
        ("SIGN_SYMPTOM", "#FF0000"),
        ("TIME", "#673AB7"),
        ("HEIGHT", "#3F51B5"),
        ("CLINICAL_EVENT", "#2196F3"),
        ("SHAPE", "#03A9F4"),
        ("FREQUENCY", "#00BCD4"),
        ("BIOLOGICAL_STRUCTURE", "#009688"),
        ("AREA", "#4CAF50"),
        ("WEIGHT", "#8BC34A"),
        ("TEXTURE", "#CDDC39"),
        ("COREFERENCE", "#FFEB3B"),
        ("MEDICATION", "#FFC107"),
        ("MASS", "#FF9800"),
        ("SEVERITY", "#FF5722"),
        ("BIOLOGICAL_ATTRIBUTE", "#795548"),
        ("DISEASE_DISORDER", "#00FF00"),
        ("DURATION", "#607D8B"),
        ("VOLUME", "#D32F2F"),
        ("THERAPEUTIC_PROCEDURE", "#C2185B"),
        ("ADMINISTRATION", "#7B1FA2"),
        ("ACTIVITY", "#512DA8"),
        ("SUBJECT", "#303F9F"),
        ("FAMILY_HISTORY", "#1976D2"),
        ("HISTORY", "#0288D1"),
        ("QUANTITATIVE_CONCEPT", "#0097A7"),
        ("LAB_VALUE", "#00796B"),
        ("DETAILED_DESCRIPTION", "#388E3C"),
        ("DIAGNOSTIC_PROCEDURE", "#689F38"),
        ("NONBIOLOGICAL_LOCATION", "#AFB42B"),
        ("OUTCOME", "#FBC02D"),
        ("SEX", "#FFA000"),
        ("COLOR", "#F57C00"),
        ("QUALITATIVE_CONCEPT", "#E64A19"),
        ("DISTANCE", "#5D4037"),
        ("PERSONAL_BACKGROUND", "#616161"),
        ("OTHER_ENTITY", "#455A64"),
        ("OTHER_EVENT", "#C62828"),
        ("DOSAGE", "#AD1457"),
        ("OCCUPATION", "#880E4F"),
        (crate::span::COMBINED_BIO_SYMPTOM, "#FF4500"),
    ])
});

static FINANCIAL_COLORS: Lazy<ColorTable> = Lazy::new(|| {
    ColorTable::from_pairs(vec![
        ("CURRENCY", "#4CAF50"),
        ("FINANCIAL_RATIO", "#2196F3"),
        ("FINANCIAL_INSTRUMENT", "#FF9800"),
        ("FINANCIAL_INSTITUTION", "#9C27B0"),
        ("FINANCIAL_INDICATOR", "#F44336"),
        ("ACCOUNTING_TERM", "#607D8B"),
        ("ORG", "#3F51B5"),
        ("MISC", "#795548"),
        ("PER", "#E91E63"),
    ])
});
