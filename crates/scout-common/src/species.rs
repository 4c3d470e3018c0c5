//! Classification results and the presentation helpers derived from them.
//!
//! The classification service labels species the way the CUB-200 dataset
//! does (`017.Blue_Jay`) and reports confidence as a formatted percentage
//! (`"87.12%"`). These types keep the raw values and add the human-readable
//! forms clients render.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Result returned by the classification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub species: String,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_index: Option<u32>,
}

/// Confidence as reported upstream: either a formatted string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Text(String),
    Number(f64),
}

impl Confidence {
    /// Confidence as a percentage, if it can be read.
    ///
    /// Numbers are taken as percentages unchanged, so `0.5` means half a
    /// percent. Strings contribute their leading decimal number and ignore
    /// whatever follows it (`"92.1% (top)"` reads as 92.1).
    pub fn percent(&self) -> Option<f64> {
        let value = match self {
            Confidence::Text(s) => leading_number_regex().find(s.trim_start())?.as_str().parse::<f64>().ok()?,
            Confidence::Number(n) => *n,
        };
        value.is_finite().then_some(value)
    }
}

fn leading_number_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap())
}

/// Coarse bucket for a confidence percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Moderate,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl ConfidenceLabel {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 90.0 {
            ConfidenceLabel::VeryHigh
        } else if percent >= 75.0 {
            ConfidenceLabel::High
        } else if percent >= 60.0 {
            ConfidenceLabel::Moderate
        } else if percent >= 40.0 {
            ConfidenceLabel::Low
        } else {
            ConfidenceLabel::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::VeryHigh => "Very High",
            ConfidenceLabel::High => "High",
            ConfidenceLabel::Moderate => "Moderate",
            ConfidenceLabel::Low => "Low",
            ConfidenceLabel::VeryLow => "Very Low",
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn index_prefix_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    // Dataset labels look like: 001.Black_footed_Albatross
    RE.get_or_init(|| Regex::new(r"^\d+\.").unwrap())
}

/// Human-readable name for a dataset species label.
///
/// Strips a leading numeric index (`017.`) and turns underscores into spaces.
pub fn common_name(species: &str) -> String {
    index_prefix_regex().replace(species, "").replace('_', " ")
}

/// Classification result enriched with the values a client displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub species: String,
    pub common_name: String,
    pub confidence: Confidence,
    pub confidence_percent: Option<f64>,
    pub confidence_label: Option<ConfidenceLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_index: Option<u32>,
}

impl From<ClassificationResult> for Identification {
    fn from(result: ClassificationResult) -> Self {
        let confidence_percent = result.confidence.percent();
        Self {
            common_name: common_name(&result.species),
            confidence_label: confidence_percent.map(ConfidenceLabel::from_percent),
            confidence_percent,
            confidence: result.confidence,
            class_index: result.class_index,
            species: result.species,
        }
    }
}
