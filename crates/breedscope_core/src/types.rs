use std::fmt;

use serde::{Deserialize, Serialize};

/// One label reported by the vision classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    /// Confidence in `[0, 1]`.
    pub probability: f64,
}

impl Classification {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Breed {
    pub name: String,
    pub sub_name: Option<String>,
}

impl fmt::Display for Breed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_name {
            Some(sub) => write!(f, "{} ({sub})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A breed resolved from classifier output, with the confidence of the label it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub confidence: f64,
    pub breed: String,
    pub sub_breed: Option<String>,
}

impl Probe {
    pub fn as_breed(&self) -> Breed {
        Breed {
            name: self.breed.clone(),
            sub_name: self.sub_breed.clone(),
        }
    }
}

/// Outcome of a full identify-then-search run for one picture.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub probe: Probe,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}
