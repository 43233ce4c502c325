//! Turns ranked classifier labels into a breed match.
//!
//! Classifier labels are noisy: they list comma-separated synonyms
//! ("Chihuahua, Mexican dog") and multi-word names ("German shepherd"). A label
//! resolves when one of its tokens names a known breed; a sub-breed is then
//! looked up among the remaining words of the same label.

use std::cmp::Ordering;

use crate::{Breed, BreedIndex, Classification, Probe};

pub struct Classifier<'a> {
    index: &'a BreedIndex,
}

impl<'a> Classifier<'a> {
    pub fn new(index: &'a BreedIndex) -> Self {
        Self { index }
    }

    /// Returns the first resolvable label, highest probability first.
    pub fn classify(&self, classifications: &[Classification]) -> Option<Probe> {
        rank(classifications).into_iter().find_map(|entry| {
            self.resolve(&entry.label).map(|breed| Probe {
                confidence: entry.probability,
                breed: breed.name,
                sub_breed: breed.sub_name,
            })
        })
    }

    /// Resolves a single label against the index.
    pub fn resolve(&self, label: &str) -> Option<Breed> {
        let label = label.to_lowercase();
        let fragments: Vec<&str> = label
            .split(',')
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .collect();

        fragments.iter().find_map(|fragment| {
            let words: Vec<&str> = tokens(fragment).collect();
            let name = words
                .iter()
                .copied()
                .find(|word| self.index.contains_breed(word))?;
            // Tokens of the matched fragment first, then whole synonyms of the label.
            let sub_name = words
                .iter()
                .chain(fragments.iter())
                .copied()
                .find(|candidate| self.index.has_sub_breed(name, candidate));
            Some(Breed {
                name: name.to_string(),
                sub_name: sub_name.map(str::to_string),
            })
        })
    }
}

/// Stable sort by descending probability. NaN ranks as zero.
pub fn rank(classifications: &[Classification]) -> Vec<&Classification> {
    let mut ranked: Vec<&Classification> = classifications.iter().collect();
    ranked.sort_by(|a, b| by_probability_desc(a.probability, b.probability));
    ranked
}

fn by_probability_desc(a: f64, b: f64) -> Ordering {
    let key = |p: f64| if p.is_nan() { 0.0 } else { p };
    key(b).total_cmp(&key(a))
}

fn tokens(fragment: &str) -> impl Iterator<Item = &str> {
    fragment
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|token| !token.is_empty())
}
