use std::collections::{BTreeMap, BTreeSet};

/// Immutable lookup of known breeds and their sub-breeds. Keys and sub-breed
/// names are stored lower-cased; every query is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BreedIndex {
    breeds: BTreeMap<String, BTreeSet<String>>,
}

impl BreedIndex {
    /// Builds the index from a catalog listing (breed name → sub-breed names).
    /// Names differing only by case are merged.
    pub fn from_listing<I, S>(listing: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: AsRef<str>,
    {
        let mut breeds: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, subs) in listing {
            breeds
                .entry(name.as_ref().to_lowercase())
                .or_default()
                .extend(subs.iter().map(|sub| sub.to_lowercase()));
        }
        Self { breeds }
    }

    pub fn contains_breed(&self, name: &str) -> bool {
        self.breeds.contains_key(&name.to_lowercase())
    }

    pub fn sub_breeds(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.breeds.get(&name.to_lowercase())
    }

    pub fn has_sub_breed(&self, name: &str, sub: &str) -> bool {
        self.sub_breeds(name)
            .is_some_and(|subs| subs.contains(&sub.to_lowercase()))
    }

    pub fn breeds(&self) -> impl Iterator<Item = &str> {
        self.breeds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.breeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breeds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::BreedIndex;

    fn index() -> BreedIndex {
        BreedIndex::from_listing([
            ("Pug", vec![]),
            ("hound", vec!["Afghan".to_string(), "basset".to_string()]),
            ("HOUND", vec!["blood".to_string()]),
        ])
    }

    #[test]
    fn keys_and_subs_are_case_folded() {
        let index = index();
        assert!(index.contains_breed("pug"));
        assert!(index.contains_breed("PUG"));
        assert!(index.has_sub_breed("Hound", "AFGHAN"));
        assert_eq!(index.breeds().collect::<Vec<_>>(), vec!["hound", "pug"]);
    }

    #[test]
    fn duplicate_keys_merge_sub_breeds() {
        let index = index();
        assert_eq!(index.len(), 2);
        let subs: Vec<_> = index.sub_breeds("hound").unwrap().iter().cloned().collect();
        assert_eq!(subs, vec!["afghan", "basset", "blood"]);
    }

    #[test]
    fn unknown_breed_has_no_sub_breeds() {
        let index = index();
        assert!(index.sub_breeds("corgi").is_none());
        assert!(!index.has_sub_breed("pug", "black"));
        assert!(BreedIndex::default().is_empty());
    }
}
