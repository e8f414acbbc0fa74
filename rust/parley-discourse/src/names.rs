//! First-name lists used to classify discourse referents.
//!
//! The lists are plain data loaded once at session construction; lookups are
//! case-insensitive.

use std::collections::HashSet;

/// Known male and female first names.
#[derive(Debug, Clone, Default)]
pub struct NameList {
    male: HashSet<String>,
    female: HashSet<String>,
}

impl NameList {
    /// Build a list from two name sources, one name per item. Names are
    /// normalized to lowercase.
    pub fn from_lines<M, F>(male: M, female: F) -> Self
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        NameList {
            male: male
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
            female: female
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    pub fn is_male(&self, word: &str) -> bool {
        self.male.contains(&word.to_lowercase())
    }

    pub fn is_female(&self, word: &str) -> bool {
        self.female.contains(&word.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let names = NameList::from_lines(["Joe", "omar"], ["Alice"]);
        assert!(names.is_male("joe"));
        assert!(names.is_male("Omar"));
        assert!(names.is_female("ALICE"));
        assert!(!names.is_male("alice"));
        assert!(!names.is_female("joe"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let names = NameList::from_lines([" ", "joe"], Vec::<String>::new());
        assert!(names.is_male("joe"));
        assert!(!names.is_male(""));
    }
}
