use serde::{Deserialize, Serialize};

pub const MAX_SUGGESTIONS: usize = 5;

/// Up to five city names in model output order. Entries are trimmed,
/// non-empty and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionList {
    items: Vec<String>,
}

impl SuggestionList {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Vec::with_capacity(MAX_SUGGESTIONS);
        for item in items {
            if list.len() == MAX_SUGGESTIONS {
                break;
            }
            let trimmed = item.as_ref().trim();
            if trimmed.is_empty() || list.iter().any(|existing| existing == trimmed) {
                continue;
            }
            list.push(trimmed.to_string());
        }
        Self { items: list }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_trims_dedupes_and_truncates() {
        let list = SuggestionList::from_items([
            " Kraków", "Kraków ", "", "Katowice", "Kielce", "Koszalin", "Kalisz", "Konin",
        ]);
        assert_eq!(
            list.items(),
            ["Kraków", "Katowice", "Kielce", "Koszalin", "Kalisz"]
        );
    }

    #[test]
    fn test_empty_list() {
        let list = SuggestionList::empty();
        assert!(list.is_empty());
        assert_eq!(list.get(0), None);
    }
}
