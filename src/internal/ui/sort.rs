use std::cmp::Ordering;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::internal::models::PageDescriptor;

/// Ordering applied to the visible catalog.
///
/// The selector tokens are `alphabetical`, `recent` and `default`; any token
/// the selector does not know maps to [`SortMode::Original`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Display, EnumIter)]
pub enum SortMode {
    #[default]
    #[strum(serialize = "default")]
    Original,
    #[strum(serialize = "alphabetical")]
    Alphabetical,
    #[strum(serialize = "recent")]
    Recent,
}

impl SortMode {
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        Self::iter()
            .find(|mode| mode.to_string() == token)
            .unwrap_or_default()
    }

    /// Next option of the selector in declaration order, wrapping around.
    pub fn next(&self) -> Self {
        Self::iter()
            .skip_while(|mode| mode != self)
            .nth(1)
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Original => "Default",
            Self::Alphabetical => "A-Z",
            Self::Recent => "Most recent",
        }
    }
}

/// Return a sorted copy of `items`; the input slice is never reordered.
///
/// Both sorts are stable, so entries that compare equal keep their manifest
/// order.
pub fn sort_items(items: &[PageDescriptor], mode: SortMode) -> Vec<PageDescriptor> {
    let mut sorted = items.to_vec();
    match mode {
        SortMode::Alphabetical => {
            sorted.sort_by_cached_key(|page| {
                let title = page.effective_title();
                (title.to_lowercase(), title)
            });
        }
        SortMode::Recent => {
            sorted.sort_by(compare_recent);
        }
        SortMode::Original => {}
    }
    sorted
}

fn compare_recent(a: &PageDescriptor, b: &PageDescriptor) -> Ordering {
    b.effective_date().cmp(&a.effective_date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::models::fallback_manifest;

    fn titled(title: &str) -> PageDescriptor {
        PageDescriptor {
            title: Some(title.to_string()),
            ..PageDescriptor::from_file(&format!("{}.html", title))
        }
    }

    fn dated(file: &str, date: Option<&str>) -> PageDescriptor {
        PageDescriptor {
            date_added: date.map(str::to_string),
            ..PageDescriptor::from_file(file)
        }
    }

    fn titles(items: &[PageDescriptor]) -> Vec<String> {
        items.iter().map(|p| p.effective_title()).collect()
    }

    #[test]
    fn test_from_token() {
        assert_eq!(SortMode::from_token("alphabetical"), SortMode::Alphabetical);
        assert_eq!(SortMode::from_token("recent"), SortMode::Recent);
        assert_eq!(SortMode::from_token("default"), SortMode::Original);
        assert_eq!(SortMode::from_token("popularity"), SortMode::Original);
        assert_eq!(SortMode::from_token(""), SortMode::Original);
    }

    #[test]
    fn test_token_display_round_trips() {
        for mode in SortMode::iter() {
            assert_eq!(SortMode::from_token(&mode.to_string()), mode);
        }
    }

    #[test]
    fn test_next_cycles_through_all_modes() {
        let mode = SortMode::Original;
        assert_eq!(mode.next(), SortMode::Alphabetical);
        assert_eq!(mode.next().next(), SortMode::Recent);
        assert_eq!(mode.next().next().next(), mode);
    }

    #[test]
    fn test_alphabetical_is_case_insensitive() {
        let items = vec![titled("B"), titled("a"), titled("C")];
        let sorted = sort_items(&items, SortMode::Alphabetical);
        assert_eq!(titles(&sorted), vec!["a", "B", "C"]);
    }

    #[test]
    fn test_alphabetical_uses_derived_titles() {
        let items = vec![
            PageDescriptor::from_file("zeta-notes.html"),
            PageDescriptor::from_file("AlphaGuide.html"),
        ];
        let sorted = sort_items(&items, SortMode::Alphabetical);
        assert_eq!(titles(&sorted), vec!["Alpha Guide", "zeta notes"]);
    }

    #[test]
    fn test_recent_puts_newest_first() {
        let sorted = sort_items(&fallback_manifest(), SortMode::Recent);
        assert_eq!(sorted.first().unwrap().file, "knowledge-webpage.html");
        assert_eq!(sorted.last().unwrap().file, "EthicalHacking.html");
    }

    #[test]
    fn test_recent_treats_bad_dates_as_default() {
        let items = vec![
            dated("missing.html", None),
            dated("garbage.html", Some("yesterday")),
            dated("dated.html", Some("2024-01-02")),
            dated("old.html", Some("2023-12-31")),
        ];
        let sorted = sort_items(&items, SortMode::Recent);
        let files: Vec<_> = sorted.iter().map(|p| p.file.as_str()).collect();
        // Both undated entries compare as 2024-01-01 and keep their input order.
        assert_eq!(
            files,
            vec!["dated.html", "missing.html", "garbage.html", "old.html"]
        );
    }

    #[test]
    fn test_original_keeps_order() {
        let items = fallback_manifest();
        assert_eq!(sort_items(&items, SortMode::Original), items);
        assert_eq!(
            sort_items(&items, SortMode::from_token("unknown")),
            items
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let items = vec![titled("B"), titled("a"), titled("C")];
        let before = items.clone();
        let _ = sort_items(&items, SortMode::Alphabetical);
        let _ = sort_items(&items, SortMode::Recent);
        assert_eq!(items, before);
    }

    #[test]
    fn test_empty_input() {
        for mode in SortMode::iter() {
            assert!(sort_items(&[], mode).is_empty());
        }
    }
}
