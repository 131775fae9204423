use crate::internal::models::PageDescriptor;

/// Free-text filter typed into the search field.
///
/// Matching is a case-insensitive substring test against the effective title
/// and the entry's own description. The placeholder shown for entries without
/// a description is not searched. An empty query matches every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    needle: String,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let needle = query.to_lowercase();
        Self { query, needle }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.needle)
    }

    pub fn matches_page(&self, page: &PageDescriptor) -> bool {
        if self.is_empty() {
            return true;
        }
        self.matches(&page.effective_title())
            || self.matches(page.description.as_deref().unwrap_or(""))
    }
}
