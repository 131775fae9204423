//! View state over the loaded manifest.
//!
//! [`CatalogView`] owns the working set and recomputes the visible cards from
//! scratch whenever the search text or sort mode changes. The terminal layer
//! only paints whatever [`RenderedList`] it is handed.

use crate::internal::models::PageDescriptor;
use crate::internal::search::SearchQuery;
use crate::internal::ui::sort::{SortMode, sort_items};
use crate::utils::url::page_path;

/// Site path prefix under which every catalog page is served.
pub const PAGES_PREFIX: &str = "/roadmaps/";

/// One rendered catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub file: String,
    pub title: String,
    pub href: String,
    pub description: String,
    pub open_href: String,
    /// Lowercased effective title, exposed for external filtering or styling.
    pub title_key: String,
    pub category: String,
}

impl Card {
    pub fn from_page(page: &PageDescriptor, prefix: &str) -> Self {
        let title = page.effective_title();
        let href = page_path(prefix, &page.file);
        Self {
            file: page.file.clone(),
            title_key: title.to_lowercase(),
            title,
            open_href: href.clone(),
            href,
            description: page.effective_description().to_string(),
            category: page.effective_category().to_string(),
        }
    }
}

/// Result of one recompute: either the list container is filled with cards
/// and the empty-state indicator hidden, or the list is cleared and the
/// indicator shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedList {
    Empty,
    Cards(Vec<Card>),
}

impl RenderedList {
    pub fn cards(&self) -> &[Card] {
        match self {
            Self::Empty => &[],
            Self::Cards(cards) => cards,
        }
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn shows_empty_state(&self) -> bool {
        self.is_empty()
    }
}

/// Filter, sort and render `items` in one pass.
pub fn render_list(
    items: &[PageDescriptor],
    query: &SearchQuery,
    mode: SortMode,
    prefix: &str,
) -> RenderedList {
    let filtered: Vec<PageDescriptor> = items
        .iter()
        .filter(|page| query.matches_page(page))
        .cloned()
        .collect();

    let sorted = sort_items(&filtered, mode);
    if sorted.is_empty() {
        return RenderedList::Empty;
    }

    RenderedList::Cards(
        sorted
            .iter()
            .map(|page| Card::from_page(page, prefix))
            .collect(),
    )
}

#[derive(Debug, Clone)]
pub struct CatalogView {
    items: Vec<PageDescriptor>,
    search: SearchQuery,
    sort_mode: SortMode,
    prefix: String,
    visible: RenderedList,
}

impl CatalogView {
    pub fn new(items: Vec<PageDescriptor>, sort_mode: SortMode) -> Self {
        Self::with_prefix(items, sort_mode, PAGES_PREFIX)
    }

    pub fn with_prefix(items: Vec<PageDescriptor>, sort_mode: SortMode, prefix: &str) -> Self {
        let mut view = Self {
            items,
            search: SearchQuery::default(),
            sort_mode,
            prefix: prefix.to_string(),
            visible: RenderedList::Empty,
        };
        view.recompute();
        view
    }

    /// View with no working set and the empty state forced visible.
    pub fn empty(sort_mode: SortMode) -> Self {
        Self::new(Vec::new(), sort_mode)
    }

    pub fn items(&self) -> &[PageDescriptor] {
        &self.items
    }

    pub fn search_text(&self) -> &str {
        &self.search.query
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn visible(&self) -> &RenderedList {
        &self.visible
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> &RenderedList {
        self.search = SearchQuery::new(text);
        self.recompute()
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) -> &RenderedList {
        self.sort_mode = mode;
        self.recompute()
    }

    pub fn recompute(&mut self) -> &RenderedList {
        self.visible = render_list(&self.items, &self.search, self.sort_mode, &self.prefix);
        tracing::debug!(
            query = %self.search.query,
            sort = %self.sort_mode,
            visible = self.visible.len(),
            "Recomputed catalog view"
        );
        &self.visible
    }
}
