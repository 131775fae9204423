pub mod api;
pub mod config;
pub mod internal;
pub mod tui;
pub mod utils;

/// The catalog's four core operations, grouped for reuse outside the
/// terminal front-end.
pub mod roadmaps {
    pub use crate::api::{LoadedManifest, ManifestLoader, ManifestSource, load_manifest};
    pub use crate::internal::catalog::{Card, CatalogView, RenderedList, render_list};
    pub use crate::internal::models::{PageDescriptor, fallback_manifest};
    pub use crate::internal::search::SearchQuery;
    pub use crate::internal::ui::sort::{SortMode, sort_items};
    pub use crate::utils::title::normalize_title;
}
