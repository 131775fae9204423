/// Canonical site path for a catalog page: `/roadmaps/<file>`.
///
/// Tolerates a prefix with or without its trailing slash.
pub fn page_path(prefix: &str, file: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let file = file.trim_start_matches('/');
    format!("{}/{}", prefix, file)
}

/// Join a site base URL (scheme and host, optionally a path) with an absolute
/// site path. Exactly one slash ends up between the two.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Return the fragment identifier of a same-document link.
///
/// Only hrefs that start with `#` and carry a non-empty id qualify:
/// `"#about"` -> `Some("about")`, `"#"` -> `None`, `"/page#x"` -> `None`.
pub fn fragment_id(href: &str) -> Option<&str> {
    let id = href.trim().strip_prefix('#')?;
    if id.is_empty() { None } else { Some(id) }
}
