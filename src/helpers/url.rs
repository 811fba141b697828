//! URL helper functions

/// Join a base URL and a path with exactly one slash between them
///
/// # Examples
/// ```ignore
/// full_url_for("https://example.com/", "/hello") // -> "https://example.com/hello"
/// ```
pub fn full_url_for(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Site-relative link to a post or page
pub fn slug_path(slug: &str) -> String {
    format!("/{}", slug.trim_start_matches('/'))
}
