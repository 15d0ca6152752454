//! GitHub-flavored markdown anchor/slug generation.

/// Generate a table-of-contents link for a heading.
pub fn render_toc_link(heading: &str) -> String {
    format!("[{}](#{})", heading, github_slug(heading))
}

/// Generate a TOC list item, indented two spaces per nesting level.
pub fn render_toc_item(heading: &str, depth: usize) -> String {
    format!("{}- {}", "  ".repeat(depth), render_toc_link(heading))
}

/// GitHub heading anchor slug generation.
///
/// - lowercase
/// - drop every char that isn't alphanumeric, space, underscore or hyphen
/// - replace spaces with hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}
