use std::sync::OnceLock;

use regex::Regex;

fn slug_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9_-]+$").expect("valid slug regex"))
}

/// Slugs are non-empty and contain only lowercase ASCII letters, digits, hyphens and underscores.
pub fn is_valid_slug(slug: &str) -> bool {
    slug_regex().is_match(slug)
}

/// Derives a slug from a display name: ASCII-folded to lowercase, runs of anything else collapsed to a single hyphen.
/// Names with no ASCII letters or digits produce an empty string, which [`is_valid_slug`] rejects.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}
