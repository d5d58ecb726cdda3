//! URL slug sanitization.

/// Maximum slug length in characters.
const MAX_SLUG_LEN: usize = 128;

/// Convert user input into a URL-safe slug.
///
/// Lowercases, maps every non-alphanumeric character to a hyphen, collapses
/// runs of hyphens, and strips leading/trailing hyphens, yielding
/// `[a-z0-9-]+` (or an empty string if nothing survives).
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());

    for c in input.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.len() > MAX_SLUG_LEN {
        // Slug is pure ASCII at this point, so byte indexing is safe.
        slug.truncate(MAX_SLUG_LEN);
        if let Some(cut) = slug.rfind('-') {
            slug.truncate(cut);
        }
    }

    slug
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_replaces_punctuation() {
        assert_eq!(slugify("New Page!!"), "new-page");
    }

    #[test]
    fn collapses_hyphen_runs() {
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("open   day"), "open-day");
    }

    #[test]
    fn trims_leading_and_trailing_hyphens() {
        assert_eq!(slugify("  hello  "), "hello");
        assert_eq!(slugify("!!wow!!"), "wow");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("Fees 2026"), "fees-2026");
    }

    #[test]
    fn empty_when_nothing_survives() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn truncates_long_input_at_word_break() {
        let long = "word ".repeat(40);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }
}
