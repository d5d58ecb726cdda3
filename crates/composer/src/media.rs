//! Media resolution for asset references held in block props.
//!
//! Block props store opaque references to uploaded assets (or absolute
//! URLs). The props editor resolves them through this seam to show inline
//! previews; a reference that fails to resolve renders a broken-preview
//! indicator instead of an image.

use url::Url;

/// Resolves an asset reference to a displayable URL.
pub trait MediaResolver: Send + Sync {
    /// Resolve `reference` to a URL, or `None` if it cannot be displayed.
    fn resolve(&self, reference: &str) -> Option<String>;
}

/// Resolver that accepts absolute `http(s)` URLs as-is and rejects
/// everything else. Suitable when props only ever hold full URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectUrlResolver;

impl MediaResolver for DirectUrlResolver {
    fn resolve(&self, reference: &str) -> Option<String> {
        let parsed = Url::parse(reference).ok()?;
        if matches!(parsed.scheme(), "http" | "https") {
            Some(parsed.to_string())
        } else {
            None
        }
    }
}
