//! Cached resource value object

use serde::{Deserialize, Serialize};

/// Key of the single resource served by the demo responder.
pub const TEST_RESOURCE_KEY: &str = "test";

/// An ordered list of string items. Equality is structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResource {
    pub items: Vec<String>,
}

impl CachedResource {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// The fixed resource the responder serves at `/test`.
    pub fn test_resource() -> Self {
        Self::new(["foo", "bar", "baz"])
    }
}
