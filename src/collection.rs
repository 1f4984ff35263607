//! The two top-level resource collections.

use std::fmt;

/// A top-level collection: `users` or `groups`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Groups,
}

impl Collection {
    /// Path segment naming this collection.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Groups => "groups",
        }
    }

    /// Parse a path segment. Matching is exact and case-sensitive.
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "users" => Some(Collection::Users),
            "groups" => Some(Collection::Groups),
            _ => None,
        }
    }

    /// The opposite-role collection.
    pub fn other(&self) -> Self {
        match self {
            Collection::Users => Collection::Groups,
            Collection::Groups => Collection::Users,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
