//! The `(user, group)` pair read from the mapping file.

use std::fmt;

/// One membership line: `user` belongs to `group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub user: String,
    pub group: String,
}

impl Entry {
    /// Create a new entry.
    pub fn new(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
        }
    }
}

impl<U: Into<String>, G: Into<String>> From<(U, G)> for Entry {
    fn from((user, group): (U, G)) -> Self {
        Self::new(user, group)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.user, self.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_tuple() {
        let entry: Entry = ("John", "Human").into();
        assert_eq!(entry.user, "John");
        assert_eq!(entry.group, "Human");
        assert_eq!(entry.to_string(), "John,Human");
    }
}
