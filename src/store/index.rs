//! Inverted membership index.

use ahash::{AHashMap, AHashSet};

/// Mapping from a name (user or group) to the distinct names associated with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipIndex {
    members: AHashMap<String, AHashSet<String>>,
}

impl MembershipIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(key, member)` pairs.
    ///
    /// Members are first accumulated per key with duplicates, then each
    /// accumulator is collapsed into a set, so the result does not depend on
    /// input order or on repeated pairs.
    pub fn build<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut accumulated: AHashMap<&'a str, Vec<&'a str>> = AHashMap::new();
        for (key, member) in pairs {
            accumulated.entry(key).or_default().push(member);
        }

        let members = accumulated
            .into_iter()
            .map(|(key, list)| {
                let set = list.into_iter().map(str::to_string).collect();
                (key.to_string(), set)
            })
            .collect();

        Self { members }
    }

    /// Members associated with `key`, if the key is present.
    pub fn get(&self, key: &str) -> Option<&AHashSet<String>> {
        self.members.get(key)
    }

    /// Check whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    /// Check whether `member` is associated with `key`.
    pub fn contains(&self, key: &str, member: &str) -> bool {
        self.members
            .get(key)
            .map(|set| set.contains(member))
            .unwrap_or(false)
    }

    /// Iterate over all keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check whether the index has no keys.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
