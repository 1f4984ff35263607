//! Dual-indexed membership store with atomic generation swaps.
//!
//! The store keeps two inverted indexes built from the same entry list:
//! - users → groups
//! - groups → users
//!
//! Both indexes live in one immutable [`Generation`] which is published
//! through an [`ArcSwap`]. Readers take the current generation without
//! locking and always see a consistent pair of indexes; an update builds a
//! complete new generation and replaces the old one in a single store.

mod index;

pub use index::MembershipIndex;

use ahash::AHashSet;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::{Collection, Entry};

/// Callback through which a reload hands freshly parsed entries to a store.
pub type UpdateCallback = Arc<dyn Fn(Vec<Entry>) + Send + Sync>;

/// One atomically-published version of both membership indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    number: u64,
    users_to_groups: MembershipIndex,
    groups_to_users: MembershipIndex,
}

impl Generation {
    /// Build generation `number` from an entry list.
    pub fn from_entries(number: u64, entries: &[Entry]) -> Self {
        let users_to_groups = MembershipIndex::build(
            entries
                .iter()
                .map(|e| (e.user.as_str(), e.group.as_str())),
        );
        let groups_to_users = MembershipIndex::build(
            entries
                .iter()
                .map(|e| (e.group.as_str(), e.user.as_str())),
        );

        Self {
            number,
            users_to_groups,
            groups_to_users,
        }
    }

    /// Sequence number of this generation. The initial empty store is 0.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Index keyed by the members of `collection`.
    pub fn index(&self, collection: Collection) -> &MembershipIndex {
        match collection {
            Collection::Users => &self.users_to_groups,
            Collection::Groups => &self.groups_to_users,
        }
    }

    /// The users → groups index.
    pub fn users_to_groups(&self) -> &MembershipIndex {
        &self.users_to_groups
    }

    /// The groups → users index.
    pub fn groups_to_users(&self) -> &MembershipIndex {
        &self.groups_to_users
    }
}

/// Thread-safe store of user/group memberships.
///
/// # Example
///
/// ```
/// use slugs::{Entry, MembershipStore};
///
/// let store = MembershipStore::new();
/// store.update(vec![Entry::new("John", "Human"), Entry::new("Jane", "Human")]);
///
/// let users = store.lookup_group("Human").unwrap();
/// assert!(users.contains("John"));
/// assert!(store.lookup_user("Nobody").is_none());
/// ```
pub struct MembershipStore {
    current: ArcSwap<Generation>,
    /// Serializes writers so generation numbers strictly increase.
    writer: Mutex<()>,
}

impl MembershipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Generation::default()),
            writer: Mutex::new(()),
        }
    }

    /// Create a store and publish an initial generation from `entries`.
    pub fn with_entries<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Entry>,
    {
        let store = Self::new();
        store.update(entries.into_iter().map(Into::into).collect());
        store
    }

    /// The currently published generation.
    ///
    /// The returned snapshot stays valid and unchanged even if an update
    /// is published while the caller is still reading it.
    pub fn snapshot(&self) -> Arc<Generation> {
        self.current.load_full()
    }

    /// Sequence number of the current generation.
    pub fn generation(&self) -> u64 {
        self.current.load().number
    }

    /// All user names.
    pub fn list_users(&self) -> Vec<String> {
        self.current
            .load()
            .users_to_groups
            .keys()
            .map(str::to_string)
            .collect()
    }

    /// All group names.
    pub fn list_groups(&self) -> Vec<String> {
        self.current
            .load()
            .groups_to_users
            .keys()
            .map(str::to_string)
            .collect()
    }

    /// Groups of `user`, or `None` if the user is unknown.
    pub fn lookup_user(&self, user: &str) -> Option<AHashSet<String>> {
        self.current.load().users_to_groups.get(user).cloned()
    }

    /// Users of `group`, or `None` if the group is unknown.
    pub fn lookup_group(&self, group: &str) -> Option<AHashSet<String>> {
        self.current.load().groups_to_users.get(group).cloned()
    }

    /// Replace both indexes with ones built from `entries`.
    ///
    /// An empty list clears the store. Concurrent readers see either the
    /// previous generation or the new one, never a mix of the two.
    pub fn update(&self, entries: Vec<Entry>) {
        let _guard = self.writer.lock();

        let number = self.current.load().number + 1;
        let generation = Generation::from_entries(number, &entries);
        let (users, groups) = (
            generation.users_to_groups.len(),
            generation.groups_to_users.len(),
        );
        self.current.store(Arc::new(generation));

        log::info!(
            "Published membership generation {}: {} entries, {} users, {} groups",
            number,
            entries.len(),
            users,
            groups
        );
    }

    /// A callback that publishes entries into this store.
    pub fn updater(self: &Arc<Self>) -> UpdateCallback {
        let store = Arc::clone(self);
        Arc::new(move |entries| store.update(entries))
    }
}

impl Default for MembershipStore {
    fn default() -> Self {
        Self::new()
    }
}
