//! Request path resolution.
//!
//! Paths follow a fixed grammar of at most four segments:
//!
//! ```text
//! /                                   root
//! /{collection}                       users | groups
//! /{collection}/{item}
//! /{collection}/{item}/{other}        groups under users, users under groups
//! /{collection}/{item}/{other}/{key}
//! ```
//!
//! [`resolve`] turns a segment list into a [`Route`]; [`query::execute`]
//! answers a route against one store generation.

pub mod query;

use thiserror::Error;

use crate::Collection;

/// Deepest path the grammar accepts.
pub const MAX_DEPTH: usize = 4;

/// Lookup failure reported to clients as 404.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    #[error("Collection not found.")]
    Collection,

    #[error("User attribute not found.")]
    UserAttribute,

    #[error("Group attribute not found.")]
    GroupAttribute,

    #[error("User not found.")]
    User,

    #[error("Group not found.")]
    Group,

    #[error("Resource not found.")]
    Resource,
}

impl NotFound {
    /// The item of `collection` does not exist.
    pub fn item(collection: Collection) -> Self {
        match collection {
            Collection::Users => NotFound::User,
            Collection::Groups => NotFound::Group,
        }
    }

    /// The sub-collection named under `collection` is not the other collection.
    pub fn attribute(collection: Collection) -> Self {
        match collection {
            Collection::Users => NotFound::UserAttribute,
            Collection::Groups => NotFound::GroupAttribute,
        }
    }
}

/// Parameters bound while resolving a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pub user: Option<String>,
    pub group: Option<String>,
    /// `users` sub-collection requested under a group
    pub users: bool,
    /// `groups` sub-collection requested under a user
    pub groups: bool,
}

impl Params {
    /// Key bound for `collection`'s role.
    pub fn key(&self, collection: Collection) -> Option<&str> {
        match collection {
            Collection::Users => self.user.as_deref(),
            Collection::Groups => self.group.as_deref(),
        }
    }

    /// Whether the `collection` sub-collection was requested.
    pub fn flag(&self, collection: Collection) -> bool {
        match collection {
            Collection::Users => self.users,
            Collection::Groups => self.groups,
        }
    }

    fn bind(&mut self, collection: Collection, key: &str) {
        match collection {
            Collection::Users => self.user = Some(key.to_string()),
            Collection::Groups => self.group = Some(key.to_string()),
        }
    }

    fn set_flag(&mut self, collection: Collection) {
        match collection {
            Collection::Users => self.users = true,
            Collection::Groups => self.groups = true,
        }
    }
}

/// A resolved request: which collection to query and with what parameters.
///
/// `collection` is `None` for the root path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub collection: Option<Collection>,
    pub params: Params,
}

impl Route {
    /// The root route, listing both collections.
    pub fn root() -> Self {
        Self::default()
    }
}

/// Resolve path segments against the grammar.
///
/// # Examples
///
/// ```
/// use slugs::resolver::{resolve, NotFound};
/// use slugs::Collection;
///
/// let route = resolve(&["users", "John", "groups"]).unwrap();
/// assert_eq!(route.collection, Some(Collection::Users));
/// assert_eq!(route.params.user.as_deref(), Some("John"));
/// assert!(route.params.groups);
///
/// assert_eq!(resolve(&["robots"]), Err(NotFound::Collection));
/// ```
pub fn resolve<S: AsRef<str>>(segments: &[S]) -> Result<Route, NotFound> {
    if segments.len() > MAX_DEPTH {
        return Err(NotFound::Resource);
    }

    let mut segments = segments.iter().map(AsRef::as_ref);
    let mut params = Params::default();

    // /collection
    let Some(first) = segments.next() else {
        return Ok(Route::root());
    };
    let collection = Collection::parse(first).ok_or(NotFound::Collection)?;
    let other = collection.other();

    // /collection/item
    if let Some(item) = segments.next() {
        params.bind(collection, item);
    }

    // /collection/item/sub-collection
    if let Some(attribute) = segments.next() {
        if attribute != other.name() {
            return Err(NotFound::attribute(collection));
        }
        params.set_flag(other);
    }

    // /collection/item/sub-collection/sub-item
    if let Some(key) = segments.next() {
        params.bind(other, key);
    }

    Ok(Route {
        collection: Some(collection),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root() {
        let empty: [&str; 0] = [];
        assert_eq!(resolve(&empty), Ok(Route::root()));
    }

    #[test]
    fn test_collections() {
        let route = resolve(&["users"]).unwrap();
        assert_eq!(route.collection, Some(Collection::Users));
        assert_eq!(route.params, Params::default());

        let route = resolve(&["groups"]).unwrap();
        assert_eq!(route.collection, Some(Collection::Groups));
    }

    #[test]
    fn test_unknown_collection() {
        assert_eq!(resolve(&["invalid"]), Err(NotFound::Collection));
        assert_eq!(resolve(&["invalid", "John"]), Err(NotFound::Collection));
        assert_eq!(NotFound::Collection.to_string(), "Collection not found.");
    }

    #[test]
    fn test_item() {
        let route = resolve(&["groups", "Human"]).unwrap();
        assert_eq!(route.params.group.as_deref(), Some("Human"));
        assert_eq!(route.params.user, None);
        assert!(!route.params.users);
    }

    #[test]
    fn test_sub_collection() {
        let route = resolve(&["groups", "Human", "users"]).unwrap();
        assert_eq!(route.collection, Some(Collection::Groups));
        assert!(route.params.users);
        assert!(!route.params.groups);
        assert!(route.params.flag(Collection::Users));
    }

    #[test]
    fn test_bad_attribute() {
        assert_eq!(
            resolve(&["users", "John", "invalid"]),
            Err(NotFound::UserAttribute)
        );
        assert_eq!(
            resolve(&["users", "John", "users"]),
            Err(NotFound::UserAttribute)
        );
        assert_eq!(
            resolve(&["groups", "Human", "groups", "x"]),
            Err(NotFound::GroupAttribute)
        );
        assert_eq!(
            NotFound::GroupAttribute.to_string(),
            "Group attribute not found."
        );
    }

    #[test]
    fn test_sub_item() {
        let route = resolve(&["users", "John", "groups", "Human"]).unwrap();
        assert_eq!(
            route,
            Route {
                collection: Some(Collection::Users),
                params: Params {
                    user: Some("John".to_string()),
                    group: Some("Human".to_string()),
                    users: false,
                    groups: true,
                },
            }
        );
        assert_eq!(route.params.key(Collection::Groups), Some("Human"));
    }

    #[test]
    fn test_too_deep() {
        assert_eq!(
            resolve(&["users", "John", "groups", "Human", "extra"]),
            Err(NotFound::Resource)
        );
        assert_eq!(
            resolve(&["invalid", "a", "b", "c", "d", "e"]),
            Err(NotFound::Resource)
        );
        assert_eq!(NotFound::Resource.to_string(), "Resource not found.");
    }

    #[test]
    fn test_owned_segments() {
        let segments = vec!["groups".to_string(), "Human".to_string()];
        assert!(resolve(&segments).is_ok());
    }
}
