//! Answering resolved routes against a store generation.

use serde::Serialize;

use super::{NotFound, Route};
use crate::store::Generation;
use crate::Collection;

/// JSON listing of users and/or groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl Listing {
    /// A listing holding only `collection`.
    pub fn of<'a, I>(collection: Collection, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names = Some(sorted(names));
        match collection {
            Collection::Users => Self {
                users: names,
                groups: None,
            },
            Collection::Groups => Self {
                users: None,
                groups: names,
            },
        }
    }
}

/// Successful answer to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Names to return as a JSON body
    Listing(Listing),
    /// The requested item or membership exists; no body
    Found,
}

/// Answer `route` from `generation`.
pub fn execute(generation: &Generation, route: &Route) -> Result<Reply, NotFound> {
    let Some(collection) = route.collection else {
        return Ok(Reply::Listing(Listing {
            users: Some(sorted(generation.users_to_groups().keys())),
            groups: Some(sorted(generation.groups_to_users().keys())),
        }));
    };

    let index = generation.index(collection);
    let other = collection.other();
    let params = &route.params;

    let Some(item) = params.key(collection) else {
        return Ok(Reply::Listing(Listing::of(collection, index.keys())));
    };
    let members = index.get(item).ok_or(NotFound::item(collection))?;

    if !params.flag(other) {
        return Ok(Reply::Found);
    }

    match params.key(other) {
        None => Ok(Reply::Listing(Listing::of(
            other,
            members.iter().map(String::as_str),
        ))),
        Some(key) if members.contains(key) => Ok(Reply::Found),
        Some(_) => Err(NotFound::item(other)),
    }
}

fn sorted<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut names: Vec<String> = names.into_iter().map(str::to_string).collect();
    names.sort_unstable();
    names
}
