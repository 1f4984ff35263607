//! SLUGS - a Simple, Lightweight User Group Service.
//!
//! This crate serves a read-only, bidirectional mapping between users and
//! groups over HTTP. The mapping is read from a flat file that is watched for
//! changes and hot-reloaded without restarting the service.
//!
//! # Features
//!
//! - **Dual index**: users → groups and groups → users, built from one file
//! - **Atomic reloads**: both indexes are swapped together; readers never
//!   see a half-applied update
//! - **All-or-nothing parsing**: a malformed mapping file is ignored and the
//!   last good data keeps being served
//! - **Fixed path grammar**: `/users/{user}/groups/{group}` and its mirror
//!
//! # Quick Start
//!
//! ```ignore
//! use slugs::{FileWatcher, MembershipStore, Scheduler};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = Arc::new(MembershipStore::new());
//! let watcher = Arc::new(FileWatcher::new("/etc/slugs/user_group_mapping.csv", store.updater())?);
//!
//! let scheduler = Scheduler::new(Duration::from_secs(1));
//! watcher.start(&scheduler);
//! scheduler.tick();
//!
//! let groups = store.lookup_user("John");
//! ```
//!
//! # Mapping File Format
//!
//! ```text
//! # user,group
//! John,Male
//! John,Human
//! Jane,Female
//! Jane,Human
//! ```
//!
//! # HTTP Routes
//!
//! All routes are relative to the configured mount path and answer `GET`:
//!
//! - `/` lists all users and groups
//! - `/users`, `/groups` list one collection
//! - `/users/{user}`, `/groups/{group}` check existence (empty 200 or 404)
//! - `/users/{user}/groups`, `/groups/{group}/users` list memberships
//! - `/users/{user}/groups/{group}`, `/groups/{group}/users/{user}` check one
//!   membership

mod collection;
mod entry;
mod error;

pub mod config;
pub mod resolver;
pub mod scheduler;
pub mod server;
pub mod source;
pub mod store;
pub mod watcher;

// Re-export core types
pub use collection::Collection;
pub use entry::Entry;
pub use error::{Error, Result};

pub use config::Settings;
pub use resolver::{resolve, NotFound, Params, Route};
pub use scheduler::Scheduler;
pub use store::{Generation, MembershipStore, UpdateCallback};
pub use watcher::FileWatcher;
