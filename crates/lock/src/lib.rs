//! Lock file: the persistent record of installed assets.
//!
//! The document is plain JSON next to the project (or under the home
//! directory for global installs). Reads are fail-soft so a corrupt or
//! old-format file never blocks an operation; writes replace the whole
//! document (last writer wins).

pub mod hash;
pub mod store;
pub mod types;

pub use {
    hash::content_hash,
    store::LockStore,
    types::{AssetType, LockEntry, LockFile, SourceType, UnknownAssetType, lock_key},
};
