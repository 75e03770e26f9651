//! claimdesk-file - Filesystem-backed resource implementation.
//!
//! Records live at `<root>/<entity path>/<uuid>.json`, with attachments in a
//! sibling `<uuid>/` directory. Soft delete and restore only touch
//! `deleted_at`; nothing is ever removed from disk.

mod resource;
mod store;

pub use resource::FileResource;
pub use store::FileStore;
