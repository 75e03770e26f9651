//! claimdesk-core - Core types, store and optimistic sync layer.
//!
//! Every managed record type goes through the same three pieces:
//!
//! - [`Store`]: canonical in-memory list plus a search term, pure mutators.
//! - [`Resource`]: the network-facing state (`items`, `current_item`,
//!   `loading`, `error`) driven through a [`ResourceApi`] backend.
//! - [`EntitySync`]: bridges the two and applies optimistic soft-delete and
//!   restore with rollback.
//!
//! # Example
//!
//! ```no_run
//! use claimdesk_core::entities::Zone;
//! use claimdesk_core::{AccessToken, EntitySync, Resource, ResourceApi};
//!
//! # async fn example(api: impl ResourceApi<Zone> + 'static) -> claimdesk_core::Result<()> {
//! let resource = Resource::new(api, Some(AccessToken::new("token")));
//! let sync = EntitySync::new(resource);
//! sync.mount().await;
//!
//! sync.set_search_term("north");
//! for zone in sync.filtered_items() {
//!     println!("{:?}", zone.zone_name);
//! }
//!
//! if let Some(first) = sync.store().items().first() {
//!     sync.handle_delete(&first.uuid).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod entities;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod payload;
pub mod resource;
pub mod store;
pub mod sync;
pub mod traits;
pub mod types;

pub use entity::{BodyEncoding, Entity, HttpMethod, ResourceSpec, Route, UnwrapPolicy};
pub use error::Error;
pub use payload::{Attachment, Payload};
pub use resource::{Resource, ResourceSnapshot};
pub use store::{SharedStore, Store};
pub use sync::EntitySync;
pub use traits::ResourceApi;
pub use types::{AccessToken, ApiUrl, CsrfToken};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
