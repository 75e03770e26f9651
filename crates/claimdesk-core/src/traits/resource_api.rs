//! Resource backend trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::entity::Entity;
use crate::payload::Payload;
use crate::types::AccessToken;
use crate::Result;

/// A backend that can list and mutate records of one entity type.
///
/// Implementations return errors; the [`Resource`](crate::Resource) layer is
/// the one that swallows them into sentinel values and `error` state.
#[async_trait]
pub trait ResourceApi<T: Entity>: Send + Sync {
    /// Fetch the full list.
    async fn list(&self, token: &AccessToken) -> Result<Vec<T>>;

    /// Fetch a single record.
    async fn get(&self, uuid: &str, token: &AccessToken) -> Result<T>;

    /// Create a record; the server assigns its uuid.
    async fn create(&self, payload: &Payload, token: &AccessToken) -> Result<T>;

    /// Update a record and return the server representation.
    async fn update(&self, uuid: &str, payload: &Payload, token: &AccessToken) -> Result<T>;

    /// Soft-delete a record.
    async fn delete(&self, uuid: &str, token: &AccessToken) -> Result<()>;

    /// Clear a record's soft-delete marker.
    async fn restore(&self, uuid: &str, token: &AccessToken) -> Result<T>;
}

#[async_trait]
impl<T: Entity, A: ResourceApi<T> + ?Sized> ResourceApi<T> for Arc<A> {
    async fn list(&self, token: &AccessToken) -> Result<Vec<T>> {
        (**self).list(token).await
    }

    async fn get(&self, uuid: &str, token: &AccessToken) -> Result<T> {
        (**self).get(uuid, token).await
    }

    async fn create(&self, payload: &Payload, token: &AccessToken) -> Result<T> {
        (**self).create(payload, token).await
    }

    async fn update(&self, uuid: &str, payload: &Payload, token: &AccessToken) -> Result<T> {
        (**self).update(uuid, payload, token).await
    }

    async fn delete(&self, uuid: &str, token: &AccessToken) -> Result<()> {
        (**self).delete(uuid, token).await
    }

    async fn restore(&self, uuid: &str, token: &AccessToken) -> Result<T> {
        (**self).restore(uuid, token).await
    }
}
