//! File-backed resource implementation.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use claimdesk_core::envelope::decode_records;
use claimdesk_core::error::{AuthError, ShapeError};
use claimdesk_core::{AccessToken, Entity, Payload, ResourceApi, Result};

use crate::store::FileStore;

fn decode<T: Entity>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        ShapeError::Decode {
            message: e.to_string(),
        }
        .into()
    })
}

fn authorize(token: &AccessToken) -> Result<()> {
    if token.is_empty() {
        return Err(AuthError::MissingToken.into());
    }
    Ok(())
}

/// One entity's records in a [`FileStore`].
///
/// Any non-empty token is accepted.
pub struct FileResource<T> {
    store: FileStore,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> FileResource<T> {
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn open(root: impl AsRef<Path>) -> Self {
        Self::new(FileStore::new(root))
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }
}

impl<T> Clone for FileResource<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> fmt::Debug for FileResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileResource")
            .field("entity", &T::RESOURCE.name)
            .field("root", &self.store.root())
            .finish()
    }
}

#[async_trait]
impl<T: Entity> ResourceApi<T> for FileResource<T> {
    #[instrument(skip(self, token), fields(entity = T::RESOURCE.name))]
    async fn list(&self, token: &AccessToken) -> Result<Vec<T>> {
        authorize(token)?;
        Ok(decode_records(self.store.list(&T::RESOURCE)?))
    }

    #[instrument(skip(self, token), fields(entity = T::RESOURCE.name))]
    async fn get(&self, uuid: &str, token: &AccessToken) -> Result<T> {
        authorize(token)?;
        decode(self.store.get(&T::RESOURCE, uuid)?)
    }

    #[instrument(skip(self, payload, token), fields(entity = T::RESOURCE.name))]
    async fn create(&self, payload: &Payload, token: &AccessToken) -> Result<T> {
        authorize(token)?;
        let record = self
            .store
            .create(&T::RESOURCE, payload.fields(), payload.attachments())?;
        decode(record)
    }

    #[instrument(skip(self, payload, token), fields(entity = T::RESOURCE.name))]
    async fn update(&self, uuid: &str, payload: &Payload, token: &AccessToken) -> Result<T> {
        authorize(token)?;
        let record = self
            .store
            .update(&T::RESOURCE, uuid, payload.fields(), payload.attachments())?;
        decode(record)
    }

    #[instrument(skip(self, token), fields(entity = T::RESOURCE.name))]
    async fn delete(&self, uuid: &str, token: &AccessToken) -> Result<()> {
        authorize(token)?;
        self.store.set_deleted(&T::RESOURCE, uuid, true)?;
        Ok(())
    }

    #[instrument(skip(self, token), fields(entity = T::RESOURCE.name))]
    async fn restore(&self, uuid: &str, token: &AccessToken) -> Result<T> {
        authorize(token)?;
        decode(self.store.set_deleted(&T::RESOURCE, uuid, false)?)
    }
}
