//! Optimistic bridge between a [`Resource`] and a [`SharedStore`].
//!
//! State flows one way, resource to store. The store is hydrated once from
//! the first non-empty fetch; after that it is the writable source of truth
//! and later fetches only reach it through [`EntitySync::refresh_items`].
//!
//! Delete and restore write to the store before the request is sent. While
//! any status change on a uuid is in flight its optimistic `deleted_at` is
//! kept across refreshes. A success writes the server's value back; when the
//! last in-flight change on a uuid fails, the store returns to the last value
//! the server confirmed. Concurrent calls on the same uuid are not
//! serialized: whichever success settles last decides the flag.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument, warn};

use crate::Result;
use crate::entity::Entity;
use crate::error::OperationError;
use crate::payload::Payload;
use crate::resource::{DEFAULT_ERROR_MESSAGE, Resource};
use crate::store::{SharedStore, Store, now_timestamp};
use crate::traits::ResourceApi;
use crate::types::AccessToken;

/// Status changes in flight for one uuid.
#[derive(Debug)]
struct PendingStatus {
    in_flight: usize,
    /// Last `deleted_at` known to be on the server.
    settled: Option<String>,
}

/// Sync handlers for one entity type.
pub struct EntitySync<T, A> {
    resource: Resource<T, A>,
    store: SharedStore<T>,
    /// Set once the store holds data, either hydrated or written by a handler.
    /// Only touched while the store's write lock is held.
    hydrated: Arc<AtomicBool>,
    /// Locked only inside a store write, after the store lock.
    pending: Arc<Mutex<HashMap<String, PendingStatus>>>,
}

impl<T, A> Clone for EntitySync<T, A> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            store: self.store.clone(),
            hydrated: Arc::clone(&self.hydrated),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<T: Entity, A: ResourceApi<T>> EntitySync<T, A> {
    /// Bridge `resource` into a fresh store.
    pub fn new(resource: Resource<T, A>) -> Self {
        Self::with_store(resource, SharedStore::default())
    }

    /// Bridge `resource` into an existing store, e.g. one shared by several
    /// views of the same entity.
    pub fn with_store(resource: Resource<T, A>, store: SharedStore<T>) -> Self {
        Self {
            resource,
            store,
            hydrated: Arc::new(AtomicBool::new(false)),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> &SharedStore<T> {
        &self.store
    }

    pub fn resource(&self) -> &Resource<T, A> {
        &self.resource
    }

    /// Run the resource's automatic fetch, then bridge its state.
    pub async fn mount(&self) {
        self.resource.mount().await;
        self.bridge();
    }

    /// Change the access token; a new token fetches once and bridges.
    pub async fn set_token(&self, token: Option<AccessToken>) {
        self.resource.set_token(token).await;
        self.bridge();
    }

    /// Copy resource state into the store.
    ///
    /// Items are copied only while the store is empty and has never held
    /// data. `loading` is mirrored. A non-null error is copied, with an empty
    /// message replaced by a generic one.
    pub fn bridge(&self) {
        let hydrate = !self.hydrated.load(Ordering::Acquire);
        let items = if hydrate { self.resource.items() } else { Vec::new() };
        let loading = self.resource.loading();
        let error = self.resource.error();

        self.store.write(|store| {
            if !items.is_empty() && store.is_empty() && !self.hydrated.load(Ordering::Acquire) {
                debug!(entity = T::RESOURCE.name, count = items.len(), "Hydrating store");
                store.set_items(items);
                self.hydrated.store(true, Ordering::Release);
            }

            if store.loading() != loading {
                store.set_loading(loading);
            }

            if let Some(error) = error {
                let error = if error.is_empty() {
                    DEFAULT_ERROR_MESSAGE.to_string()
                } else {
                    error
                };
                if store.error() != Some(error.as_str()) {
                    store.set_error(Some(error));
                }
            }
        });
    }

    fn mark_written(&self, store: &Store<T>) {
        if !store.is_empty() {
            self.hydrated.store(true, Ordering::Release);
        }
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<String, PendingStatus>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-fetch the list and, on success, replace the store's items with it.
    ///
    /// This is the only path by which server state overwrites the store after
    /// hydration. Records with a status change still in flight keep their
    /// optimistic `deleted_at`.
    #[instrument(skip(self), fields(entity = T::RESOURCE.name))]
    pub async fn refresh_items(&self) {
        if let Some(items) = self.resource.fetch_list().await {
            self.store.write(|store| {
                let mut pending = self.pending();
                let held: Vec<(String, Option<String>)> = pending
                    .keys()
                    .filter_map(|uuid| {
                        let item = store.get(uuid)?;
                        Some((uuid.clone(), item.deleted_at().map(str::to_string)))
                    })
                    .collect();

                for item in &items {
                    if let Some(entry) = pending.get_mut(item.uuid()) {
                        entry.settled = item.deleted_at().map(str::to_string);
                    }
                }

                store.set_items(items);
                for (uuid, deleted_at) in held {
                    store.set_deleted_at(&uuid, deleted_at);
                }
                self.mark_written(store);
            });
        }
        self.bridge();
    }

    /// Create a record and add it to the store.
    #[instrument(skip(self, payload), fields(entity = T::RESOURCE.name))]
    pub async fn handle_create(&self, payload: &Payload) -> Result<T> {
        let created = self.resource.create_item(payload).await;
        self.bridge();

        let Some(created) = created else {
            return Err(OperationError::CreateFailed.into());
        };

        self.store.write(|store| {
            store.add_item(created.clone());
            self.mark_written(store);
        });
        Ok(created)
    }

    /// Update a record and merge the server's version into the store.
    #[instrument(skip(self, payload), fields(entity = T::RESOURCE.name))]
    pub async fn handle_update(&self, uuid: &str, payload: &Payload) -> Result<T> {
        let updated = self.resource.update_item(uuid, payload).await;
        self.bridge();

        let Some(updated) = updated else {
            return Err(OperationError::UpdateFailed.into());
        };

        self.store.write(|store| {
            if !store.update_item(uuid, &updated) {
                debug!(uuid, "Updated item is not in the store");
            }
        });
        Ok(updated)
    }

    /// Soft-delete optimistically; roll back if the request fails.
    #[instrument(skip(self), fields(entity = T::RESOURCE.name))]
    pub async fn handle_delete(&self, uuid: &str) -> Result<()> {
        let tracked = self.apply_status(uuid, true);

        if self.resource.delete_item(uuid).await {
            self.bridge();
            if tracked {
                let confirmed = self.confirmed_deletion(uuid);
                self.settle_status(uuid, Some(confirmed));
            }
            return Ok(());
        }

        let message = self.roll_back(uuid, tracked);
        Err(OperationError::DeleteFailed {
            uuid: uuid.to_string(),
            message,
        }
        .into())
    }

    /// Restore optimistically; roll back if the request fails.
    #[instrument(skip(self), fields(entity = T::RESOURCE.name))]
    pub async fn handle_restore(&self, uuid: &str) -> Result<T> {
        let tracked = self.apply_status(uuid, false);

        if let Some(restored) = self.resource.restore_item(uuid).await {
            self.bridge();
            if tracked {
                self.settle_status(uuid, Some(restored.deleted_at().map(str::to_string)));
            }
            return Ok(restored);
        }

        let message = self.roll_back(uuid, tracked);
        Err(OperationError::RestoreFailed {
            uuid: uuid.to_string(),
            message,
        }
        .into())
    }

    /// Write the optimistic status and register it as in flight.
    ///
    /// Returns false when the uuid is not in the store; nothing is written.
    fn apply_status(&self, uuid: &str, is_deleted: bool) -> bool {
        self.store.write(|store| {
            let Some(current) = store.get(uuid).map(|item| item.deleted_at().map(str::to_string))
            else {
                return false;
            };

            self.pending()
                .entry(uuid.to_string())
                .or_insert(PendingStatus {
                    in_flight: 0,
                    settled: current,
                })
                .in_flight += 1;

            store.update_item_status(uuid, is_deleted);
            self.mark_written(store);
            true
        })
    }

    /// The server's `deleted_at` after a successful delete.
    ///
    /// Falls back to the optimistic value when the follow-up fetch did not
    /// return the record.
    fn confirmed_deletion(&self, uuid: &str) -> Option<String> {
        self.resource
            .items()
            .iter()
            .find(|item| item.uuid() == uuid)
            .and_then(|item| item.deleted_at().map(str::to_string))
            .or_else(|| {
                self.store
                    .read(|s| s.get(uuid).and_then(|item| item.deleted_at().map(str::to_string)))
            })
            .or_else(|| Some(now_timestamp()))
    }

    /// Finish one in-flight status change.
    ///
    /// `confirmed` is the server's value on success and `None` on failure.
    fn settle_status(&self, uuid: &str, confirmed: Option<Option<String>>) {
        self.store.write(|store| {
            let mut pending = self.pending();
            let Some(entry) = pending.get_mut(uuid) else {
                return;
            };
            entry.in_flight = entry.in_flight.saturating_sub(1);

            match confirmed {
                Some(deleted_at) => {
                    entry.settled = deleted_at.clone();
                    store.set_deleted_at(uuid, deleted_at);
                }
                None if entry.in_flight == 0 => {
                    store.set_deleted_at(uuid, entry.settled.clone());
                }
                None => {}
            }

            if entry.in_flight == 0 {
                pending.remove(uuid);
            }
        });
    }

    fn roll_back(&self, uuid: &str, tracked: bool) -> String {
        self.bridge();
        let message = self
            .resource
            .error()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

        if tracked {
            self.settle_status(uuid, None);
        }
        self.store.write(|store| store.set_error(Some(message.clone())));
        warn!(entity = T::RESOURCE.name, uuid, error = %message, "Rolled back optimistic status change");
        message
    }

    /// Store items matching the current search term.
    pub fn filtered_items(&self) -> Vec<T> {
        self.store.filtered_items()
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.store.set_search_term(term);
    }
}

impl<T, A> std::fmt::Debug for EntitySync<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitySync")
            .field("hydrated", &self.hydrated.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
