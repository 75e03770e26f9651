//! Network-facing resource state.
//!
//! A [`Resource`] is the only component that talks to a [`ResourceApi`]. It
//! owns `items`, `current_item`, `loading` and `error`, and it never returns
//! an error: every failure is logged, turned into a message in `error`, and
//! reported to the caller as `None` / `false`.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error, instrument};

use crate::Result;
use crate::entity::Entity;
use crate::error::{AuthError, Error};
use crate::payload::Payload;
use crate::traits::ResourceApi;
use crate::types::AccessToken;

/// Message used when normalizing an error produces no text.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

const FETCH_FAILED: &str = "Failed to fetch items";
const GET_FAILED: &str = "Failed to fetch item";
const CREATE_FAILED: &str = "Failed to create item";
const UPDATE_FAILED: &str = "Failed to update item";
const DELETE_FAILED: &str = "Failed to delete item";
const RESTORE_FAILED: &str = "Failed to restore item";

/// Point-in-time copy of a resource's state.
#[derive(Debug, Clone)]
pub struct ResourceSnapshot<T> {
    pub items: Vec<T>,
    pub current_item: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
struct ResourceState<T> {
    items: Vec<T>,
    current_item: Option<T>,
    in_flight: usize,
    error: Option<String>,
    token: Option<AccessToken>,
    /// Token value the automatic fetch last ran for.
    fetched_for: Option<AccessToken>,
}

impl<T> ResourceState<T> {
    fn active_token(&self) -> Option<AccessToken> {
        self.token.clone().filter(|t| !t.is_empty())
    }
}

/// Keeps `loading` true while any operation is in flight.
struct InFlight<T> {
    state: Arc<RwLock<ResourceState<T>>>,
}

impl<T> Drop for InFlight<T> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Resource state for one entity type, backed by a [`ResourceApi`].
pub struct Resource<T, A> {
    api: Arc<A>,
    state: Arc<RwLock<ResourceState<T>>>,
}

impl<T, A> Clone for Resource<T, A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Entity, A: ResourceApi<T>> Resource<T, A> {
    /// Create a resource. Nothing is fetched until [`mount`](Self::mount).
    pub fn new(api: A, token: Option<AccessToken>) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::new(RwLock::new(ResourceState {
                items: Vec::new(),
                current_item: None,
                in_flight: 0,
                error: None,
                token,
                fetched_for: None,
            })),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn read<R>(&self, f: impl FnOnce(&ResourceState<T>) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut ResourceState<T>) -> R) -> R {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn items(&self) -> Vec<T> {
        self.read(|s| s.items.clone())
    }

    pub fn current_item(&self) -> Option<T> {
        self.read(|s| s.current_item.clone())
    }

    pub fn loading(&self) -> bool {
        self.read(|s| s.in_flight > 0)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }

    pub fn token(&self) -> Option<AccessToken> {
        self.read(ResourceState::active_token)
    }

    pub fn snapshot(&self) -> ResourceSnapshot<T> {
        self.read(|s| ResourceSnapshot {
            items: s.items.clone(),
            current_item: s.current_item.clone(),
            loading: s.in_flight > 0,
            error: s.error.clone(),
        })
    }

    /// Run the automatic list fetch if it has not run for the current token.
    pub async fn mount(&self) {
        let due = self.write(|s| {
            let token = s.active_token()?;
            if s.fetched_for.as_ref() == Some(&token) {
                return None;
            }
            s.fetched_for = Some(token.clone());
            Some(token)
        });

        if due.is_some() {
            self.fetch_items().await;
        }
    }

    /// Swap the access token; a new non-empty token triggers one list fetch.
    pub async fn set_token(&self, token: Option<AccessToken>) {
        let changed = self.write(|s| {
            if s.token == token {
                return false;
            }
            s.token = token;
            s.fetched_for = None;
            true
        });

        if changed {
            self.mount().await;
        }
    }

    fn begin(&self) -> InFlight<T> {
        self.write(|s| {
            s.in_flight += 1;
            s.error = None;
        });
        InFlight {
            state: Arc::clone(&self.state),
        }
    }

    fn fail(&self, operation: &'static str, err: &Error, fallback: &str) {
        error!(entity = T::RESOURCE.name, operation, error = %err, "Resource operation failed");
        let mut message = err.user_message(fallback);
        if message.is_empty() {
            message = DEFAULT_ERROR_MESSAGE.to_string();
        }
        self.write(|s| s.error = Some(message));
    }

    fn settle<R>(&self, operation: &'static str, fallback: &str, result: Result<R>) -> Option<R> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.fail(operation, &err, fallback);
                None
            }
        }
    }

    fn require_token(&self, operation: &'static str, fallback: &str) -> Option<AccessToken> {
        let token = self.token();
        if token.is_none() {
            self.fail(operation, &AuthError::MissingToken.into(), fallback);
        }
        token
    }

    /// Fetch the full list. Without a token this is a no-op.
    ///
    /// A malformed envelope clears `items`; transport and HTTP failures leave
    /// the previous list in place. Returns true when the list was replaced.
    pub async fn fetch_items(&self) -> bool {
        self.fetch_list().await.is_some()
    }

    /// [`fetch_items`](Self::fetch_items), handing back the list it stored.
    #[instrument(skip(self), fields(entity = T::RESOURCE.name))]
    pub(crate) async fn fetch_list(&self) -> Option<Vec<T>> {
        let Some(token) = self.token() else {
            debug!("No access token, skipping fetch");
            return None;
        };

        let _in_flight = self.begin();
        match self.api.list(&token).await {
            Ok(items) => {
                debug!(count = items.len(), "Fetched items");
                self.write(|s| s.items = items.clone());
                Some(items)
            }
            Err(err) => {
                if err.is_shape() {
                    self.write(|s| s.items.clear());
                }
                self.fail("list", &err, FETCH_FAILED);
                None
            }
        }
    }

    /// Fetch one record into `current_item`.
    #[instrument(skip(self), fields(entity = T::RESOURCE.name))]
    pub async fn get_item(&self, uuid: &str) -> Option<T> {
        let token = self.require_token("get", GET_FAILED)?;
        let _in_flight = self.begin();

        let result = self.api.get(uuid, &token).await;
        let record = self.settle("get", GET_FAILED, result)?;
        self.write(|s| s.current_item = Some(record.clone()));
        Some(record)
    }

    /// Create a record, then re-fetch the list for server-computed fields.
    #[instrument(skip(self, payload), fields(entity = T::RESOURCE.name))]
    pub async fn create_item(&self, payload: &Payload) -> Option<T> {
        let token = self.require_token("create", CREATE_FAILED)?;
        let _in_flight = self.begin();

        let result = self.api.create(payload, &token).await;
        let record = self.settle("create", CREATE_FAILED, result)?;
        debug!(uuid = record.uuid(), "Created item");
        self.write(|s| s.current_item = Some(record.clone()));
        self.fetch_items().await;
        Some(record)
    }

    /// Update a record, then re-fetch the list.
    #[instrument(skip(self, payload), fields(entity = T::RESOURCE.name))]
    pub async fn update_item(&self, uuid: &str, payload: &Payload) -> Option<T> {
        let token = self.require_token("update", UPDATE_FAILED)?;
        let _in_flight = self.begin();

        let result = self.api.update(uuid, payload, &token).await;
        let record = self.settle("update", UPDATE_FAILED, result)?;
        self.write(|s| s.current_item = Some(record.clone()));
        self.fetch_items().await;
        Some(record)
    }

    /// Soft-delete a record, then re-fetch the list.
    #[instrument(skip(self), fields(entity = T::RESOURCE.name))]
    pub async fn delete_item(&self, uuid: &str) -> bool {
        let Some(token) = self.require_token("delete", DELETE_FAILED) else {
            return false;
        };
        let _in_flight = self.begin();

        let result = self.api.delete(uuid, &token).await;
        if self.settle("delete", DELETE_FAILED, result).is_none() {
            return false;
        }
        self.fetch_items().await;
        true
    }

    /// Restore a soft-deleted record, then re-fetch the list.
    #[instrument(skip(self), fields(entity = T::RESOURCE.name))]
    pub async fn restore_item(&self, uuid: &str) -> Option<T> {
        let token = self.require_token("restore", RESTORE_FAILED)?;
        let _in_flight = self.begin();

        let result = self.api.restore(uuid, &token).await;
        let record = self.settle("restore", RESTORE_FAILED, result)?;
        self.write(|s| s.current_item = Some(record.clone()));
        self.fetch_items().await;
        Some(record)
    }
}

impl<T, A> std::fmt::Debug for Resource<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Resource")
            .field("items", &state.items.len())
            .field("in_flight", &state.in_flight)
            .field("error", &state.error)
            .finish()
    }
}
