//! Shared test helpers: a scripted in-process backend.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Semaphore;

use claimdesk_core::error::{ProtocolError, ShapeError, TransportError};
use claimdesk_core::{AccessToken, Entity, Payload, ResourceApi, Result};

pub const DELETED_AT: &str = "2026-03-01T10:00:00.000Z";

/// How the list endpoint misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFailure {
    /// `{success: false}`
    Envelope,
    /// Connection refused.
    Network,
}

/// In-memory backend with switchable failures and an optional gate that
/// holds every write until the test releases a permit.
pub struct MockApi<T> {
    records: Mutex<Vec<T>>,
    list_failure: Mutex<Option<ListFailure>>,
    fail_writes: AtomicBool,
    gate: Option<Arc<Semaphore>>,
    uuids: Mutex<VecDeque<String>>,
    next_id: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
}

impl<T: Entity> MockApi<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
            list_failure: Mutex::new(None),
            fail_writes: AtomicBool::new(false),
            gate: None,
            uuids: Mutex::new(VecDeque::new()),
            next_id: AtomicUsize::new(1),
            list_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
        }
    }

    /// Writes wait for a permit on `gate` before responding.
    pub fn gated(records: Vec<T>, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(records)
        }
    }

    pub fn records(&self) -> Vec<T> {
        self.records.lock().unwrap().clone()
    }

    pub fn push(&self, record: T) {
        self.records.lock().unwrap().push(record);
    }

    pub fn fail_list(&self, failure: Option<ListFailure>) {
        *self.list_failure.lock().unwrap() = failure;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The uuid the next create assigns.
    pub fn assign_uuid(&self, uuid: &str) {
        self.uuids.lock().unwrap().push_back(uuid.to_string());
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    async fn begin_write(&self) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TransportError::Connection {
                message: "connection refused".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn not_found(uuid: &str) -> claimdesk_core::Error {
        ProtocolError::new(404, Some(format!("Record {uuid} not found"))).into()
    }

    fn with_record<R>(&self, uuid: &str, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.uuid() == uuid)
            .ok_or_else(|| Self::not_found(uuid))?;
        Ok(f(record))
    }
}

#[async_trait]
impl<T: Entity> ResourceApi<T> for MockApi<T> {
    async fn list(&self, _token: &AccessToken) -> Result<Vec<T>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let failure = *self.list_failure.lock().unwrap();
        match failure {
            Some(ListFailure::Envelope) => Err(ShapeError::Unsuccessful { message: None }.into()),
            Some(ListFailure::Network) => Err(TransportError::Connection {
                message: "connection refused".to_string(),
            }
            .into()),
            None => Ok(self.records()),
        }
    }

    async fn get(&self, uuid: &str, _token: &AccessToken) -> Result<T> {
        self.with_record(uuid, |r| r.clone())
    }

    async fn create(&self, payload: &Payload, _token: &AccessToken) -> Result<T> {
        self.begin_write().await?;

        let uuid = self.uuids.lock().unwrap().pop_front().unwrap_or_else(|| {
            format!("mock-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
        });
        let mut fields = payload.fields().clone();
        fields.insert("uuid".to_string(), Value::String(uuid));
        fields.insert("deleted_at".to_string(), Value::Null);

        let record: T = serde_json::from_value(Value::Object(fields)).unwrap();
        self.push(record.clone());
        Ok(record)
    }

    async fn update(&self, uuid: &str, payload: &Payload, _token: &AccessToken) -> Result<T> {
        self.begin_write().await?;
        self.with_record(uuid, |record| {
            let mut value = serde_json::to_value(&*record).unwrap();
            for (key, field) in payload.fields() {
                value[key] = field.clone();
            }
            *record = serde_json::from_value(value).unwrap();
            record.clone()
        })
    }

    async fn delete(&self, uuid: &str, _token: &AccessToken) -> Result<()> {
        self.begin_write().await?;
        self.with_record(uuid, |r| r.set_deleted_at(Some(DELETED_AT.to_string())))
    }

    async fn restore(&self, uuid: &str, _token: &AccessToken) -> Result<T> {
        self.begin_write().await?;
        self.with_record(uuid, |r| {
            r.set_deleted_at(None);
            r.clone()
        })
    }
}

pub fn record<T: Entity>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

pub fn zone(uuid: &str, name: &str) -> claimdesk_core::entities::Zone {
    record(json!({"uuid": uuid, "zone_name": name, "deleted_at": null}))
}

pub fn token() -> Option<AccessToken> {
    Some(AccessToken::new("test-token"))
}

/// Yield until `check` holds; panics after a bounded number of polls.
pub async fn until(mut check: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if check() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
