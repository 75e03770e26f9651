//! Client-side record store.
//!
//! The store holds the canonical in-memory list that views render, plus the
//! current search term. Every mutator is a synchronous, infallible state
//! transition; nothing here touches the network.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::entity::{Entity, coerce_text, display_sort_key};

/// Current time in the `deleted_at` wire format (ISO-8601, UTC, millis).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// In-memory list state for one entity type.
#[derive(Debug, Clone)]
pub struct Store<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    search_term: String,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            search_term: String::new(),
        }
    }
}

impl<T: Entity> Store<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn get(&self, uuid: &str) -> Option<&T> {
        self.items.iter().find(|item| item.uuid() == uuid)
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.get(uuid).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the whole list.
    ///
    /// Later duplicates of a uuid are dropped so the one-record-per-uuid
    /// invariant holds regardless of what the caller passes.
    pub fn set_items(&mut self, items: Vec<T>) {
        let mut seen = HashSet::with_capacity(items.len());
        let before = items.len();
        self.items = items
            .into_iter()
            .filter(|item| seen.insert(item.uuid().to_string()))
            .collect();
        if self.items.len() != before {
            warn!(
                entity = T::RESOURCE.name,
                dropped = before - self.items.len(),
                "Dropped duplicate uuids from item list"
            );
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Update the filter input; `items` is left untouched.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Insert at the head, then sort by the display field.
    ///
    /// A uuid that is already present is replaced in place instead.
    pub fn add_item(&mut self, item: T) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.uuid() == item.uuid()) {
            debug!(entity = T::RESOURCE.name, uuid = item.uuid(), "add_item on existing uuid, replacing");
            *existing = item;
            return;
        }

        self.items.insert(0, item);
        self.items
            .sort_by_cached_key(|i| display_sort_key(i.field_text(T::DISPLAY_FIELD)));
    }

    /// Shallow-merge `patch` into the record with this uuid.
    ///
    /// `patch` may be a full record or any JSON object of fields. Returns
    /// false when the uuid is absent or the merge does not produce a valid
    /// record; the stored entry is unchanged in both cases.
    pub fn update_item<P: Serialize + ?Sized>(&mut self, uuid: &str, patch: &P) -> bool {
        let Some(index) = self.items.iter().position(|i| i.uuid() == uuid) else {
            return false;
        };

        match merge(&self.items[index], patch) {
            Some(merged) => {
                self.items[index] = merged;
                true
            }
            None => {
                warn!(entity = T::RESOURCE.name, uuid, "Ignoring patch that does not merge into a record");
                false
            }
        }
    }

    /// Mark a record soft-deleted (`deleted_at = now`) or active (`None`).
    pub fn update_item_status(&mut self, uuid: &str, is_deleted: bool) -> bool {
        let deleted_at = is_deleted.then(now_timestamp);
        self.set_deleted_at(uuid, deleted_at)
    }

    /// Set `deleted_at` on a record verbatim; used to roll back optimistic
    /// status changes to their exact prior value.
    pub fn set_deleted_at(&mut self, uuid: &str, deleted_at: Option<String>) -> bool {
        match self.items.iter_mut().find(|i| i.uuid() == uuid) {
            Some(item) => {
                item.set_deleted_at(deleted_at);
                true
            }
            None => false,
        }
    }

    /// Items matching the search term across the entity's search fields.
    ///
    /// An empty term returns every item in store order.
    pub fn filtered_items(&self) -> Vec<T> {
        if self.search_term.is_empty() {
            return self.items.clone();
        }

        let needle = self.search_term.to_lowercase();
        self.items
            .iter()
            .filter(|item| matches_search(*item, &needle))
            .cloned()
            .collect()
    }

    pub fn active_items(&self) -> Vec<T> {
        self.items.iter().filter(|i| !i.is_deleted()).cloned().collect()
    }

    pub fn deleted_items(&self) -> Vec<T> {
        self.items.iter().filter(|i| i.is_deleted()).cloned().collect()
    }
}

fn matches_search<T: Entity>(item: &T, needle: &str) -> bool {
    let Ok(value) = serde_json::to_value(item) else {
        return false;
    };
    T::SEARCH_FIELDS.iter().any(|field| {
        value
            .get(field)
            .and_then(coerce_text)
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

fn merge<T: Entity, P: Serialize + ?Sized>(current: &T, patch: &P) -> Option<T> {
    let Value::Object(mut base) = serde_json::to_value(current).ok()? else {
        return None;
    };
    let Value::Object(changes) = serde_json::to_value(patch).ok()? else {
        return None;
    };
    base.extend(changes);
    serde_json::from_value(Value::Object(base)).ok()
}

/// A store shared between a sync instance and its readers.
///
/// Locks are held only for the duration of the closure passed to
/// [`read`](Self::read) / [`write`](Self::write), never across an await.
#[derive(Debug)]
pub struct SharedStore<T> {
    inner: Arc<RwLock<Store<T>>>,
}

impl<T> Clone for SharedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Entity> Default for SharedStore<T> {
    fn default() -> Self {
        Self::new(Store::new())
    }
}

impl<T: Entity> SharedStore<T> {
    pub fn new(store: Store<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&Store<T>) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Store<T>) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn items(&self) -> Vec<T> {
        self.read(|s| s.items().to_vec())
    }

    pub fn get(&self, uuid: &str) -> Option<T> {
        self.read(|s| s.get(uuid).cloned())
    }

    pub fn filtered_items(&self) -> Vec<T> {
        self.read(Store::filtered_items)
    }

    pub fn loading(&self) -> bool {
        self.read(Store::loading)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error().map(str::to_string))
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.write(|s| s.set_search_term(term));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Zone;
    use serde_json::json;

    fn zone(uuid: &str, name: &str) -> Zone {
        serde_json::from_value(json!({
            "uuid": uuid,
            "zone_name": name,
            "deleted_at": null
        }))
        .unwrap()
    }

    fn uuids(items: &[Zone]) -> Vec<&str> {
        items.iter().map(|z| z.uuid.as_str()).collect()
    }

    #[test]
    fn add_item_sorts_by_display_field() {
        let mut store = Store::new();
        store.set_items(vec![zone("a", "Alpha"), zone("c", "Charlie")]);
        store.add_item(zone("b", "bravo"));
        assert_eq!(uuids(store.items()), vec!["a", "b", "c"]);
    }

    #[test]
    fn add_item_missing_display_value_sorts_first() {
        let mut store = Store::new();
        store.set_items(vec![zone("a", "Alpha")]);
        let mut unnamed = zone("x", "");
        unnamed.zone_name = None;
        store.add_item(unnamed);
        assert_eq!(uuids(store.items()), vec!["x", "a"]);
    }

    #[test]
    fn uuids_stay_unique() {
        let mut store = Store::new();
        store.set_items(vec![zone("a", "A"), zone("a", "Again"), zone("b", "B")]);
        assert_eq!(uuids(store.items()), vec!["a", "b"]);
        assert_eq!(store.get("a").unwrap().zone_name.as_deref(), Some("A"));

        store.add_item(zone("b", "Bee"));
        assert_eq!(store.items().len(), 2);
        assert_eq!(store.get("b").unwrap().zone_name.as_deref(), Some("Bee"));
    }

    #[test]
    fn update_item_merges_partial_patch() {
        let mut store = Store::new();
        let mut original = zone("a", "North");
        original.code = Some("N1".into());
        store.set_items(vec![original]);

        assert!(store.update_item("a", &json!({"zone_name": "North East"})));
        let updated = store.get("a").unwrap();
        assert_eq!(updated.zone_name.as_deref(), Some("North East"));
        assert_eq!(updated.code.as_deref(), Some("N1"));
    }

    #[test]
    fn update_item_unknown_uuid_is_noop() {
        let mut store = Store::new();
        store.set_items(vec![zone("a", "North")]);
        assert!(!store.update_item("zzz", &json!({"zone_name": "x"})));
        assert_eq!(store.get("a").unwrap().zone_name.as_deref(), Some("North"));
    }

    #[test]
    fn update_item_rejects_patch_breaking_the_record() {
        let mut store = Store::new();
        store.set_items(vec![zone("a", "North")]);
        assert!(!store.update_item("a", &json!({"uuid": 12})));
        assert_eq!(store.get("a").unwrap().uuid, "a");
    }

    #[test]
    fn update_item_status_only_touches_deleted_at() {
        let mut store = Store::new();
        store.set_items(vec![zone("a", "North")]);

        store.update_item_status("a", true);
        let deleted = store.get("a").unwrap();
        assert!(deleted.deleted_at.as_deref().unwrap().ends_with('Z'));
        assert_eq!(deleted.zone_name.as_deref(), Some("North"));

        store.update_item_status("a", false);
        assert!(store.get("a").unwrap().deleted_at.is_none());
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut store = Store::new();
        store.set_items(vec![zone("a", "ACME Corp"), zone("b", "Other")]);

        store.set_search_term("acme");
        assert_eq!(uuids(&store.filtered_items()), vec!["a"]);

        store.set_search_term("nothing-like-this");
        assert!(store.filtered_items().is_empty());
    }

    #[test]
    fn filter_does_not_match_null_as_text() {
        let mut store = Store::new();
        let mut z = zone("a", "North");
        z.code = None;
        store.set_items(vec![z]);
        store.set_search_term("null");
        assert!(store.filtered_items().is_empty());
    }

    #[test]
    fn search_checks_every_search_field() {
        let mut store = Store::new();
        let coded: Zone = serde_json::from_value(json!({
            "uuid": "b",
            "zone_name": "Beta",
            "code": 4410,
            "description": "North yard"
        }))
        .unwrap();
        store.set_items(vec![zone("a", "Alpha"), coded]);

        store.set_search_term("441");
        assert_eq!(uuids(&store.filtered_items()), vec!["b"]);
        store.set_search_term("YARD");
        assert_eq!(uuids(&store.filtered_items()), vec!["b"]);
    }

    #[test]
    fn empty_search_is_identity() {
        let mut store = Store::new();
        store.set_items(vec![zone("b", "Beta"), zone("a", "Alpha")]);
        store.set_search_term("");
        assert_eq!(uuids(&store.filtered_items()), vec!["b", "a"]);
    }

    #[test]
    fn active_and_deleted_partitions() {
        let mut store = Store::new();
        store.set_items(vec![zone("a", "A"), zone("b", "B")]);
        store.update_item_status("b", true);
        assert_eq!(uuids(&store.active_items()), vec!["a"]);
        assert_eq!(uuids(&store.deleted_items()), vec!["b"]);
    }

    #[test]
    fn shared_store_clones_see_same_state() {
        let shared = SharedStore::<Zone>::default();
        let reader = shared.clone();
        shared.write(|s| s.set_items(vec![zone("a", "A")]));
        assert_eq!(reader.items().len(), 1);
        reader.set_search_term("a");
        assert_eq!(shared.read(|s| s.search_term().to_string()), "a");
    }
}
