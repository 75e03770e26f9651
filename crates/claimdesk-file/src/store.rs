//! Filesystem storage for the file-backed resources.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use fs2::FileExt;
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use uuid::Uuid;

use claimdesk_core::error::{Error, InvalidInputError, ProtocolError, ShapeError, TransportError};
use claimdesk_core::{Attachment, ResourceSpec, Result};

fn map_io(err: std::io::Error) -> Error {
    Error::Transport(TransportError::from(err))
}

fn not_found(spec: &ResourceSpec, uuid: &str) -> Error {
    Error::Protocol(ProtocolError::new(
        404,
        Some(format!("{} {} not found", spec.name, uuid)),
    ))
}

pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Holds an exclusive lock on an entity directory until dropped.
struct DirLock(File);

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

/// Filesystem-backed record storage shared by every entity type.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_dir(&self, spec: &ResourceSpec) -> PathBuf {
        self.root.join(spec.path)
    }

    fn record_path(&self, spec: &ResourceSpec, uuid: &str) -> PathBuf {
        self.entity_dir(spec).join(format!("{uuid}.json"))
    }

    fn attachments_dir(&self, spec: &ResourceSpec, uuid: &str) -> PathBuf {
        self.entity_dir(spec).join(uuid)
    }

    /// Reject uuids that would escape the entity directory.
    fn check_uuid(uuid: &str) -> Result<()> {
        let valid = !uuid.is_empty()
            && uuid
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(())
        } else if uuid.is_empty() {
            Err(InvalidInputError::EmptyUuid.into())
        } else {
            Err(InvalidInputError::Other {
                message: format!("invalid record uuid '{uuid}'"),
            }
            .into())
        }
    }

    fn lock(&self, spec: &ResourceSpec) -> Result<DirLock> {
        let dir = self.entity_dir(spec);
        fs::create_dir_all(&dir).map_err(map_io)?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(dir.join(".lock"))
            .map_err(map_io)?;
        file.lock_exclusive().map_err(map_io)?;
        Ok(DirLock(file))
    }

    fn read_path(path: &Path) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(path).map_err(map_io)?;
        match serde_json::from_str(&content) {
            Ok(Value::Object(record)) => Ok(record),
            Ok(_) => Err(ShapeError::Decode {
                message: format!("{} does not hold a JSON object", path.display()),
            }
            .into()),
            Err(e) => Err(ShapeError::Decode {
                message: format!("{}: {}", path.display(), e),
            }
            .into()),
        }
    }

    fn write_record(&self, spec: &ResourceSpec, uuid: &str, record: &Map<String, Value>) -> Result<()> {
        let path = self.record_path(spec, uuid);
        let content = serde_json::to_string_pretty(record).map_err(|e| InvalidInputError::Other {
            message: e.to_string(),
        })?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(map_io)?;
        fs::rename(&temp_path, &path).map_err(map_io)?;
        Ok(())
    }

    /// Write attachments beside the record and add their paths to `record`.
    ///
    /// `photo_path[]` parts accumulate into a `photo_path` array; other keys
    /// take the path of their last part.
    fn store_attachments(
        &self,
        spec: &ResourceSpec,
        uuid: &str,
        attachments: &[Attachment],
        record: &mut Map<String, Value>,
    ) -> Result<()> {
        if attachments.is_empty() {
            return Ok(());
        }

        let dir = self.attachments_dir(spec, uuid);
        fs::create_dir_all(&dir).map_err(map_io)?;

        for attachment in attachments {
            let file_name = Path::new(&attachment.file_name)
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| InvalidInputError::Other {
                    message: format!("invalid attachment name '{}'", attachment.file_name),
                })?;
            fs::write(dir.join(file_name), &attachment.bytes).map_err(map_io)?;

            let stored = Value::String(format!("{}/{}/{}", spec.path, uuid, file_name));
            match attachment.field.strip_suffix("[]") {
                Some(key) => match record.get_mut(key) {
                    Some(Value::Array(paths)) => paths.push(stored),
                    _ => {
                        record.insert(key.to_string(), Value::Array(vec![stored]));
                    }
                },
                None => {
                    record.insert(attachment.field.clone(), stored);
                }
            }
        }
        Ok(())
    }

    /// All records of an entity, oldest first.
    #[instrument(skip(self), fields(entity = spec.name))]
    pub fn list(&self, spec: &ResourceSpec) -> Result<Vec<Value>> {
        let dir = self.entity_dir(spec);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir).map_err(map_io)? {
            let path = entry.map_err(map_io)?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                records.push(Self::read_path(&path)?);
            }
        }

        records.sort_by(|a, b| {
            let key = |r: &Map<String, Value>| {
                (
                    r.get("created_at").and_then(Value::as_str).map(str::to_string),
                    r.get("uuid").and_then(Value::as_str).map(str::to_string),
                )
            };
            key(a).cmp(&key(b))
        });

        debug!(count = records.len(), "Listed records");
        Ok(records.into_iter().map(Value::Object).collect())
    }

    #[instrument(skip(self), fields(entity = spec.name))]
    pub fn get(&self, spec: &ResourceSpec, uuid: &str) -> Result<Value> {
        Self::check_uuid(uuid)?;
        let path = self.record_path(spec, uuid);
        if !path.exists() {
            return Err(not_found(spec, uuid));
        }
        Self::read_path(&path).map(Value::Object)
    }

    /// Store a new record under a fresh uuid.
    #[instrument(skip(self, fields, attachments), fields(entity = spec.name))]
    pub fn create(
        &self,
        spec: &ResourceSpec,
        fields: &Map<String, Value>,
        attachments: &[Attachment],
    ) -> Result<Value> {
        let _lock = self.lock(spec)?;

        let uuid = Uuid::new_v4().to_string();
        let now = timestamp();

        let mut record = fields.clone();
        record.insert("uuid".to_string(), Value::String(uuid.clone()));
        record.insert("created_at".to_string(), Value::String(now.clone()));
        record.insert("updated_at".to_string(), Value::String(now));
        record.insert("deleted_at".to_string(), Value::Null);
        self.store_attachments(spec, &uuid, attachments, &mut record)?;

        self.write_record(spec, &uuid, &record)?;
        debug!(uuid = %uuid, "Created record");
        Ok(Value::Object(record))
    }

    /// Shallow-merge `fields` into an existing record.
    #[instrument(skip(self, fields, attachments), fields(entity = spec.name))]
    pub fn update(
        &self,
        spec: &ResourceSpec,
        uuid: &str,
        fields: &Map<String, Value>,
        attachments: &[Attachment],
    ) -> Result<Value> {
        Self::check_uuid(uuid)?;
        self.modify(spec, uuid, |store, record| {
            for (key, value) in fields {
                if key != "uuid" {
                    record.insert(key.clone(), value.clone());
                }
            }
            store.store_attachments(spec, uuid, attachments, record)
        })
    }

    /// Set or clear `deleted_at`.
    #[instrument(skip(self), fields(entity = spec.name))]
    pub fn set_deleted(&self, spec: &ResourceSpec, uuid: &str, deleted: bool) -> Result<Value> {
        Self::check_uuid(uuid)?;
        self.modify(spec, uuid, |_, record| {
            let deleted_at = if deleted {
                Value::String(timestamp())
            } else {
                Value::Null
            };
            record.insert("deleted_at".to_string(), deleted_at);
            Ok(())
        })
    }

    fn modify(
        &self,
        spec: &ResourceSpec,
        uuid: &str,
        change: impl FnOnce(&Self, &mut Map<String, Value>) -> Result<()>,
    ) -> Result<Value> {
        let _lock = self.lock(spec)?;

        let path = self.record_path(spec, uuid);
        if !path.exists() {
            return Err(not_found(spec, uuid));
        }

        let mut record = Self::read_path(&path)?;
        change(self, &mut record)?;
        record.insert("updated_at".to_string(), Value::String(timestamp()));

        self.write_record(spec, uuid, &record)?;
        debug!(uuid, "Updated record");
        Ok(Value::Object(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPEC: ResourceSpec = ResourceSpec::json("zone", "zones");

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn create_assigns_uuid_and_timestamps() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        let record = store.create(&SPEC, &fields(json!({"zone_name": "North"})), &[]).unwrap();

        let uuid = record["uuid"].as_str().unwrap();
        assert!(tmp.path().join("zones").join(format!("{uuid}.json")).exists());
        assert!(record["created_at"].as_str().unwrap().ends_with('Z'));
        assert!(record["deleted_at"].is_null());
    }

    #[test]
    fn list_is_empty_without_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        assert!(store.list(&SPEC).unwrap().is_empty());
    }

    #[test]
    fn soft_delete_keeps_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        let record = store.create(&SPEC, &Map::new(), &[]).unwrap();
        let uuid = record["uuid"].as_str().unwrap().to_string();

        let deleted = store.set_deleted(&SPEC, &uuid, true).unwrap();
        assert!(deleted["deleted_at"].is_string());
        assert_eq!(store.list(&SPEC).unwrap().len(), 1);

        let restored = store.set_deleted(&SPEC, &uuid, false).unwrap();
        assert!(restored["deleted_at"].is_null());
    }

    #[test]
    fn update_merges_and_keeps_uuid() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        let record = store
            .create(&SPEC, &fields(json!({"zone_name": "North", "code": "N1"})), &[])
            .unwrap();
        let uuid = record["uuid"].as_str().unwrap().to_string();

        let updated = store
            .update(&SPEC, &uuid, &fields(json!({"zone_name": "Far North", "uuid": "other"})), &[])
            .unwrap();

        assert_eq!(updated["zone_name"], "Far North");
        assert_eq!(updated["code"], "N1");
        assert_eq!(updated["uuid"], uuid.as_str());
    }

    #[test]
    fn photo_attachments_accumulate() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        let attachments = vec![
            Attachment::new("photo_path[]", "front.jpg", vec![1]),
            Attachment::new("photo_path[]", "back.jpg", vec![2]),
        ];

        let record = store.create(&SPEC, &Map::new(), &attachments).unwrap();
        let uuid = record["uuid"].as_str().unwrap();

        assert_eq!(record["photo_path"].as_array().unwrap().len(), 2);
        assert!(tmp.path().join("zones").join(uuid).join("back.jpg").exists());
    }

    #[test]
    fn missing_record_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        let err = store.get(&SPEC, "missing").unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError { status: 404, .. })));
    }

    #[test]
    fn path_traversal_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        assert!(store.get(&SPEC, "../secrets").is_err());
        assert!(matches!(
            store.get(&SPEC, "").unwrap_err(),
            Error::InvalidInput(InvalidInputError::EmptyUuid)
        ));
    }
}
