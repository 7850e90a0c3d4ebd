//! redb-backed container app persistence.
//!
//! Provides typed CRUD over container apps plus the three scale-template
//! mutations the wizards commit: replacing the rule collection, setting the
//! replica range, and adding a secret. Values are JSON-serialized into
//! redb's `&[u8]` value column. The store supports both on-disk and
//! in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use appscale_core::{ContainerApp, ScaleRule, Secret};

use crate::error::{StateError, StateResult};
use crate::tables::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe state store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(CONTAINER_APPS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Container apps ─────────────────────────────────────────────

    /// Insert or replace a container app.
    pub fn put_container_app(&self, app: &ContainerApp) -> StateResult<()> {
        let key = app.table_key();
        let value = serde_json::to_vec(app).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(CONTAINER_APPS).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, "container app stored");
        Ok(())
    }

    /// Get a container app by its `{resource_group}/{name}` key.
    pub fn get_container_app(&self, key: &str) -> StateResult<Option<ContainerApp>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CONTAINER_APPS).map_err(map_err!(Table))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => {
                let app: ContainerApp =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(app))
            }
            None => Ok(None),
        }
    }

    /// List all container apps, ordered by key.
    pub fn list_container_apps(&self) -> StateResult<Vec<ContainerApp>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CONTAINER_APPS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let app: ContainerApp =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(app);
        }
        Ok(results)
    }

    /// Delete a container app by key. Returns true if it existed.
    pub fn delete_container_app(&self, key: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(CONTAINER_APPS).map_err(map_err!(Table))?;
            existed = table.remove(key).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, existed, "container app deleted");
        Ok(existed)
    }

    // ── Scale template ─────────────────────────────────────────────

    /// Replace the whole rule collection of a container app.
    pub fn update_scale_rules(&self, key: &str, rules: &[ScaleRule]) -> StateResult<ContainerApp> {
        let app = self.modify_container_app(key, |app| {
            app.template.scale.rules = rules.to_vec();
            Ok(())
        })?;
        debug!(%key, rules = rules.len(), "scale rules updated");
        Ok(app)
    }

    /// Set the replica range of a container app.
    pub fn update_scale_range(&self, key: &str, min: u32, max: u32) -> StateResult<ContainerApp> {
        let app = self.modify_container_app(key, |app| {
            app.template.scale.min_replicas = Some(min);
            app.template.scale.max_replicas = Some(max);
            Ok(())
        })?;
        debug!(%key, min, max, "scale range updated");
        Ok(app)
    }

    /// Add a secret. Names are unique case-insensitively.
    pub fn add_secret(&self, key: &str, secret: &Secret) -> StateResult<ContainerApp> {
        let app = self.modify_container_app(key, |app| {
            if app
                .secrets
                .iter()
                .any(|s| s.name.eq_ignore_ascii_case(&secret.name))
            {
                return Err(StateError::Conflict(format!(
                    "secret {} already exists on {key}",
                    secret.name
                )));
            }
            app.secrets.push(secret.clone());
            Ok(())
        })?;
        debug!(%key, secret = %secret.name, "secret added");
        Ok(app)
    }

    /// Read-modify-write a container app inside one write transaction.
    ///
    /// If `mutate` fails the transaction is dropped uncommitted.
    fn modify_container_app<F>(&self, key: &str, mutate: F) -> StateResult<ContainerApp>
    where
        F: FnOnce(&mut ContainerApp) -> StateResult<()>,
    {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let app = {
            let mut table = txn.open_table(CONTAINER_APPS).map_err(map_err!(Table))?;
            let current = table
                .get(key)
                .map_err(map_err!(Read))?
                .map(|guard| guard.value().to_vec())
                .ok_or_else(|| StateError::NotFound(key.to_string()))?;
            let mut app: ContainerApp =
                serde_json::from_slice(&current).map_err(map_err!(Deserialize))?;
            mutate(&mut app)?;
            app.updated_at = epoch_secs();
            let value = serde_json::to_vec(&app).map_err(map_err!(Serialize))?;
            table
                .insert(key, value.as_slice())
                .map_err(map_err!(Write))?;
            app
        };
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(app)
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
