use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};
use vb_import::{CellarStore, ImportError, ImportItem};
use vb_schemas::{BottleRecord, OpenedRecord};
use vb_status::{tally, DashboardStats};

use crate::{BottleFilter, FilterOptions, StoreError};

/// On-disk shape of a cellar file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellarSnapshot {
    #[serde(default)]
    pub bottles: Vec<BottleRecord>,
    #[serde(default)]
    pub opened: Vec<OpenedRecord>,
}

/// Parameters for opening bottles from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub quantity: i64,
    pub rating_100: Option<i64>,
    pub tasting_notes: Option<String>,
    pub opened_at: DateTime<Utc>,
}

impl OpenRequest {
    pub fn one(opened_at: DateTime<Utc>) -> Self {
        Self {
            quantity: 1,
            rating_100: None,
            tasting_notes: None,
            opened_at,
        }
    }
}

/// Patch for an opened record. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenedUpdate {
    pub tasting_notes: Option<String>,
    pub rating_100: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deleted {
    pub bottle: BottleRecord,
    pub opened_removed: usize,
}

fn check_rating(rating: Option<i64>) -> Result<(), StoreError> {
    match rating {
        Some(r) if !(0..=100).contains(&r) => Err(StoreError::InvalidRating(r)),
        _ => Ok(()),
    }
}

fn parse_fields(fields: &Value) -> Result<ImportItem, StoreError> {
    ImportItem::from_raw(fields).map_err(StoreError::InvalidFields)
}

fn bottle_not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        kind: "bottle",
        id: id.to_string(),
    }
}

/// In-process cellar. Every read and write is scoped by owner.
#[derive(Debug, Default)]
pub struct Cellar {
    state: RwLock<CellarSnapshot>,
}

impl Cellar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CellarSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Load a cellar file. A missing file is an empty cellar.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "cellar file absent; starting empty");
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let snapshot: CellarSnapshot =
            serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            path = %path.display(),
            bottles = snapshot.bottles.len(),
            opened = snapshot.opened.len(),
            "cellar loaded"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the cellar as pretty JSON. Writes a sibling temp file first and
    /// renames it over `path`, so a crash never leaves a half-written file.
    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        let snapshot = self.snapshot().await;
        let json = serde_json::to_string_pretty(&snapshot).map_err(|source| {
            StoreError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, format!("{json}\n")).map_err(io)?;
        fs::rename(&tmp, path).map_err(io)?;

        debug!(path = %path.display(), bottles = snapshot.bottles.len(), "cellar saved");
        Ok(())
    }

    pub async fn snapshot(&self) -> CellarSnapshot {
        self.state.read().await.clone()
    }

    pub async fn get(&self, owner_id: &str, id: &str) -> Result<BottleRecord, StoreError> {
        self.state
            .read()
            .await
            .bottles
            .iter()
            .find(|b| b.id == id && b.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| bottle_not_found(id))
    }

    /// Bottles matching `filter`, newest first.
    pub async fn list(
        &self,
        owner_id: &str,
        filter: &BottleFilter,
        now_year: i32,
    ) -> Vec<BottleRecord> {
        let state = self.state.read().await;
        let mut out: Vec<BottleRecord> = state
            .bottles
            .iter()
            .filter(|b| b.owner_id == owner_id && filter.matches(b, now_year))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    pub async fn filter_options(&self, owner_id: &str) -> FilterOptions {
        let state = self.state.read().await;
        FilterOptions::collect(state.bottles.iter().filter(|b| b.owner_id == owner_id))
    }

    /// Create a line by direct entry.
    ///
    /// `fields` uses the import item shape and goes through the same
    /// coercion and canonicalization. Quantity defaults to 1. Nothing is
    /// recorded as import provenance.
    pub async fn create(
        &self,
        owner_id: &str,
        fields: &Value,
        now: DateTime<Utc>,
    ) -> Result<BottleRecord, StoreError> {
        let item = parse_fields(fields)?;

        let mut state = self.state.write().await;
        if state
            .bottles
            .iter()
            .any(|b| b.external_key == item.external_key && b.owner_id == owner_id)
        {
            return Err(StoreError::DuplicateKey {
                external_key: item.external_key,
            });
        }

        let mut rec = BottleRecord::new(owner_id, item.external_key.clone(), now);
        item.patch_fields(&mut rec);
        rec.quantity = item.quantity.unwrap_or(1);
        state.bottles.push(rec.clone());

        info!(owner_id, id = %rec.id, external_key = %rec.external_key, "bottle created");
        Ok(rec)
    }

    /// Patch the fields present in `patch`; absent or null fields keep their
    /// stored value. An explicit `quantity` replaces the count. The natural
    /// key cannot be changed.
    pub async fn edit(
        &self,
        owner_id: &str,
        id: &str,
        patch: &Value,
        now: DateTime<Utc>,
    ) -> Result<BottleRecord, StoreError> {
        let mut obj = patch
            .as_object()
            .cloned()
            .ok_or(StoreError::InvalidFields(ImportError::NotAnObject))?;

        let mut state = self.state.write().await;
        let bottle = state
            .bottles
            .iter_mut()
            .find(|b| b.id == id && b.owner_id == owner_id)
            .ok_or_else(|| bottle_not_found(id))?;

        if let Some(key) = vb_import::external_key_of(patch) {
            if key != bottle.external_key {
                return Err(StoreError::InvalidFields(ImportError::InvalidField {
                    field: "external_key",
                    detail: "cannot be changed by an edit".to_string(),
                }));
            }
        }
        obj.insert(
            "external_key".to_string(),
            Value::String(bottle.external_key.clone()),
        );
        let item = parse_fields(&Value::Object(obj))?;

        item.patch_fields(bottle);
        if let Some(q) = item.quantity {
            bottle.quantity = q;
        }
        bottle.updated_at = now;

        info!(owner_id, id, "bottle edited");
        Ok(bottle.clone())
    }

    /// Add `delta` bottles to a line (negative to remove). A change that
    /// would leave the line below zero is refused and nothing is written.
    pub async fn adjust_quantity(
        &self,
        owner_id: &str,
        id: &str,
        delta: i64,
        now: DateTime<Utc>,
    ) -> Result<BottleRecord, StoreError> {
        if delta == 0 {
            return Err(StoreError::InvalidQuantity(delta));
        }

        let mut state = self.state.write().await;
        let bottle = state
            .bottles
            .iter_mut()
            .find(|b| b.id == id && b.owner_id == owner_id)
            .ok_or_else(|| bottle_not_found(id))?;

        let next = bottle
            .quantity
            .checked_add(delta)
            .ok_or(StoreError::InvalidQuantity(delta))?;
        if next < 0 {
            return Err(StoreError::InsufficientQuantity {
                id: id.to_string(),
                on_hand: bottle.quantity,
                requested: delta.saturating_neg(),
            });
        }
        bottle.quantity = next;
        bottle.updated_at = now;

        info!(owner_id, id, delta, quantity = next, "bottle quantity adjusted");
        Ok(bottle.clone())
    }

    /// Remove a bottle line and every opened record pointing at it.
    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<Deleted, StoreError> {
        let mut state = self.state.write().await;
        let idx = state
            .bottles
            .iter()
            .position(|b| b.id == id && b.owner_id == owner_id)
            .ok_or_else(|| bottle_not_found(id))?;
        let bottle = state.bottles.remove(idx);

        let before = state.opened.len();
        state
            .opened
            .retain(|o| !(o.owner_id == owner_id && o.bottle_id.as_deref() == Some(id)));
        let opened_removed = before - state.opened.len();

        info!(owner_id, id, opened_removed, "bottle deleted");
        Ok(Deleted {
            bottle,
            opened_removed,
        })
    }

    /// Take `req.quantity` bottles off a line and log the event.
    pub async fn open_bottle(
        &self,
        owner_id: &str,
        id: &str,
        req: OpenRequest,
    ) -> Result<(BottleRecord, OpenedRecord), StoreError> {
        if req.quantity < 1 {
            return Err(StoreError::InvalidQuantity(req.quantity));
        }
        check_rating(req.rating_100)?;

        let mut state = self.state.write().await;
        let bottle = state
            .bottles
            .iter_mut()
            .find(|b| b.id == id && b.owner_id == owner_id)
            .ok_or_else(|| bottle_not_found(id))?;

        if bottle.quantity < req.quantity {
            return Err(StoreError::InsufficientQuantity {
                id: id.to_string(),
                on_hand: bottle.quantity,
                requested: req.quantity,
            });
        }
        bottle.quantity -= req.quantity;
        bottle.updated_at = req.opened_at;
        let bottle = bottle.clone();

        let mut opened = OpenedRecord::snapshot(&bottle, req.quantity, req.opened_at);
        opened.rating_100 = req.rating_100;
        opened.tasting_notes = req.tasting_notes;
        state.opened.push(opened.clone());

        info!(
            owner_id,
            id,
            opened = req.quantity,
            remaining = bottle.quantity,
            "bottle opened"
        );
        Ok((bottle, opened))
    }

    /// Opened history, most recent first.
    pub async fn list_opened(&self, owner_id: &str) -> Vec<OpenedRecord> {
        let state = self.state.read().await;
        let mut out: Vec<OpenedRecord> = state
            .opened
            .iter()
            .filter(|o| o.owner_id == owner_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
        out
    }

    pub async fn update_opened(
        &self,
        owner_id: &str,
        id: &str,
        update: OpenedUpdate,
    ) -> Result<OpenedRecord, StoreError> {
        check_rating(update.rating_100)?;

        let mut state = self.state.write().await;
        let rec = state
            .opened
            .iter_mut()
            .find(|o| o.id == id && o.owner_id == owner_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "opened record",
                id: id.to_string(),
            })?;
        if let Some(notes) = update.tasting_notes {
            rec.tasting_notes = Some(notes);
        }
        if let Some(r) = update.rating_100 {
            rec.rating_100 = Some(r);
        }
        Ok(rec.clone())
    }

    pub async fn dashboard(&self, owner_id: &str, now_year: i32) -> DashboardStats {
        let state = self.state.read().await;
        tally(
            state.bottles.iter().filter(|b| b.owner_id == owner_id),
            now_year,
        )
    }
}

#[async_trait::async_trait]
impl CellarStore for Cellar {
    async fn find_by_external_key(
        &self,
        external_key: &str,
        owner_id: &str,
    ) -> anyhow::Result<Option<BottleRecord>> {
        Ok(self
            .state
            .read()
            .await
            .bottles
            .iter()
            .find(|b| b.external_key == external_key && b.owner_id == owner_id)
            .cloned())
    }

    async fn insert(&self, record: BottleRecord) -> anyhow::Result<BottleRecord> {
        let mut state = self.state.write().await;
        if state
            .bottles
            .iter()
            .any(|b| b.external_key == record.external_key && b.owner_id == record.owner_id)
        {
            anyhow::bail!(
                "duplicate external_key '{}' for owner {}",
                record.external_key,
                record.owner_id
            );
        }
        state.bottles.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: BottleRecord) -> anyhow::Result<BottleRecord> {
        let mut state = self.state.write().await;
        let slot = state
            .bottles
            .iter_mut()
            .find(|b| b.id == record.id && b.owner_id == record.owner_id)
            .ok_or_else(|| bottle_not_found(&record.id))?;
        *slot = record.clone();
        Ok(record)
    }
}
