use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use vb_schemas::{BottleRecord, ImportMode};

use crate::item::{external_key_of, UNKNOWN_KEY};
use crate::reconcile::{decide, Decision};
use crate::{CellarStore, ImportError, ImportItem, ImportPayload};

/// One rejected item, as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    pub external_key: String,
    pub reason: String,
}

/// Result of reconciling one raw item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Created(BottleRecord),
    Updated(BottleRecord),
    Rejected(ImportFailure),
}

impl ItemOutcome {
    pub fn action(&self) -> &'static str {
        match self {
            ItemOutcome::Created(_) => "created",
            ItemOutcome::Updated(_) => "updated",
            ItemOutcome::Rejected(_) => "rejected",
        }
    }

    pub fn record(&self) -> Option<&BottleRecord> {
        match self {
            ItemOutcome::Created(r) | ItemOutcome::Updated(r) => Some(r),
            ItemOutcome::Rejected(_) => None,
        }
    }
}

/// Batch summary. `errors` preserves input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub mode: ImportMode,
    pub created: u64,
    pub updated: u64,
    pub errors: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn new(mode: ImportMode) -> Self {
        Self {
            mode,
            created: 0,
            updated: 0,
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Created(_) => self.created += 1,
            ItemOutcome::Updated(_) => self.updated += 1,
            ItemOutcome::Rejected(f) => self.errors.push(f.clone()),
        }
    }

    pub fn total(&self) -> u64 {
        self.created + self.updated + self.errors.len() as u64
    }
}

fn store_err(e: anyhow::Error) -> ImportError {
    ImportError::Store(format!("{e:#}"))
}

async fn try_reconcile<S: CellarStore + ?Sized>(
    store: &S,
    raw: &Value,
    owner_id: &str,
    mode: ImportMode,
) -> Result<ItemOutcome, ImportError> {
    let item = ImportItem::from_raw(raw)?;
    let existing = store
        .find_by_external_key(&item.external_key, owner_id)
        .await
        .map_err(store_err)?;

    let decision = decide(&item, existing.as_ref(), owner_id, mode, Utc::now());
    debug!(
        external_key = %item.external_key,
        owner_id,
        mode = %mode,
        update = matches!(decision, Decision::Update(_)),
        quantity = decision.record().quantity,
        "import decision"
    );

    match decision {
        Decision::Create(rec) => Ok(ItemOutcome::Created(
            store.insert(rec).await.map_err(store_err)?,
        )),
        Decision::Update(rec) => Ok(ItemOutcome::Updated(
            store.update(rec).await.map_err(store_err)?,
        )),
    }
}

/// Validate, canonicalize and persist one raw item. Never fails: every
/// problem comes back as [`ItemOutcome::Rejected`].
pub async fn reconcile_item<S: CellarStore + ?Sized>(
    store: &S,
    raw: &Value,
    owner_id: &str,
    mode: ImportMode,
) -> ItemOutcome {
    match try_reconcile(store, raw, owner_id, mode).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let external_key = external_key_of(raw).unwrap_or_else(|| UNKNOWN_KEY.to_string());
            warn!(external_key = %external_key, reason = %e, "import item rejected");
            ItemOutcome::Rejected(ImportFailure {
                external_key,
                reason: e.to_string(),
            })
        }
    }
}

/// Reconcile every item of `payload` in order. A rejected item does not
/// roll back or stop the others.
pub async fn import_batch<S: CellarStore + ?Sized>(
    store: &S,
    payload: ImportPayload,
    owner_id: &str,
    mode: ImportMode,
) -> ImportReport {
    let mut report = ImportReport::new(mode);
    for raw in payload.into_items() {
        let outcome = reconcile_item(store, &raw, owner_id, mode).await;
        report.record(&outcome);
    }
    info!(
        owner_id,
        mode = %mode,
        created = report.created,
        updated = report.updated,
        rejected = report.errors.len(),
        "import batch done"
    );
    report
}
