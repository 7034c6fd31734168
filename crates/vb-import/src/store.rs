use anyhow::Result;
use vb_schemas::BottleRecord;

/// Storage boundary used by the reconciler.
///
/// Implementations must scope every lookup by owner. Errors are opaque to
/// the import pipeline; they are reported per item and never abort a batch.
#[async_trait::async_trait]
pub trait CellarStore: Send + Sync {
    /// The single line for `(external_key, owner_id)`, if any.
    async fn find_by_external_key(
        &self,
        external_key: &str,
        owner_id: &str,
    ) -> Result<Option<BottleRecord>>;

    /// Persist a new line and return it as stored.
    async fn insert(&self, record: BottleRecord) -> Result<BottleRecord>;

    /// Replace an existing line (matched by `id`) and return it as stored.
    async fn update(&self, record: BottleRecord) -> Result<BottleRecord>;
}
