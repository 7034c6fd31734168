use anyhow::{bail, Result};
use vb_config::ModeSetting;
use vb_import::{import_batch, ImportPayload};

use super::{load_json_file, Ctx};

/// Execute `vb import --file <path> [--mode ..]`.
///
/// Rejected items are listed but do not fail the command; the rest of the
/// batch is saved.
pub async fn run(ctx: &Ctx, file: &str, mode: Option<&str>) -> Result<()> {
    let setting = match mode {
        None => ctx.cfg.default_mode,
        Some(m) => match ModeSetting::parse(m) {
            Some(s) => s,
            None => bail!("invalid --mode '{}'. expected one of: merge | sync | auto", m),
        },
    };

    let doc = load_json_file(file)?;
    let payload = ImportPayload::from_value(doc);
    let mode = setting.resolve(payload.suggested_mode());

    let cellar = ctx.open_cellar()?;
    let report = import_batch(&cellar, payload, ctx.owner(), mode).await;
    ctx.save_cellar(&cellar).await?;

    println!(
        "mode={} created={} updated={} rejected={}",
        report.mode,
        report.created,
        report.updated,
        report.errors.len()
    );
    for e in &report.errors {
        println!("error external_key={} reason={:?}", e.external_key, e.reason);
    }
    Ok(())
}
