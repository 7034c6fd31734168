//! Read and edit commands over the local cellar file.

use anyhow::{bail, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use vb_schemas::BottleRecord;
use vb_status::status_of;
use vb_store::{BottleFilter, OpenRequest, OpenedUpdate};

use super::{opt, Ctx};

fn print_line(b: &BottleRecord, now_year: i32) {
    let s = status_of(b, now_year);
    println!(
        "id={} external_key={} quantity={} status={} window={} name={:?}",
        b.id,
        b.external_key,
        b.quantity,
        s.status.as_str(),
        if s.window_label.is_empty() { "-" } else { s.window_label.as_str() },
        b.display_name()
    );
}

/// `--set field=value` pairs as a JSON object. Values stay strings; the
/// import coercion parses numbers and years out of them.
fn fields_from_pairs(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut fields = Map::new();
    for pair in pairs {
        let Some((k, v)) = pair.split_once('=') else {
            bail!("invalid --set '{}'. expected FIELD=VALUE", pair);
        };
        let k = k.trim();
        if k.is_empty() {
            bail!("invalid --set '{}'. field name is empty", pair);
        }
        fields.insert(k.to_string(), Value::String(v.to_string()));
    }
    Ok(fields)
}

pub async fn add(ctx: &Ctx, key: &str, qty: Option<i64>, set: &[String]) -> Result<()> {
    let mut fields = fields_from_pairs(set)?;
    fields.insert("external_key".to_string(), Value::String(key.to_string()));
    if let Some(q) = qty {
        fields.insert("quantity".to_string(), Value::from(q));
    }

    let cellar = ctx.open_cellar()?;
    let b = cellar
        .create(ctx.owner(), &Value::Object(fields), Utc::now())
        .await?;
    ctx.save_cellar(&cellar).await?;
    println!("created=true id={} external_key={} quantity={}", b.id, b.external_key, b.quantity);
    Ok(())
}

pub async fn edit(ctx: &Ctx, id: &str, set: &[String]) -> Result<()> {
    let patch = Value::Object(fields_from_pairs(set)?);
    let cellar = ctx.open_cellar()?;
    let b = cellar.edit(ctx.owner(), id, &patch, Utc::now()).await?;
    ctx.save_cellar(&cellar).await?;
    print_line(&b, ctx.now_year());
    Ok(())
}

pub async fn adjust(ctx: &Ctx, id: &str, delta: i64) -> Result<()> {
    let cellar = ctx.open_cellar()?;
    let b = cellar
        .adjust_quantity(ctx.owner(), id, delta, Utc::now())
        .await?;
    ctx.save_cellar(&cellar).await?;
    println!("adjusted=true id={} delta={} quantity={}", b.id, delta, b.quantity);
    Ok(())
}

pub async fn list(ctx: &Ctx, filter: BottleFilter) -> Result<()> {
    let cellar = ctx.open_cellar()?;
    let now_year = ctx.now_year();
    let rows = cellar.list(ctx.owner(), &filter, now_year).await;
    for b in &rows {
        print_line(b, now_year);
    }
    println!("count={}", rows.len());
    Ok(())
}

pub async fn show(ctx: &Ctx, id: &str) -> Result<()> {
    let cellar = ctx.open_cellar()?;
    let b = cellar.get(ctx.owner(), id).await?;
    let s = status_of(&b, ctx.now_year());

    println!("id={}", b.id);
    println!("external_key={}", b.external_key);
    println!("name={:?}", b.display_name());
    println!("color={}", opt(&b.color));
    println!("type={}", opt(&b.wine_type));
    println!("region={}", opt(&b.region));
    println!("quantity={}", b.quantity);
    println!("location={}", opt(&b.location));
    println!("status={}", s.status.as_str());
    println!("status_group={}", s.status.coarse().as_str());
    println!("reason={:?}", s.reason);
    println!("window={:?}", s.window_label);
    println!("peak={:?}", s.peak_label);
    println!("confidence={}", opt(&b.confidence));
    println!("window_source={}", opt(&b.window_source));
    println!("updated_at_utc={}", b.updated_at.to_rfc3339());
    Ok(())
}

pub async fn dashboard(ctx: &Ctx) -> Result<()> {
    let cellar = ctx.open_cellar()?;
    let d = cellar.dashboard(ctx.owner(), ctx.now_year()).await;
    println!("open_now={}", d.open_now);
    println!("peak={}", d.peak);
    println!("drink_soon={}", d.drink_soon);
    println!("wait={}", d.wait);
    println!("possibly_past={}", d.possibly_past);
    println!("to_verify={}", d.to_verify);
    Ok(())
}

pub async fn open(
    ctx: &Ctx,
    id: &str,
    qty: i64,
    rating: Option<i64>,
    notes: Option<String>,
) -> Result<()> {
    let cellar = ctx.open_cellar()?;
    let req = OpenRequest {
        quantity: qty,
        rating_100: rating,
        tasting_notes: notes,
        opened_at: Utc::now(),
    };
    let (bottle, opened) = cellar.open_bottle(ctx.owner(), id, req).await?;
    ctx.save_cellar(&cellar).await?;

    println!(
        "opened=true opened_id={} bottle_id={} quantity_opened={} remaining={}",
        opened.id, bottle.id, opened.quantity_opened, bottle.quantity
    );
    Ok(())
}

pub async fn history(ctx: &Ctx) -> Result<()> {
    let cellar = ctx.open_cellar()?;
    let rows = cellar.list_opened(ctx.owner()).await;
    for o in &rows {
        println!(
            "id={} opened_at_utc={} external_key={} quantity_opened={} rating={} notes={:?}",
            o.id,
            o.opened_at.to_rfc3339(),
            o.external_key,
            o.quantity_opened,
            opt(&o.rating_100),
            o.tasting_notes.as_deref().unwrap_or("")
        );
    }
    println!("count={}", rows.len());
    Ok(())
}

pub async fn rate(ctx: &Ctx, id: &str, rating: Option<i64>, notes: Option<String>) -> Result<()> {
    let cellar = ctx.open_cellar()?;
    let rec = cellar
        .update_opened(
            ctx.owner(),
            id,
            OpenedUpdate {
                tasting_notes: notes,
                rating_100: rating,
            },
        )
        .await?;
    ctx.save_cellar(&cellar).await?;
    println!("updated=true id={} rating={}", rec.id, opt(&rec.rating_100));
    Ok(())
}

pub async fn delete(ctx: &Ctx, id: &str) -> Result<()> {
    let cellar = ctx.open_cellar()?;
    let deleted = cellar.delete(ctx.owner(), id).await?;
    ctx.save_cellar(&cellar).await?;
    println!(
        "deleted=true id={} external_key={} opened_removed={}",
        deleted.bottle.id, deleted.bottle.external_key, deleted.opened_removed
    );
    Ok(())
}

pub async fn filters(ctx: &Ctx) -> Result<()> {
    let cellar = ctx.open_cellar()?;
    let f = cellar.filter_options(ctx.owner()).await;
    println!("colors={}", f.colors.join(","));
    println!("types={}", f.types.join(","));
    println!("confidences={}", f.confidences.join(","));
    println!("window_sources={}", f.window_sources.join(","));
    println!("sweetnesses={}", f.sweetnesses.join(","));
    println!("locations={}", f.locations.join(","));
    Ok(())
}
