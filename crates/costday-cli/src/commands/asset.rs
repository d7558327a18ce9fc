//! Asset command handlers

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use costday_core::{query, today, Asset, AssetStore, ViewOptions};

use crate::output::Output;
use crate::prompt::{confirm, prompt_with_default};

/// Record a new asset
pub fn add(
    store: &mut AssetStore,
    name: String,
    price: String,
    date: Option<String>,
    output: &Output,
) -> Result<()> {
    let name = validate_name(&name)?;
    let price = parse_price(&price)?;
    let purchase_date = match date {
        Some(ref d) => parse_date(d)?,
        None => today(),
    };

    let asset = Asset::new(name, purchase_date, price);
    let id = asset.id;
    store.add(asset);

    output.success(&format!("Asset added: {}", id));
    print_one(store, id, output)
}

/// List assets matching `options`, followed by their totals
pub fn list(store: &AssetStore, options: ViewOptions, output: &Output) -> Result<()> {
    let reference = today();
    let assets = store.view(&options, reference);
    let totals = query::totals(&assets, reference);

    output.print_assets(&query::rows(&assets, reference), &totals);
    Ok(())
}

/// Show a single asset
pub fn show(store: &AssetStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_asset_id(&id, store)?;
    print_one(store, uuid, output)
}

/// Print totals for the assets matching `search`
pub fn totals(store: &AssetStore, search: String, output: &Output) -> Result<()> {
    let reference = today();
    let options = ViewOptions {
        search_text: search,
        ..ViewOptions::default()
    };
    let assets = store.view(&options, reference);

    output.print_totals(&query::totals(&assets, reference), assets.len());
    Ok(())
}

/// Fields supplied on the command line for an edit
#[derive(Debug, Default)]
pub struct EditArgs {
    pub name: Option<String>,
    pub price: Option<String>,
    pub date: Option<String>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.date.is_none()
    }
}

/// Replace an asset's fields
///
/// With no flags in human mode, prompts for each field showing the current
/// value as the default.
pub fn edit(store: &mut AssetStore, id: String, args: EditArgs, output: &Output) -> Result<()> {
    let uuid = parse_asset_id(&id, store)?;

    let current = store
        .get(uuid)
        .cloned()
        .ok_or_else(|| anyhow!("Asset not found: {}", id))?;

    let args = if args.is_empty() && output.should_prompt() {
        println!("Editing asset: {}", current.id);
        println!("Press Enter to keep current value, or type new value.\n");
        EditArgs {
            name: prompt_with_default("Name", &current.name)?,
            price: prompt_with_default("Purchase price", &current.formatted_price())?,
            date: prompt_with_default(
                "Purchase date",
                &current.purchase_date.format("%Y-%m-%d").to_string(),
            )?,
        }
    } else {
        args
    };

    let updated = apply_edit(&current, args)?;
    if updated == current {
        output.message("No changes.");
        return Ok(());
    }

    store.update(updated);

    output.success("Asset updated");
    print_one(store, uuid, output)
}

/// Delete one or more assets
pub fn delete(store: &mut AssetStore, ids: Vec<String>, yes: bool, output: &Output) -> Result<()> {
    let mut targets: Vec<Asset> = Vec::new();
    for id in &ids {
        let uuid = parse_asset_id(id, store)?;
        let asset = store
            .get(uuid)
            .cloned()
            .ok_or_else(|| anyhow!("Asset not found: {}", id))?;
        if !targets.iter().any(|t| t.id == asset.id) {
            targets.push(asset);
        }
    }

    if output.should_prompt() && !yes {
        for asset in &targets {
            println!(
                "Delete asset: {} - {} ({})",
                &asset.id.to_string()[..8],
                asset.name,
                output.money(asset.purchase_price)
            );
        }
        let question = if targets.len() == 1 {
            "Are you sure?".to_string()
        } else {
            format!("Delete these {} assets?", targets.len())
        };
        if !confirm(&question)? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    let uuids: Vec<Uuid> = targets.iter().map(|a| a.id).collect();
    store.delete_many(&uuids);

    if output.is_quiet() {
        return Ok(());
    }
    for uuid in uuids {
        output.success(&format!("Deleted asset: {}", uuid));
    }
    Ok(())
}

fn print_one(store: &AssetStore, id: Uuid, output: &Output) -> Result<()> {
    let asset = store
        .get(id)
        .ok_or_else(|| anyhow!("Asset not found: {}", id))?;
    let row = query::rows(std::slice::from_ref(asset), today())
        .pop()
        .context("Failed to derive asset values")?;

    output.print_asset(&row);
    Ok(())
}

/// Build the full replacement for `current` from the supplied fields
fn apply_edit(current: &Asset, args: EditArgs) -> Result<Asset> {
    let name = match args.name {
        Some(ref n) => validate_name(n)?,
        None => current.name.clone(),
    };
    let price = match args.price {
        Some(ref p) => parse_price(p)?,
        None => current.purchase_price,
    };
    let purchase_date = match args.date {
        Some(ref d) => parse_date(d)?,
        None => current.purchase_date,
    };

    Ok(Asset::with_id(current.id, name, purchase_date, price))
}

/// Reject names that are empty once trimmed
fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Name cannot be empty");
    }
    Ok(name.to_string())
}

/// Parse a purchase price, rejecting non-numbers and negatives
fn parse_price(input: &str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => bail!("Invalid price '{}'. Please enter a valid price.", input),
    }
}

/// Parse a purchase date in `YYYY-MM-DD` form
fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD.", input))
}

/// Parse an asset ID (supports full UUID or prefix)
fn parse_asset_id(id: &str, store: &AssetStore) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let matches = store.find_by_prefix(id);
    match matches.len() {
        0 => bail!("No asset found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple assets match '{}':", id);
            for asset in &matches {
                eprintln!("  {} - {}", asset.id, asset.name);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costday_core::MemoryBlobStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Camera ").unwrap(), "Camera");
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("19.90").unwrap(), 19.9);
        assert_eq!(parse_price(" 250 ").unwrap(), 250.0);
        assert_eq!(parse_price("0").unwrap(), 0.0);
        assert!(parse_price("abc").is_err());
        assert!(parse_price("").is_err());
        assert!(parse_price("-5").is_err());
        assert!(parse_price("inf").is_err());
        assert!(parse_price("NaN").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-04-01").unwrap(), date(2025, 4, 1));
        assert!(parse_date("04/01/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn test_apply_edit_keeps_unspecified_fields() {
        let current = Asset::new("Camera", date(2025, 4, 1), 19.9);

        let updated = apply_edit(
            &current,
            EditArgs {
                price: Some("17.50".to_string()),
                ..EditArgs::default()
            },
        )
        .unwrap();

        assert_eq!(updated.id, current.id);
        assert_eq!(updated.name, "Camera");
        assert_eq!(updated.purchase_date, current.purchase_date);
        assert_eq!(updated.purchase_price, 17.5);
    }

    #[test]
    fn test_apply_edit_rejects_invalid_fields() {
        let current = Asset::new("Camera", date(2025, 4, 1), 19.9);

        let result = apply_edit(
            &current,
            EditArgs {
                name: Some(" ".to_string()),
                ..EditArgs::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_asset_id() {
        let mut store = AssetStore::with_blob_store(MemoryBlobStore::new());
        let asset = Asset::new("Lamp", date(2025, 1, 1), 40.0);
        store.add(asset.clone());

        let full = asset.id.to_string();
        assert_eq!(parse_asset_id(&full, &store).unwrap(), asset.id);
        assert_eq!(parse_asset_id(&full[..6], &store).unwrap(), asset.id);
        assert!(parse_asset_id("zzzz", &store).is_err());
    }
}
