use crate::models::{DataPoint, Favorite};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Prefix cells that spreadsheet apps would evaluate as formulas.
fn safe_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{}", s),
        _ => s.to_string(),
    }
}

/// Save observations as CSV with header.
pub fn save_series_csv<P: AsRef<Path>>(points: &[DataPoint], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "indicator_id",
        "indicator_name",
        "country_id",
        "country_name",
        "country_iso3",
        "year",
        "value",
        "unit",
        "obs_status",
        "decimal",
    ))?;
    for p in points {
        wtr.serialize((
            safe_cell(&p.indicator.id),
            safe_cell(&p.indicator.value),
            safe_cell(&p.country.id),
            safe_cell(&p.country.value),
            safe_cell(&p.country_iso3),
            &p.date,
            p.value,
            p.unit.as_deref().map(safe_cell),
            p.obs_status.as_deref().map(safe_cell),
            p.decimal,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save observations as pretty JSON array.
pub fn save_series_json<P: AsRef<Path>>(points: &[DataPoint], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(points)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save favorites as a pretty JSON array of `{id, name, notes, addedAt}` records.
pub fn save_favorites<P: AsRef<Path>>(favorites: &[Favorite], path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = serde_json::to_string_pretty(favorites)?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Load favorites saved by [`save_favorites`]; a missing file yields an empty list.
pub fn load_favorites<P: AsRef<Path>>(path: P) -> Result<Vec<Favorite>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&s).with_context(|| format!("parse favorites {}", path.display()))
}

/// Save favorites as CSV (id, name, notes, added_at).
pub fn save_favorites_csv<P: AsRef<Path>>(favorites: &[Favorite], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("id", "name", "notes", "added_at"))?;
    for f in favorites {
        wtr.serialize((
            safe_cell(&f.id),
            safe_cell(&f.name),
            safe_cell(&f.notes),
            f.added_at.to_rfc3339(),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}
