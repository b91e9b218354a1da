//! `lofs unlock` – decrypt the bundle and list its notes.

use anyhow::Result;
use lofs_core::config::LofsConfig;
use std::path::Path;

use super::load_catalog;

pub async fn run_unlock(cfg: &LofsConfig, file: Option<&Path>, json: bool) -> Result<()> {
    let catalog = load_catalog(cfg, file).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(catalog.notes())?);
        return Ok(());
    }

    if catalog.is_empty() {
        println!("No notes in bundle.");
        return Ok(());
    }
    println!("{:<12} {:<8} {:<6} {}", "DATE", "ID", "IMAGE", "TEXT");
    for n in catalog.notes() {
        let image = if n.has_image() { "yes" } else { "-" };
        println!("{:<12} {:<8} {:<6} {}", n.date, n.id, image, first_line(&n.text, 60));
    }
    println!(
        "{} note(s), {} with images",
        catalog.len(),
        catalog.image_dates().len()
    );
    Ok(())
}

/// First line of `text`, cut to `max` characters.
pub(crate) fn first_line(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() <= max {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
