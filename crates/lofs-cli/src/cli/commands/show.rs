//! `lofs show <date>` – print one day's note and the neighboring days.

use anyhow::{anyhow, bail, Result};
use lofs_core::config::LofsConfig;
use lofs_core::normalize::parse_note_date;
use std::path::Path;

use super::load_catalog;

pub async fn run_show(cfg: &LofsConfig, date: &str, file: Option<&Path>) -> Result<()> {
    let day = parse_note_date(date).ok_or_else(|| anyhow!("not a date: {:?}", date))?;
    let catalog = load_catalog(cfg, file).await?;

    let Some(note) = catalog.find_by_date(day) else {
        bail!("no note for {}", day);
    };
    println!("{}  (id {})", note.date, note.id);
    println!();
    println!("{}", note.text);
    if let Some(image) = &note.image {
        println!();
        println!("[image: {}, {} bytes as data URL]", image.mime_type, image.data_url.len());
    }
    if let (Some(prev), Some(next)) = (catalog.previous(day), catalog.next(day)) {
        println!();
        println!("previous: {}   next: {}", prev.date, next.date);
    }
    Ok(())
}
