//! Handler functions for font CLI commands.
//!
//! These work directly on the SillyTavern tree, so they are usable
//! without a running panel.

use crate::cli::FontsAction;
use fontpanel_core::{ConfigProvider, FontEntry, FontStore, Result};
use std::collections::HashSet;

/// Dispatch a fonts subcommand.
pub async fn handle_fonts_command<C: ConfigProvider>(config: &C, action: FontsAction) -> Result<()> {
    let store = FontStore::from_config(config)?;
    match action {
        FontsAction::List => handle_list(&store).await,
        FontsAction::Remove { family, file } => handle_remove(&store, &family, &file).await,
    }
}

/// Print registered fonts, then any font files nothing registers.
pub async fn handle_list(store: &FontStore) -> Result<()> {
    let fonts = store.list().await?;
    let files = store.files().await?;
    let on_disk: HashSet<&str> = files.iter().map(|f| f.name.as_str()).collect();

    println!("Stylesheet: {}", store.css_path().display());
    if fonts.is_empty() {
        println!("No fonts registered.");
    } else {
        println!("Registered fonts:");
        for FontEntry {
            font_family,
            file_name,
        } in &fonts
        {
            let status = if on_disk.contains(file_name.as_str()) {
                "ok"
            } else {
                "missing file"
            };
            println!("  {font_family:<24} {file_name:<32} {status}");
        }
    }

    let registered: HashSet<&str> = fonts.iter().map(|f| f.file_name.as_str()).collect();
    let orphans: Vec<_> = files
        .iter()
        .filter(|f| !registered.contains(f.name.as_str()))
        .collect();
    if !orphans.is_empty() {
        println!("Unregistered files in {}:", store.font_dir().display());
        for file in orphans {
            println!("  {:<32} {} bytes", file.name, file.size);
        }
    }
    Ok(())
}

/// Remove a font rule and its file.
pub async fn handle_remove(store: &FontStore, family: &str, file: &str) -> Result<()> {
    let report = store.delete(family, file).await?;
    println!(
        "Removed {} rule(s) for '{family}'; file {}",
        report.rules_removed,
        if report.file_removed {
            "deleted"
        } else {
            "was not present"
        }
    );
    Ok(())
}
