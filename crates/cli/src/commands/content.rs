//! Content commands.
//!
//! # Usage
//!
//! ```bash
//! # Print all content, or one section
//! stagefront content show
//! stagefront content show events
//!
//! # Partial update (editors only)
//! stagefront content edit about --json '{"bio": ["First paragraph."]}'
//!
//! # Replace the merch catalog
//! stagefront content edit merch --json '[{"id": "m1", ...}]'
//!
//! # Back to the built-in defaults
//! stagefront content reset
//!
//! # Push everything to the store
//! stagefront seed
//! ```

use stagefront_core::SectionName;
use stagefront_core::content::SectionPatch;
use stagefront_site::services::SyncStatus;
use stagefront_site::state::AppState;

use super::{CommandError, print_json};

/// Print one section, or the whole site, as JSON.
///
/// # Errors
///
/// Returns an error if the content cannot be encoded.
pub fn show(state: &AppState, section: Option<SectionName>) -> Result<(), CommandError> {
    let value = match section {
        Some(name) => state.content().section(name).to_json()?,
        None => serde_json::to_value(state.content().content())?,
    };
    print_json(&value)
}

/// Apply a JSON patch to a section and print the result.
///
/// The local copy changes even when the store write fails; the failure is
/// logged and reported as the section's sync status.
///
/// # Errors
///
/// Returns an error if the patch is malformed or no editor is signed in.
pub async fn edit(state: &AppState, section: SectionName, json: &str) -> Result<(), CommandError> {
    let data: serde_json::Value = serde_json::from_str(json)?;
    let patch = SectionPatch::from_json(section, data)?;

    let updated = state.edit_section(patch).await?;
    print_json(&updated.to_json()?)?;
    sync_banner(section, state.content().sync_status(section));
    Ok(())
}

#[allow(clippy::print_stdout)]
fn sync_banner(section: SectionName, status: Option<SyncStatus>) {
    match status {
        Some(SyncStatus::Synced) => println!("Saved {section} to the content store"),
        Some(SyncStatus::Failed) => {
            println!("Saved {section} locally; the content store update failed");
        }
        Some(SyncStatus::Pending) | None => println!("Saved {section} locally"),
    }
}

/// Restore defaults and forget the local fallback snapshot.
pub fn reset(state: &AppState) {
    state.content().reset();
    tracing::info!("Content reset to defaults");
}

/// Seed the store with every section's current content.
///
/// # Errors
///
/// Returns an error if no editor is signed in or a section fails to upload.
#[allow(clippy::print_stdout)]
pub async fn seed(state: &AppState) -> Result<(), CommandError> {
    let report = state.seed().await?;
    for section in &report.sections {
        println!("seeded {section}");
    }
    println!("Content store seeded ({} sections)", report.sections.len());
    Ok(())
}
