// Add command for recording a box file in a catalog

use std::path::PathBuf;

use log::debug;

use crate::boxfile::{self, ChecksumKind};
use crate::manager::BackendManager;
use crate::ui;
use crate::uri;

#[allow(clippy::too_many_arguments)]
pub async fn add(
    catalog: String,
    box_path: PathBuf,
    name: String,
    description: String,
    version: String,
    provider: Option<String>,
    checksum_type: String,
) -> anyhow::Result<()> {
    let checksum_kind: ChecksumKind = checksum_type.parse()?;
    let catalog_uri = uri::coerce_to_uri(&catalog)?;

    // Checksum always comes from the file itself; the provider does too
    // unless the user overrides it.
    let inspection = boxfile::inspect(&box_path, checksum_kind)?;
    let provider = provider.unwrap_or(inspection.provider);
    debug!(
        "inspected '{}': provider '{provider}', {} {}",
        box_path.display(),
        inspection.checksum_type,
        inspection.checksum
    );

    let manager = BackendManager::from_uri(&catalog_uri)?;

    let pb = ui::spinner(&format!("Adding {name} {version} ({provider})..."));
    match manager
        .add_box(
            &box_path,
            &name,
            &description,
            &version,
            &provider,
            &inspection.checksum_type,
            &inspection.checksum,
        )
        .await
    {
        Ok(()) => {
            ui::finish_spinner_success(&pb, &format!("Added {name} {version} ({provider})"));
            Ok(())
        }
        Err(e) => {
            ui::finish_spinner_error(&pb, &format!("Failed to add {name} {version}"));
            Err(e.into())
        }
    }
}
