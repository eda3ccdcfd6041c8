// Show command for printing a whole catalog

use crate::manager::BackendManager;
use crate::ui;
use crate::uri;

pub async fn show(catalog: String) -> anyhow::Result<()> {
    let catalog_uri = uri::coerce_to_uri(&catalog)?;
    let manager = BackendManager::from_uri(&catalog_uri)?;

    let result = manager.get_catalog().await?;
    ui::plain(result.to_string().trim_end());
    Ok(())
}
