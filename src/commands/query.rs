// Query command for listing catalog entries that match a filter

use crate::manager::BackendManager;
use crate::query::CatalogQueryParams;
use crate::ui;
use crate::uri;

pub async fn query(catalog: String, version: String, provider: String) -> anyhow::Result<()> {
    let catalog_uri = uri::coerce_to_uri(&catalog)?;
    let manager = BackendManager::from_uri(&catalog_uri)?;

    let params = CatalogQueryParams { version, provider };
    let result = manager.query(&params).await?;

    if result.is_empty() {
        ui::dim("No boxes match the query");
    } else {
        ui::plain(result.to_string().trim_end());
    }
    Ok(())
}
