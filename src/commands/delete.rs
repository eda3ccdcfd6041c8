// Delete command for removing matched boxes from a catalog and its storage

use crate::manager::BackendManager;
use crate::query::CatalogQueryParams;
use crate::ui;
use crate::uri;

pub async fn delete(catalog: String, version: String, provider: String) -> anyhow::Result<()> {
    let catalog_uri = uri::coerce_to_uri(&catalog)?;
    let manager = BackendManager::from_uri(&catalog_uri)?;

    let params = CatalogQueryParams { version, provider };

    let pb = ui::spinner("Deleting matched boxes...");
    match manager.delete_box(&params).await {
        Ok(refs) if refs.is_empty() => {
            ui::finish_spinner_success(&pb, "No boxes matched; catalog unchanged");
            Ok(())
        }
        Ok(refs) => {
            ui::finish_spinner_success(&pb, &format!("Deleted {} box(es)", refs.len()));
            for reference in &refs {
                ui::action(&format!(
                    "removed {} ({}) {}",
                    reference.version, reference.provider, reference.uri
                ));
            }
            Ok(())
        }
        Err(e) => {
            ui::finish_spinner_error(&pb, "Delete failed");
            Err(e.into())
        }
    }
}
