//! Sheets: create, copy, load, refresh, export.

use bytes::Bytes;
use core_models::{
    Column, ContainerDestination, IndexResultResponse, PaperSize, ResultResponse, Sheet,
    SheetCopyInclusion,
};
use tracing::{debug, instrument};

use crate::client::{into_result, require_id, require_sheet_id, require_text, Query, SmartsheetClient};
use crate::error::Result;
use crate::types::{Acknowledgement, SheetContainer, SheetQuery};

pub const EXCEL_MIME: &str = "application/vnd.ms-excel";
pub const PDF_MIME: &str = "application/pdf";
pub const CSV_MIME: &str = "text/csv";

impl SmartsheetClient {
    /// Create a sheet with the given columns.
    ///
    /// At most one column may be primary; this is checked before anything
    /// is sent.
    #[instrument(skip_all, fields(container = ?container, columns = columns.len()))]
    pub async fn create_sheet(
        &self,
        name: &str,
        columns: Vec<Column>,
        container: SheetContainer,
        auth: Option<&str>,
    ) -> Result<Sheet> {
        let name = require_text("Sheet name", name)?;
        let path = container_path(container, "sheets")?;
        let sheet = Sheet::new(name, columns)?;

        let response: ResultResponse<Sheet> = self.post(&path, &sheet, auth).await?;
        let mut created = into_result(response, "create_sheet")?;
        created.reconcile();
        Ok(created)
    }

    /// Create a sheet from a template, data included.
    #[instrument(skip_all, fields(template_id = %template_id, container = ?container))]
    pub async fn create_sheet_from_template(
        &self,
        name: &str,
        template_id: i64,
        container: SheetContainer,
        auth: Option<&str>,
    ) -> Result<Sheet> {
        let name = require_text("Sheet name", name)?;
        require_id("template id", template_id)?;

        let path = match container {
            SheetContainer::Folder(_) => Query::new()
                .param("include", "data")
                .finish(container_path(container, "sheets")?),
            _ => container_path(container, "sheets")?,
        };
        let sheet = Sheet {
            name: Some(name.to_string()),
            from_id: Some(template_id),
            ..Default::default()
        };

        let response: ResultResponse<Sheet> = self.post(&path, &sheet, auth).await?;
        let mut created = into_result(response, "create_sheet_from_template")?;
        created.reconcile();
        Ok(created)
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, destination = ?destination.destination_type))]
    pub async fn copy_sheet(
        &self,
        sheet_id: i64,
        destination: &ContainerDestination,
        includes: &[SheetCopyInclusion],
        auth: Option<&str>,
    ) -> Result<Sheet> {
        require_id("sheet id", sheet_id)?;
        require_text("New sheet name", destination.new_name.as_deref().unwrap_or_default())?;
        if let Some(destination_id) = destination.destination_id {
            require_id("destination id", destination_id)?;
        }

        let path = Query::new()
            .list("include", includes.iter().map(SheetCopyInclusion::as_str))
            .finish(format!("sheets/{}/copy", sheet_id));

        let response: ResultResponse<Sheet> = self.post(&path, destination, auth).await?;
        into_result(response, "copy_sheet")
    }

    /// Load a sheet and pair every row's cells with the columns.
    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn get_sheet(
        &self,
        sheet_id: i64,
        query: &SheetQuery,
        auth: Option<&str>,
    ) -> Result<Sheet> {
        require_id("sheet id", sheet_id)?;

        let path = Query::new()
            .list("include", query.include.iter().map(|i| i.as_str()))
            .list("exclude", query.exclude.iter().map(|e| e.as_str()))
            .list("columnIds", &query.column_ids)
            .list("rowIds", &query.row_ids)
            .param_opt("pageSize", query.page_size)
            .param_opt("page", query.page)
            .finish(format!("sheets/{}", sheet_id));

        let mut sheet: Sheet = self.get(&path, auth).await?;
        sheet.reconcile();

        debug!(
            columns = sheet.columns.len(),
            rows = sheet.rows.len(),
            "Sheet loaded"
        );
        Ok(sheet)
    }

    /// Replace a sheet's columns and rows with the server's current copy.
    #[instrument(skip_all, fields(sheet_id = ?sheet.id))]
    pub async fn refresh_sheet(&self, sheet: &mut Sheet, auth: Option<&str>) -> Result<()> {
        let sheet_id = require_sheet_id(sheet)?;
        let fresh = self.get_sheet(sheet_id, &SheetQuery::default(), auth).await?;
        sheet.replace_from(fresh);
        Ok(())
    }

    /// Rename a sheet or change its settings.
    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn update_sheet(
        &self,
        sheet_id: i64,
        sheet: &Sheet,
        auth: Option<&str>,
    ) -> Result<Sheet> {
        require_id("sheet id", sheet_id)?;

        let response: ResultResponse<Sheet> =
            self.put(&format!("sheets/{}", sheet_id), sheet, auth).await?;
        let mut updated = into_result(response, "update_sheet")?;
        updated.reconcile();
        Ok(updated)
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn delete_sheet(&self, sheet_id: i64, auth: Option<&str>) -> Result<Acknowledgement> {
        require_id("sheet id", sheet_id)?;
        self.delete(&format!("sheets/{}", sheet_id), auth).await
    }

    #[instrument(skip_all)]
    pub async fn list_sheets(&self, auth: Option<&str>) -> Result<Vec<Sheet>> {
        let page: IndexResultResponse<Sheet> = self.get("sheets", auth).await?;
        Ok(page.data)
    }

    /// Every sheet, unpaged, with its version number.
    #[instrument(skip_all)]
    pub async fn list_all_sheets_and_versions(&self, auth: Option<&str>) -> Result<Vec<Sheet>> {
        let path = Query::new()
            .param("include", "sheetVersion")
            .param("includeAll", true)
            .finish("sheets");
        let page: IndexResultResponse<Sheet> = self.get(&path, auth).await?;
        Ok(page.data)
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn export_sheet_as_excel(&self, sheet_id: i64, auth: Option<&str>) -> Result<Bytes> {
        self.export_sheet(sheet_id, None, EXCEL_MIME, auth).await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, paper_size = ?paper_size))]
    pub async fn export_sheet_as_pdf(
        &self,
        sheet_id: i64,
        paper_size: Option<PaperSize>,
        auth: Option<&str>,
    ) -> Result<Bytes> {
        self.export_sheet(sheet_id, paper_size, PDF_MIME, auth).await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn export_sheet_as_csv(&self, sheet_id: i64, auth: Option<&str>) -> Result<Bytes> {
        self.export_sheet(sheet_id, None, CSV_MIME, auth).await
    }

    async fn export_sheet(
        &self,
        sheet_id: i64,
        paper_size: Option<PaperSize>,
        accept: &str,
        auth: Option<&str>,
    ) -> Result<Bytes> {
        require_id("sheet id", sheet_id)?;

        let path = Query::new()
            .param_opt("paperSize", paper_size.map(|p| p.as_str()))
            .finish(format!("sheets/{}", sheet_id));

        let bytes = self
            .executor()
            .download(&path, accept, auth, self.call_options())
            .await?;
        Ok(bytes)
    }
}

fn container_path(container: SheetContainer, leaf: &str) -> Result<String> {
    Ok(match container {
        SheetContainer::Home => leaf.to_string(),
        SheetContainer::Folder(id) => format!("folders/{}/{}", require_id("folder id", id)?, leaf),
        SheetContainer::Workspace(id) => {
            format!("workspaces/{}/{}", require_id("workspace id", id)?, leaf)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_paths() {
        assert_eq!(container_path(SheetContainer::Home, "sheets").unwrap(), "sheets");
        assert_eq!(
            container_path(SheetContainer::Folder(12), "sheets").unwrap(),
            "folders/12/sheets"
        );
        assert_eq!(
            container_path(SheetContainer::Workspace(34), "sheets").unwrap(),
            "workspaces/34/sheets"
        );
        assert!(container_path(SheetContainer::Folder(0), "sheets").is_err());
    }
}
