//! Reports, templates, dashboards, cross-sheet references and cell history.

use core_models::{
    CellHistory, CrossSheetReference, IndexResultResponse, Report, ResultResponse, Sight, Template,
};
use tracing::instrument;

use crate::client::{into_result, require_id, require_text, Query, SmartsheetClient};
use crate::error::Result;
use crate::types::CellInclusion;

impl SmartsheetClient {
    #[instrument(skip_all)]
    pub async fn list_reports(&self, auth: Option<&str>) -> Result<Vec<Report>> {
        let page: IndexResultResponse<Report> = self.get("reports", auth).await?;
        Ok(page.data)
    }

    /// User-created templates.
    #[instrument(skip_all)]
    pub async fn list_templates(&self, auth: Option<&str>) -> Result<Vec<Template>> {
        let page: IndexResultResponse<Template> = self.get("templates", auth).await?;
        Ok(page.data)
    }

    /// Dashboards.
    #[instrument(skip_all)]
    pub async fn list_sights(&self, auth: Option<&str>) -> Result<Vec<Sight>> {
        let page: IndexResultResponse<Sight> = self.get("sights", auth).await?;
        Ok(page.data)
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn list_cross_sheet_references(
        &self,
        sheet_id: i64,
        auth: Option<&str>,
    ) -> Result<Vec<CrossSheetReference>> {
        require_id("sheet id", sheet_id)?;

        let page: IndexResultResponse<CrossSheetReference> = self
            .get(&format!("sheets/{}/crosssheetreferences", sheet_id), auth)
            .await?;
        Ok(page.data)
    }

    /// Define a named range in `reference.source_sheet_id` that formulas in
    /// `sheet_id` can use.
    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn create_cross_sheet_reference(
        &self,
        sheet_id: i64,
        reference: &CrossSheetReference,
        auth: Option<&str>,
    ) -> Result<CrossSheetReference> {
        require_id("sheet id", sheet_id)?;
        require_text("Reference name", reference.name.as_deref().unwrap_or_default())?;
        require_id("source sheet id", reference.source_sheet_id.unwrap_or_default())?;

        let response: ResultResponse<CrossSheetReference> = self
            .post(
                &format!("sheets/{}/crosssheetreferences", sheet_id),
                reference,
                auth,
            )
            .await?;
        into_result(response, "create_cross_sheet_reference")
    }

    /// Every past value of one cell, newest first.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, row_id = %row_id, column_id = %column_id))]
    pub async fn cell_history(
        &self,
        sheet_id: i64,
        row_id: i64,
        column_id: i64,
        includes: &[CellInclusion],
        auth: Option<&str>,
    ) -> Result<Vec<CellHistory>> {
        require_id("sheet id", sheet_id)?;
        require_id("row id", row_id)?;
        require_id("column id", column_id)?;

        let path = Query::new()
            .list("include", includes.iter().map(CellInclusion::as_str))
            .finish(format!(
                "sheets/{}/rows/{}/columns/{}/history",
                sheet_id, row_id, column_id
            ));

        let page: IndexResultResponse<CellHistory> = self.get(&path, auth).await?;
        Ok(page.data)
    }
}
