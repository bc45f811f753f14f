//! Column definitions.

use core_models::{Column, ResultResponse};
use tracing::instrument;

use crate::client::{into_result, require_id, require_text, SmartsheetClient};
use crate::error::Result;
use crate::types::Acknowledgement;

impl SmartsheetClient {
    /// Insert a column. `column.index` decides its position.
    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn create_column(
        &self,
        sheet_id: i64,
        column: &Column,
        auth: Option<&str>,
    ) -> Result<Column> {
        require_id("sheet id", sheet_id)?;
        require_text("Column title", column.title.as_deref().unwrap_or_default())?;

        let response: ResultResponse<Column> = self
            .post(&format!("sheets/{}/columns", sheet_id), column, auth)
            .await?;
        into_result(response, "create_column")
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, column_id = %column_id))]
    pub async fn edit_column(
        &self,
        sheet_id: i64,
        column_id: i64,
        column: &Column,
        auth: Option<&str>,
    ) -> Result<Column> {
        require_id("sheet id", sheet_id)?;
        require_id("column id", column_id)?;

        // The id travels in the path; the body must not repeat it.
        let body = Column {
            id: None,
            ..column.clone()
        };

        let response: ResultResponse<Column> = self
            .put(&format!("sheets/{}/columns/{}", sheet_id, column_id), &body, auth)
            .await?;
        into_result(response, "edit_column")
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, column_id = %column_id))]
    pub async fn delete_column(
        &self,
        sheet_id: i64,
        column_id: i64,
        auth: Option<&str>,
    ) -> Result<Acknowledgement> {
        require_id("sheet id", sheet_id)?;
        require_id("column id", column_id)?;

        self.delete(&format!("sheets/{}/columns/{}", sheet_id, column_id), auth)
            .await
    }
}
