//! Rows: bulk create/update, chunked delete, move/copy, lock, email.
//!
//! The `*_sheet` variants work against a loaded [`Sheet`]: outgoing rows are
//! normalized with [`Sheet::prepare_rows`] (system-column cells dropped) and
//! the server's rows are folded back in and reconciled.

use std::collections::HashSet;

use core_models::{
    CopyOrMoveRowDirective, CopyOrMoveRowResult, MultiRowEmail, Placement, ResultResponse, Row,
    RowBuild, Sheet, UpdateRequest, SUCCESS_MESSAGE,
};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::client::{into_result, require_any, require_id, require_sheet_id, Query, SmartsheetClient};
use crate::error::{Result, SmartsheetError};
use crate::types::RemovedRows;

/// Most row ids one delete request may carry.
pub const DELETE_CHUNK_SIZE: usize = 300;

#[derive(Serialize)]
struct RowLock {
    id: i64,
    locked: bool,
}

impl SmartsheetClient {
    /// Add rows to a sheet.
    ///
    /// Rows are normalized for creation: ids and server fields are dropped,
    /// empty cells removed and `placement` (if any) applied to every row.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, rows = rows.len()))]
    pub async fn create_rows(
        &self,
        sheet_id: i64,
        rows: Vec<Row>,
        placement: Option<Placement>,
        auth: Option<&str>,
    ) -> Result<Vec<Row>> {
        require_id("sheet id", sheet_id)?;

        let build = create_build(placement);
        let rows: Vec<Row> = rows.into_iter().map(|row| row.build(&build)).collect();
        self.post_rows(sheet_id, &rows, auth).await
    }

    /// Update existing rows, matched by id.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, rows = rows.len()))]
    pub async fn update_rows(
        &self,
        sheet_id: i64,
        rows: Vec<Row>,
        auth: Option<&str>,
    ) -> Result<Vec<Row>> {
        require_id("sheet id", sheet_id)?;

        let build = RowBuild::update();
        let rows: Vec<Row> = rows.into_iter().map(|row| row.build(&build)).collect();
        require_row_ids(&rows)?;
        self.put_rows(sheet_id, &rows, auth).await
    }

    /// Create rows in a loaded sheet and append the created rows to it.
    #[instrument(skip_all, fields(sheet_id = ?sheet.id, rows = rows.len()))]
    pub async fn add_rows_to_sheet(
        &self,
        sheet: &mut Sheet,
        rows: Vec<Row>,
        placement: Option<Placement>,
        auth: Option<&str>,
    ) -> Result<Vec<Row>> {
        let sheet_id = require_sheet_id(sheet)?;

        let rows = sheet.prepare_rows(rows, &create_build(placement));
        let created = self.post_rows(sheet_id, &rows, auth).await?;

        sheet.append_rows(created.clone());
        Ok(created)
    }

    /// Update rows of a loaded sheet and replace them with the server's copy.
    #[instrument(skip_all, fields(sheet_id = ?sheet.id, rows = rows.len()))]
    pub async fn update_rows_in_sheet(
        &self,
        sheet: &mut Sheet,
        rows: Vec<Row>,
        auth: Option<&str>,
    ) -> Result<Vec<Row>> {
        let sheet_id = require_sheet_id(sheet)?;

        let rows = sheet.prepare_rows(rows, &RowBuild::update());
        require_row_ids(&rows)?;
        let updated = self.put_rows(sheet_id, &rows, auth).await?;

        sheet.merge_rows(updated.clone());
        Ok(updated)
    }

    /// Delete rows by id, [`DELETE_CHUNK_SIZE`] per request.
    ///
    /// Chunks are sent one after another. A chunk whose response is not
    /// `SUCCESS` stops the run; its ids and everything after it are left in
    /// [`RemovedRows::pending`]. Rows that no longer exist do not fail a
    /// chunk and end up in [`RemovedRows::not_found`].
    #[instrument(skip_all, fields(sheet_id = %sheet_id, rows = row_ids.len()))]
    pub async fn remove_rows(
        &self,
        sheet_id: i64,
        row_ids: &[i64],
        auth: Option<&str>,
    ) -> Result<RemovedRows> {
        require_id("sheet id", sheet_id)?;

        let mut outcome = RemovedRows::default();
        let mut remaining: &[i64] = row_ids;

        while !remaining.is_empty() {
            let take = remaining.len().min(DELETE_CHUNK_SIZE);
            let (chunk, rest) = remaining.split_at(take);

            let path = Query::new()
                .list("ids", chunk)
                .param("ignoreRowsNotFound", true)
                .finish(format!("sheets/{}/rows", sheet_id));

            let response: ResultResponse<Vec<i64>> = self.delete(&path, auth).await?;
            outcome.requests += 1;

            if response.message.as_deref() != Some(SUCCESS_MESSAGE) {
                warn!(
                    chunk = outcome.requests,
                    message = ?response.message,
                    result_code = ?response.result_code,
                    "Row delete chunk did not succeed, stopping"
                );
                break;
            }

            let deleted: HashSet<i64> = response.result.unwrap_or_default().into_iter().collect();
            for id in chunk {
                if deleted.contains(id) {
                    outcome.removed.push(*id);
                } else {
                    outcome.not_found.push(*id);
                }
            }

            debug!(
                chunk = outcome.requests,
                sent = chunk.len(),
                deleted = deleted.len(),
                "Row delete chunk done"
            );
            remaining = rest;
        }

        outcome.pending = remaining.to_vec();
        Ok(outcome)
    }

    /// Delete rows from a loaded sheet and drop them locally.
    ///
    /// Rows the server confirmed or could not find are removed from `sheet`.
    #[instrument(skip_all, fields(sheet_id = ?sheet.id, rows = row_ids.len()))]
    pub async fn remove_rows_from_sheet(
        &self,
        sheet: &mut Sheet,
        row_ids: &[i64],
        auth: Option<&str>,
    ) -> Result<RemovedRows> {
        let sheet_id = require_sheet_id(sheet)?;
        let outcome = self.remove_rows(sheet_id, row_ids, auth).await?;

        sheet.remove_rows_by_id(&outcome.removed);
        sheet.remove_rows_by_id(&outcome.not_found);
        Ok(outcome)
    }

    /// Move rows, with attachments and discussions, to another sheet.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, destination_sheet_id = %destination_sheet_id))]
    pub async fn move_rows(
        &self,
        sheet_id: i64,
        destination_sheet_id: i64,
        row_ids: Vec<i64>,
        auth: Option<&str>,
    ) -> Result<CopyOrMoveRowResult> {
        self.copy_or_move_rows("move", sheet_id, destination_sheet_id, row_ids, auth)
            .await
    }

    /// Copy rows, with attachments and discussions, to another sheet.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, destination_sheet_id = %destination_sheet_id))]
    pub async fn copy_rows(
        &self,
        sheet_id: i64,
        destination_sheet_id: i64,
        row_ids: Vec<i64>,
        auth: Option<&str>,
    ) -> Result<CopyOrMoveRowResult> {
        self.copy_or_move_rows("copy", sheet_id, destination_sheet_id, row_ids, auth)
            .await
    }

    async fn copy_or_move_rows(
        &self,
        action: &str,
        sheet_id: i64,
        destination_sheet_id: i64,
        row_ids: Vec<i64>,
        auth: Option<&str>,
    ) -> Result<CopyOrMoveRowResult> {
        require_id("source sheet id", sheet_id)?;
        require_id("destination sheet id", destination_sheet_id)?;
        require_any("row id", &row_ids)?;

        let path = Query::new()
            .list("include", ["attachments", "discussions"])
            .finish(format!("sheets/{}/rows/{}", sheet_id, action));
        let directive = CopyOrMoveRowDirective::new(row_ids, destination_sheet_id);

        self.post(&path, &directive, auth).await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, locked = %locked, rows = row_ids.len()))]
    pub async fn lock_rows(
        &self,
        sheet_id: i64,
        locked: bool,
        row_ids: &[i64],
        auth: Option<&str>,
    ) -> Result<Vec<Row>> {
        require_id("sheet id", sheet_id)?;
        require_any("row id", row_ids)?;

        let body: Vec<RowLock> = row_ids.iter().map(|&id| RowLock { id, locked }).collect();
        let response: ResultResponse<Vec<Row>> =
            self.put(&format!("sheets/{}/rows", sheet_id), &body, auth).await?;
        Ok(response.into_result().unwrap_or_default())
    }

    /// Email rows to users or groups.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, rows = email.row_ids.len()))]
    pub async fn send_rows(
        &self,
        sheet_id: i64,
        email: &MultiRowEmail,
        auth: Option<&str>,
    ) -> Result<MultiRowEmail> {
        require_id("sheet id", sheet_id)?;
        require_any("row id", &email.row_ids)?;
        require_any("recipient", &email.row_email.email.send_to)?;

        let response: ResultResponse<MultiRowEmail> = self
            .post(&format!("sheets/{}/rows/emails", sheet_id), email, auth)
            .await?;
        into_result(response, "send_rows")
    }

    /// Ask recipients to fill in specific rows.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, rows = request.rows.row_ids.len()))]
    pub async fn create_update_request(
        &self,
        sheet_id: i64,
        request: &UpdateRequest,
        auth: Option<&str>,
    ) -> Result<UpdateRequest> {
        require_id("sheet id", sheet_id)?;
        require_any("row id", &request.rows.row_ids)?;
        require_any("recipient", &request.rows.row_email.email.send_to)?;

        let response: ResultResponse<UpdateRequest> = self
            .post(&format!("sheets/{}/updaterequests", sheet_id), request, auth)
            .await?;
        into_result(response, "create_update_request")
    }

    async fn post_rows(&self, sheet_id: i64, rows: &[Row], auth: Option<&str>) -> Result<Vec<Row>> {
        let response: ResultResponse<Vec<Row>> =
            self.post(&format!("sheets/{}/rows", sheet_id), rows, auth).await?;
        log_failed_items(&response);
        Ok(response.into_result().unwrap_or_default())
    }

    async fn put_rows(&self, sheet_id: i64, rows: &[Row], auth: Option<&str>) -> Result<Vec<Row>> {
        let response: ResultResponse<Vec<Row>> =
            self.put(&format!("sheets/{}/rows", sheet_id), rows, auth).await?;
        log_failed_items(&response);
        Ok(response.into_result().unwrap_or_default())
    }
}

fn create_build(placement: Option<Placement>) -> RowBuild {
    match placement {
        Some(placement) => RowBuild::create().placement(placement),
        None => RowBuild::create(),
    }
}

fn require_row_ids(rows: &[Row]) -> Result<()> {
    match rows.iter().position(|row| row.id.is_none()) {
        Some(index) => Err(SmartsheetError::Validation(format!(
            "Row {} has no id and cannot be updated",
            index
        ))),
        None => Ok(()),
    }
}

fn log_failed_items<T>(response: &ResultResponse<T>) {
    for item in &response.failed_items {
        warn!(
            index = ?item.index,
            row_id = ?item.row_id,
            error = ?item.error,
            "Row rejected by server"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_build_applies_placement() {
        let plain = create_build(None);
        let placed = create_build(Some(Placement::Top));

        assert!(!plain.preserve_id);
        assert_eq!(placed.placement, Some(Placement::Top));
    }

    #[test]
    fn test_update_requires_ids() {
        assert!(require_row_ids(&[Row::with_id(1)]).is_ok());
        assert!(matches!(
            require_row_ids(&[Row::with_id(1), Row::default()]),
            Err(SmartsheetError::Validation(msg)) if msg.contains("Row 1")
        ));
    }
}
