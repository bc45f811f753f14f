//! Sheets and positional cell/column reconciliation.
//!
//! A row returned by the server is a flat list of cells. Cell `i` belongs to
//! column `i` of the sheet at the time of the last [`Sheet::reconcile`]; the
//! column id embedded in a freshly created row is not reliable. Every
//! operation that replaces or grows the row or column lists re-runs the
//! reconciliation.
//!
//! Precondition for a complete pairing: each row holds at most as many cells
//! as the sheet has columns. Excess cells are kept but left unpaired.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attachment::AttachmentType;
use crate::cell::Cell;
use crate::column::Column;
use crate::containers::Workspace;
use crate::error::{ModelError, Result};
use crate::row::{Row, RowBuild};
use crate::user::{AccessLevel, User};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_summary_tasks: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    /// Template or sheet to create this sheet from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_row_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gantt_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_management_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_image_upload_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_parent_rows_for_filters: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_settings: Option<UserSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Box<Workspace>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_attachment_options: Option<Vec<AttachmentType>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Row>,
}

impl Sheet {
    /// A sheet ready to be created. Fails if more than one column is primary.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let mut sheet = Self {
            name: Some(name.into()),
            columns,
            ..Default::default()
        };
        sheet.columns.iter_mut().for_each(Column::normalize);
        sheet.validate_columns()?;
        Ok(sheet)
    }

    /// At most one column may be primary.
    pub fn validate_columns(&self) -> Result<()> {
        let count = self.columns.iter().filter(|c| c.is_primary()).count();
        if count > 1 {
            return Err(ModelError::MultiplePrimaryColumns { count });
        }
        Ok(())
    }

    /// Pair cell `i` of every row with column `i`.
    ///
    /// The column id is written into the cell and a snapshot of the column is
    /// attached. Cells beyond the column count lose any previous pairing;
    /// columns beyond a row's cell count produce no cell.
    pub fn reconcile(&mut self) {
        let columns: Vec<Arc<Column>> = self.columns.iter().cloned().map(Arc::new).collect();

        for row in &mut self.rows {
            if row.cells.len() > columns.len() {
                debug!(
                    row_id = ?row.id,
                    cells = row.cells.len(),
                    columns = columns.len(),
                    "Row has more cells than the sheet has columns"
                );
            }

            for (index, cell) in row.cells.iter_mut().enumerate() {
                match columns.get(index) {
                    Some(column) => {
                        cell.column_id = column.id;
                        cell.column = Some(Arc::clone(column));
                    }
                    None => cell.column = None,
                }
            }
        }
    }

    pub fn column_by_id(&self, column_id: i64) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == Some(column_id))
    }

    /// Trimmed, case-insensitive title lookup.
    pub fn column_by_title(&self, title: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.matches_title(title))
    }

    /// Exact, case-sensitive title lookup.
    pub fn column_by_title_exact(&self, title: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.title.as_deref() == Some(title))
    }

    pub fn row_by_id(&self, row_id: i64) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == Some(row_id))
    }

    /// Treat the sheet as a lookup table.
    ///
    /// Finds the first row whose `key_column` value equals `key` (both sides
    /// trimmed and lowercased) and returns that row's `value_column` cell.
    pub fn cell_by_key_value_lookup(
        &self,
        key: &str,
        key_column: &str,
        value_column: &str,
    ) -> Option<&Cell> {
        let wanted = normalize_key(key);
        self.rows
            .iter()
            .find(|row| normalize_key(&row.value_as_string(key_column)) == wanted)
            .and_then(|row| row.cell_for_column_title(value_column))
    }

    /// Ids of server-maintained columns.
    pub fn system_column_ids(&self) -> HashSet<i64> {
        self.columns
            .iter()
            .filter(|c| c.is_system())
            .filter_map(|c| c.id)
            .collect()
    }

    /// Normalize rows for a write against this sheet.
    ///
    /// Cells in system columns are removed before the usual row build.
    pub fn prepare_rows(&self, rows: Vec<Row>, options: &RowBuild) -> Vec<Row> {
        let system = self.system_column_ids();
        rows.into_iter()
            .map(|mut row| {
                row.cells
                    .retain(|cell| cell.column_id.map_or(true, |id| !system.contains(&id)));
                row.build(options)
            })
            .collect()
    }

    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.reconcile();
    }

    pub fn append_rows(&mut self, rows: Vec<Row>) {
        self.rows.extend(rows);
        self.reconcile();
    }

    /// Replace rows that share an id with an incoming row, append the rest.
    pub fn merge_rows(&mut self, rows: Vec<Row>) {
        for row in rows {
            let existing = row
                .id
                .and_then(|id| self.rows.iter().position(|r| r.id == Some(id)));
            match existing {
                Some(index) => self.rows[index] = row,
                None => self.rows.push(row),
            }
        }
        self.reconcile();
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.reconcile();
    }

    /// Take everything from a freshly fetched copy of this sheet.
    pub fn replace_from(&mut self, fresh: Sheet) {
        *self = fresh;
        self.reconcile();
    }

    /// Drop rows by id, returning how many were removed.
    pub fn remove_rows_by_id(&mut self, row_ids: &[i64]) -> usize {
        let ids: HashSet<i64> = row_ids.iter().copied().collect();
        let before = self.rows.len();
        self.rows.retain(|r| r.id.map_or(true, |id| !ids.contains(&id)));
        before - self.rows.len()
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}
