//! Rows, row placement and row normalization.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attachment::{Attachment, Discussion};
use crate::cell::{Cell, CellValue};
use crate::column::Column;
use crate::error::{ModelError, Result};
use crate::nullable::Nullable;
use crate::user::{AccessLevel, User};

/// Where a created or moved row lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
    /// Directly above the sibling row
    Above(i64),
    /// Directly below the sibling row
    Below(i64),
    FirstChildOf(i64),
    LastChildOf(i64),
}

/// Options for [`Row::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowBuild {
    pub preserve_id: bool,
    pub strict: bool,
    pub placement: Option<Placement>,
}

impl RowBuild {
    /// Options for a new row; any id it carries is dropped.
    pub fn create() -> Self {
        Self::default()
    }

    /// Options for an existing row; the id is kept.
    pub fn update() -> Self {
        Self {
            preserve_id: true,
            ..Self::default()
        }
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sibling_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_critical_path: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_for_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_bottom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub above: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdent: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditional_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<User>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<Cell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussions: Option<Vec<Discussion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

impl Row {
    pub fn with_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }

    /// A row reference carrying only its id, for updates.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Normalize the row for a create or update payload.
    ///
    /// Server-owned fields are stripped, placement is taken from `options`
    /// only, and every cell is normalized. Cells with nothing to say are
    /// dropped, so a row of empty cells contributes no cells at all.
    pub fn build(mut self, options: &RowBuild) -> Self {
        if !options.preserve_id {
            self.id = None;
        }

        self.sheet_id = None;
        self.row_number = None;
        self.version = None;
        self.created_at = None;
        self.created_by = None;
        self.modified_at = None;
        self.modified_by = None;
        self.locked_for_user = None;
        self.filtered_out = None;
        self.in_critical_path = None;
        self.access_level = None;
        self.permalink = None;
        self.columns = None;
        self.discussions = None;
        self.attachments = None;

        self.apply_placement(options.placement);

        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter(Cell::has_content)
            .map(|mut cell| {
                cell.normalize(options.strict);
                cell
            })
            .collect();

        self
    }

    fn apply_placement(&mut self, placement: Option<Placement>) {
        self.to_top = None;
        self.to_bottom = None;
        self.above = None;
        self.parent_id = None;
        self.sibling_id = None;

        match placement {
            None => {}
            Some(Placement::Top) => self.to_top = Some(true),
            Some(Placement::Bottom) => self.to_bottom = Some(true),
            Some(Placement::Above(sibling)) => {
                self.sibling_id = Some(sibling);
                self.above = Some(true);
            }
            Some(Placement::Below(sibling)) => self.sibling_id = Some(sibling),
            Some(Placement::FirstChildOf(parent)) => {
                self.parent_id = Some(parent);
                self.to_top = Some(true);
            }
            Some(Placement::LastChildOf(parent)) => {
                self.parent_id = Some(parent);
                self.to_bottom = Some(true);
            }
        }
    }

    /// Cell paired with the column id, matching the reconciled column first.
    pub fn cell_for_column_id(&self, column_id: i64) -> Option<&Cell> {
        self.cells.iter().find(|cell| {
            cell.column
                .as_ref()
                .and_then(|c| c.id)
                .or(cell.column_id)
                == Some(column_id)
        })
    }

    /// Cell whose reconciled column has this title (trimmed, case-insensitive).
    pub fn cell_for_column_title(&self, title: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|cell| cell.column.as_ref().is_some_and(|c| c.matches_title(title)))
    }

    pub fn cell_for_column_title_mut(&mut self, title: &str) -> Option<&mut Cell> {
        self.cells
            .iter_mut()
            .find(|cell| cell.column.as_ref().is_some_and(|c| c.matches_title(title)))
    }

    /// Text of the cell under `title`, or an empty string.
    pub fn value_as_string(&self, title: &str) -> String {
        self.cell_for_column_title(title)
            .map(Cell::value_as_string)
            .unwrap_or_default()
    }

    /// Replace the value of the cell under `title`, dropping any formula.
    pub fn update_cell_for_column(
        &mut self,
        title: &str,
        value: impl Into<Nullable<CellValue>>,
    ) -> Result<()> {
        let cell = self
            .cell_for_column_title_mut(title)
            .ok_or_else(|| ModelError::UnknownColumn(title.to_string()))?;

        cell.value = value.into();
        cell.formula = None;
        Ok(())
    }

    /// Reconciled cells keyed by column title.
    pub fn cells_by_title(&self) -> HashMap<&str, &Cell> {
        self.cells
            .iter()
            .filter_map(|cell| cell.column_title().map(|title| (title, cell)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDestination {
    pub sheet_id: i64,
}

/// Body of the row copy and move endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyOrMoveRowDirective {
    pub row_ids: Vec<i64>,
    pub to: RowDestination,
}

impl CopyOrMoveRowDirective {
    pub fn new(row_ids: Vec<i64>, destination_sheet_id: i64) -> Self {
        Self {
            row_ids,
            to: RowDestination {
                sheet_id: destination_sheet_id,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowMapping {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyOrMoveRowResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_sheet_id: Option<i64>,
    #[serde(default)]
    pub row_mappings: Vec<RowMapping>,
}
