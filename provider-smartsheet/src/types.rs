//! Request options and outcomes that exist only on the client side.

use core_models::ResultResponse;

/// Envelope returned by deletes and other calls without a meaningful result.
pub type Acknowledgement = ResultResponse<serde_json::Value>;

/// Where a new sheet is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetContainer {
    /// The user's Sheets folder
    #[default]
    Home,
    Folder(i64),
    Workspace(i64),
}

// =============================================================================
// Sheet loading
// =============================================================================

/// Optional parts of a sheet to load alongside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetInclusion {
    Attachments,
    ColumnType,
    CrossSheetReferences,
    Discussions,
    FilterDefinitions,
    Filters,
    Format,
    ObjectValue,
    OwnerInfo,
    RowPermalink,
    Source,
    Writer,
}

impl SheetInclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetInclusion::Attachments => "attachments",
            SheetInclusion::ColumnType => "columnType",
            SheetInclusion::CrossSheetReferences => "crossSheetReferences",
            SheetInclusion::Discussions => "discussions",
            SheetInclusion::FilterDefinitions => "filterDefinitions",
            SheetInclusion::Filters => "filters",
            SheetInclusion::Format => "format",
            SheetInclusion::ObjectValue => "objectValue",
            SheetInclusion::OwnerInfo => "ownerInfo",
            SheetInclusion::RowPermalink => "rowPermalink",
            SheetInclusion::Source => "source",
            SheetInclusion::Writer => "writerInfo",
        }
    }
}

/// Parts of a sheet the server should leave out.
///
/// Empty cells are always requested: rows are paired with columns by
/// position, so every row must carry one cell per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetExclusion {
    FilteredOutRows,
    LinkInFromCellDetails,
    LinksOutToCellsDetails,
}

impl SheetExclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetExclusion::FilteredOutRows => "filteredOutRows",
            SheetExclusion::LinkInFromCellDetails => "linkInFromCellDetails",
            SheetExclusion::LinksOutToCellsDetails => "linksOutToCellsDetails",
        }
    }
}

/// Query options for [`get_sheet`](crate::SmartsheetClient::get_sheet).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetQuery {
    pub include: Vec<SheetInclusion>,
    pub exclude: Vec<SheetExclusion>,
    /// Restrict the returned cells to these columns
    pub column_ids: Vec<i64>,
    /// Restrict the returned rows to these ids
    pub row_ids: Vec<i64>,
    pub page_size: Option<u32>,
    pub page: Option<u32>,
}

impl SheetQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, inclusion: SheetInclusion) -> Self {
        self.include.push(inclusion);
        self
    }

    pub fn exclude(mut self, exclusion: SheetExclusion) -> Self {
        self.exclude.push(exclusion);
        self
    }

    pub fn column_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.column_ids = ids.into_iter().collect();
        self
    }

    pub fn row_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.row_ids = ids.into_iter().collect();
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }
}

/// Extra data for cell history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellInclusion {
    ColumnType,
    ObjectValue,
}

impl CellInclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellInclusion::ColumnType => "columnType",
            CellInclusion::ObjectValue => "objectValue",
        }
    }
}

/// What to load with a discussion listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscussionQuery {
    pub include_comments: bool,
    /// Only honoured together with `include_comments`
    pub include_attachments: bool,
    pub include_all: bool,
}

// =============================================================================
// Users
// =============================================================================

/// Options for removing a user from the organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRemoval {
    /// User who takes ownership of the removed user's groups and, with
    /// `transfer_sheets`, their sheets
    pub transfer_to: Option<i64>,
    pub transfer_sheets: bool,
    pub remove_from_sharing: bool,
}

// =============================================================================
// Bulk row removal
// =============================================================================

/// Outcome of a chunked row delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedRows {
    /// Ids the server reported as deleted
    pub removed: Vec<i64>,
    /// Ids sent in a successful chunk that the server did not report back,
    /// typically rows that no longer existed
    pub not_found: Vec<i64>,
    /// Ids never sent, or sent in a chunk that did not succeed
    pub pending: Vec<i64>,
    /// Delete calls issued
    pub requests: usize,
}

impl RemovedRows {
    /// Every requested id was sent in a chunk that succeeded.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_query_builder() {
        let query = SheetQuery::new()
            .include(SheetInclusion::Attachments)
            .exclude(SheetExclusion::FilteredOutRows)
            .row_ids([1, 2])
            .page(2, 100);

        assert_eq!(query.include, vec![SheetInclusion::Attachments]);
        assert_eq!(query.exclude, vec![SheetExclusion::FilteredOutRows]);
        assert_eq!(query.row_ids, vec![1, 2]);
        assert_eq!(query.page, Some(2));
        assert_eq!(query.page_size, Some(100));
        assert!(query.column_ids.is_empty());
    }

    #[test]
    fn test_removed_rows_completion() {
        let mut outcome = RemovedRows {
            removed: vec![1, 2],
            ..Default::default()
        };
        assert!(outcome.is_complete());

        outcome.pending.push(3);
        assert!(!outcome.is_complete());
    }
}
