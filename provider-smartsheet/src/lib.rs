//! # Smartsheet Provider
//!
//! Typed access to the Smartsheet REST API (`https://api.smartsheet.com/2.0/`).
//!
//! ## Overview
//!
//! [`SmartsheetClient`] covers users, workspaces, folders, sheets, rows,
//! columns, attachments, discussions, groups, webhooks, shares, reports,
//! templates, dashboards, cross-sheet references and cell history. Every
//! call goes through [`core_client::RequestExecutor`], which retries rate
//! limits and transient server errors with backoff.
//!
//! Sheets come back reconciled: each row's cells are paired with the
//! sheet's columns by position, so lookups by column title work right away.
//! The helpers that take `&mut Sheet` keep that pairing intact after rows are
//! added, updated or removed.
//!
//! ```ignore
//! use core_models::{Cell, Row};
//! use provider_smartsheet::{SheetQuery, SmartsheetClient};
//!
//! let client = SmartsheetClient::from_env()?;
//! let mut sheet = client.get_sheet(sheet_id, &SheetQuery::new(), None).await?;
//!
//! let status = sheet.column_by_title("status").and_then(|c| c.id).unwrap();
//! let row = Row::with_cells(vec![Cell::value(status, "Done")]);
//! client.add_rows_to_sheet(&mut sheet, vec![row], None, None).await?;
//! ```

pub mod client;
mod endpoints;
pub mod error;
pub mod types;

pub use client::SmartsheetClient;
pub use endpoints::rows::DELETE_CHUNK_SIZE;
pub use endpoints::sheets::{CSV_MIME, EXCEL_MIME, PDF_MIME};
pub use error::{Result, SmartsheetError};
pub use types::{
    Acknowledgement, CellInclusion, DiscussionQuery, RemovedRows, SheetContainer,
    SheetExclusion, SheetInclusion, SheetQuery, UserRemoval,
};

pub use core_client::{CallOptions, CancellationToken, FormFile};
pub use core_runtime::config::ClientConfig;
