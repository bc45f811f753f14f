//! Cells and cell values.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{ModelError, Result};
use crate::nullable::Nullable;
use crate::user::User;

/// Marks the start of a formula.
pub const FORMULA_MARKER: char = '=';

/// A literal cell value as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Object values (multi-contact, multi-picklist, ...)
    Json(serde_json::Value),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperlink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sight_id: Option<i64>,
}

impl Hyperlink {
    /// Links to another sheet, report or dashboard carry a server-generated url.
    pub fn targets_object(&self) -> bool {
        self.sheet_id.is_some() || self.report_id.is_some() || self.sight_id.is_some()
    }
}

/// One end of a cross-sheet cell link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
}

/// One (row, column) intersection holding a value or a formula.
///
/// `value` is tri-state: leave it unset for "no change", set it to
/// [`Nullable::Null`] to clear the cell on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub value: Nullable<CellValue>,

    /// Server-computed, read-only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<Hyperlink>,

    /// Inbound cross-sheet link; read-only once established
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_in_from_cell: Option<CellLink>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_out_to_cells: Option<Vec<CellLink>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditional_format: Option<String>,

    /// Column this cell was paired with by the last reconciliation.
    #[serde(skip)]
    pub column: Option<Arc<Column>>,
}

impl Cell {
    /// A literal value cell. The formula is left empty.
    pub fn value(column_id: i64, value: impl Into<CellValue>) -> Self {
        Self {
            column_id: Some(column_id),
            value: Nullable::Value(value.into()),
            ..Default::default()
        }
    }

    /// A formula cell. The value is left unset.
    pub fn formula(column_id: i64, formula: impl Into<String>) -> Result<Self> {
        let formula = formula.into();
        if !formula.trim_start().starts_with(FORMULA_MARKER) {
            return Err(ModelError::InvalidFormula(formula));
        }

        Ok(Self {
            column_id: Some(column_id),
            formula: Some(formula),
            ..Default::default()
        })
    }

    /// A cell that clears whatever the server currently holds.
    pub fn clear(column_id: i64) -> Self {
        Self {
            column_id: Some(column_id),
            value: Nullable::Null,
            ..Default::default()
        }
    }

    pub fn with_hyperlink(mut self, hyperlink: Hyperlink) -> Self {
        self.hyperlink = Some(hyperlink);
        self
    }

    pub fn has_formula(&self) -> bool {
        self.formula.as_deref().is_some_and(|f| !f.trim().is_empty())
    }

    /// Whether the cell says anything worth sending.
    pub fn has_content(&self) -> bool {
        !self.value.is_unset() || self.has_formula() || self.link_in_from_cell.is_some()
    }

    /// Column title from the reconciled back-reference.
    pub fn column_title(&self) -> Option<&str> {
        self.column.as_ref().and_then(|c| c.title.as_deref())
    }

    /// Value rendered as text; empty when the cell holds nothing.
    pub fn value_as_string(&self) -> String {
        self.value
            .as_option()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Strip read-only data before the cell is written.
    ///
    /// `strict` is ignored for cells fed by an inbound link; the server
    /// rejects the flag there. A formula cell is sent with an explicit null
    /// value next to its formula.
    pub fn normalize(&mut self, strict: bool) {
        self.column = None;
        self.display_value = None;
        self.links_out_to_cells = None;

        self.strict = if self.link_in_from_cell.is_some() {
            None
        } else {
            Some(strict)
        };

        if let Some(link) = self.hyperlink.as_mut() {
            if link.targets_object() {
                link.url = None;
            }
        }

        if self.has_formula() {
            self.value = Nullable::Null;
        }
    }
}

/// A cell as it stood at one point in its history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellHistory {
    #[serde(flatten)]
    pub cell: Cell,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_requires_marker() {
        let err = Cell::formula(1, "SUM(A1:A3)").unwrap_err();
        assert_eq!(err, ModelError::InvalidFormula("SUM(A1:A3)".into()));

        let cell = Cell::formula(1, "=SUM([Cost]:[Cost])").unwrap();
        assert!(cell.value.is_unset());
        assert!(cell.has_formula());
    }

    #[test]
    fn test_value_cell_has_no_formula() {
        let cell = Cell::value(7, "Done");
        assert!(cell.formula.is_none());
        assert_eq!(cell.value_as_string(), "Done");
    }

    #[test]
    fn test_normalize_clears_value_of_formula_cell() {
        let mut cell = Cell::formula(3, "=TODAY()").unwrap();
        cell.value = Nullable::Value("2024-01-01".into());
        cell.display_value = Some("01/01/24".into());

        cell.normalize(false);

        assert_eq!(cell.value, Nullable::Null);
        assert!(cell.display_value.is_none());
        assert_eq!(cell.strict, Some(false));
        assert_eq!(
            serde_json::to_value(&cell).unwrap(),
            serde_json::json!({
                "columnId": 3,
                "value": null,
                "formula": "=TODAY()",
                "strict": false
            })
        );
    }

    #[test]
    fn test_normalize_skips_strict_for_linked_cell() {
        let mut cell = Cell {
            column_id: Some(9),
            link_in_from_cell: Some(CellLink {
                sheet_id: Some(1),
                row_id: Some(2),
                column_id: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };

        cell.normalize(true);

        assert!(cell.strict.is_none());
        assert!(cell.has_content());
    }

    #[test]
    fn test_normalize_drops_generated_hyperlink_url() {
        let mut cell = Cell::value(1, "Budget").with_hyperlink(Hyperlink {
            url: Some("https://app.smartsheet.com/sheets/abc".into()),
            sheet_id: Some(55),
            ..Default::default()
        });
        cell.normalize(false);
        assert!(cell.hyperlink.as_ref().unwrap().url.is_none());

        let mut external = Cell::value(1, "Docs").with_hyperlink(Hyperlink {
            url: Some("https://example.com".into()),
            ..Default::default()
        });
        external.normalize(false);
        assert!(external.hyperlink.unwrap().url.is_some());
    }

    #[test]
    fn test_clear_serializes_explicit_null() {
        let json = serde_json::to_value(Cell::clear(4)).unwrap();
        assert_eq!(json, serde_json::json!({ "columnId": 4, "value": null }));

        let untouched = serde_json::to_value(Cell::formula(4, "=1+1").unwrap()).unwrap();
        assert!(untouched.get("value").is_none());
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(CellValue::Number(12.0).to_string(), "12");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "true");

        let parsed: CellValue = serde_json::from_str("17").unwrap();
        assert_eq!(parsed, CellValue::Number(17.0));
    }

    #[test]
    fn test_history_entry_flattens_cell() {
        let entry: CellHistory = serde_json::from_str(
            r#"{"columnId": 1, "value": "Open", "modifiedAt": "2024-05-01T08:00:00Z",
                "modifiedBy": {"email": "pm@example.com"}}"#,
        )
        .unwrap();

        assert_eq!(entry.cell.value_as_string(), "Open");
        assert_eq!(
            entry.modified_by.and_then(|u| u.email).as_deref(),
            Some("pm@example.com")
        );
    }
}
