//! Column schema.

use serde::{Deserialize, Serialize};

/// Column type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    TextNumber,
    ContactList,
    MultiContactList,
    Date,
    Datetime,
    AbstractDatetime,
    Picklist,
    MultiPicklist,
    Checkbox,
    Duration,
    Predecessor,
    #[serde(other)]
    Unknown,
}

/// Server-maintained column kinds. Cells in these columns are never written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemColumnType {
    AutoNumber,
    CreatedBy,
    CreatedDate,
    ModifiedBy,
    ModifiedDate,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoNumberFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Zero-padding mask, e.g. `"0000"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_number: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value1: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value2: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Vec<Criteria>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A typed field definition with a fixed position in its sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Assigned by the server on creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_column_type: Option<SystemColumnType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_for_user: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_number_format: Option<AutoNumberFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<ColumnFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_options: Option<Vec<ContactOption>>,

    /// Picklist values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Column {
    pub fn new(title: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            title: Some(title.into()),
            column_type: Some(column_type),
            ..Default::default()
        }
    }

    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_system_type(mut self, system_type: SystemColumnType) -> Self {
        self.system_column_type = Some(system_type);
        self
    }

    pub fn with_auto_number_format(mut self, format: AutoNumberFormat) -> Self {
        self.auto_number_format = Some(format);
        self
    }

    pub fn with_width(mut self, width: i64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn is_primary(&self) -> bool {
        self.primary.unwrap_or(false)
    }

    pub fn is_system(&self) -> bool {
        self.system_column_type.is_some()
    }

    /// Trimmed, case-insensitive title comparison.
    pub fn matches_title(&self, title: &str) -> bool {
        self.title
            .as_deref()
            .is_some_and(|own| own.trim().to_lowercase() == title.trim().to_lowercase())
    }

    /// Prepare the column for a create or update payload.
    ///
    /// Tags are read-only and an empty option list is dropped rather than
    /// sent as `[]`.
    pub fn normalize(&mut self) {
        self.tags = None;
        if self.options.as_ref().is_some_and(Vec::is_empty) {
            self.options = None;
        }
        self.locked_for_user = None;
    }
}
