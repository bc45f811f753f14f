//! Workspaces, folders and the other sheet containers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sheet::Sheet;
use crate::user::AccessLevel;

// =============================================================================
// Containers
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<Sheet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folders: Option<Vec<Folder>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<Report>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<Template>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sights: Option<Vec<Sight>>,
}

impl Workspace {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<Sheet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folders: Option<Vec<Folder>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<Report>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<Template>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sights: Option<Vec<Sight>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
}

/// A dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sight {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Everything visible to the current user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Home {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
    #[serde(default)]
    pub sights: Vec<Sight>,
}

// =============================================================================
// Copy directives
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationType {
    Folder,
    Workspace,
    Home,
}

/// Target of a sheet or folder copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDestination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<i64>,
    pub destination_type: DestinationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

impl ContainerDestination {
    pub fn folder(folder_id: i64, new_name: impl Into<String>) -> Self {
        Self {
            destination_id: Some(folder_id),
            destination_type: DestinationType::Folder,
            new_name: Some(new_name.into()),
        }
    }

    pub fn workspace(workspace_id: i64, new_name: impl Into<String>) -> Self {
        Self {
            destination_id: Some(workspace_id),
            destination_type: DestinationType::Workspace,
            new_name: Some(new_name.into()),
        }
    }

    pub fn home(new_name: impl Into<String>) -> Self {
        Self {
            destination_id: None,
            destination_type: DestinationType::Home,
            new_name: Some(new_name.into()),
        }
    }
}

/// Sheet parts carried over by a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetCopyInclusion {
    Attachments,
    CellLinks,
    Data,
    Discussions,
    Filters,
    Forms,
    RuleRecipients,
    Rules,
    Shares,
    All,
}

impl SheetCopyInclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetCopyInclusion::Attachments => "attachments",
            SheetCopyInclusion::CellLinks => "cellLinks",
            SheetCopyInclusion::Data => "data",
            SheetCopyInclusion::Discussions => "discussions",
            SheetCopyInclusion::Filters => "filters",
            SheetCopyInclusion::Forms => "forms",
            SheetCopyInclusion::RuleRecipients => "ruleRecipients",
            SheetCopyInclusion::Rules => "rules",
            SheetCopyInclusion::Shares => "shares",
            SheetCopyInclusion::All => "all",
        }
    }
}

/// Page size for PDF exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaperSize {
    Letter,
    Legal,
    Wide,
    Archd,
    A4,
    A3,
    A2,
    A1,
    A0,
}

impl PaperSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSize::Letter => "LETTER",
            PaperSize::Legal => "LEGAL",
            PaperSize::Wide => "WIDE",
            PaperSize::Archd => "ARCHD",
            PaperSize::A4 => "A4",
            PaperSize::A3 => "A3",
            PaperSize::A2 => "A2",
            PaperSize::A1 => "A1",
            PaperSize::A0 => "A0",
        }
    }
}

/// A named range in another sheet that formulas can reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossSheetReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_sheet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_row_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_row_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_shape() {
        let json = serde_json::to_value(ContainerDestination::folder(8, "Copy of Plan")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "destinationId": 8,
                "destinationType": "folder",
                "newName": "Copy of Plan"
            })
        );

        let home = serde_json::to_value(ContainerDestination::home("Mine")).unwrap();
        assert!(home.get("destinationId").is_none());
    }

    #[test]
    fn test_inclusion_names_match_serde() {
        for inclusion in [SheetCopyInclusion::CellLinks, SheetCopyInclusion::RuleRecipients] {
            let json = serde_json::to_value(inclusion).unwrap();
            assert_eq!(json, inclusion.as_str());
        }
        assert_eq!(PaperSize::Archd.as_str(), "ARCHD");
    }

    #[test]
    fn test_home_tolerates_missing_sections() {
        let home: Home = serde_json::from_str(r#"{"sheets": [{"id": 1, "name": "Plan"}]}"#).unwrap();
        assert_eq!(home.sheets.len(), 1);
        assert!(home.workspaces.is_empty());
    }
}
