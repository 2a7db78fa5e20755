//! Microsoft Graph API response types
//!
//! Data structures for deserializing drive item listings. Only the fields the
//! provider reads are typed; everything else is carried through verbatim in
//! `extra` so a record serializes back to the JSON Graph returned.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a Graph drive (a SharePoint document library)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriveId(String);

impl DriveId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Graph driveItem resource
///
/// See: https://learn.microsoft.com/graph/api/resources/driveitem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    /// Item ID (unique within the drive)
    pub id: String,

    /// File or folder name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Browser URL of the item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,

    /// Last modification time (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<String>,

    /// Location of the item's parent, including the drive id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<ItemReference>,

    /// Present on files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,

    /// Present on folders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,

    /// Short-lived pre-authenticated download URL
    #[serde(
        rename = "@microsoft.graph.downloadUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub download_url: Option<String>,

    /// All other fields, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DriveItem {
    /// Whether the item carries a folder facet (an empty `{}` counts)
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// Drive id from the parent reference, if Graph included it
    pub fn drive_id(&self) -> Option<DriveId> {
        self.parent_reference
            .as_ref()
            .and_then(|parent| parent.drive_id.as_deref())
            .filter(|id| !id.is_empty())
            .map(DriveId::new)
    }
}

/// Graph itemReference resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Graph file facet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Graph folder facet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a driveItem collection
#[derive(Debug, Clone, Deserialize)]
pub struct DriveItemPage {
    /// Items on this page, folders and files intermixed
    #[serde(default)]
    pub value: Vec<DriveItem>,

    /// URL of the next page
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// A branch of the tree that could not be listed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalWarning {
    /// URL whose fetch failed
    pub url: String,
    /// Error description
    pub message: String,
}

/// Result of walking a drive: every file reached, plus the branches skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traversal {
    /// Files in pre-order, page order within each folder. Never contains folders.
    pub files: Vec<DriveItem>,
    pub warnings: Vec<TraversalWarning>,
}

impl Traversal {
    /// True when no branch failed
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// IDs of the listed files, in order
    pub fn file_ids(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.id.as_str()).collect()
    }
}
