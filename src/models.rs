use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::paths::strip_dav_root;

/// Raw PROPFIND record as handed over by the transport, one per response
/// element
///
/// Property values stay in wire form. Servers only report `getcontentlength`
/// for files and only mark collections in `resourcetype`, so absent fields
/// are the normal case, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DavRecord {
    /// Percent-encoded href rooted at the configured DAV base path
    pub href: String,
    #[serde(default, rename = "lastmodified")]
    pub last_modified: Option<String>,
    /// `"collection"` for folders, absent or empty otherwise
    #[serde(default, rename = "resourcetype")]
    pub resource_type: Option<String>,
    #[serde(default, rename = "getcontentlength")]
    pub content_length: Option<String>,
}

impl DavRecord {
    /// Reads records out of a loosely typed transport payload
    ///
    /// Some transports hand back whatever the server sent, which on failure
    /// is an error string or a status object rather than a record list.
    /// Anything that is not an array yields no records, and array items
    /// without a usable `href` are skipped, so a bad payload turns into an
    /// empty directory instead of an error.
    pub fn vec_from_value(payload: &Value) -> Vec<DavRecord> {
        match payload {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A record parsed into usable form: decoded path, typed timestamp and size
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    /// Percent-decoded path relative to the DAV root, leading slash kept
    pub href: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub resource_type: Option<String>,
    pub content_length: Option<u64>,
}

impl RemoteFile {
    pub fn from_record(record: &DavRecord, dav_root: &str) -> Self {
        Self {
            href: strip_dav_root(&record.href, dav_root),
            last_modified: record.last_modified.as_deref().and_then(parse_http_date),
            resource_type: record.resource_type.clone(),
            content_length: record
                .content_length
                .as_deref()
                .and_then(|len| len.trim().parse().ok()),
        }
    }

    pub fn is_collection(&self) -> bool {
        self.resource_type.as_deref() == Some("collection")
    }
}

/// Parse the timestamp formats WebDAV servers put in `getlastmodified`
fn parse_http_date(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }

    // RFC 2822 is what the DAV spec mandates; the fallbacks show up in the wild
    DateTime::parse_from_rfc2822(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc3339(date_str)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(date_str, "%a, %d %b %Y %H:%M:%S GMT")
                .ok()
                .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
        })
}

/// One breadcrumb segment; `path` is the cumulative picker path ("/A/B/")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub name: String,
    pub path: String,
}

/// Folder row in a directory listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderEntry {
    /// Folder name without the trailing slash
    pub title: String,
    /// Icon hint the host maps to a thumbnail URL, always `"folder"`
    pub thumbnail: String,
    /// Always empty: with dynamic loading the picker fetches children on demand
    pub children: Vec<ListingEntry>,
    #[serde(rename = "datemodified", with = "chrono::serde::ts_seconds_option")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Picker path used to browse into the folder
    pub path: String,
}

/// File row in a directory listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    pub title: String,
    /// Icon hint the host maps to a thumbnail URL, the lowercased extension
    pub thumbnail: String,
    /// Size in bytes when the server reported one
    pub size: Option<u64>,
    #[serde(rename = "datemodified", with = "chrono::serde::ts_seconds_option")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Path the picker hands back when this file is chosen
    pub source: String,
}

/// A single row in a directory listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListingEntry {
    Folder(FolderEntry),
    File(FileEntry),
}

impl ListingEntry {
    pub fn title(&self) -> &str {
        match self {
            ListingEntry::Folder(folder) => &folder.title,
            ListingEntry::File(file) => &file.title,
        }
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        match self {
            ListingEntry::Folder(folder) => folder.last_modified,
            ListingEntry::File(file) => file.last_modified,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ListingEntry::Folder(_))
    }
}

/// UI-ready listing in the file picker's wire shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryListing {
    #[serde(rename = "dynload")]
    pub dynamic_load: bool,
    #[serde(rename = "nosearch")]
    pub search_disabled: bool,
    #[serde(rename = "nologin")]
    pub login_disabled: bool,
    /// Breadcrumb trail, root segment first
    #[serde(rename = "path")]
    pub breadcrumbs: Vec<PathSegment>,
    /// Folder entries first, then files, each group sorted by title
    #[serde(rename = "list")]
    pub entries: Vec<ListingEntry>,
    #[serde(rename = "manage", skip_serializing_if = "Option::is_none")]
    pub manage_link: Option<String>,
}

/// How the picker should present the login step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginKind {
    Popup,
}

/// Login button handed to the picker when no session exists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginPrompt {
    #[serde(rename = "type")]
    pub kind: LoginKind,
    pub url: String,
}

bitflags! {
    /// Ways a picked file may be handed over to the host
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ReturnMode: u8 {
        /// The host downloads the file and keeps its own copy
        const INTERNAL = 0b0000_0001;
        /// The host embeds a direct link to the remote file
        const EXTERNAL = 0b0000_0010;
        /// The host stores a live reference and resolves it on access
        const REFERENCE = 0b0000_0100;
    }
}
