use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::config::RepositoryConfig;
use crate::models::{
    DavRecord, DirectoryListing, FileEntry, FolderEntry, ListingEntry, RemoteFile,
};
use crate::paths::breadcrumb_trail;

/// Icon hint for folder rows
pub const FOLDER_ICON_HINT: &str = "folder";

/// Icon hint for files without an extension
pub const FILE_ICON_HINT: &str = "file";

/// Build the picker listing for one directory level
///
/// `current_path` is the decoded picker path ("/" or "/Documents/"); the
/// records are the PROPFIND rows for that directory, usually including the
/// directory itself, which is skipped. Folders come before files and each
/// group is sorted case-insensitively by title (uppercased, code point
/// order); two titles that collide after uppercasing keep only the later
/// record. This never fails: no records simply means an empty listing.
pub fn build_listing(
    config: &RepositoryConfig,
    current_path: &str,
    records: &[DavRecord],
) -> DirectoryListing {
    let current = if current_path.is_empty() { "/" } else { current_path };

    let mut folders: BTreeMap<String, ListingEntry> = BTreeMap::new();
    let mut files: BTreeMap<String, ListingEntry> = BTreeMap::new();

    for record in records {
        let file = RemoteFile::from_record(record, config.trimmed_dav_root());

        // The directory itself is part of every multistatus
        if file.href == current {
            continue;
        }

        let title = file.href.get(current.len()..).unwrap_or_default();
        let sort_key = title.to_uppercase();

        if file.is_collection() {
            folders.insert(
                sort_key,
                ListingEntry::Folder(FolderEntry {
                    title: title.trim_end_matches('/').to_string(),
                    thumbnail: FOLDER_ICON_HINT.to_string(),
                    children: Vec::new(),
                    last_modified: file.last_modified,
                    path: file.href.clone(),
                }),
            );
        } else {
            files.insert(
                sort_key,
                ListingEntry::File(FileEntry {
                    title: title.to_string(),
                    thumbnail: file_icon_hint(title),
                    size: file.content_length,
                    last_modified: file.last_modified,
                    source: file.href.clone(),
                }),
            );
        }
    }

    debug!(
        "Built listing for '{}': {} folders, {} files",
        current,
        folders.len(),
        files.len()
    );

    DirectoryListing {
        dynamic_load: config.listing.dynamic_load,
        search_disabled: config.listing.search_disabled,
        login_disabled: config.listing.login_disabled,
        breadcrumbs: breadcrumb_trail(&config.provider_name, current),
        entries: folders.into_values().chain(files.into_values()).collect(),
        manage_link: config.manage_url.as_ref().map(|url| url.to_string()),
    }
}

/// Listing with breadcrumbs and flags but no entries
///
/// The degrade result when the transport could not deliver records; the
/// picker still renders a navigable, empty directory.
pub fn empty_listing(config: &RepositoryConfig, current_path: &str) -> DirectoryListing {
    build_listing(config, current_path, &[])
}

fn file_icon_hint(title: &str) -> String {
    Path::new(title)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_else(|| FILE_ICON_HINT.to_string())
}
