//! Scripted in-memory client for exercising the repository without a server
//!
//! Available to unit tests directly and to the crate's integration tests
//! through the `test-utils` feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use crate::client::CloudClient;
use crate::errors::ClientError;
use crate::models::DavRecord;

#[derive(Default)]
struct RecordedCalls {
    downloads: Vec<String>,
    logged_out: bool,
}

/// Scripted `CloudClient`: canned listings per path, switchable failures,
/// recorded calls
///
/// Clones share the recorded calls, so a test can keep a probe clone after
/// moving the client into a repository.
#[derive(Clone)]
pub struct TestCloudClient {
    configured: bool,
    authenticated: bool,
    login_url: Url,
    listings: HashMap<String, Vec<DavRecord>>,
    files: HashMap<String, Vec<u8>>,
    share_links: HashMap<String, String>,
    fail_listings: bool,
    calls: Arc<Mutex<RecordedCalls>>,
}

impl TestCloudClient {
    pub fn new() -> Self {
        Self {
            configured: true,
            authenticated: true,
            login_url: Url::parse("https://cloud.example.com/apps/oauth2/authorize").unwrap(),
            listings: HashMap::new(),
            files: HashMap::new(),
            share_links: HashMap::new(),
            fail_listings: false,
            calls: Arc::new(Mutex::new(RecordedCalls::default())),
        }
    }

    /// Scripts the records returned for one decoded directory path
    pub fn with_listing(mut self, path: &str, records: Vec<DavRecord>) -> Self {
        self.listings.insert(path.to_string(), records);
        self
    }

    /// Scripts the contents returned for one decoded file path
    pub fn with_file(mut self, path: &str, contents: &[u8]) -> Self {
        self.files.insert(path.to_string(), contents.to_vec());
        self
    }

    pub fn with_share_link(mut self, path: &str, link: &str) -> Self {
        self.share_links.insert(path.to_string(), link.to_string());
        self
    }

    /// Makes every `list_directory` call fail with a connection error
    pub fn with_failing_listings(mut self) -> Self {
        self.fail_listings = true;
        self
    }

    pub fn with_configured(mut self, configured: bool) -> Self {
        self.configured = configured;
        self
    }

    pub fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    /// Paths handed to `download` so far
    pub fn downloaded_paths(&self) -> Vec<String> {
        self.calls.lock().unwrap().downloads.clone()
    }

    pub fn logged_out(&self) -> bool {
        self.calls.lock().unwrap().logged_out
    }
}

impl Default for TestCloudClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CloudClient for TestCloudClient {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn login_url(&self) -> Url {
        self.login_url.clone()
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<DavRecord>, ClientError> {
        if self.fail_listings {
            return Err(ClientError::connection_failed("scripted failure"));
        }

        // Unknown directories list as empty, like a WebDAV server that has
        // nothing to report
        Ok(self.listings.get(path).cloned().unwrap_or_default())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        self.calls.lock().unwrap().downloads.push(path.to_string());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ClientError::not_found(path))
    }

    async fn create_share_link(&self, path: &str) -> Result<String, ClientError> {
        self.share_links
            .get(path)
            .cloned()
            .ok_or_else(|| ClientError::server_error(404, "no share link scripted"))
    }

    async fn logout(&self) -> Result<(), ClientError> {
        self.calls.lock().unwrap().logged_out = true;
        Ok(())
    }
}

/// Records shaped like a real Nextcloud PROPFIND of a small Documents tree
pub fn sample_documents_records() -> Vec<DavRecord> {
    vec![
        DavRecord {
            href: "/remote.php/webdav/Documents/".to_string(),
            last_modified: Some("Mon, 15 Jan 2024 14:30:00 GMT".to_string()),
            resource_type: Some("collection".to_string()),
            content_length: None,
        },
        DavRecord {
            href: "/remote.php/webdav/Documents/Reports/".to_string(),
            last_modified: Some("Tue, 16 Jan 2024 09:00:00 GMT".to_string()),
            resource_type: Some("collection".to_string()),
            content_length: None,
        },
        DavRecord {
            href: "/remote.php/webdav/Documents/notes.txt".to_string(),
            last_modified: Some("Wed, 17 Jan 2024 08:15:00 GMT".to_string()),
            resource_type: None,
            content_length: Some("42".to_string()),
        },
        DavRecord {
            href: "/remote.php/webdav/Documents/Budget%202024.xlsx".to_string(),
            last_modified: Some("Thu, 18 Jan 2024 16:45:00 GMT".to_string()),
            resource_type: None,
            content_length: Some("18230".to_string()),
        },
    ]
}
