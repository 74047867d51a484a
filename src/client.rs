use async_trait::async_trait;
use url::Url;

use crate::errors::ClientError;
use crate::models::DavRecord;

/// Transport-side contract for one cloud storage account
///
/// Implementations own the WebDAV wire protocol, the share endpoint and the
/// OAuth2 session, including token refresh and retries; the repository only
/// orchestrates them. Paths handed to the trait are percent-decoded,
/// relative to the DAV root and start with "/".
#[async_trait]
pub trait CloudClient: Send + Sync {
    /// Whether the OAuth2 issuer and client for this account are set up at all
    fn is_configured(&self) -> bool;

    /// Whether a usable session currently exists
    async fn is_authenticated(&self) -> bool;

    /// Authorization URL the picker opens in its login popup
    fn login_url(&self) -> Url;

    /// PROPFIND of a single directory level
    async fn list_directory(&self, path: &str) -> Result<Vec<DavRecord>, ClientError>;

    /// GET of a single file's contents
    async fn download(&self, path: &str) -> Result<Vec<u8>, ClientError>;

    /// Create (or reuse) a public share link for the given path
    async fn create_share_link(&self, path: &str) -> Result<String, ClientError>;

    /// Invalidate the current session
    async fn logout(&self) -> Result<(), ClientError>;
}
