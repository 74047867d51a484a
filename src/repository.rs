use std::borrow::Cow;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::client::CloudClient;
use crate::config::RepositoryConfig;
use crate::errors::{ConfigError, RepositoryError};
use crate::listing::{build_listing, empty_listing};
use crate::models::{DirectoryListing, LoginKind, LoginPrompt, ReturnMode};

/// Host-facing capability set of a remote file repository
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Browse one directory level; degrades to an empty listing on failure
    async fn list_directory(&self, path: &str) -> DirectoryListing;

    /// Download a picked file to a local destination
    async fn fetch_file(&self, source: &str, destination: &Path) -> Result<(), RepositoryError>;

    /// Whether a usable session currently exists
    async fn is_authenticated(&self) -> bool;
}

/// File repository backed by a Nextcloud/ownCloud style account
///
/// The client carries the wire protocols and the OAuth2 session; this type
/// carries the picker semantics on top of it.
pub struct CloudRepository<C: CloudClient> {
    config: RepositoryConfig,
    client: C,
}

impl<C: CloudClient> CloudRepository<C> {
    /// Creates the repository after validating its configuration
    pub fn new(config: RepositoryConfig, client: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Create a public share link for a picked file
    ///
    /// The empty path is rejected: it would share the account root.
    pub async fn share_link(&self, path: &str) -> Result<String, RepositoryError> {
        if path.is_empty() {
            return Err(RepositoryError::EmptyPath);
        }

        let link = self.client.create_share_link(path).await?;
        info!("🔗 Created share link for '{}'", path);
        Ok(link)
    }

    /// Resolve what the host should store for a picked file
    ///
    /// With `use_link` a public share link is created; otherwise the source
    /// path is handed back unchanged and the host fetches a copy later.
    pub async fn file_reference(
        &self,
        source: &str,
        use_link: bool,
    ) -> Result<String, RepositoryError> {
        if use_link {
            self.share_link(source).await
        } else {
            Ok(source.to_string())
        }
    }

    /// Login button for the picker's authentication step
    pub fn login_prompt(&self) -> LoginPrompt {
        LoginPrompt {
            kind: LoginKind::Popup,
            url: self.client.login_url().to_string(),
        }
    }

    /// Ends the current session and hands back a fresh login prompt
    pub async fn logout(&self) -> Result<LoginPrompt, RepositoryError> {
        self.client.logout().await?;
        info!("Logged out, the picker returns to the login step");
        Ok(self.login_prompt())
    }

    /// Whether the host should offer this repository at all
    ///
    /// False while the OAuth2 issuer/client setup is incomplete.
    pub fn is_visible(&self) -> bool {
        self.client.is_configured()
    }

    /// Ways a picked file may be handed over to the host
    pub fn supported_return_modes(&self) -> ReturnMode {
        ReturnMode::INTERNAL | ReturnMode::EXTERNAL | ReturnMode::REFERENCE
    }
}

#[async_trait]
impl<C: CloudClient> FileRepository for CloudRepository<C> {
    async fn list_directory(&self, path: &str) -> DirectoryListing {
        let decoded = percent_decoded(path);
        let current = if decoded.is_empty() {
            Cow::Borrowed("/")
        } else {
            Cow::Owned(decoded)
        };
        debug!("📁 Listing '{}'", current);

        match self.client.list_directory(&current).await {
            Ok(records) => build_listing(&self.config, &current, &records),
            Err(e) => {
                warn!(
                    "❌ Listing '{}' failed, returning an empty listing: {}",
                    current, e
                );
                empty_listing(&self.config, &current)
            }
        }
    }

    async fn fetch_file(&self, source: &str, destination: &Path) -> Result<(), RepositoryError> {
        let decoded = percent_decoded(source);
        let contents = self.client.download(&decoded).await?;
        tokio::fs::write(destination, &contents).await?;
        debug!("✅ Fetched '{}' ({} bytes)", decoded, contents.len());
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        self.client.is_authenticated().await
    }
}

/// Picker callbacks echo our own paths back, but hosts may also hand over
/// still-encoded ones
fn percent_decoded(path: &str) -> String {
    urlencoding::decode(path)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| path.to_string())
}
