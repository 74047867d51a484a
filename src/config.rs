use url::Url;

use crate::errors::ConfigError;

/// Picker behavior flags passed through into every listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Fetch one directory level per request instead of a full tree
    pub dynamic_load: bool,
    /// Hide the picker's search box
    pub search_disabled: bool,
    /// Hide the picker's login button
    pub login_disabled: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            dynamic_load: true,
            search_disabled: true,
            login_disabled: false,
        }
    }
}

/// Repository configuration
///
/// `dav_root` is the server-side WebDAV base path (e.g. "remote.php/webdav").
/// Every href in a PROPFIND response is rooted at it, and it is stripped
/// before paths reach the picker.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Display name shown as the breadcrumb root
    pub provider_name: String,
    pub dav_root: String,
    /// Account-management page offered to the user as an external link
    pub manage_url: Option<Url>,
    pub listing: ListingOptions,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            provider_name: "Nextcloud".to_string(),
            dav_root: "remote.php/webdav".to_string(),
            manage_url: None,
            listing: ListingOptions::default(),
        }
    }
}

impl RepositoryConfig {
    /// Creates a configuration with default listing flags and no manage link
    pub fn new(provider_name: String, dav_root: String) -> Self {
        Self {
            provider_name,
            dav_root,
            ..Self::default()
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider_name.trim().is_empty() {
            return Err(ConfigError::MissingProviderName);
        }

        // The host and scheme belong to the transport, not to this crate
        if self.dav_root.starts_with("http://") || self.dav_root.starts_with("https://") {
            return Err(ConfigError::DavRootIsUrl {
                value: self.dav_root.clone(),
            });
        }

        Ok(())
    }

    /// DAV root without surrounding slashes and whitespace, the form hrefs
    /// are matched against
    pub fn trimmed_dav_root(&self) -> &str {
        self.dav_root.trim_matches(|c| c == '/' || c == ' ')
    }
}
