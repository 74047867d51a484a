use std::borrow::Cow;

use crate::models::PathSegment;

/// Convert a raw href from a PROPFIND response into a picker path
///
/// Input:  "/remote.php/webdav/Documents/Report%201.pdf" with DAV root "remote.php/webdav"
/// Output: "/Documents/Report 1.pdf"
///
/// The href is percent-decoded first, then the DAV root is cut off by byte
/// length; the server roots every href at the configured path, so the cut
/// leaves the picker-relative remainder with its leading slash. A href
/// shorter than the DAV root comes back empty instead of panicking.
pub fn strip_dav_root(href: &str, dav_root: &str) -> String {
    let base = dav_root.trim_matches(|c| c == '/' || c == ' ');
    let trimmed = href.trim_start_matches(|c| c == '/' || c == ' ');

    let decoded = urlencoding::decode(trimmed)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| trimmed.to_string());

    decoded.get(base.len()..).unwrap_or_default().to_string()
}

/// Breadcrumb trail for the current picker path
///
/// The root segment carries the provider display name and an empty path.
/// Every fragment after it links to the cumulative path up to and including
/// itself, so "/Documents/Reports/" yields the root segment, "/Documents/"
/// and "/Documents/Reports/". Fragment names are percent-decoded for
/// display, the paths keep the fragments as given.
pub fn breadcrumb_trail(provider_name: &str, current_path: &str) -> Vec<PathSegment> {
    let mut trail = vec![PathSegment {
        name: provider_name.to_string(),
        path: String::new(),
    }];

    let trimmed = current_path.trim_matches('/');
    if trimmed.is_empty() {
        return trail;
    }

    let fragments: Vec<&str> = trimmed.split('/').collect();
    for i in 0..fragments.len() {
        let name = urlencoding::decode(fragments[i])
            .unwrap_or_else(|_| Cow::Borrowed(fragments[i]))
            .into_owned();

        trail.push(PathSegment {
            name,
            path: format!("/{}/", fragments[..=i].join("/")),
        });
    }

    trail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_dav_root_file_and_directory() {
        // File href
        let path = strip_dav_root("/remote.php/webdav/Photos/image.jpg", "remote.php/webdav");
        assert_eq!(path, "/Photos/image.jpg");

        // Directory href keeps its trailing slash
        let path = strip_dav_root("/remote.php/webdav/Photos/", "remote.php/webdav");
        assert_eq!(path, "/Photos/");

        // The root itself
        let path = strip_dav_root("/remote.php/webdav/", "remote.php/webdav");
        assert_eq!(path, "/");
    }

    #[test]
    fn test_strip_dav_root_decodes_percent_encoding() {
        let path = strip_dav_root(
            "/remote.php/webdav/Documents/Report%201.pdf",
            "remote.php/webdav",
        );
        assert_eq!(path, "/Documents/Report 1.pdf");
    }

    #[test]
    fn test_strip_dav_root_tolerates_untrimmed_config() {
        // The configured path may carry slashes and spaces, hrefs may not
        // start with one
        let path = strip_dav_root("remote.php/webdav/a.txt", "/remote.php/webdav/ ");
        assert_eq!(path, "/a.txt");
    }

    #[test]
    fn test_strip_dav_root_short_href_yields_empty() {
        assert_eq!(strip_dav_root("/short", "remote.php/webdav"), "");
    }

    #[test]
    fn test_breadcrumb_trail_root_only() {
        let trail = breadcrumb_trail("Nextcloud", "/");
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].name, "Nextcloud");
        assert_eq!(trail[0].path, "");

        // The empty path behaves like the root
        assert_eq!(breadcrumb_trail("Nextcloud", ""), trail);
    }

    #[test]
    fn test_breadcrumb_trail_nested() {
        let trail = breadcrumb_trail("Nextcloud", "/Documents/Reports/");
        assert_eq!(trail.len(), 3);
        assert_eq!(trail[1].name, "Documents");
        assert_eq!(trail[1].path, "/Documents/");
        assert_eq!(trail[2].name, "Reports");
        assert_eq!(trail[2].path, "/Documents/Reports/");
    }

    #[test]
    fn test_breadcrumb_trail_decodes_names_keeps_paths() {
        let trail = breadcrumb_trail("Nextcloud", "/My%20Files/");
        assert_eq!(trail[1].name, "My Files");
        assert_eq!(trail[1].path, "/My%20Files/");
    }
}
