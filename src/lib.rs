//! File picker repository for Nextcloud/ownCloud style WebDAV accounts:
//! raw PROPFIND records in, UI-ready directory listings out, with the wire
//! transport and OAuth2 session behind the [`client::CloudClient`] seam.

pub mod client;
pub mod config;
pub mod errors;
pub mod listing;
pub mod models;
pub mod paths;
pub mod propfind;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
