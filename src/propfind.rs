use std::str;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;

use crate::errors::ClientError;
use crate::models::DavRecord;

#[derive(Debug, Default)]
struct ResponseScan {
    href: String,
    last_modified: Option<String>,
    content_length: Option<String>,
    is_collection: bool,
    status_ok: bool,
}

/// Parse a PROPFIND multistatus body into raw records
///
/// Collections are kept alongside files, hrefs stay percent-encoded and
/// property values stay in wire form; turning them into something usable is
/// the normalizer's job. A response element only produces a record when it
/// has a non-empty href and a propstat with a 200 status.
pub fn parse_propfind_response(xml_text: &str) -> Result<Vec<DavRecord>, ClientError> {
    let mut reader = Reader::from_str(xml_text);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut current: Option<ResponseScan> = None;
    let mut current_element = String::new();
    let mut in_propstat = false;
    let mut in_resourcetype = false;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = local_name(&e)?;

                match name.as_str() {
                    "response" => {
                        current = Some(ResponseScan::default());
                    }
                    "propstat" => {
                        in_propstat = true;
                    }
                    "resourcetype" => {
                        in_resourcetype = true;
                    }
                    "collection" if in_resourcetype => {
                        if let Some(ref mut scan) = current {
                            scan.is_collection = true;
                        }
                    }
                    _ => {
                        current_element = name;
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                let name = local_name(&e)?;

                // Collections arrive as <d:collection/> inside resourcetype;
                // an empty <d:resourcetype/> marks a plain file
                if name == "collection" && in_resourcetype {
                    if let Some(ref mut scan) = current {
                        scan.is_collection = true;
                    }
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| ClientError::protocol(format!("XML parsing error: {}", e)))?
                    .to_string();

                if let Some(ref mut scan) = current {
                    if !text.trim().is_empty() {
                        match current_element.as_str() {
                            "href" => {
                                scan.href = text.trim().to_string();
                            }
                            "getlastmodified" => {
                                scan.last_modified = Some(text.trim().to_string());
                            }
                            "getcontentlength" => {
                                scan.content_length = Some(text.trim().to_string());
                            }
                            "status" if in_propstat => {
                                if text.contains("200") {
                                    scan.status_ok = true;
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = local_name_from_end(&e)?;

                match name.as_str() {
                    "response" => {
                        if let Some(scan) = current.take() {
                            if scan.status_ok && !scan.href.is_empty() {
                                records.push(DavRecord {
                                    href: scan.href,
                                    last_modified: scan.last_modified,
                                    resource_type: scan
                                        .is_collection
                                        .then(|| "collection".to_string()),
                                    content_length: scan.content_length,
                                });
                            }
                        }
                    }
                    "propstat" => {
                        in_propstat = false;
                    }
                    "resourcetype" => {
                        in_resourcetype = false;
                    }
                    _ => {}
                }

                current_element.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ClientError::protocol(format!("XML parsing error: {}", e))),
            _ => {}
        }

        buf.clear();
    }

    Ok(records)
}

fn local_name(e: &BytesStart) -> Result<String, ClientError> {
    let qname = e.name();
    let local = qname.local_name();
    str::from_utf8(local.as_ref())
        .map(|name| name.to_string())
        .map_err(|e| ClientError::protocol(format!("Invalid UTF-8 in element name: {}", e)))
}

fn local_name_from_end(e: &BytesEnd) -> Result<String, ClientError> {
    let qname = e.name();
    let local = qname.local_name();
    str::from_utf8(local.as_ref())
        .map(|name| name.to_string())
        .map_err(|e| ClientError::protocol(format!("Invalid UTF-8 in element name: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_file() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/remote.php/webdav/test.pdf</d:href>
                <d:propstat>
                    <d:prop>
                        <d:getcontentlength>1024</d:getcontentlength>
                        <d:getlastmodified>Mon, 01 Jan 2024 12:00:00 GMT</d:getlastmodified>
                        <d:resourcetype/>
                    </d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

        let records = parse_propfind_response(xml).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.href, "/remote.php/webdav/test.pdf");
        assert_eq!(record.content_length.as_deref(), Some("1024"));
        assert_eq!(
            record.last_modified.as_deref(),
            Some("Mon, 01 Jan 2024 12:00:00 GMT")
        );
        assert_eq!(record.resource_type, None);
    }

    #[test]
    fn test_parse_keeps_collections() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/remote.php/webdav/Documents/</d:href>
                <d:propstat>
                    <d:prop>
                        <d:resourcetype>
                            <d:collection/>
                        </d:resourcetype>
                    </d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
            <d:response>
                <d:href>/remote.php/webdav/Documents/file.txt</d:href>
                <d:propstat>
                    <d:prop>
                        <d:getcontentlength>256</d:getcontentlength>
                        <d:resourcetype/>
                    </d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

        let records = parse_propfind_response(xml).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].resource_type.as_deref(), Some("collection"));
        assert_eq!(records[0].content_length, None);
        assert_eq!(records[1].resource_type, None);
        assert_eq!(records[1].content_length.as_deref(), Some("256"));
    }

    #[test]
    fn test_parse_nextcloud_response() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns" xmlns:oc="http://owncloud.org/ns">
            <d:response>
                <d:href>/remote.php/webdav/Documents/report.pdf</d:href>
                <d:propstat>
                    <d:prop>
                        <d:getcontentlength>2048000</d:getcontentlength>
                        <d:getlastmodified>Mon, 15 Jan 2024 14:30:00 GMT</d:getlastmodified>
                        <d:getetag>"pdf123"</d:getetag>
                        <d:resourcetype/>
                    </d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

        let records = parse_propfind_response(xml).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].href, "/remote.php/webdav/Documents/report.pdf");
        assert_eq!(records[0].content_length.as_deref(), Some("2048000"));
    }

    #[test]
    fn test_parse_keeps_hrefs_percent_encoded() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/remote.php/webdav/File%20with%20spaces.pdf</d:href>
                <d:propstat>
                    <d:prop>
                        <d:getcontentlength>1024</d:getcontentlength>
                        <d:resourcetype/>
                    </d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

        let records = parse_propfind_response(xml).unwrap();
        assert_eq!(records[0].href, "/remote.php/webdav/File%20with%20spaces.pdf");
    }

    #[test]
    fn test_parse_skips_failed_propstat() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/remote.php/webdav/gone.txt</d:href>
                <d:propstat>
                    <d:prop>
                        <d:getcontentlength/>
                    </d:prop>
                    <d:status>HTTP/1.1 404 Not Found</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

        let records = parse_propfind_response(xml).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_empty_multistatus() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
        </d:multistatus>"#;

        let records = parse_propfind_response(xml).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_malformed_xml_is_a_protocol_error() {
        let result =
            parse_propfind_response("<d:multistatus><d:response></d:mismatch></d:multistatus>");
        assert!(matches!(result, Err(ClientError::Protocol { .. })));
    }
}
