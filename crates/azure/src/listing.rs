//! Listing response parsing.
//!
//! Both services answer list calls with an `EnumerationResults` document;
//! only entry names, entry kinds and the continuation marker are kept.

use filestore_core::storage::{RemoteEntry, ServiceError};
use serde::Deserialize;

/// One page of a listing.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ListingPage {
    pub entries: Vec<RemoteEntry>,
    pub next_marker: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShareEnumeration {
    #[serde(default)]
    entries: ShareEntries,
    #[serde(default)]
    next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ShareEntries {
    #[serde(rename = "$value", default)]
    items: Vec<ShareEntry>,
}

#[derive(Debug, Deserialize)]
enum ShareEntry {
    File(NamedEntry),
    Directory(NamedEntry),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlobEnumeration {
    #[serde(default)]
    blobs: BlobEntries,
    #[serde(default)]
    next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BlobEntries {
    #[serde(rename = "$value", default)]
    items: Vec<BlobEntry>,
}

#[derive(Debug, Deserialize)]
enum BlobEntry {
    Blob(NamedEntry),
    BlobPrefix(NamedEntry),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NamedEntry {
    name: String,
}

/// Parse a "List Directories and Files" response.
pub(crate) fn parse_share_listing(xml: &str) -> Result<ListingPage, ServiceError> {
    let parsed: ShareEnumeration = quick_xml::de::from_str(xml).map_err(invalid_listing)?;

    Ok(ListingPage {
        entries: parsed
            .entries
            .items
            .into_iter()
            .map(|item| match item {
                ShareEntry::File(entry) => RemoteEntry::file(entry.name),
                ShareEntry::Directory(entry) => RemoteEntry::directory(entry.name),
            })
            .collect(),
        next_marker: non_empty(parsed.next_marker),
    })
}

/// Parse a "List Blobs" response.
pub(crate) fn parse_blob_listing(xml: &str) -> Result<ListingPage, ServiceError> {
    let parsed: BlobEnumeration = quick_xml::de::from_str(xml).map_err(invalid_listing)?;

    Ok(ListingPage {
        entries: parsed
            .blobs
            .items
            .into_iter()
            .map(|item| match item {
                BlobEntry::Blob(entry) => RemoteEntry::file(entry.name),
                BlobEntry::BlobPrefix(entry) => RemoteEntry::directory(entry.name),
            })
            .collect(),
        next_marker: non_empty(parsed.next_marker),
    })
}

fn non_empty(marker: Option<String>) -> Option<String> {
    marker.filter(|m| !m.trim().is_empty())
}

#[allow(clippy::needless_pass_by_value)]
fn invalid_listing(err: quick_xml::DeError) -> ServiceError {
    ServiceError::transport(format!("invalid listing response: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHARE_LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ServiceEndpoint="https://acct.file.core.windows.net/" ShareName="docs" DirectoryPath="reports">
  <Marker />
  <MaxResults>5000</MaxResults>
  <DirectoryId>13835128424026341376</DirectoryId>
  <Entries>
    <File>
      <Name>q1.pdf</Name>
      <Properties>
        <Content-Length>1024</Content-Length>
      </Properties>
    </File>
    <Directory>
      <Name>archive</Name>
      <Properties />
    </Directory>
    <File>
      <Name>q2.pdf</Name>
      <Properties>
        <Content-Length>2048</Content-Length>
      </Properties>
    </File>
  </Entries>
  <NextMarker />
</EnumerationResults>"#;

    const BLOB_LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ServiceEndpoint="https://acct.blob.core.windows.net/" ContainerName="reports">
  <Prefix>2024/</Prefix>
  <Delimiter>/</Delimiter>
  <Blobs>
    <Blob>
      <Name>2024/a.pdf</Name>
      <Properties>
        <Content-Length>10</Content-Length>
        <Content-Type>application/pdf</Content-Type>
      </Properties>
    </Blob>
    <BlobPrefix>
      <Name>2024/q1/</Name>
    </BlobPrefix>
  </Blobs>
  <NextMarker>2!96!MDAwMDE1</NextMarker>
</EnumerationResults>"#;

    #[test]
    fn test_parse_share_listing() {
        let page = parse_share_listing(SHARE_LISTING).expect("parse");
        assert_eq!(
            page.entries,
            vec![
                RemoteEntry::file("q1.pdf"),
                RemoteEntry::directory("archive"),
                RemoteEntry::file("q2.pdf"),
            ]
        );
        assert_eq!(page.next_marker, None);
    }

    #[test]
    fn test_parse_empty_share_listing() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ShareName="docs" DirectoryPath="">
  <Entries />
  <NextMarker />
</EnumerationResults>"#;
        let page = parse_share_listing(xml).expect("parse");
        assert!(page.entries.is_empty());
        assert_eq!(page.next_marker, None);
    }

    #[test]
    fn test_parse_blob_listing() {
        let page = parse_blob_listing(BLOB_LISTING).expect("parse");
        assert_eq!(
            page.entries,
            vec![
                RemoteEntry::file("2024/a.pdf"),
                RemoteEntry::directory("2024/q1/"),
            ]
        );
        assert_eq!(page.next_marker.as_deref(), Some("2!96!MDAwMDE1"));
    }

    #[test]
    fn test_parse_invalid_listing() {
        let err = parse_blob_listing("<EnumerationResults><Blobs>").unwrap_err();
        assert_eq!(err.status, None);
        assert!(err.message.starts_with("invalid listing response"));
    }
}
