use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::Deserialize;
use std::io::Cursor;

use crate::adapters::outbound::storage::error::StoreError;
use crate::domain::{
    models::{VersionRecord, VersionSequence, VersioningStatus},
    value_objects::{ObjectKey, VersionId},
};

pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Body of an S3 `<Error>` response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct S3ErrorBody {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "RequestId", default)]
    pub request_id: Option<String>,
}

/// Serialize a `VersioningConfiguration` document for PutBucketVersioning
pub fn versioning_configuration_xml(status: VersioningStatus) -> Result<String, StoreError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("VersioningConfiguration").with_attributes([("xmlns", S3_NAMESPACE)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("Status")))?;
    writer.write_event(Event::Text(BytesText::new(status.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new("Status")))?;
    writer.write_event(Event::End(BytesEnd::new("VersioningConfiguration")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes)
        .map_err(|e| StoreError::UnexpectedResponse(format!("Generated XML is not UTF-8: {}", e)))
}

/// Parse the S3 error document, if the body is one
pub fn parse_error_body(xml: &str) -> Option<S3ErrorBody> {
    if xml.trim().is_empty() {
        return None;
    }
    quick_xml::de::from_str(xml).ok()
}

#[derive(Default)]
struct PendingVersion {
    key: Option<String>,
    version_id: Option<String>,
    last_modified: Option<DateTime<Utc>>,
    is_latest: bool,
}

impl PendingVersion {
    fn finish(self) -> Result<VersionRecord, StoreError> {
        let key = self
            .key
            .ok_or_else(|| StoreError::UnexpectedResponse("Version without Key".to_string()))?;
        let version_id = self.version_id.ok_or_else(|| {
            StoreError::UnexpectedResponse(format!("Version of '{}' without VersionId", key))
        })?;

        Ok(VersionRecord {
            key: ObjectKey::new(key)
                .map_err(|e| StoreError::UnexpectedResponse(e.to_string()))?,
            version_id: VersionId::new(version_id)
                .map_err(|e| StoreError::UnexpectedResponse(e.to_string()))?,
            last_modified: self.last_modified,
            is_latest: self.is_latest,
        })
    }
}

/// Parse a `ListVersionsResult` document.
///
/// `Version` entries are kept in document order. `DeleteMarker` entries are
/// not versions of the object's content and are skipped.
pub fn parse_list_versions(xml: &str) -> Result<VersionSequence, StoreError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut sequence = VersionSequence::default();
    let mut current: Option<PendingVersion> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if name.as_slice() == b"Version" {
                    current = Some(PendingVersion::default());
                } else if let Some(version) = current.as_mut() {
                    match name.as_slice() {
                        b"Key" => version.key = Some(read_text(&mut reader)?),
                        b"VersionId" => version.version_id = Some(read_text(&mut reader)?),
                        b"IsLatest" => version.is_latest = read_text(&mut reader)? == "true",
                        b"LastModified" => {
                            version.last_modified =
                                Some(parse_timestamp(&read_text(&mut reader)?)?)
                        }
                        _ => {}
                    }
                } else if name.as_slice() == b"IsTruncated" {
                    sequence.is_truncated = read_text(&mut reader)? == "true";
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"Version" {
                    if let Some(version) = current.take() {
                        sequence.records.push(version.finish()?);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sequence)
}

// Collect the text content up to the closing tag of the current element
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, StoreError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::End(_) => return Ok(text),
            Event::Eof => {
                return Err(StoreError::UnexpectedResponse(
                    "Unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::UnexpectedResponse(format!("Invalid LastModified '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const LIST_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListVersionsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>your-s3-bucket-name</Name>
  <Prefix>path/to/your/file.jpg</Prefix>
  <KeyMarker></KeyMarker>
  <VersionIdMarker></VersionIdMarker>
  <MaxKeys>1000</MaxKeys>
  <IsTruncated>false</IsTruncated>
  <DeleteMarker>
    <Key>path/to/your/file.jpg</Key>
    <VersionId>dm1</VersionId>
    <IsLatest>true</IsLatest>
    <LastModified>2024-03-03T10:00:00.000Z</LastModified>
  </DeleteMarker>
  <Version>
    <Key>path/to/your/file.jpg</Key>
    <VersionId>v3</VersionId>
    <IsLatest>false</IsLatest>
    <LastModified>2024-03-02T10:00:00.000Z</LastModified>
    <ETag>"fba9dede5f27731c9771645a39863328"</ETag>
    <Size>434234</Size>
    <StorageClass>STANDARD</StorageClass>
  </Version>
  <Version>
    <Key>path/to/your/file.jpg</Key>
    <VersionId>v2</VersionId>
    <IsLatest>false</IsLatest>
    <LastModified>2024-03-01T10:00:00.000Z</LastModified>
    <ETag>"3b7d5d5e7a0a4c8f9e8d7c6b5a493827"</ETag>
    <Size>1024</Size>
    <StorageClass>STANDARD</StorageClass>
  </Version>
  <Version>
    <Key>path/to/your/file.jpg.bak</Key>
    <VersionId>b1</VersionId>
    <IsLatest>true</IsLatest>
    <LastModified>2024-02-01T10:00:00.000Z</LastModified>
    <Size>10</Size>
  </Version>
</ListVersionsResult>"#;

    #[test]
    fn test_versioning_configuration_body() {
        let xml = versioning_configuration_xml(VersioningStatus::Enabled).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><VersioningConfiguration xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\"><Status>Enabled</Status></VersioningConfiguration>"
        );
    }

    #[test]
    fn test_parse_list_versions_keeps_document_order() {
        let sequence = parse_list_versions(LIST_RESPONSE).unwrap();

        let ids: Vec<_> = sequence
            .records
            .iter()
            .map(|r| r.version_id.as_str())
            .collect();
        assert_eq!(ids, vec!["v3", "v2", "b1"]);
        assert!(!sequence.is_truncated);

        let first = &sequence.records[0];
        assert_eq!(first.key.as_str(), "path/to/your/file.jpg");
        assert!(!first.is_latest);
        assert_eq!(
            first.last_modified,
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap())
        );
        assert!(sequence.records[2].is_latest);
    }

    #[test]
    fn test_parse_empty_listing() {
        let xml = r#"<ListVersionsResult><Name>b</Name><Prefix>missing</Prefix><IsTruncated>true</IsTruncated></ListVersionsResult>"#;
        let sequence = parse_list_versions(xml).unwrap();
        assert!(sequence.is_empty());
        assert!(sequence.is_truncated);
    }

    #[test]
    fn test_parse_version_without_id_fails() {
        let xml = r#"<ListVersionsResult><Version><Key>a</Key></Version></ListVersionsResult>"#;
        assert!(matches!(
            parse_list_versions(xml),
            Err(StoreError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_parse_error_body() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
  <Code>NoSuchBucket</Code>
  <Message>The specified bucket does not exist</Message>
  <BucketName>your-s3-bucket-name</BucketName>
  <RequestId>4442587FB7D0A2F9</RequestId>
  <HostId>host-id</HostId>
</Error>"#;

        let body = parse_error_body(xml).unwrap();
        assert_eq!(body.code, "NoSuchBucket");
        assert_eq!(
            body.message.as_deref(),
            Some("The specified bucket does not exist")
        );
        assert_eq!(body.request_id.as_deref(), Some("4442587FB7D0A2F9"));
    }

    #[test]
    fn test_parse_error_body_rejects_non_errors() {
        assert!(parse_error_body("").is_none());
        assert!(parse_error_body("not xml at all").is_none());
    }
}
