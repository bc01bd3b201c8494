//! Conversion between uploaded files and their durable text form.
//!
//! The durable form is a data URL, `data:<mime-type>;base64,<payload>`,
//! so a stored record carries its full content and needs nothing else to
//! be reconstructed.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use uuid::Uuid;

use crate::{
    domain::models::file::{FileData, Locator, MapFile, StoredFile},
    services::{blob_registry::BlobRegistry, error::CodecError},
};

const DATA_URL_PREFIX: &str = "data:";
const BASE64_SEPARATOR: &str = ";base64,";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let declared = if mime_type.is_empty() {
        FALLBACK_MIME_TYPE
    } else {
        mime_type
    };
    format!(
        "{}{}{}{}",
        DATA_URL_PREFIX,
        declared,
        BASE64_SEPARATOR,
        STANDARD.encode(bytes)
    )
}

/// Splits a data URL into its declared MIME type and decoded bytes.
pub fn parse_data_url(data_url: &str) -> Result<(String, Vec<u8>), CodecError> {
    let rest = data_url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| CodecError::Malformed("missing 'data:' prefix".to_string()))?;
    let (mime_type, payload) = rest
        .split_once(BASE64_SEPARATOR)
        .ok_or_else(|| CodecError::Malformed("missing ';base64,' separator".to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| CodecError::Malformed(format!("invalid base64 payload: {}", e)))?;
    Ok((mime_type.to_string(), bytes))
}

/// Reads the whole file and produces its durable record.
pub async fn encode(file: &FileData) -> Result<StoredFile, CodecError> {
    let bytes = file.read().await.map_err(|source| CodecError::Read {
        name: file.filename.clone(),
        source,
    })?;

    Ok(StoredFile {
        id: format!("file_{}", Uuid::new_v4()),
        name: file.filename.clone(),
        mime_type: file.mime_type.clone(),
        size: bytes.len() as u64,
        data: to_data_url(&file.mime_type, &bytes),
    })
}

/// Rebuilds the working form of a stored record.
///
/// Embedded content is registered in `blobs` under the record id. Records
/// whose `data` is a remote URL or the placeholder sentinel keep that
/// locator and carry no binary handle.
pub fn decode(stored: &StoredFile, blobs: &BlobRegistry) -> Result<MapFile, CodecError> {
    if !stored.data.starts_with(DATA_URL_PREFIX) {
        let locator = match Locator::parse(&stored.data) {
            Some(Locator::Blob(_)) | None => {
                return Err(CodecError::Malformed(format!(
                    "file '{}' has no embedded content",
                    stored.name
                )))
            }
            Some(locator) => locator,
        };
        return Ok(MapFile {
            id: stored.id.clone(),
            name: stored.name.clone(),
            mime_type: stored.mime_type.clone(),
            size: stored.size,
            locator,
            file: None,
        });
    }

    let (_, bytes) = parse_data_url(&stored.data)?;
    let file = FileData::new(bytes, stored.name.clone(), stored.mime_type.clone());
    let locator = blobs.register(&stored.id, file.clone());

    Ok(MapFile {
        id: stored.id.clone(),
        name: stored.name.clone(),
        mime_type: stored.mime_type.clone(),
        size: stored.size,
        locator,
        file: Some(file),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_preserves_bytes_name_and_type() {
        let blobs = BlobRegistry::new();
        let content: Vec<u8> = (0..=255u8).collect();
        let original = FileData::new(
            content.clone(),
            "Lusaka_Districts.shp".to_string(),
            "application/x-esri-shape".to_string(),
        );

        let stored = encode(&original).await.unwrap();
        assert_eq!(stored.size, 256);
        assert!(stored
            .data
            .starts_with("data:application/x-esri-shape;base64,"));

        let working = decode(&stored, &blobs).unwrap();
        let handle = working.file.expect("decoded file keeps a handle");
        assert_eq!(handle.filename, "Lusaka_Districts.shp");
        assert_eq!(handle.mime_type, "application/x-esri-shape");
        assert_eq!(&*handle.read().await.unwrap(), content.as_slice());
        assert_eq!(working.locator, Locator::Blob(stored.id.clone()));
        assert!(blobs.resolve(&stored.id).is_some());
    }

    #[tokio::test]
    async fn empty_file_and_empty_type_round_trip() {
        let blobs = BlobRegistry::new();
        let original = FileData::new(Vec::new(), "empty.dbf".to_string(), String::new());

        let stored = encode(&original).await.unwrap();
        assert_eq!(stored.data, "data:application/octet-stream;base64,");
        assert_eq!(stored.mime_type, "");

        let working = decode(&stored, &blobs).unwrap();
        assert_eq!(working.mime_type, "");
        assert_eq!(working.size, 0);
        assert!(working.file.unwrap().read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn encode_propagates_read_failure() {
        let missing = FileData::from_path(
            "/no/such/dir/roads.geojson",
            "roads.geojson".to_string(),
            "application/geo+json".to_string(),
        );
        let err = encode(&missing).await.unwrap_err();
        assert!(matches!(err, CodecError::Read { ref name, .. } if name == "roads.geojson"));
    }

    #[test]
    fn parse_rejects_missing_separator() {
        let err = parse_data_url("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn parse_rejects_invalid_alphabet() {
        let err = parse_data_url("data:text/plain;base64,@@not base64@@").unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn decode_keeps_remote_and_placeholder_locators() {
        let blobs = BlobRegistry::new();
        let mut stored = StoredFile {
            id: "img_1".to_string(),
            name: "lusaka_map.png".to_string(),
            mime_type: "image/png".to_string(),
            size: 1_200_000,
            data: "https://picsum.photos/seed/lusaka/800/600".to_string(),
        };
        let remote = decode(&stored, &blobs).unwrap();
        assert!(matches!(remote.locator, Locator::Remote(_)));
        assert!(remote.file.is_none());

        stored.data = "#".to_string();
        let placeholder = decode(&stored, &blobs).unwrap();
        assert_eq!(placeholder.locator, Locator::Placeholder);
        assert_eq!(placeholder.size, 1_200_000);
        assert!(blobs.is_empty());
    }

    #[test]
    fn decode_rejects_unknown_data() {
        let blobs = BlobRegistry::new();
        let stored = StoredFile {
            id: "file_1".to_string(),
            name: "a.txt".to_string(),
            mime_type: "text/plain".to_string(),
            size: 1,
            data: "garbage".to_string(),
        };
        assert!(matches!(
            decode(&stored, &blobs),
            Err(CodecError::Malformed(_))
        ));
    }
}
