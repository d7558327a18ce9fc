//! Byte encoding of the asset collection
//!
//! The whole collection is stored as one JSON array. Dates are written as
//! `YYYY-MM-DD` and prices as plain JSON numbers, so a round trip is exact.

use thiserror::Error;
use uuid::Uuid;

use crate::models::Asset;

/// Errors converting the collection to or from bytes
#[derive(Error, Debug)]
pub enum CodecError {
    /// The collection could not be serialized
    #[error("Failed to encode assets: {0}")]
    Encode(#[source] serde_json::Error),

    /// JSON has no representation for NaN or infinite prices
    #[error("Failed to encode assets: asset {id} has a non-finite price")]
    NonFinitePrice { id: Uuid },

    /// The stored bytes are malformed or do not match the asset schema
    #[error("Failed to decode assets: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Serialize the collection, preserving order
///
/// Fails without producing bytes if any price is NaN or infinite, since it
/// would be written as `null` and make the whole blob undecodable.
pub fn encode(assets: &[Asset]) -> Result<Vec<u8>, CodecError> {
    if let Some(bad) = assets.iter().find(|a| !a.purchase_price.is_finite()) {
        return Err(CodecError::NonFinitePrice { id: bad.id });
    }
    serde_json::to_vec(assets).map_err(CodecError::Encode)
}

/// Deserialize a collection previously produced by [`encode`]
pub fn decode(bytes: &[u8]) -> Result<Vec<Asset>, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let assets = vec![
            Asset::new("Watch", date(2024, 12, 31), 250.0),
            Asset::new("Camera", date(2025, 4, 1), 19.9),
            Asset::new("", date(2000, 2, 29), 0.01),
            Asset::new("Bike", date(2025, 1, 15), 1234.5678),
        ];

        let decoded = decode(&encode(&assets).unwrap()).unwrap();
        assert_eq!(decoded, assets);
    }

    #[test]
    fn test_encode_empty() {
        let bytes = encode(&[]).unwrap();
        assert_eq!(bytes, b"[]");
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_encode_rejects_non_finite_price() {
        for price in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let bad = Asset::new("Bad", date(2025, 1, 1), price);
            let assets = vec![Asset::new("Good", date(2025, 1, 1), 10.0), bad.clone()];

            match encode(&assets) {
                Err(CodecError::NonFinitePrice { id }) => assert_eq!(id, bad.id),
                other => panic!("expected NonFinitePrice, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_decode_known_layout() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"[{{"id":"{}","name":"Camera","purchaseDate":"2025-04-01","purchasePrice":19.9}}]"#,
            id
        );

        let assets = decode(json.as_bytes()).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, id);
        assert_eq!(assets[0].purchase_date, date(2025, 4, 1));
        assert_eq!(assets[0].formatted_price(), "19.90");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode(b"not json at all").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_decode_schema_mismatch_fails() {
        let err = decode(br#"[{"title":"no such field"}]"#).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));

        let err = decode(br#"{"id":"x"}"#).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_decode_bad_date_fails() {
        let json = format!(
            r#"[{{"id":"{}","name":"x","purchaseDate":"2025-13-40","purchasePrice":1.0}}]"#,
            Uuid::new_v4()
        );
        assert!(decode(json.as_bytes()).is_err());
    }
}
