//! Persistence encoding for the `imagens` column.
//!
//! The store keeps the filename list as JSON text; these helpers are the only
//! place that knows about that representation.

use crate::error::Result;

pub fn encode_images(imagens: &[String]) -> Result<String> {
    Ok(serde_json::to_string(imagens)?)
}

/// NULL and empty text both decode to an empty list.
pub fn decode_images(raw: Option<&str>) -> Result<Vec<String>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    #[test]
    fn missing_column_decodes_to_empty_list() {
        assert!(decode_images(None).unwrap().is_empty());
        assert!(decode_images(Some("")).unwrap().is_empty());
    }

    #[test]
    fn encodes_as_json_array() {
        let encoded =
            encode_images(&["a.png".to_string(), "b.jpg".to_string()]).unwrap();
        assert_eq!(encoded, r#"["a.png","b.jpg"]"#);
        assert_eq!(
            decode_images(Some(&encoded)).unwrap(),
            vec!["a.png", "b.jpg"]
        );
    }

    #[test]
    fn corrupt_text_is_a_serialization_error() {
        assert!(matches!(
            decode_images(Some("not json")),
            Err(CatalogError::Serialization(_))
        ));
    }
}
