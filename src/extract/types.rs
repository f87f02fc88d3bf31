//! Request/response types for the Document AI `:process` REST call.
//!
//! The wire format is dictated entirely by the external service; these
//! types mirror its camelCase JSON and carry no behavior of their own.

use serde::{Deserialize, Serialize};

/// Request body for the `:process` endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub raw_document: RawDocument,
}

/// Inline document content, base64-encoded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub content: String,
    pub mime_type: String,
}

/// Response from the `:process` endpoint.
#[derive(Debug, Deserialize)]
pub struct ProcessResponse {
    pub document: Document,
}

/// Processed document with its extracted entities.
#[derive(Debug, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// A labeled span of extracted information.
///
/// Entities may nest: a parent entity groups sub-properties of the same
/// shape, and for structured processors the properties are where the
/// useful values live. The service returns entities in an order of its
/// own choosing; downstream consumers must not reorder them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub mention_text: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub properties: Vec<Entity>,
}

impl Entity {
    /// Construct a flat entity with no nested properties.
    pub fn new(entity_type: impl Into<String>, mention_text: impl Into<String>, confidence: f32) -> Self {
        Self {
            entity_type: entity_type.into(),
            mention_text: mention_text.into(),
            confidence,
            properties: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_response() {
        let json = r#"{
          "document": {
            "text": "BUSINESS LICENSE ...",
            "entities": [
              {
                "type": "license",
                "mentionText": "BUSINESS LICENSE",
                "confidence": 0.97,
                "properties": [
                  { "type": "id", "mentionText": "LIC-2024-001", "confidence": 0.91 },
                  { "type": "person", "mentionText": "Jane Doe", "confidence": 0.88 }
                ]
              }
            ]
          }
        }"#;

        let response: ProcessResponse = serde_json::from_str(json).unwrap();
        let entities = response.document.entities;
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].entity_type, "license");
        assert_eq!(entities[0].properties.len(), 2);
        assert_eq!(entities[0].properties[0].mention_text, "LIC-2024-001");
        assert!((entities[0].properties[1].confidence - 0.88).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_entities_without_properties() {
        let json = r#"{ "document": { "entities": [
            { "type": "id", "mentionText": "LIC-1", "confidence": 0.9 }
        ] } }"#;

        let response: ProcessResponse = serde_json::from_str(json).unwrap();
        assert!(response.document.entities[0].properties.is_empty());
    }

    #[test]
    fn test_parse_empty_document() {
        let response: ProcessResponse = serde_json::from_str(r#"{ "document": {} }"#).unwrap();
        assert!(response.document.entities.is_empty());
    }

    #[test]
    fn test_serialize_process_request() {
        let request = ProcessRequest {
            raw_document: RawDocument {
                content: "aGVsbG8=".to_string(),
                mime_type: "image/png".to_string(),
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["rawDocument"]["content"], "aGVsbG8=");
        assert_eq!(value["rawDocument"]["mimeType"], "image/png");
    }
}
