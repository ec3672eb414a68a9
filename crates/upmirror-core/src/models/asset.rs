use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Metadata the host emits when an asset has been generated.
///
/// Wire shape: `{"file": "2024/05/photo.jpg", "sizes": {"thumbnail": {"file": "photo-150x150.jpg"}}}`.
/// `file` is relative to the uploads root; each size's `file` is a bare filename that
/// lives next to the primary file. Size order is the order the host supplied.
/// Any other top-level fields are carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetMetadata {
    #[serde(rename = "file", default, skip_serializing_if = "Option::is_none")]
    pub primary_relative_path: Option<String>,

    #[serde(rename = "sizes", default, with = "ordered_sizes")]
    pub variants: Vec<SizeVariant>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AssetMetadata {
    pub fn new(primary_relative_path: impl Into<String>) -> Self {
        Self {
            primary_relative_path: Some(primary_relative_path.into()),
            ..Default::default()
        }
    }

    /// Append a size variant, keeping insertion order.
    pub fn with_variant(mut self, name: impl Into<String>, relative_path: impl Into<String>) -> Self {
        self.variants.push(SizeVariant {
            name: name.into(),
            relative_path: relative_path.into(),
        });
        self
    }
}

/// A derived size of an asset (thumbnail, medium, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeVariant {
    pub name: String,
    pub relative_path: String,
}

#[derive(Serialize, Deserialize)]
struct SizeEntry {
    file: String,
}

/// `sizes` is an object keyed by size name. Deserializing into a `Vec` keeps document
/// order without an ordered-map dependency. An empty list or `null` means no sizes.
mod ordered_sizes {
    use super::*;

    pub fn serialize<S: Serializer>(variants: &[SizeVariant], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(variants.len()))?;
        for variant in variants {
            map.serialize_entry(
                &variant.name,
                &SizeEntry {
                    file: variant.relative_path.clone(),
                },
            )?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SizeVariant>, D::Error> {
        deserializer.deserialize_any(SizesVisitor)
    }

    struct SizesVisitor;

    impl<'de> Visitor<'de> for SizesVisitor {
        type Value = Vec<SizeVariant>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of size name to {\"file\": ...}")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut variants = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, entry)) = access.next_entry::<String, SizeEntry>()? {
                variants.push(SizeVariant {
                    name,
                    relative_path: entry.file,
                });
            }
            Ok(variants)
        }

        // Hosts serialize an empty size map as `[]`.
        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut variants = Vec::new();
            while let Some(entry) = access.next_element::<SizeEntry>()? {
                variants.push(SizeVariant {
                    name: variants.len().to_string(),
                    relative_path: entry.file,
                });
            }
            Ok(variants)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_host_payload_keeps_size_order() {
        let payload = json!({
            "width": 1200,
            "file": "2024/05/photo.jpg",
            "sizes": {
                "medium": {"file": "photo-300x200.jpg", "width": 300},
                "thumbnail": {"file": "photo-150x150.jpg"},
                "large": {"file": "photo-1024x683.jpg"}
            }
        });

        let metadata: AssetMetadata = serde_json::from_value(payload).unwrap();

        assert_eq!(metadata.primary_relative_path.as_deref(), Some("2024/05/photo.jpg"));
        let names: Vec<&str> = metadata.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["medium", "thumbnail", "large"]);
        assert_eq!(metadata.variants[1].relative_path, "photo-150x150.jpg");
        assert_eq!(metadata.extra["width"], json!(1200));
    }

    #[test]
    fn test_deserialize_without_file_or_sizes() {
        let metadata: AssetMetadata = serde_json::from_value(json!({"width": 10})).unwrap();
        assert!(metadata.primary_relative_path.is_none());
        assert!(metadata.variants.is_empty());
    }

    #[test]
    fn test_deserialize_empty_sizes_list_and_null() {
        let metadata: AssetMetadata =
            serde_json::from_value(json!({"file": "a.jpg", "sizes": []})).unwrap();
        assert!(metadata.variants.is_empty());

        let metadata: AssetMetadata =
            serde_json::from_value(json!({"file": "a.jpg", "sizes": null})).unwrap();
        assert!(metadata.variants.is_empty());
    }

    #[test]
    fn test_serialize_preserves_host_shape() {
        let metadata = AssetMetadata::new("2024/05/photo.jpg")
            .with_variant("thumbnail", "photo-150x150.jpg")
            .with_variant("medium", "photo-300x200.jpg");

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["file"], json!("2024/05/photo.jpg"));
        assert_eq!(value["sizes"]["thumbnail"]["file"], json!("photo-150x150.jpg"));
        assert_eq!(value["sizes"]["medium"]["file"], json!("photo-300x200.jpg"));
    }
}
