use bytes::Bytes;
use uuid::Uuid;

const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

/// Raw upload as received from the caller, before any decoding.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub id: Uuid,
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            bytes: bytes.into(),
            content_type,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    /// True when the declared content type starts with `image/`.
    pub fn declares_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.starts_with(IMAGE_CONTENT_TYPE_PREFIX))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declares_image() {
        let upload = ImageUpload::new(vec![1, 2, 3], Some("image/png".to_string()));
        assert!(upload.declares_image());
        assert_eq!(upload.len(), 3);

        let upload = ImageUpload::new(vec![], Some("text/plain".to_string()));
        assert!(!upload.declares_image());
        assert!(upload.is_empty());

        let upload = ImageUpload::new(vec![], None);
        assert!(!upload.declares_image());
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        let upload = ImageUpload::new(vec![], Some("IMAGE/PNG".to_string()));
        assert!(!upload.declares_image());
    }
}
