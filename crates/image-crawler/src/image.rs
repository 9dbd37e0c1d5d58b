//! Image payloads and the transforms applied to them.
//!
//! Images are opaque byte payloads. Transforms work on bytes and never
//! decode pixel data.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

use crate::{CrawlerError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    url: Url,
    bytes: Bytes,
    transform: Option<String>,
}

impl Image {
    pub fn new(url: Url, bytes: Bytes) -> Self {
        Self {
            url,
            bytes,
            transform: None,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Name of the transform that produced this image, if any.
    pub fn transform_name(&self) -> Option<&str> {
        self.transform.as_deref()
    }

    /// A new image with the same source URL, produced by `transform`.
    pub fn derive(&self, transform: &str, bytes: Bytes) -> Self {
        Self {
            url: self.url.clone(),
            bytes,
            transform: Some(transform.to_string()),
        }
    }
}

pub trait Transform: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Returns `None` when the image cannot be transformed.
    fn apply(&self, image: &Image) -> Option<Image>;
}

/// Passes the payload through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    fn name(&self) -> &str {
        "identity"
    }

    fn apply(&self, image: &Image) -> Option<Image> {
        Some(image.derive(self.name(), image.bytes().clone()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InvertTransform;

impl Transform for InvertTransform {
    fn name(&self) -> &str {
        "invert"
    }

    fn apply(&self, image: &Image) -> Option<Image> {
        if image.is_empty() {
            return None;
        }
        let inverted: Vec<u8> = image.bytes().iter().map(|b| !b).collect();
        Some(image.derive(self.name(), Bytes::from(inverted)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseTransform;

impl Transform for ReverseTransform {
    fn name(&self) -> &str {
        "reverse"
    }

    fn apply(&self, image: &Image) -> Option<Image> {
        if image.is_empty() {
            return None;
        }
        let reversed: Vec<u8> = image.bytes().iter().rev().copied().collect();
        Some(image.derive(self.name(), Bytes::from(reversed)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Identity,
    Invert,
    Reverse,
}

impl TransformKind {
    pub fn build(self) -> Arc<dyn Transform> {
        match self {
            TransformKind::Identity => Arc::new(IdentityTransform),
            TransformKind::Invert => Arc::new(InvertTransform),
            TransformKind::Reverse => Arc::new(ReverseTransform),
        }
    }

    /// Parses a comma separated list such as `identity,invert`.
    pub fn parse_list(s: &str) -> Result<Vec<Self>> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse::<TransformKind>)
            .collect()
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformKind::Identity => f.write_str("identity"),
            TransformKind::Invert => f.write_str("invert"),
            TransformKind::Reverse => f.write_str("reverse"),
        }
    }
}

impl FromStr for TransformKind {
    type Err = CrawlerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "null" => Ok(TransformKind::Identity),
            "invert" => Ok(TransformKind::Invert),
            "reverse" => Ok(TransformKind::Reverse),
            _ => Err(CrawlerError::UnknownTransform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(bytes: &'static [u8]) -> Image {
        Image::new(
            Url::parse("file:///site/img/a.png").unwrap(),
            Bytes::from_static(bytes),
        )
    }

    #[test]
    fn test_identity_shares_payload() {
        let original = image(b"\x89PNG");
        let copy = IdentityTransform.apply(&original).unwrap();

        assert_eq!(copy.bytes(), original.bytes());
        assert_eq!(copy.transform_name(), Some("identity"));
        assert_eq!(copy.url(), original.url());
    }

    #[test]
    fn test_invert_and_reverse() {
        let original = image(&[0x00, 0x0f, 0xff]);

        let inverted = InvertTransform.apply(&original).unwrap();
        assert_eq!(&inverted.bytes()[..], &[0xff, 0xf0, 0x00]);

        let reversed = ReverseTransform.apply(&original).unwrap();
        assert_eq!(&reversed.bytes()[..], &[0xff, 0x0f, 0x00]);
    }

    #[test]
    fn test_empty_image_only_passes_identity() {
        let empty = image(b"");

        assert!(IdentityTransform.apply(&empty).is_some());
        assert!(InvertTransform.apply(&empty).is_none());
        assert!(ReverseTransform.apply(&empty).is_none());
    }

    #[test]
    fn test_parse_transform_list() {
        let kinds = TransformKind::parse_list("identity, INVERT,,reverse").unwrap();
        assert_eq!(
            kinds,
            vec![
                TransformKind::Identity,
                TransformKind::Invert,
                TransformKind::Reverse
            ]
        );
        assert!(matches!(
            TransformKind::parse_list("identity,blur"),
            Err(CrawlerError::UnknownTransform(_))
        ));
        assert_eq!(TransformKind::Invert.build().name(), "invert");
    }
}
