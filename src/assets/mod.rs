mod index;
mod source;

pub use index::MaterialTextureIndex;
pub use source::{DirectorySource, IMAGE_EXTENSIONS};

use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read texture at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to walk texture directory {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },
}

/// Shared, read-only decoded image. Cloning only bumps a reference count.
#[derive(Debug, Clone)]
pub struct TextureHandle {
    image: Arc<image::RgbaImage>,
}

impl TextureHandle {
    pub fn new(image: image::RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn from_dynamic(image: image::DynamicImage) -> Self {
        Self::new(image.into_rgba8())
    }

    /// Solid single-colour texture, used by hosts that only need a stand-in.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(image::RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// False for handles whose pixel data never arrived.
    pub fn is_materialized(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    pub fn image(&self) -> &image::RgbaImage {
        &self.image
    }

    pub fn ptr_eq(&self, other: &TextureHandle) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

/// One texture from the asset source.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub key: String,
    pub filename: String,
    pub handle: TextureHandle,
    /// Hex SHA-256 of the source bytes when the source knows them.
    pub source_hash: Option<String>,
}

impl TextureAsset {
    pub fn new(key: impl Into<String>, filename: impl Into<String>, handle: TextureHandle) -> Self {
        Self {
            key: key.into(),
            filename: filename.into(),
            handle,
            source_hash: None,
        }
    }

    pub fn with_source_hash(mut self, hash: impl Into<String>) -> Self {
        self.source_hash = Some(hash.into());
        self
    }
}

/// Insertion-ordered texture set with unique keys, built once per load.
#[derive(Debug, Clone, Default)]
pub struct TextureCollection {
    assets: Vec<TextureAsset>,
    by_key: HashMap<String, usize>,
}

impl TextureCollection {
    pub fn new() -> Self {
        Self {
            assets: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Build from decode results, dropping entries whose image failed to load.
    pub fn from_decoded<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String, Result<TextureHandle, AssetError>)>,
    {
        let mut collection = Self::new();
        for (key, filename, handle) in entries {
            match handle {
                Ok(handle) => {
                    collection.insert(TextureAsset::new(key, filename, handle));
                }
                Err(err) => log::warn!("Excluding texture {}: {}", key, err),
            }
        }
        collection
    }

    /// Adds an asset. Returns false and keeps the existing one if the key is taken.
    pub fn insert(&mut self, asset: TextureAsset) -> bool {
        if self.by_key.contains_key(&asset.key) {
            log::warn!("Duplicate texture key {}, keeping the first", asset.key);
            return false;
        }
        self.by_key.insert(asset.key.clone(), self.assets.len());
        self.assets.push(asset);
        true
    }

    pub fn get(&self, key: &str) -> Option<&TextureAsset> {
        self.by_key.get(key).map(|index| &self.assets[*index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextureAsset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<TextureAsset> for TextureCollection {
    fn from_iter<T: IntoIterator<Item = TextureAsset>>(iter: T) -> Self {
        let mut collection = Self::new();
        for asset in iter {
            collection.insert(asset);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a TextureCollection {
    type Item = &'a TextureAsset;
    type IntoIter = std::slice::Iter<'a, TextureAsset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> TextureHandle {
        TextureHandle::solid(2, 2, [255, 255, 255, 255])
    }

    #[test]
    fn duplicate_keys_keep_the_first_asset() {
        let first = handle();
        let mut collection = TextureCollection::new();
        assert!(collection.insert(TextureAsset::new("a.png", "a.png", first.clone())));
        assert!(!collection.insert(TextureAsset::new("a.png", "a.png", handle())));
        assert_eq!(collection.len(), 1);
        assert!(collection.get("a.png").unwrap().handle.ptr_eq(&first));
    }

    #[test]
    fn decode_failures_are_excluded() {
        let failure = AssetError::Read {
            path: "broken.png".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let collection = TextureCollection::from_decoded(vec![
            ("ok.png".to_string(), "ok.png".to_string(), Ok(handle())),
            ("broken.png".to_string(), "broken.png".to_string(), Err(failure)),
        ]);
        assert_eq!(collection.len(), 1);
        assert!(collection.get("broken.png").is_none());
        assert!(collection.get("ok.png").is_some());
    }

    #[test]
    fn empty_image_is_not_materialized() {
        assert!(handle().is_materialized());
        assert!(!TextureHandle::new(image::RgbaImage::new(0, 0)).is_materialized());
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let collection: TextureCollection = ["c", "a", "b"]
            .into_iter()
            .map(|key| TextureAsset::new(key, key, handle()))
            .collect();
        let keys: Vec<&str> = collection.iter().map(|asset| asset.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }
}
