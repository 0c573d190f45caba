use super::{AssetError, TextureAsset, TextureCollection, TextureHandle};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "tga", "bmp", "webp", "tif", "tiff",
];

/// Texture source backed by an extracted archive directory.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode every image under the root. Entries that fail to list, read or
    /// decode are logged and left out; only an unreadable root is an error.
    pub fn load(&self) -> Result<TextureCollection, AssetError> {
        let mut paths = Vec::new();
        let walker = walkdir::WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) if source.depth() == 0 => {
                    return Err(AssetError::Walk {
                        path: self.root.display().to_string(),
                        source,
                    });
                }
                Err(err) => {
                    log::warn!("Skipping part of {}: {}", self.root.display(), err);
                    continue;
                }
            };
            if entry.file_type().is_file() && has_image_extension(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        let mut collection = TextureCollection::new();
        for path in paths {
            let key = self.key_for(&path);
            match load_texture(&path) {
                Ok((handle, hash)) => {
                    let filename = path
                        .file_name()
                        .and_then(|value| value.to_str())
                        .unwrap_or(&key)
                        .to_string();
                    collection.insert(TextureAsset::new(key, filename, handle).with_source_hash(hash));
                }
                Err(err) => log::warn!("Excluding texture {}: {}", key, err),
            }
        }

        log::info!(
            "Loaded {} textures from {}",
            collection.len(),
            self.root.display()
        );
        Ok(collection)
    }

    fn key_for(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn load_texture(path: &Path) -> Result<(TextureHandle, String), AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    Ok((TextureHandle::from_dynamic(image), hex_digest(&bytes)))
}

fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}
