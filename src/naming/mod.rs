//! Material name normalization and texture filename classification.

mod slot;

pub use slot::{MapSlot, TextureColorSpace};

use crate::config::ResolverConfig;
use std::collections::HashMap;

/// A texture filename split into the material it names and the slot it fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub material_prefix: String,
    pub map_type: MapSlot,
}

/// Canonicalizes material names and texture prefixes so that different
/// spellings of the same name compare equal.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    markers: Vec<String>,
}

impl NameNormalizer {
    pub fn new(markers: &[String]) -> Self {
        let mut markers: Vec<String> = markers
            .iter()
            .map(|marker| marker.to_lowercase())
            .filter(|marker| !marker.is_empty())
            .collect();
        // Longest first so "material" wins over "mat".
        markers.sort_by(|a, b| b.len().cmp(&a.len()));
        Self { markers }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut name: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| !is_separator(*c))
            .collect();

        // Repeat until no marker trails the name, keeping at least one character.
        'strip: loop {
            for marker in &self.markers {
                if name.len() > marker.len() && name.ends_with(marker.as_str()) {
                    name.truncate(name.len() - marker.len());
                    continue 'strip;
                }
            }
            break;
        }
        name
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(&ResolverConfig::default().marker_suffixes)
    }
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c.is_whitespace()
}

/// Normalize with the default marker suffixes.
pub fn normalize(raw: &str) -> String {
    NameNormalizer::default().normalize(raw)
}

/// Last path component, accepting both `/` and `\` separators.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Basename without its final extension. Dotfiles keep their name.
pub fn file_stem(path: &str) -> &str {
    let base = basename(path);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => &base[..dot],
    }
}

/// Splits texture filenames of the form `<prefix>_<suffix>[.ext]`.
#[derive(Debug, Clone)]
pub struct FilenameParser {
    normalizer: NameNormalizer,
    aliases: HashMap<String, MapSlot>,
}

impl FilenameParser {
    pub fn new(config: &ResolverConfig) -> Self {
        let mut aliases = HashMap::new();
        for group in &config.synonyms {
            for alias in &group.aliases {
                let key = canonical_suffix(alias);
                if key.is_empty() {
                    continue;
                }
                // Earlier groups own an alias if it is listed twice.
                aliases.entry(key).or_insert(group.slot);
            }
        }
        Self {
            normalizer: NameNormalizer::new(&config.marker_suffixes),
            aliases,
        }
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    /// Map a raw suffix segment to its slot, if it is a known synonym.
    pub fn classify_suffix(&self, suffix: &str) -> Option<MapSlot> {
        self.aliases.get(&canonical_suffix(suffix)).copied()
    }

    pub fn parse(&self, filename: &str) -> Option<ParsedFilename> {
        let stem = file_stem(filename);
        // Material names may contain underscores; only the last one separates the suffix.
        let (prefix, suffix) = stem.rsplit_once('_')?;
        let map_type = self.classify_suffix(suffix)?;
        let material_prefix = self.normalizer.normalize(prefix);
        if material_prefix.is_empty() {
            return None;
        }
        Some(ParsedFilename {
            material_prefix,
            map_type,
        })
    }
}

impl Default for FilenameParser {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

fn canonical_suffix(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
