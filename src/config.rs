//! Tunable tables for texture classification and matching.
//!
//! Everything here is plain data so new asset naming conventions can be
//! supported by editing a JSON file instead of the matching code.

use crate::naming::MapSlot;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("threshold for {slot} must be within 0..=1, got {value}")]
    Threshold { slot: MapSlot, value: f64 },
}

/// Aliases that all name the same map slot in a texture filename suffix.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SynonymGroup {
    pub slot: MapSlot,
    pub aliases: Vec<String>,
}

/// Switches for individual resolution tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TierSwitches {
    pub index: bool,
    pub referenced_path: bool,
    pub strict_prefix: bool,
    pub fuzzy: bool,
}

impl Default for TierSwitches {
    fn default() -> Self {
        Self {
            index: true,
            referenced_path: true,
            strict_prefix: true,
            fuzzy: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub synonyms: Vec<SynonymGroup>,
    /// Trailing tokens the normalizer strips from material names.
    pub marker_suffixes: Vec<String>,
    /// Fuzzy acceptance bar for colour-bearing slots.
    pub color_threshold: f64,
    /// Fuzzy acceptance bar for every other slot.
    pub default_threshold: f64,
    pub threshold_overrides: BTreeMap<MapSlot, f64>,
    /// Shortest material name allowed to match by prefix/suffix extension.
    pub strict_prefix_min_len: usize,
    pub tiers: TierSwitches,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            synonyms: default_synonyms(),
            marker_suffixes: ["material", "mtl", "mat"]
                .into_iter()
                .map(String::from)
                .collect(),
            color_threshold: 0.58,
            default_threshold: 0.72,
            threshold_overrides: BTreeMap::new(),
            strict_prefix_min_len: 3,
            tiers: TierSwitches::default(),
        }
    }
}

impl ResolverConfig {
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: ResolverConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Json {
                path: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json, &path.display().to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for slot in MapSlot::ALL {
            let value = self.threshold_for(slot);
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Threshold { slot, value });
            }
        }
        Ok(())
    }

    /// Minimum similarity a fuzzy candidate needs to be accepted for `slot`.
    pub fn threshold_for(&self, slot: MapSlot) -> f64 {
        if let Some(value) = self.threshold_overrides.get(&slot) {
            return *value;
        }
        if slot.is_color() {
            self.color_threshold
        } else {
            self.default_threshold
        }
    }
}

fn default_synonyms() -> Vec<SynonymGroup> {
    let table: [(MapSlot, &[&str]); 9] = [
        (
            MapSlot::BaseColor,
            &["basecolor", "diffuse", "albedo", "color", "base"],
        ),
        (MapSlot::Normal, &["normal", "norm", "nrm"]),
        (MapSlot::Roughness, &["roughness", "rough"]),
        (MapSlot::Metalness, &["metallic", "metalness", "metal"]),
        (
            MapSlot::AmbientOcclusion,
            &["ao", "ambientocclusion", "occlusion"],
        ),
        (MapSlot::Emissive, &["emissive", "emission", "emit"]),
        (MapSlot::Alpha, &["alpha", "transparency", "opacity"]),
        (MapSlot::Bump, &["bump", "height"]),
        (MapSlot::Displacement, &["displacement", "disp"]),
    ];
    table
        .into_iter()
        .map(|(slot, aliases)| SynonymGroup {
            slot,
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_split_color_and_data_slots() {
        let config = ResolverConfig::default();
        assert_eq!(config.threshold_for(MapSlot::BaseColor), 0.58);
        assert_eq!(config.threshold_for(MapSlot::Emissive), 0.58);
        assert_eq!(config.threshold_for(MapSlot::Normal), 0.72);
        assert_eq!(config.threshold_for(MapSlot::Displacement), 0.72);
    }

    #[test]
    fn every_slot_has_a_synonym_group() {
        let config = ResolverConfig::default();
        for slot in MapSlot::ALL {
            assert!(config.synonyms.iter().any(|group| group.slot == slot));
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "default_threshold": 0.8, "threshold_overrides": { "Normal": 0.9 } }"#;
        let config = ResolverConfig::from_json_str(json, "inline").unwrap();
        assert_eq!(config.default_threshold, 0.8);
        assert_eq!(config.color_threshold, 0.58);
        assert_eq!(config.threshold_for(MapSlot::Normal), 0.9);
        assert_eq!(config.threshold_for(MapSlot::Roughness), 0.8);
        assert_eq!(config.synonyms.len(), 9);
        assert!(config.tiers.fuzzy);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let json = r#"{ "color_threshold": 1.5 }"#;
        let err = ResolverConfig::from_json_str(json, "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Threshold { .. }));
    }

    #[test]
    fn config_file_roundtrip() {
        let mut config = ResolverConfig::default();
        config.tiers.fuzzy = false;
        config.strict_prefix_min_len = 5;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolver.json");
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = ResolverConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_config_file_reports_path() {
        let err = ResolverConfig::from_json_file(Path::new("/nonexistent/resolver.json"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/resolver.json"));
    }
}
