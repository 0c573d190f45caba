//! Texture-to-material resolution.
//!
//! Every material is resolved slot by slot through four tiers of decreasing
//! confidence: the filename index, the path the model already referenced,
//! a strict prefix scan for base colour, and finally fuzzy name similarity.
//! The first tier to produce a texture for a slot wins that slot.

mod report;

pub use report::ResolutionReport;

use crate::assets::{MaterialTextureIndex, TextureAsset, TextureCollection};
use crate::config::ResolverConfig;
use crate::matching::{match_path, similarity, PathMatchKind};
use crate::naming::{FilenameParser, MapSlot};
use crate::scene::{MaterialId, SceneTarget, TextureBinding, UvChannel, NEUTRAL_TINT};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Resolution tier, ordered from most to least confident.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Index,
    ReferencedPath,
    StrictPrefix,
    Fuzzy,
    None,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchTier::Index => "index",
            MatchTier::ReferencedPath => "referenced-path",
            MatchTier::StrictPrefix => "strict-prefix",
            MatchTier::Fuzzy => "fuzzy",
            MatchTier::None => "none",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AppliedTexture {
    pub key: String,
    pub filename: String,
    pub tier: MatchTier,
    /// Similarity that won the fuzzy tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Rule that matched the referenced path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_match: Option<PathMatchKind>,
}

/// What one resolution run did to one material.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolutionOutcome {
    pub material_name: String,
    pub applied_slots: BTreeMap<MapSlot, AppliedTexture>,
    /// Most confident tier that filled any slot.
    pub matched_by: MatchTier,
}

impl ResolutionOutcome {
    fn unmatched(material_name: String) -> Self {
        Self {
            material_name,
            applied_slots: BTreeMap::new(),
            matched_by: MatchTier::None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pick<'a> {
    asset: &'a TextureAsset,
    tier: MatchTier,
    score: Option<f64>,
    path_match: Option<PathMatchKind>,
}

pub struct Resolver {
    config: ResolverConfig,
    parser: FilenameParser,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        let parser = FilenameParser::new(&config);
        Self { config, parser }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn parser(&self) -> &FilenameParser {
        &self.parser
    }

    /// Whether a fuzzy candidate with `score` may fill `slot`.
    pub fn accepts(&self, slot: MapSlot, score: f64) -> bool {
        score >= self.config.threshold_for(slot)
    }

    /// Resolve textures for every material of every mesh in `scene`.
    ///
    /// Runs to completion; a material shared by several meshes is matched
    /// once and the result applied to each mesh that uses it.
    pub fn resolve<S>(&self, scene: &mut S, assets: &TextureCollection) -> ResolutionReport
    where
        S: SceneTarget + ?Sized,
    {
        let index = MaterialTextureIndex::build(assets, &self.parser);
        let mut resolved: HashMap<MaterialId, Vec<(MapSlot, &TextureAsset)>> = HashMap::new();
        let mut outcomes = Vec::new();

        for mesh in 0..scene.mesh_count() {
            for material in scene.mesh_materials(mesh) {
                let picks = match resolved.get(&material) {
                    Some(picks) => picks.clone(),
                    None => {
                        let (outcome, picks) =
                            self.resolve_material(&*scene, material, &index, assets);
                        outcomes.push(outcome);
                        resolved.insert(material, picks.clone());
                        picks
                    }
                };
                for (slot, asset) in picks {
                    apply_texture(scene, mesh, material, slot, asset);
                }
            }
        }

        let report = ResolutionReport::new(
            outcomes,
            assets.len(),
            index
                .unparsed()
                .iter()
                .map(|asset| asset.key.clone())
                .collect(),
        );
        log::info!(
            "Resolved {} materials against {} textures: {} slots filled, {} materials untextured",
            report.outcomes.len(),
            assets.len(),
            report.filled_slot_count(),
            report.unmatched_materials().count()
        );
        report
    }

    fn resolve_material<'a, S>(
        &self,
        scene: &S,
        material: MaterialId,
        index: &MaterialTextureIndex<'a>,
        assets: &'a TextureCollection,
    ) -> (ResolutionOutcome, Vec<(MapSlot, &'a TextureAsset)>)
    where
        S: SceneTarget + ?Sized,
    {
        let name = scene.material_name(material).to_string();
        let normalized = self.parser.normalizer().normalize(&name);
        if normalized.is_empty() {
            log::debug!("Material {:?} has no usable name, skipping", name);
            return (ResolutionOutcome::unmatched(name), Vec::new());
        }

        let open: Vec<MapSlot> = MapSlot::ALL
            .into_iter()
            .filter(|slot| scene.slot_binding(material, *slot).is_none())
            .collect();
        let mut picks: BTreeMap<MapSlot, Pick<'a>> = BTreeMap::new();
        let tiers = self.config.tiers;

        if tiers.index {
            for (slot, asset) in index.slots_for(&normalized) {
                if open.contains(&slot) {
                    picks.insert(
                        slot,
                        Pick {
                            asset,
                            tier: MatchTier::Index,
                            score: None,
                            path_match: None,
                        },
                    );
                }
            }
        }

        if tiers.referenced_path {
            for slot in &open {
                if picks.contains_key(slot) {
                    continue;
                }
                let Some(reference) = scene.texture_reference(material, *slot) else {
                    continue;
                };
                match match_path(reference, assets) {
                    Some((asset, kind)) => {
                        picks.insert(
                            *slot,
                            Pick {
                                asset,
                                tier: MatchTier::ReferencedPath,
                                score: None,
                                path_match: Some(kind),
                            },
                        );
                    }
                    None => log::debug!("{} {} reference {:?} not found", name, slot, reference),
                }
            }
        }

        if tiers.strict_prefix
            && open.contains(&MapSlot::BaseColor)
            && !picks.contains_key(&MapSlot::BaseColor)
        {
            if let Some(asset) = self.strict_prefix_match(&normalized, index) {
                picks.insert(
                    MapSlot::BaseColor,
                    Pick {
                        asset,
                        tier: MatchTier::StrictPrefix,
                        score: None,
                        path_match: None,
                    },
                );
            }
        }

        if tiers.fuzzy {
            for slot in &open {
                if picks.contains_key(slot) {
                    continue;
                }
                if let Some((asset, score)) = self.fuzzy_match(&normalized, *slot, index) {
                    picks.insert(
                        *slot,
                        Pick {
                            asset,
                            tier: MatchTier::Fuzzy,
                            score: Some(score),
                            path_match: None,
                        },
                    );
                }
            }
        }

        let mut outcome = ResolutionOutcome::unmatched(name);
        for (slot, pick) in &picks {
            log::debug!(
                "{} {} <- {} ({})",
                outcome.material_name,
                slot,
                pick.asset.key,
                pick.tier
            );
            outcome.matched_by = outcome.matched_by.min(pick.tier);
            outcome.applied_slots.insert(
                *slot,
                AppliedTexture {
                    key: pick.asset.key.clone(),
                    filename: pick.asset.filename.clone(),
                    tier: pick.tier,
                    score: pick.score,
                    path_match: pick.path_match,
                },
            );
        }

        let applied = picks
            .into_iter()
            .map(|(slot, pick)| (slot, pick.asset))
            .collect();
        (outcome, applied)
    }

    /// Base colour textures whose prefix is the material name, or the name
    /// with extra text on either end (e.g. a colour word prepended).
    fn strict_prefix_match<'a>(
        &self,
        normalized: &str,
        index: &MaterialTextureIndex<'a>,
    ) -> Option<&'a TextureAsset> {
        let mut extension: Option<(usize, &'a TextureAsset)> = None;
        let extensions_allowed = normalized.chars().count() >= self.config.strict_prefix_min_len;

        for (prefix, asset) in index.candidates(MapSlot::BaseColor) {
            if prefix == normalized {
                return Some(asset);
            }
            if !extensions_allowed {
                continue;
            }
            if prefix.ends_with(normalized) || prefix.starts_with(normalized) {
                // Prefer the candidate that adds the least text.
                let extra = prefix.len() - normalized.len();
                if extension.map_or(true, |(best, _)| extra < best) {
                    extension = Some((extra, asset));
                }
            }
        }
        extension.map(|(_, asset)| asset)
    }

    fn fuzzy_match<'a>(
        &self,
        normalized: &str,
        slot: MapSlot,
        index: &MaterialTextureIndex<'a>,
    ) -> Option<(&'a TextureAsset, f64)> {
        let mut best: Option<(&'a TextureAsset, f64)> = None;
        for (prefix, asset) in index.candidates(slot) {
            let score = similarity(normalized, prefix);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((asset, score));
            }
        }
        best.filter(|(_, score)| self.accepts(slot, *score))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

/// Resolve with the default tables.
pub fn resolve<S>(scene: &mut S, assets: &TextureCollection) -> ResolutionReport
where
    S: SceneTarget + ?Sized,
{
    Resolver::default().resolve(scene, assets)
}

fn apply_texture<S>(
    scene: &mut S,
    mesh: usize,
    material: MaterialId,
    slot: MapSlot,
    asset: &TextureAsset,
) where
    S: SceneTarget + ?Sized,
{
    scene.set_slot(
        material,
        slot,
        TextureBinding {
            key: asset.key.clone(),
            filename: asset.filename.clone(),
            color_space: slot.color_space(),
            source_hash: asset.source_hash.clone(),
        },
    );

    match slot {
        MapSlot::BaseColor => {
            // Tint and vertex colours multiply the texture.
            scene.set_tint(material, NEUTRAL_TINT);
            if !scene.mesh_has_vertex_colors(mesh) {
                scene.set_vertex_colors(material, false);
            }
        }
        MapSlot::AmbientOcclusion => {
            if scene.mesh_has_uv(mesh, UvChannel::Primary)
                && !scene.mesh_has_uv(mesh, UvChannel::Secondary)
            {
                log::debug!("Copying UV0 to UV1 on {} for occlusion", scene.mesh_name(mesh));
                scene.copy_primary_uv_to_secondary(mesh);
            }
        }
        _ => {}
    }
}
