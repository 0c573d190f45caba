use super::{TextureAsset, TextureCollection};
use crate::naming::{FilenameParser, MapSlot, ParsedFilename};
use std::collections::{BTreeMap, HashMap};

/// `material prefix -> slot -> texture`, built once per texture load.
///
/// The first texture seen for a `(prefix, slot)` pair owns it; later
/// duplicates are ignored so results do not depend on anything but the
/// collection order.
#[derive(Debug)]
pub struct MaterialTextureIndex<'a> {
    parsed: Vec<(ParsedFilename, &'a TextureAsset)>,
    by_prefix: HashMap<String, BTreeMap<MapSlot, usize>>,
    unparsed: Vec<&'a TextureAsset>,
}

impl<'a> MaterialTextureIndex<'a> {
    pub fn build(assets: &'a TextureCollection, parser: &FilenameParser) -> Self {
        let mut index = Self {
            parsed: Vec::new(),
            by_prefix: HashMap::new(),
            unparsed: Vec::new(),
        };

        for asset in assets {
            if !asset.handle.is_materialized() {
                log::warn!("Skipping texture {} with no image data", asset.key);
                continue;
            }
            let Some(parsed) = parser.parse(&asset.filename) else {
                log::debug!("Texture {} does not follow <prefix>_<suffix>", asset.filename);
                index.unparsed.push(asset);
                continue;
            };

            let position = index.parsed.len();
            let slots = index
                .by_prefix
                .entry(parsed.material_prefix.clone())
                .or_default();
            if let Some(existing) = slots.get(&parsed.map_type) {
                log::debug!(
                    "{} {} already provided by {}, ignoring {}",
                    parsed.material_prefix,
                    parsed.map_type,
                    index.parsed[*existing].1.key,
                    asset.key
                );
            } else {
                slots.insert(parsed.map_type, position);
            }
            index.parsed.push((parsed, asset));
        }

        index
    }

    /// Every slot indexed under `prefix`, in slot order.
    pub fn slots_for(&self, prefix: &str) -> Vec<(MapSlot, &'a TextureAsset)> {
        self.by_prefix
            .get(prefix)
            .map(|slots| {
                slots
                    .iter()
                    .map(|(slot, position)| (*slot, self.parsed[*position].1))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, prefix: &str, slot: MapSlot) -> Option<&'a TextureAsset> {
        let position = self.by_prefix.get(prefix)?.get(&slot)?;
        Some(self.parsed[*position].1)
    }

    /// `(prefix, texture)` for every parsed texture of `slot`, duplicates
    /// included, in collection order.
    pub fn candidates(
        &self,
        slot: MapSlot,
    ) -> impl Iterator<Item = (&str, &'a TextureAsset)> + '_ {
        self.parsed
            .iter()
            .filter(move |(parsed, _)| parsed.map_type == slot)
            .map(|(parsed, asset)| (parsed.material_prefix.as_str(), *asset))
    }

    pub fn prefix_count(&self) -> usize {
        self.by_prefix.len()
    }

    /// Textures whose filename could not be classified.
    pub fn unparsed(&self) -> &[&'a TextureAsset] {
        &self.unparsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureHandle;

    fn asset(name: &str) -> TextureAsset {
        TextureAsset::new(
            format!("textures/{name}"),
            name,
            TextureHandle::solid(1, 1, [0, 0, 0, 255]),
        )
    }

    #[test]
    fn first_writer_wins_per_prefix_and_slot() {
        let first = asset("Body_BaseColor.png");
        let first_handle = first.handle.clone();
        let assets: TextureCollection = vec![
            first,
            asset("Body_Diffuse.jpg"),
            asset("Body_Normal.png"),
        ]
        .into_iter()
        .collect();

        let parser = FilenameParser::default();
        let index = MaterialTextureIndex::build(&assets, &parser);

        let base = index.get("body", MapSlot::BaseColor).unwrap();
        assert!(base.handle.ptr_eq(&first_handle));
        assert_eq!(base.key, "textures/Body_BaseColor.png");
        assert_eq!(index.slots_for("body").len(), 2);
        assert_eq!(index.candidates(MapSlot::BaseColor).count(), 2);
    }

    #[test]
    fn unparseable_and_empty_textures_are_left_out() {
        let empty = TextureAsset::new(
            "Hair_Normal.png",
            "Hair_Normal.png",
            TextureHandle::new(image::RgbaImage::new(0, 0)),
        );
        let assets: TextureCollection = vec![asset("noise.png"), asset("Hair_Gloss.png"), empty]
            .into_iter()
            .collect();

        let index = MaterialTextureIndex::build(&assets, &FilenameParser::default());
        assert_eq!(index.prefix_count(), 0);
        assert_eq!(index.unparsed().len(), 2);
        assert!(index.get("hair", MapSlot::Normal).is_none());
    }

    #[test]
    fn prefixes_are_normalized() {
        let assets: TextureCollection = vec![asset("DevilHeadMtl_BaseColor.png")]
            .into_iter()
            .collect();
        let index = MaterialTextureIndex::build(&assets, &FilenameParser::default());
        assert!(index.get("devilhead", MapSlot::BaseColor).is_some());
        assert!(index.slots_for("DevilHeadMtl").is_empty());
    }
}
