//! String matching used by the fallback tiers.

use crate::assets::{TextureAsset, TextureCollection};
use crate::naming::basename;

/// Edit distance with unit insert/delete/substitute costs, over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = previous[j] + usize::from(ca != cb);
            let delete = previous[j + 1] + 1;
            let insert = current[j] + 1;
            current[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// `1 - distance / longest length`, in `[0, 1]`. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Which rule of [`match_path`] produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathMatchKind {
    Exact,
    Basename,
    Substring,
}

/// Resolve a path embedded in a loaded material against the texture set.
///
/// Textures without image data are invisible to every rule.
pub fn match_path<'a>(
    referenced: &str,
    assets: &'a TextureCollection,
) -> Option<(&'a TextureAsset, PathMatchKind)> {
    let wanted = canonical_path(referenced);
    if wanted.is_empty() {
        return None;
    }

    let usable = || assets.iter().filter(|asset| asset.handle.is_materialized());

    if let Some(asset) = usable().find(|asset| canonical_path(&asset.key) == wanted)
    {
        return Some((asset, PathMatchKind::Exact));
    }

    let wanted_base = basename(&wanted);
    if wanted_base.is_empty() {
        return None;
    }

    if let Some(asset) =
        usable().find(|asset| basename(&canonical_path(&asset.key)) == wanted_base)
    {
        return Some((asset, PathMatchKind::Basename));
    }

    usable()
        .find(|asset| {
            let key = canonical_path(&asset.key);
            let base = basename(&key);
            !base.is_empty() && (base.contains(wanted_base) || wanted_base.contains(base))
        })
        .map(|asset| (asset, PathMatchKind::Substring))
}

fn canonical_path(path: &str) -> String {
    path.trim().replace('\\', "/").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureHandle;

    fn collection(keys: &[&str]) -> TextureCollection {
        keys.iter()
            .map(|key| {
                TextureAsset::new(
                    *key,
                    basename(key),
                    TextureHandle::solid(1, 1, [255, 0, 0, 255]),
                )
            })
            .collect()
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("eyez", "eyes"), 1);
        assert_eq!(levenshtein("eyez", "hair"), 4);
    }

    #[test]
    fn similarity_boundaries() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("body", "body"), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("eyez", "eyes"), 0.75);
        for (a, b) in [("kitten", "sitting"), ("hair", "eyez"), ("", "x")] {
            assert_eq!(similarity(a, b), similarity(b, a));
            let value = similarity(a, b);
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn similarity_counts_chars_not_bytes() {
        assert_eq!(similarity("ü", "u"), 0.0);
        assert_eq!(similarity("äb", "ab"), 0.5);
    }

    #[test]
    fn exact_match_ignores_case_and_slashes() {
        let assets = collection(&["Textures/Body_BaseColor.png", "Body_BaseColor.png"]);
        let (asset, kind) = match_path(r"textures\body_basecolor.PNG", &assets).unwrap();
        assert_eq!(asset.key, "Textures/Body_BaseColor.png");
        assert_eq!(kind, PathMatchKind::Exact);
    }

    #[test]
    fn basename_match_when_directories_differ() {
        let assets = collection(&["maps/Body_Normal.png"]);
        let (asset, kind) = match_path("C:/artist/export/body_normal.png", &assets).unwrap();
        assert_eq!(asset.key, "maps/Body_Normal.png");
        assert_eq!(kind, PathMatchKind::Basename);
    }

    #[test]
    fn substring_match_in_either_direction() {
        let assets = collection(&["maps/Body_Normal_4k.png"]);
        let (_, kind) = match_path("Body_Normal", &assets).unwrap();
        assert_eq!(kind, PathMatchKind::Substring);

        let assets = collection(&["Normal.png"]);
        let (_, kind) = match_path("sources/Body_Normal.png.bak", &assets).unwrap();
        assert_eq!(kind, PathMatchKind::Substring);
    }

    #[test]
    fn empty_images_are_passed_over() {
        let assets: TextureCollection = [
            TextureAsset::new(
                "export/cloak nrm.png",
                "cloak nrm.png",
                TextureHandle::new(image::RgbaImage::new(0, 0)),
            ),
            TextureAsset::new(
                "maps/cloak nrm.png",
                "cloak nrm.png",
                TextureHandle::solid(2, 2, [128, 128, 255, 255]),
            ),
        ]
        .into_iter()
        .collect();
        let (asset, kind) = match_path("export/cloak nrm.png", &assets).unwrap();
        assert_eq!(asset.key, "maps/cloak nrm.png");
        assert_eq!(kind, PathMatchKind::Basename);
    }

    #[test]
    fn no_match_is_none() {
        let assets = collection(&["Hair_BaseColor.png"]);
        assert!(match_path("Body_Normal.png", &assets).is_none());
        assert!(match_path("", &assets).is_none());
        assert!(match_path("textures/", &assets).is_none());
    }
}
