use std::fmt;

/// Canonical texture channel a material can bind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum MapSlot {
    BaseColor,
    Normal,
    Roughness,
    Metalness,
    AmbientOcclusion,
    Emissive,
    Alpha,
    Bump,
    Displacement,
}

/// How the renderer should sample a bound texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextureColorSpace {
    Srgb,
    Linear,
}

impl MapSlot {
    pub const ALL: [MapSlot; 9] = [
        MapSlot::BaseColor,
        MapSlot::Normal,
        MapSlot::Roughness,
        MapSlot::Metalness,
        MapSlot::AmbientOcclusion,
        MapSlot::Emissive,
        MapSlot::Alpha,
        MapSlot::Bump,
        MapSlot::Displacement,
    ];

    /// Slots that carry colour data rather than scalar or vector data.
    pub fn is_color(self) -> bool {
        matches!(self, MapSlot::BaseColor | MapSlot::Emissive)
    }

    pub fn color_space(self) -> TextureColorSpace {
        if self.is_color() {
            TextureColorSpace::Srgb
        } else {
            TextureColorSpace::Linear
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MapSlot::BaseColor => "baseColor",
            MapSlot::Normal => "normal",
            MapSlot::Roughness => "roughness",
            MapSlot::Metalness => "metalness",
            MapSlot::AmbientOcclusion => "ambientOcclusion",
            MapSlot::Emissive => "emissive",
            MapSlot::Alpha => "alpha",
            MapSlot::Bump => "bump",
            MapSlot::Displacement => "displacement",
        }
    }
}

impl fmt::Display for MapSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
