//! Texture-to-material resolution for loaded models.
//!
//! Given the materials of a loaded model and a flat, loosely named set of
//! textures (typically extracted from an archive next to the model), work out
//! which texture belongs in which slot of which material, apply it, and fix up
//! the material state a bound texture depends on.
//!
//! ```no_run
//! use texmatch::{assets::DirectorySource, resolve::Resolver, scene::serialization};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut scene = serialization::load_scene_from_file(Path::new("scene.json"))?;
//! let textures = DirectorySource::new("textures").load()?;
//! let report = Resolver::default().resolve(&mut scene, &textures);
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod config;
pub mod matching;
pub mod naming;
pub mod resolve;
pub mod scene;

pub use assets::{TextureAsset, TextureCollection, TextureHandle};
pub use config::ResolverConfig;
pub use naming::{MapSlot, ParsedFilename};
pub use resolve::{resolve, MatchTier, ResolutionOutcome, ResolutionReport, Resolver};
pub use scene::{SceneDocument, SceneTarget};
