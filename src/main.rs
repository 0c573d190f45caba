//! texmatch - bind loose texture files to the materials of a scene manifest.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use texmatch::assets::DirectorySource;
use texmatch::config::ResolverConfig;
use texmatch::resolve::Resolver;
use texmatch::scene::serialization::{load_scene_from_file, save_scene_to_file};

#[derive(Parser)]
#[command(name = "texmatch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Scene manifest (JSON) listing meshes and materials
    #[arg(short, long)]
    scene: PathBuf,

    /// Directory holding the extracted textures
    #[arg(short, long)]
    textures: PathBuf,

    /// Resolver tables (JSON); defaults are used for missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the resolution report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the updated scene manifest
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => ResolverConfig::from_json_file(path)?,
        None => ResolverConfig::default(),
    };

    let mut scene = load_scene_from_file(&cli.scene)?;
    log::info!(
        "Loaded scene {} ({} meshes, {} materials)",
        cli.scene.display(),
        scene.meshes.len(),
        scene.materials.len()
    );

    let textures = DirectorySource::new(&cli.textures).load()?;
    let report = Resolver::new(config).resolve(&mut scene, &textures);
    print!("{report}");

    if let Some(path) = &cli.report {
        std::fs::write(path, report.to_json()?)?;
        log::info!("Wrote report to {}", path.display());
    }
    if let Some(path) = &cli.output {
        save_scene_to_file(&scene, path)?;
        log::info!("Wrote scene to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
