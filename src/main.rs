use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use scene_importer::{
    importer::{write_scene, SceneImporter},
    materializer::{resources::ResourceRegistry, retrieve},
    DecodeFailurePolicy, ImporterConfig, SceneSelection,
};

const USAGE: &str = "usage: scene-importer <scene.xml> [--asset-root <dir>] [--skip-invalid] \
                     [--last-scene-wins] [--export <out.xml>]";

struct Args {
    scene: PathBuf,
    asset_root: Option<PathBuf>,
    export: Option<PathBuf>,
    config: ImporterConfig,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut scene: Option<PathBuf> = None;
    let mut asset_root: Option<PathBuf> = None;
    let mut export: Option<PathBuf> = None;
    let mut config = ImporterConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--asset-root" => {
                asset_root = Some(args.next().context("--asset-root needs a directory")?.into());
            }
            "--export" => {
                export = Some(args.next().context("--export needs a file name")?.into());
            }
            "--skip-invalid" => config.decode_failure = DecodeFailurePolicy::Skip,
            "--last-scene-wins" => config.scene_selection = SceneSelection::LastWins,
            "-h" | "--help" => bail!(USAGE),
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
            path if scene.is_none() => scene = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument {extra}\n{USAGE}"),
        }
    }

    Ok(Args {
        scene: scene.context(USAGE)?,
        asset_root,
        export,
        config,
    })
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args(std::env::args().skip(1))?;

    let importer = SceneImporter::open(&args.scene, args.config)
        .with_context(|| format!("Failed to import {}", args.scene.display()))?;

    if let Some(err) = importer.load_error() {
        log::warn!("{} was not loaded: {err}", args.scene.display());
    }

    let imported = retrieve(
        importer.imported_objects(),
        ResourceRegistry::new(args.asset_root),
    )
    .context("Failed to materialize imported objects")?;

    println!(
        "{}: {} objects, {} meshes, {} textures",
        imported.scene.name,
        imported.nodes.len(),
        imported.resources.meshes().len(),
        imported.resources.textures().len()
    );

    for &node_id in &imported.nodes {
        let Some(object) = imported.scene.get_object(node_id) else {
            continue;
        };
        let position = object
            .transform
            .get_world_matrix()
            .transform_point3(glam::Vec3::ZERO);
        println!(
            "  {} ({}) at {position}",
            object.node_name.as_deref().unwrap_or_default(),
            object.name
        );
    }

    for (_, mesh) in imported.resources.meshes().iter() {
        println!("  mesh {:?} <- {}", mesh.name, mesh.link);
    }
    for (_, texture) in imported.resources.textures().iter() {
        println!("  texture {:?} <- {}", texture.name, texture.link);
    }

    if let Some(export) = args.export {
        let xml = write_scene(importer.imported_objects(), importer.config())?;
        fs::write(&export, xml)
            .with_context(|| format!("Failed to write {}", export.display()))?;
        log::info!("Exported scene to {}", export.display());
    }

    Ok(())
}
