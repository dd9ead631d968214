use std::io::Read;
use std::path::PathBuf;

use scene_editor_lib::command::execute_json_batch;
use scene_editor_lib::state::{EditorSettings, SceneState};
use scene_editor_lib::store::{FileStore, StoreError};

/// Command line options
#[derive(Debug, Default)]
struct Args {
    store: Option<PathBuf>,
    commands: Option<PathBuf>,
    /// Write the effective settings back to the config dir
    save_settings: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_editor=info,scene_editor_lib=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: scene-editor [--store <dir>] [--commands <file>] [--save-settings]");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--store" => {
                let dir = iter.next().ok_or("--store needs a directory")?;
                args.store = Some(PathBuf::from(dir));
            }
            "--commands" => {
                let file = iter.next().ok_or("--commands needs a file")?;
                args.commands = Some(PathBuf::from(file));
            }
            "--save-settings" => args.save_settings = true,
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(args)
}

fn open_store(settings: &EditorSettings, dir: Option<PathBuf>) -> Result<FileStore, StoreError> {
    match dir {
        Some(dir) => Ok(FileStore::new(dir)),
        None => settings.file_store(),
    }
}

fn run(args: Args) -> Result<(), String> {
    let settings = EditorSettings::load();
    if args.save_settings {
        match settings.save() {
            Ok(path) => tracing::info!("Saved settings to {}", path.display()),
            Err(e) => tracing::warn!("Failed to save settings: {e}"),
        }
    }
    let store = open_store(&settings, args.store).map_err(|e| e.to_string())?;
    tracing::info!("Using scene store at {}", store.dir().display());

    let mut scene = SceneState::new(store, settings);
    scene
        .init_store()
        .map_err(|e| format!("Failed to initialise store: {e}"))?;
    match scene.restore() {
        Ok(count) => tracing::info!("Restored {count} objects"),
        Err(e) => tracing::warn!("Starting with an empty scene: {e}"),
    }

    let json = match &args.commands {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {e}"))?;
            buf
        }
    };

    let responses = if json.trim().is_empty() {
        Vec::new()
    } else {
        execute_json_batch(&mut scene, &json)?
    };
    let failed = responses.iter().filter(|r| !r.success).count();
    tracing::info!("Executed {} commands ({failed} failed)", responses.len());

    let out = serde_json::to_string_pretty(&responses)
        .map_err(|e| format!("Failed to encode responses: {e}"))?;
    println!("{out}");
    Ok(())
}
