use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use engine::{AudioSink, LoopConfig, NullAudioSink, Scene};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{self, Tuning};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
    pub(crate) audio: Box<dyn AudioSink>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Winchline Startup ===");

    let paths = match engine::resolve_app_paths() {
        Ok(paths) => Some(paths),
        Err(error) => {
            warn!(error = %error, "app_paths_unresolved_using_defaults");
            None
        }
    };

    let tuning = match &paths {
        Some(paths) => load_tuning(&paths.tuning_path),
        None => Tuning::default(),
    };

    let rng_seed = tuning.rng_seed.unwrap_or_else(seed_from_clock);
    info!(rng_seed, "simulation_seed");

    let mut config = LoopConfig::default();
    if let Some(paths) = paths {
        config.asset_root = paths.asset_root;
    }

    AppWiring {
        config,
        scene: gameplay::build_scene(tuning, rng_seed),
        audio: Box::new(NullAudioSink),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_tuning(path: &Path) -> Tuning {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "tuning_file_absent_using_defaults");
            return Tuning::default();
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "tuning_read_failed_using_defaults");
            return Tuning::default();
        }
    };

    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    match serde_path_to_error::deserialize(&mut deserializer) {
        Ok(tuning) => {
            info!(path = %path.display(), "tuning_loaded");
            tuning
        }
        Err(error) => {
            warn!(
                path = %path.display(),
                field = %error.path(),
                error = %error,
                "tuning_invalid_using_defaults"
            );
            Tuning::default()
        }
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0x5eed)
}
