use cascade_faces::{run_batch, Config, NativeBackend};
use log::warn;
use std::{error::Error, panic};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = Config::default_path();
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            let reason = e.source().map(ToString::to_string).unwrap_or_default();
            warn!("{e}: {reason}. Using defaults.");
            Config::default()
        },
    };

    // The native back-end can fail in ways that aren't ordinary errors, e.g. a missing shared
    // library surfacing as a panic inside the bindings. Both are logged and the process exits 0.
    match panic::catch_unwind(|| run_batch(&config, NativeBackend)) {
        Ok(Ok(_)) => {},
        Ok(Err(e)) => warn!("Something went wrong while detecting faces: {e}"),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!("Something went wrong while detecting faces: {message}");
        },
    }
}
