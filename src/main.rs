use anyhow::Result;
use roadmap_catalog::config::AppConfig;
use roadmap_catalog::internal::theme::{FilePreferences, MemoryPreferences, PreferenceStore};
use roadmap_catalog::internal::ui::app::App;
use roadmap_catalog::tui;

/// Open the on-disk preference store, or fall back to a session-only one.
fn preference_store(config: &AppConfig) -> Box<dyn PreferenceStore> {
    let path = match &config.preferences_file {
        Some(path) => Ok(path.into()),
        None => FilePreferences::default_path(),
    };
    match path.and_then(FilePreferences::open) {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "Using preferences file");
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Preferences unavailable; theme will not persist");
            Box::new(MemoryPreferences::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load();

    // While the TUI owns the terminal, logs go to a daily rotating file so they
    // do not corrupt the screen. If the TUI cannot start, log to stderr instead.
    match tui::init() {
        Ok(terminal) => {
            let file_appender =
                tracing_appender::rolling::daily(config.log_directory(), "roadmap-catalog.log");
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            // RUST_LOG wins over the configured levels.
            let env_filter = match std::env::var("RUST_LOG") {
                Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
                Err(_) => tracing_subscriber::EnvFilter::new(config.logging.filter_directive()),
            };

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();

            let store = preference_store(&config);
            let mut app = App::bootstrap(config, store);
            let res = app.run(terminal).await;

            tui::restore()?;

            if let Err(err) = res {
                eprintln!("{err:?}");
            }

            Ok(())
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .init();

            let _ = tui::restore();
            eprintln!("Failed to initialize TUI: {e:?}");
            Err(e)
        }
    }
}
