mod app;

use app::cli::Args;
use app::config::Config;
use app::{
    App,
    main_loop::AppMainLoop,
    terminal::{init_terminal, install_panic_hook, restore_terminal},
};
use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Handle --generate-config option
    if let Some(path) = &args.generate_config {
        let config_path = if path.is_dir() || path.to_str() == Some(".") {
            path.join("config.toml")
        } else {
            path.clone()
        };
        Config::generate_default(config_path)?;
        return Ok(());
    }

    // Determine config path for logging later
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let config_existed = config_path.exists();

    let (mut config, config_warnings) = Config::load(args.config.clone())?;

    if let Some(base_url) = &args.base_url {
        config.source.base_url = base_url.clone();
    }
    if let Some(address) = &args.mpd_address {
        config.audio.mpd_address = address.clone();
    }
    if args.no_audio {
        config.audio.enabled = false;
    }

    if config.logging.enabled {
        app::logging::ensure_log_directory(&config.logging)?;
        app::logging::init_logger(&config.logging)?;
        app::logging::log_startup_info(&config.logging);
        app::logging::log_config_loading(&config_path, !config_existed);

        for warning in &config_warnings {
            log::warn!("{}", warning);
        }
    }
    let logging_enabled = config.logging.enabled;

    let mut app = App::new(config, args.start_route())?;

    if !config_warnings.is_empty() {
        app.config_warnings = config_warnings;
        app.show_config_warnings_popup = true;
    }

    let terminal = init_terminal()?;
    install_panic_hook();

    let result = app.run(terminal).await;

    if logging_enabled {
        app::logging::log_shutdown_info();
    }

    restore_terminal()?;
    result
}
