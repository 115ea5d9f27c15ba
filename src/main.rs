use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use cutout_overlay::config::{
    get_config_path, load_config, load_config_from, ConfigFlags, ConfigWatcher,
};
use cutout_overlay::{DeviceSnapshot, FaceScanningProviderFactory};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(250);

struct Options {
    snapshot: PathBuf,
    /// Overrides the default config location.
    config: Option<PathBuf>,
    watch: bool,
}

fn print_help() {
    println!(
        "cutout-overlay {}
Evaluate face-scanning overlay placement for a recorded device state

USAGE:
    cutout-overlay [OPTIONS] <SNAPSHOT>

OPTIONS:
    -h, --help             Print this help message
    -v, --version          Print version information
    -c, --config <PATH>    Use this config file instead of the default
    -w, --watch            Re-evaluate whenever the config file changes

ENVIRONMENT:
    RUST_LOG               Set log level (error, warn, info, debug, trace)

CONFIG:
    ~/.config/cutout-overlay/config.toml

EXAMPLES:
    cutout-overlay phone.toml
    RUST_LOG=debug cutout-overlay --watch phone.toml",
        VERSION
    );
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("Try 'cutout-overlay --help' for more information.");
    std::process::exit(1);
}

/// Parses arguments; exits for help, version and usage errors.
fn parse_args(args: &[String]) -> Options {
    let mut snapshot = None;
    let mut config = None;
    let mut watch = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                println!("cutout-overlay {}", VERSION);
                std::process::exit(0);
            }
            "-w" | "--watch" => watch = true,
            "-c" | "--config" => match iter.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => usage_error("Missing value for --config"),
            },
            other if other.starts_with('-') => {
                usage_error(&format!("Unknown argument: {}", other))
            }
            other => {
                if snapshot.is_some() {
                    usage_error(&format!("Unexpected argument: {}", other));
                }
                snapshot = Some(PathBuf::from(other));
            }
        }
    }

    let Some(snapshot) = snapshot else {
        usage_error("Missing snapshot file");
    };

    Options {
        snapshot,
        config,
        watch,
    }
}

fn print_report(factory: &FaceScanningProviderFactory) {
    match serde_json::to_string_pretty(&factory.report()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize report: {}", e),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args);

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    logger
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {:>5} {}] {}",
                chrono::Utc::now().to_rfc3339(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let snapshot = match DeviceSnapshot::load(&options.snapshot) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let config = match &options.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let config = Arc::new(RwLock::new(config));
    let factory = FaceScanningProviderFactory::for_device(
        Arc::new(snapshot),
        Arc::new(ConfigFlags(config.clone())),
    );

    print_report(&factory);

    if !options.watch {
        return;
    }

    let config_path = options.config.unwrap_or_else(get_config_path);
    let watcher = match ConfigWatcher::new(config, config_path.clone()) {
        Ok(watcher) => watcher,
        Err(e) => {
            log::error!("Failed to set up config watcher: {}", e);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    if let Err(e) = ctrlc::set_handler(move || running_clone.store(false, Ordering::SeqCst)) {
        log::warn!("Failed to install signal handler: {}", e);
    }

    while running.load(Ordering::SeqCst) {
        if watcher.check_and_reload() {
            print_report(&factory);
        }
        std::thread::sleep(WATCH_POLL_INTERVAL);
    }
    log::info!("Stopped watching {}", config_path.display());
}
