mod types;

pub use types::{Config, ConfigIssue, KNOWN_FLAGS};

use crate::provider::FeatureFlags;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

pub type SharedConfig = Arc<RwLock<Config>>;

const CONFIG_FILE_NAME: &str = "config.toml";
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(500);

/// Feature flags backed by a live, reloadable config.
pub struct ConfigFlags(pub SharedConfig);

impl FeatureFlags for ConfigFlags {
    fn is_enabled(&self, flag: &str) -> bool {
        self.0.read().map(|cfg| cfg.flag(flag)).unwrap_or(false)
    }
}

pub fn load_config() -> Config {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Config {
    let config = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", config_path);
                    config
                }
                Err(e) => {
                    log::error!("Failed to parse config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                log::error!("Failed to read config file: {}", e);
                Config::default()
            }
        }
    } else {
        log::info!("No config file found at {:?}, using defaults", config_path);
        Config::default()
    };

    for issue in config.validate() {
        log::warn!("Config: {}", issue);
    }

    config
}

pub fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("cutout-overlay")
        .join(CONFIG_FILE_NAME)
}

/// Reloads the shared config when its file changes on disk.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<Result<Event, notify::Error>>,
    config: SharedConfig,
    config_path: PathBuf,
    last_reload: Mutex<Instant>,
    /// A change was seen but not yet applied because of the debounce.
    pending: AtomicBool,
}

impl ConfigWatcher {
    pub fn new(config: SharedConfig, config_path: PathBuf) -> Result<Self, notify::Error> {
        let (tx, rx) = channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;

        // Watch the directory so editors that replace the file are still seen
        let config_dir = config_path.parent().unwrap_or(&config_path).to_path_buf();
        if !config_dir.exists() {
            let _ = std::fs::create_dir_all(&config_dir);
        }

        watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;
        log::info!("Watching config directory: {:?}", config_dir);

        // Back-date so the first change reloads immediately
        let last_reload = Instant::now()
            .checked_sub(RELOAD_DEBOUNCE)
            .unwrap_or_else(Instant::now);

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            config,
            config_path,
            last_reload: Mutex::new(last_reload),
            pending: AtomicBool::new(false),
        })
    }

    /// Check for config changes and reload if needed. Returns true if config was reloaded.
    ///
    /// A change that lands inside the debounce window stays pending and is
    /// applied by the first call after the window closes.
    pub fn check_and_reload(&self) -> bool {
        self.drain_events();

        let now = Instant::now();
        if !self.reload_due(now) {
            return false;
        }

        log::info!("Config file changed, reloading...");
        let new_config = load_config_from(&self.config_path);
        if let Ok(mut cfg) = self.config.write() {
            *cfg = new_config;
            self.pending.store(false, Ordering::SeqCst);
            if let Ok(mut t) = self.last_reload.lock() {
                *t = now;
            }
            return true;
        }
        false
    }

    fn drain_events(&self) {
        let file_name = self.config_path.file_name();

        while let Ok(event) = self.receiver.try_recv() {
            match event {
                Ok(event) => {
                    let is_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().is_some() && p.file_name() == file_name);

                    if is_config && (event.kind.is_modify() || event.kind.is_create()) {
                        self.pending.store(true, Ordering::SeqCst);
                    }
                }
                Err(e) => {
                    log::error!("Config watch error: {}", e);
                }
            }
        }
    }

    fn reload_due(&self, now: Instant) -> bool {
        if !self.pending.load(Ordering::SeqCst) {
            return false;
        }
        let elapsed = self
            .last_reload
            .lock()
            .map(|t| now.saturating_duration_since(*t))
            .unwrap_or(Duration::ZERO);
        elapsed > RELOAD_DEBOUNCE
    }
}
