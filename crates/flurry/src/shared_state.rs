//! Here we store all the data that the main loop and the config watcher share.
//! Access is mediated with locks to support asynchronicity

use std::sync::Arc;

use tokio::sync::RwLock;

/// All the shared data the app uses
#[non_exhaustive]
pub(crate) struct SharedState {
    /// The channel on which all Flurry protocol messages are sent.
    pub protocol_tx: tokio::sync::broadcast::Sender<crate::run::Protocol>,
    /// Location of the config directory.
    pub config_path: RwLock<std::path::PathBuf>,
    /// Name of the main config file.
    pub main_config_file: RwLock<std::path::PathBuf>,
    /// User config
    pub config: RwLock<crate::config::main::Config>,
    /// All the user-configured keybindings.
    pub keybindings: RwLock<crate::config::input::KeybindingsAsEvents>,
    /// Is the application logging?
    pub is_logging: RwLock<bool>,
}

impl SharedState {
    /// Initialise the shared state
    pub fn init() -> Arc<Self> {
        let (protocol_tx, _) = tokio::sync::broadcast::channel(16);
        Arc::new(Self {
            protocol_tx,
            config_path: RwLock::default(),
            main_config_file: RwLock::default(),
            config: RwLock::default(),
            keybindings: RwLock::default(),
            is_logging: RwLock::default(),
        })
    }
}
