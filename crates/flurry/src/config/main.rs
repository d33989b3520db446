//! All of the user config for Flurry.

use color_eyre::eyre::ContextCompat as _;
use color_eyre::eyre::Result;

use flurry_field::presets::Preset;

/// A copy of the default config file. It gets copied to the user's config folder the first time
/// they start Flurry.
static DEFAULT_CONFIG: &str = include_str!("../../default_config.toml");

/// The valid log levels. Based on our `tracing` crate.
#[derive(serde::Serialize, serde::Deserialize, clap::ValueEnum, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LogLevel {
    /// Error
    Error,
    /// Warnings
    Warn,
    /// Info
    Info,
    /// Debug
    Debug,
    /// Trace
    Trace,
    /// No logging
    Off,
}

/// Managing user config.
#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct Config {
    /// The maximum log level
    pub log_level: LogLevel,
    /// The location of the log file.
    pub log_path: std::path::PathBuf,
    /// Keybindings
    pub keybindings: super::input::KeybindingsRaw,
    /// Target frame rate
    pub frame_rate: u32,
    /// How many field units wide a single terminal pixel is.
    pub pixel_scale: f32,
    /// Whether to show the particle count and frame rate.
    pub show_stats: bool,
    /// The particle fields, bottom-most first.
    pub layers: Vec<LayerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let log_directory = match dirs::state_dir() {
            Some(directory) => directory,
            None => std::path::PathBuf::new().join("./"),
        };
        let log_path = log_directory.join("flurry").join("flurry.log");

        Self {
            log_level: LogLevel::Off,
            log_path,
            keybindings: super::input::KeybindingsRaw::new(),
            frame_rate: 60,
            pixel_scale: 4.0,
            show_stats: false,
            layers: vec![LayerConfig::default()],
        }
    }
}

/// A single particle field.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct LayerConfig {
    /// The preset the layer is based on.
    pub preset: Preset,
    /// A complete field config, used instead of the preset.
    pub field: Option<flurry_field::config::Config>,
    /// Override just the particle count.
    #[serde(deserialize_with = "deserialize_count_override")]
    pub count: Option<usize>,
    /// Whether the layer starts out running.
    pub enabled: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            preset: Preset::Falling,
            field: None,
            count: None,
            enabled: true,
        }
    }
}

impl LayerConfig {
    /// A layer running a preset, as chosen on the command line.
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// The final field config, with any overrides applied.
    pub fn field_config(&self) -> flurry_field::config::Config {
        let mut config = self
            .field
            .clone()
            .unwrap_or_else(|| self.preset.config());
        if let Some(count) = self.count {
            config.count = count;
        }
        config
    }

    /// A short name for the layer, for logs.
    pub fn name(&self) -> String {
        if self.field.is_some() {
            "custom".to_owned()
        } else {
            self.preset.to_string()
        }
    }
}

/// Counts given in the config are as forgiving as the field's own.
fn deserialize_count_override<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    flurry_field::config::deserialize_count(deserializer).map(Some)
}

impl Config {
    /// Canonical path to the config directory.
    pub async fn directory(
        state: &std::sync::Arc<crate::shared_state::SharedState>,
    ) -> std::path::PathBuf {
        state.config_path.read().await.clone()
    }

    /// Get the stable location of Flurry's config directory on the user's system.
    pub fn default_directory() -> Result<std::path::PathBuf> {
        Ok(dirs::config_dir()
            .context("Couldn't get standard config directory")?
            .join("flurry"))
    }

    /// Figure out where our config is being stored, and create the directory if needed.
    pub async fn setup_directory(
        maybe_custom_path: Option<std::path::PathBuf>,
        state: &std::sync::Arc<crate::shared_state::SharedState>,
    ) -> Result<()> {
        let path = match maybe_custom_path {
            None => Self::default_directory()?,
            Some(custom_path) => custom_path,
        };

        std::fs::create_dir_all(&path)?;
        *state.config_path.write().await = path;

        Ok(())
    }

    /// Canonical path to the main config file.
    pub async fn main_config_path(
        state: &std::sync::Arc<crate::shared_state::SharedState>,
    ) -> std::path::PathBuf {
        let directory = Self::directory(state).await;
        let main_config_file = state.main_config_file.read().await.clone();
        directory.join(main_config_file)
    }

    /// Load the main config
    pub async fn load(state: &std::sync::Arc<crate::shared_state::SharedState>) -> Result<Self> {
        let config_path = Self::main_config_path(state).await;
        let config_file_name = config_path
            .file_name()
            .context("Couldn't get file name from config path")?;
        let is_default_config = config_file_name == crate::cli_args::DEFAULT_CONFIG_FILE_NAME;
        if is_default_config && !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG)?;
        }

        tracing::info!("(Re)loading the main Flurry config from: {config_path:?}");
        let data = std::fs::read_to_string(&config_path).map_err(|error| {
            tracing::error!("Loading config: {error:?}");
            color_eyre::eyre::eyre!("Couldn't load config at {config_path:?}: {error}")
        })?;

        tracing::trace!("Using config file:\n{data}");
        let config = Self::parse(&data)?;
        Self::load_keybindings(state, &config).await?;
        Ok(config)
    }

    /// Parse a config file's contents.
    pub fn parse(data: &str) -> Result<Self> {
        Ok(toml::from_str::<Self>(data)?)
    }

    /// Load the main config
    pub async fn load_config_into_shared_state(
        state: &std::sync::Arc<crate::shared_state::SharedState>,
    ) -> Result<Self> {
        let new_config = Self::load(state).await?;
        *state.config.write().await = new_config.clone();
        Ok(new_config)
    }

    /// Merge the user's keybindings over the defaults.
    pub fn keybindings_as_events(
        user_config: &Self,
    ) -> Result<crate::config::input::KeybindingsAsEvents> {
        let mut keybindings = crate::config::input::KeybindingsAsEvents::new();
        let defaults = Self::parse(DEFAULT_CONFIG)?;
        let all_bindings = defaults
            .keybindings
            .into_iter()
            .chain(user_config.keybindings.clone());

        for (action, binding_config) in all_bindings {
            tracing::trace!("Keybinding found for '{action:?}': {binding_config:?}");
            let key_event: termwiz::input::KeyEvent = binding_config.try_into()?;
            tracing::debug!("Keybinding parsed for '{action:?}': {key_event:?}");
            keybindings.insert(action, key_event);
        }

        Ok(keybindings)
    }

    /// Load all user keybindings.
    async fn load_keybindings(
        state: &std::sync::Arc<crate::shared_state::SharedState>,
        user_config: &Self,
    ) -> Result<()> {
        let keybindings = Self::keybindings_as_events(user_config)?;
        *state.keybindings.write().await = keybindings;
        Ok(())
    }

    /// Watch the config file for any changes and then automatically update the shared state with
    /// the contents of the new config file.
    pub fn watch(
        state: std::sync::Arc<crate::shared_state::SharedState>,
    ) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move {
            let path = Self::directory(&state).await;
            tracing::debug!("Watching config ({path:?}) for changes.");

            let (config_file_change_tx, mut config_file_change_rx) = tokio::sync::mpsc::channel(1);
            let mut protocol_rx = state.protocol_tx.subscribe();

            let mut debouncer = notify_debouncer_full::new_debouncer(
                std::time::Duration::from_millis(100),
                None,
                move |result: notify_debouncer_full::DebounceEventResult| match result {
                    Ok(events) => {
                        for event in events {
                            let send_result = config_file_change_tx.blocking_send(event);
                            if let Err(error) = send_result {
                                tracing::error!(
                                    "Sending config file watcher notification: {error:?}"
                                );
                            }
                        }
                    }
                    Err(error) => tracing::error!("File watcher: {error:?}"),
                },
            )?;
            debouncer.watch(
                &path,
                notify_debouncer_full::notify::RecursiveMode::NonRecursive,
            )?;

            #[expect(
                clippy::integer_division_remainder_used,
                reason = "This is caused by the `tokio::select!`"
            )]
            loop {
                tokio::select! {
                    Some(event) = config_file_change_rx.recv() => {
                        Self::handle_file_change_event(event, &state).await;
                    },
                    Ok(message) = protocol_rx.recv() => {
                        if matches!(message, crate::run::Protocol::End) {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("Leaving config watcher loop");
            Ok(())
        })
    }

    /// Handle an event from the config file watcher. Should normally be a notification that the
    /// config file has changed.
    async fn handle_file_change_event(
        event: notify_debouncer_full::DebouncedEvent,
        state: &std::sync::Arc<crate::shared_state::SharedState>,
    ) {
        use notify_debouncer_full::notify::event as notify_event;
        let notify_event::EventKind::Modify(kind) = event.kind else {
            return;
        };
        let notify_event::ModifyKind::Data(_) = kind else {
            return;
        };

        let main_config_file = state.main_config_file.read().await.clone();
        let is_main_config = event
            .paths
            .iter()
            .any(|path| path.file_name() == main_config_file.file_name());
        if !is_main_config {
            return;
        }

        tracing::debug!(
            "Config file change detected ({:?}), reloading.",
            event.paths
        );

        match Self::load_config_into_shared_state(state).await {
            Ok(config) => {
                state
                    .protocol_tx
                    .send(crate::run::Protocol::Config(config))
                    .unwrap_or_else(|send_error| {
                        tracing::error!(
                            "Couldn't send config update on protocol channel: {send_error:?}"
                        );
                        0
                    });
            }
            Err(error) => {
                tracing::error!("Config update error, keeping the old config: {error:?}");
            }
        }
    }
}
