//! All the CLI arguments for Flurry

/// The name of the main config file, when one isn't given on the command line.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "flurry.toml";

/// Fill your terminal with drifting, bouncing and glowing particles.
#[derive(clap::Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = "Fill your terminal with drifting, bouncing and glowing particles. \
                  Each `--use` adds a layer running one of the bundled presets: \
                  falling, network or preview."
)]
#[non_exhaustive]
pub struct CliArgs {
    /// Name of the preset(s) to layer. Overrides the layers in the config file.
    #[arg(short, long("use"))]
    pub presets: Vec<String>,

    /// Use a custom config directory instead of the standard one.
    #[arg(long)]
    pub config_dir: Option<std::path::PathBuf>,

    /// Name of the main config file inside the config directory.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    pub main_config: std::path::PathBuf,

    /// Override the log level from the config file.
    #[arg(long, value_enum)]
    pub log_level: Option<crate::config::main::LogLevel>,

    /// Override where logs are written.
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,

    /// Seed every field's randomness, so that runs can be repeated.
    #[arg(long)]
    pub seed: Option<u64>,
}
