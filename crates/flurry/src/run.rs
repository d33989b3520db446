//! Main entrypoint for running Flurry

use std::sync::Arc;
use std::time::Instant;

use clap::Parser as _;
use color_eyre::eyre::{ContextCompat as _, Result};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

use flurry_field::colour::BLACK;
use flurry_field::presets::Preset;

use crate::cli_args::CliArgs;
use crate::config::main::{Config, LayerConfig};
use crate::layers::Layers;
use crate::renderer::Renderer;
use crate::shared_state::SharedState;

/// Commands to control the various tasks
#[non_exhaustive]
#[derive(Clone, Debug)]
pub(crate) enum Protocol {
    /// The entire application is exiting.
    End,
    /// Flurry's configuration has been reloaded.
    Config(Config),
}

/// Main entrypoint
pub(crate) async fn run(state: &Arc<SharedState>) -> Result<()> {
    let cli_args = setup(state).await?;
    let config_handle = Config::watch(Arc::clone(state));
    override_on_panic_behaviour();

    let mut renderer = Renderer::new()?;
    let result = render_loop(&mut renderer, state, &cli_args).await;
    let restore_result = renderer.restore();

    broadcast_protocol_end(&state.protocol_tx);
    config_handle.await??;

    result?;
    restore_result?;
    tracing::trace!("Leaving Flurry's main `run()` function");
    Ok(())
}

/// Keeps the frames coming at the configured rate.
struct FrameClock {
    /// Target frames per second
    frame_rate: u32,
    /// When the last frame started
    last_frame_tick: Instant,
}

impl FrameClock {
    /// Instantiate
    fn new(frame_rate: u32) -> Self {
        Self {
            frame_rate,
            last_frame_tick: Instant::now(),
        }
    }

    /// Sleep until it's time for the next frame.
    async fn sleep_until_next_frame_tick(&mut self) {
        let target = crate::renderer::ONE_MICROSECOND.wrapping_div(self.frame_rate.max(1).into());
        let target_frame_rate_micro = std::time::Duration::from_micros(target);
        if let Some(wait) = target_frame_rate_micro.checked_sub(self.last_frame_tick.elapsed()) {
            tokio::time::sleep(wait).await;
        }
        self.last_frame_tick = Instant::now();
    }
}

/// A rough count of frames per second, for the stats line.
struct Stats {
    /// Frames counted since `since`
    frames: u32,
    /// When counting started
    since: Instant,
    /// The last full second's count
    fps: u32,
}

impl Stats {
    /// Count another frame.
    fn tick(&mut self, now: Instant) {
        self.frames += 1;
        if now.saturating_duration_since(self.since).as_secs() >= 1 {
            self.fps = self.frames;
            self.frames = 0;
            self.since = now;
        }
    }
}

/// The layers to run: presets from the command line win over the config file.
fn layer_configs(config: &Config, cli_args: &CliArgs) -> Result<Vec<LayerConfig>> {
    if cli_args.presets.is_empty() {
        if config.layers.is_empty() {
            tracing::warn!("No layers configured, nothing will be drawn");
        }
        return Ok(config.layers.clone());
    }

    let mut layers = Vec::new();
    for name in &cli_args.presets {
        let preset: Preset = name.parse()?;
        layers.push(LayerConfig::from_preset(preset));
    }
    Ok(layers)
}

/// Draw frames until the user quits. It lives in its own function so that the user's terminal
/// can always be restored, whatever happens in here.
async fn render_loop(
    renderer: &mut Renderer,
    state: &Arc<SharedState>,
    cli_args: &CliArgs,
) -> Result<()> {
    let mut config = state.config.read().await.clone();
    let (width, height) = renderer.dimensions();
    let mut layers = Layers::new(
        &layer_configs(&config, cli_args)?,
        config.pixel_scale,
        cli_args.seed,
        width,
        height * 2,
    );
    let mut clock = FrameClock::new(config.frame_rate);
    let mut stats = Stats {
        frames: 0,
        since: Instant::now(),
        fps: 0,
    };
    let mut protocol_rx = state.protocol_tx.subscribe();

    tracing::debug!("Starting render loop");
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "`tokio::select! generates this.`"
    )]
    loop {
        tokio::select! {
            () = clock.sleep_until_next_frame_tick() => {
                if !handle_input(renderer, &mut layers, state).await? {
                    break;
                }
                if let Some((new_width, new_height)) = renderer.check_for_resize()? {
                    layers.resize(new_width, new_height * 2);
                }

                let now = Instant::now();
                layers.frame(now);
                stats.tick(now);
                render(renderer, &layers, &config, &stats)?;
            }
            Ok(message) = protocol_rx.recv() => {
                match message {
                    Protocol::End => break,
                    Protocol::Config(new_config) => {
                        tracing::debug!("Applying new config");
                        let configs = layer_configs(&new_config, cli_args)?;
                        layers.reconfigure(&configs, new_config.pixel_scale);
                        clock.frame_rate = new_config.frame_rate;
                        config = new_config;
                    }
                }
            }
        }
    }
    tracing::debug!("Exited render loop");

    Ok(())
}

/// Act on any keybindings that have been pressed. Returns `false` when it's time to quit.
async fn handle_input(
    renderer: &mut Renderer,
    layers: &mut Layers,
    state: &Arc<SharedState>,
) -> Result<bool> {
    let events = renderer.poll_input()?;
    if events.is_empty() {
        return Ok(true);
    }

    let keybindings = state.keybindings.read().await;
    for event in events {
        let termwiz::input::InputEvent::Key(key) = event else {
            continue;
        };

        let is_interrupt = key.modifiers == termwiz::input::Modifiers::CTRL
            && key.key == termwiz::input::KeyCode::Char('c');
        if is_interrupt {
            return Ok(false);
        }

        if let Some(action) = crate::config::input::action_for(&keybindings, &key) {
            if !layers.handle_action(action) {
                return Ok(false);
            }
        }
    }
    drop(keybindings);

    Ok(true)
}

/// Draw the composited layers, and the stats line if it's wanted.
fn render(renderer: &mut Renderer, layers: &Layers, config: &Config, stats: &Stats) -> Result<()> {
    let mut frame = crate::surface::Surface::from_pixels(&layers.composite())?;
    if config.show_stats {
        let text = format!(" particles: {} fps: {} ", layers.particle_count(), stats.fps);
        frame.add_text(0, 0, text, Some(BLACK), None);
    }
    renderer.render(&frame)
}

/// The default behaviour prints panics to the terminal, which is in raw mode and on the alternate
/// screen, so nobody would ever see them. At least a log is made.
fn override_on_panic_behaviour() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let message = if let Some(message) = info.payload().downcast_ref::<String>() {
            message
        } else if let Some(message) = info.payload().downcast_ref::<&str>() {
            message
        } else {
            "Caught a panic with an unknown type."
        };
        let location = match info.location() {
            Some(location) => format!(
                "{}@{}:{}",
                location.file(),
                location.line(),
                location.column()
            ),
            None => "Unknown location".to_owned(),
        };
        tracing::error!("Caught panic ({}): {message:?}", location);
        default_hook(info);
    }));
}

/// Signal all task loops to exit.
///
/// We keep it in its own function because we need to handle the error separately. A send error
/// just means that nothing is listening any more.
pub(crate) fn broadcast_protocol_end(protocol_tx: &tokio::sync::broadcast::Sender<Protocol>) {
    tracing::debug!("Broadcasting the protocol `End` message to all listeners");
    let result = protocol_tx.send(Protocol::End);
    if let Err(error) = result {
        tracing::debug!("No listeners for `End`: {error:?}");
    }
}

/// Prepare the application to start.
async fn setup(state: &Arc<SharedState>) -> Result<CliArgs> {
    let cli_args = CliArgs::parse();

    (*state.main_config_file.write().await).clone_from(&cli_args.main_config);

    let directory_result = Config::setup_directory(cli_args.config_dir.clone(), state).await;
    if let Err(directory_error) = directory_result {
        color_eyre::eyre::bail!("Error setting up config directory: {directory_error:?}");
    }

    let config_result = Config::load_config_into_shared_state(state).await;
    if let Err(config_error) = config_result {
        let path = Config::main_config_path(state).await;
        color_eyre::eyre::bail!(
            "Bad config file: {config_error:?}\n\nConfig path: {}",
            path.display()
        );
    }

    setup_logging(&cli_args, state).await?;

    tracing::info!("Starting Flurry");
    tracing::debug!("Loaded config: {:?}", state.config.read().await);

    Ok(cli_args)
}

/// Setup logging
async fn setup_logging(cli_args: &CliArgs, state: &Arc<SharedState>) -> Result<()> {
    let maybe_user_filters = std::env::var("FLURRY_LOG").ok();
    let mut path = state.config.read().await.log_path.clone();

    if let Some(cli_override_path) = cli_args.log_path.clone() {
        path = cli_override_path;
    }

    let mut level = state.config.read().await.log_level.clone();
    if let Some(cli_override_level) = cli_args.log_level.clone() {
        level = cli_override_level;
    }
    let level_as_string = format!("{level:?}").to_lowercase();

    let is_loggable =
        !matches!(level, crate::config::main::LogLevel::Off) || maybe_user_filters.is_some();

    if !is_loggable {
        return Ok(());
    }

    let directory = path.parent().context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(&path)?;

    let filters = if let Some(user_filters) = maybe_user_filters {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .parse_lossy(user_filters)
    } else {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .from_env_lossy()
            .add_directive(format!("flurry={level_as_string}").parse()?)
            .add_directive(format!("flurry_field={level_as_string}").parse()?)
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry().with(logfile_layer).init();

    *state.is_logging.write().await = true;

    Ok(())
}
