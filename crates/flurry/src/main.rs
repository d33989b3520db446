//! Just `main()`. Keep as small as possible.

pub mod cli_args;
/// All the user-configurable settings.
pub mod config {
    pub mod input;
    pub mod main;
}
pub mod layers;
pub mod pixels;
pub mod renderer;
pub mod run;
pub mod shared_state;
pub mod surface;

use color_eyre::eyre::Result;

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "It's our central place for communicating with the user on CLI"
)]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let state_arc = shared_state::SharedState::init();
    let result = run::run(&std::sync::Arc::clone(&state_arc)).await;

    let logpath = state_arc.config.read().await.log_path.clone();
    let is_logging = *state_arc.is_logging.read().await;
    tracing::debug!("Flurry is exiting");

    match result {
        Ok(()) => {
            if is_logging {
                println!("Logs saved to {}", logpath.display());
            }
        }
        Err(error) => {
            tracing::error!("{error:?}");
            eprintln!("Error: {error}");
            if is_logging {
                eprintln!("See {} for more details", logpath.display());
            }
        }
    }

    Ok(())
}
