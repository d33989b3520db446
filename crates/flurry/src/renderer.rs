//! Render frames to the user's terminal

use color_eyre::eyre::Result;
use termwiz::surface::Change as TermwizChange;
use termwiz::terminal::buffered::BufferedTerminal;
use termwiz::terminal::{SystemTerminal, Terminal as TermwizTerminal};

/// Microseconds in a second, for working out frame durations.
pub const ONE_MICROSECOND: u64 = 1_000_000;

/// `Render`
pub(crate) struct Renderer {
    /// The user's terminal, with a diffing buffer in front of it.
    terminal: BufferedTerminal<SystemTerminal>,
}

impl Renderer {
    /// Take over the user's terminal: raw mode, alternate screen and no cursor.
    pub fn new() -> Result<Self> {
        let capabilities = termwiz::caps::Capabilities::new_from_env()?;
        let mut users_terminal = SystemTerminal::new(capabilities)?;

        tracing::debug!("Putting user's terminal into raw mode");
        users_terminal.set_raw_mode()?;
        users_terminal.enter_alternate_screen()?;

        let mut terminal = BufferedTerminal::new(users_terminal)?;
        terminal.add_change(TermwizChange::CursorVisibility(
            termwiz::surface::CursorVisibility::Hidden,
        ));
        terminal.add_change(TermwizChange::ClearScreen(
            termwiz::color::ColorAttribute::Default,
        ));
        terminal.flush()?;

        Ok(Self { terminal })
    }

    /// The terminal's size in cells.
    pub fn dimensions(&self) -> (usize, usize) {
        self.terminal.dimensions()
    }

    /// Check whether the user's terminal has changed size, returning the new size if it has.
    pub fn check_for_resize(&mut self) -> Result<Option<(usize, usize)>> {
        if !self.terminal.check_for_resize()? {
            return Ok(None);
        }

        self.terminal.repaint()?;
        let dimensions = self.terminal.dimensions();
        tracing::debug!("Terminal resized to {dimensions:?}");
        Ok(Some(dimensions))
    }

    /// Collect all the input that's waiting, without blocking.
    pub fn poll_input(&mut self) -> Result<Vec<termwiz::input::InputEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self
            .terminal
            .terminal()
            .poll_input(Some(std::time::Duration::ZERO))?
        {
            tracing::trace!("Parsed input event: {event:?}");
            events.push(event);
        }
        Ok(events)
    }

    /// Do a single render to the user's actual terminal. It uses a diffing algorithm to make
    /// the minimum number of changes.
    pub fn render(&mut self, frame: &crate::surface::Surface) -> Result<()> {
        self.terminal.draw_from_screen(&frame.surface, 0, 0);
        self.terminal.flush()?;
        Ok(())
    }

    /// Give the user their terminal back, just as it was.
    pub fn restore(&mut self) -> Result<()> {
        tracing::debug!("Setting user's terminal to cooked mode");
        self.terminal.add_change(TermwizChange::CursorVisibility(
            termwiz::surface::CursorVisibility::Visible,
        ));
        self.terminal.flush()?;

        let users_terminal = self.terminal.terminal();
        users_terminal.exit_alternate_screen()?;
        users_terminal.set_cooked_mode()?;
        Ok(())
    }
}
