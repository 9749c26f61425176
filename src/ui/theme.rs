//! Prompt colors
//!
//! Green while a prompt waits for input, red on a rejected answer, dimmed
//! once the prompt is answered or cancelled.

use super::context::UiContext;
use cliclack::ThemeState;
use console::Style;

#[derive(Debug, Clone, Default)]
pub struct PoolTheme;

/// Bar color and state symbol color for one prompt state
fn palette(state: &ThemeState) -> (Style, Style) {
    match state {
        ThemeState::Active => (Style::new().green(), Style::new().green().bold()),
        ThemeState::Submit => (Style::new().dim(), Style::new().green()),
        ThemeState::Cancel => (Style::new().dim(), Style::new().yellow()),
        ThemeState::Error(_) => (Style::new().red(), Style::new().red().bold()),
    }
}

impl cliclack::Theme for PoolTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        palette(state).0
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        palette(state).1
    }
}

/// Install the theme when prompts and framing will be drawn
pub fn init_theme(ctx: &UiContext) {
    if ctx.use_fancy_output() {
        cliclack::set_theme(PoolTheme);
    }
}
