//! Progress indicators with CI fallback

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A task spinner with CI fallback
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    ctx: UiContext,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            ctx: ctx.clone(),
        }
    }

    /// Start the spinner with a message
    pub fn start(&mut self, message: &str) {
        if self.ctx.use_fancy_output() {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            self.ctx.emit(&format!("{} {}", style("...").dim(), message));
        }
    }

    /// Stop with success message
    pub fn stop(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        } else {
            self.ctx.emit(&format!("{} {}", style("[OK]").green(), message));
        }
    }

    /// Stop with error message
    pub fn stop_error(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(message);
        } else {
            self.ctx.emit(&format!("{} {}", style("[FAIL]").red(), message));
        }
    }
}

/// What a pip output line says about install progress
#[derive(Debug, Clone, PartialEq, Eq)]
enum PipEvent<'a> {
    /// `Collecting <req>`: one more requirement being resolved
    Collecting(&'a str),
    /// `Installing collected packages: a, b`
    Installing(usize),
    /// Any other non-empty line
    Other(&'a str),
}

/// Spinner for pip installs.
///
/// Counts `Collecting` lines and shows the package currently being
/// handled in interactive mode, or one line per package in CI.
pub struct InstallProgress {
    bar: Option<ProgressBar>,
    ctx: UiContext,
}

impl InstallProgress {
    pub fn new(ctx: &UiContext, label: &str) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new_spinner();
            if let Ok(spinner_style) = ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {prefix} {pos} collected {msg:.dim}  {elapsed:.dim}")
            {
                bar.set_style(spinner_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            ctx.emit(&format!("{}...", label));
            None
        };
        Self {
            bar,
            ctx: ctx.clone(),
        }
    }

    /// Feed one line of pip output
    pub fn on_line(&self, line: String) {
        match parse_pip_line(&line) {
            Some(PipEvent::Collecting(req)) => match self.bar {
                Some(ref bar) => {
                    bar.inc(1);
                    bar.set_message(req.to_string());
                }
                None => self.ctx.emit(&format!("  collecting {}", req)),
            },
            Some(PipEvent::Installing(count)) => match self.bar {
                Some(ref bar) => bar.set_message(format!("installing {} package(s)", count)),
                None => self.ctx.emit(&format!("  installing {} package(s)", count)),
            },
            Some(PipEvent::Other(text)) => {
                if let Some(ref bar) = self.bar {
                    bar.set_message(truncate(text, 60));
                }
            }
            None => {}
        }
    }

    /// Finish and clear the spinner
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

fn parse_pip_line(line: &str) -> Option<PipEvent<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(req) = line.strip_prefix("Collecting ") {
        return Some(PipEvent::Collecting(req.trim()));
    }
    if let Some(list) = line.strip_prefix("Installing collected packages:") {
        let count = list.split(',').filter(|p| !p.trim().is_empty()).count();
        return Some(PipEvent::Installing(count));
    }
    Some(PipEvent::Other(line))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", head)
}
