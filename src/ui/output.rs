//! Status lines for command output
//!
//! Interactive runs go through cliclack's framed log. Plain runs print one
//! tagged line per event, on stderr when stdout carries the command's result.

use super::context::UiContext;
use console::style;

#[derive(Debug, Clone, Copy)]
enum Tag {
    Ok,
    Warn,
    Info,
}

fn plain_line(tag: Tag, message: &str) -> String {
    let label = match tag {
        Tag::Ok => style("[OK]").green(),
        Tag::Warn => style("[WARN]").yellow(),
        Tag::Info => style("[INFO]").cyan(),
    };
    format!("  {} {}", label, message)
}

fn status(ctx: &UiContext, tag: Tag, message: &str) {
    if !ctx.use_fancy_output() {
        ctx.emit(&plain_line(tag, message));
        return;
    }
    let shown = match tag {
        Tag::Ok => cliclack::log::success(message),
        Tag::Warn => cliclack::log::warning(message),
        Tag::Info => cliclack::log::info(message),
    };
    shown.ok();
}

/// Title line opening a command
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        ctx.emit(&style(title).cyan().bold().to_string());
    }
}

/// Closing line of a successful command
pub fn outro_success(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).green().bold()).ok();
    } else {
        ctx.emit(&plain_line(Tag::Ok, message));
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    status(ctx, Tag::Ok, message);
}

/// Success with a dimmed detail, usually a name or path
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    status(ctx, Tag::Ok, &format!("{} ({})", message, style(detail).dim()));
}

pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    status(ctx, Tag::Warn, &format!("{} - {}", message, style(hint).dim()));
}

pub fn step_info(ctx: &UiContext, message: &str) {
    status(ctx, Tag::Info, message);
}

/// Dimmed aside, e.g. how to skip a prompt
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        ctx.emit(&format!("  {}", style(message).dim()));
    }
}

pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    ctx.emit(&format!("  {}: {}", style(key).dim(), value));
}
