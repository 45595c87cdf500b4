// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let fg = |code| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));

    Styles::styled()
        .header(fg(colors::codes::HEADER))
        .usage(fg(colors::codes::HEADER))
        .literal(fg(colors::codes::LITERAL))
        .placeholder(fg(colors::codes::CONTEXT))
        .valid(fg(colors::codes::CONTEXT))
}

/// Header color, or plain text when colors are off.
fn header(text: &str) -> String {
    if colors::should_colorize() {
        colors::header(text)
    } else {
        text.to_string()
    }
}

/// Literal color, or plain text when colors are off.
fn literal(text: &str) -> String {
    if colors::should_colorize() {
        colors::literal(text)
    } else {
        text.to_string()
    }
}

/// Main help template with the command list ahead of the options.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        header("Options:")
    )
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    format!(
        "\
{header_journey}
  {status}    Sync once and print where the journey is
  {watch}     Keep polling and print the journey as it moves
  {timeline}  Print the merged stop and card timeline
  {details}   Fetch extra details for one stop

{header_setup}
  {config}    Show or create the client configuration
",
        header_journey = header("Journey:"),
        header_setup = header("Setup:"),
        status = literal("status"),
        watch = literal("watch"),
        timeline = literal("timeline"),
        details = literal("details"),
        config = literal("config"),
    )
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  trek config init           Write a default config file
  trek status                Where is the journey now?
  trek watch                 Follow along until the server stops",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
