//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;
use serde::Deserialize;

/// Series line color.
const LINE_PURPLE: Color = Color::Rgb(0x88, 0x84, 0xd8);
/// Anomaly marker and alert value color.
const ALERT_RED: Color = Color::Rgb(0xff, 0x00, 0x00);

/// Which theme to use.
///
/// Selected once at startup; nothing toggles it at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Pick from the terminal background luminance.
    #[default]
    Auto,
    Light,
    Dark,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        })
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ThemeMode::Auto),
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme '{}' (expected auto, light or dark)", other)),
        }
    }
}

/// Color and style theme for the TUI.
///
/// Use [`Theme::from_mode()`] to honor the configured [`ThemeMode`], or
/// [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for titles and overlays.
    pub highlight: Color,
    /// Color of the series line.
    pub line: Color,
    /// Color for anomaly markers and alert-toned card values.
    pub alert: Color,
    /// Color for axis labels.
    pub axis: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for card and panel titles.
    pub title: Style,
    /// Style for card values.
    pub value: Style,
    /// Style for secondary text (descriptions, hints).
    pub muted: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            line: LINE_PURPLE,
            alert: ALERT_RED,
            axis: Color::Gray,
            border: Color::Gray,
            title: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            line: LINE_PURPLE,
            alert: ALERT_RED,
            axis: Color::DarkGray,
            border: Color::DarkGray,
            title: Style::default().fg(Color::DarkGray),
            value: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::auto_detect(),
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Style for a card value of the given tone.
    pub fn value_style(&self, alert: bool) -> Style {
        if alert {
            self.value.fg(self.alert)
        } else {
            self.value
        }
    }
}
