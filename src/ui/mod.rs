//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`cards`]: The four summary cards fed by the metrics snapshot
//! - [`chart`]: Line chart of the series with anomaly markers and tooltip
//! - [`common`]: Shared components (header, status bar, help overlay, tooltip)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` lays the screen out as:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├─────────┬─────────┬─────────┬────────┤
//! │ Card    │ Card    │ Card    │ Card   │
//! ├─────────┴─────────┴─────────┴────────┤
//! │                                      │
//! │ Chart (chart::render)                │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - common::render_tooltip
//!    - common::render_help
//! ```

pub mod cards;
pub mod chart;
pub mod common;
pub mod theme;

pub use chart::ChartModel;
pub use theme::{Theme, ThemeMode};
