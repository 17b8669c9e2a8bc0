//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`compact`]: The one-line summary, always shown
//! - [`expanded`]: Rate chart, latency bars, and readouts
//! - [`common`]: Shared components (header, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Summary (compact::render)            │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Charts (expanded::render)            │
//! │ only while expanded                  │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!    Help overlay rendered on top.
//! ```

pub mod common;
pub mod compact;
pub mod expanded;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::App;

/// Draw one frame of the whole dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let [header, summary, charts, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    common::render_header(frame, app, header);
    compact::render(frame, app, summary);
    if app.expanded {
        expanded::render(frame, app, charts);
    }
    common::render_status_bar(frame, app, status);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}
