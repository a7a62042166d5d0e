//! Interactive review UI.
//!
//! A terminal front-end for the keep/delete decision: the unused images
//! are listed, each one can be marked for deletion, and nothing is
//! removed until the marks are explicitly committed. Quitting without
//! committing leaves every file in place.

mod app;

pub use app::{run_review, ReviewApp, ReviewOutcome};

use std::io;

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::report::ScanReport;

/// Run the review UI over a scan report's unused images.
///
/// Sets up and tears down the alternate screen; the caller applies the
/// returned marks.
pub fn review_report(report: &ScanReport) -> io::Result<ReviewOutcome> {
    let mut app = ReviewApp::new(&report.unused);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_review(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
