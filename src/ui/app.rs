//! Review application state and TUI event loop.
//!
//! Holds the list of unused images, the per-item deletion marks, and the
//! fuzzy filter, and renders them as a scrollable list. The event loop
//! ends in one of two outcomes: the marks are committed (after an
//! explicit confirmation), or the review is abandoned and nothing is
//! deleted.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use crate::report::UnusedImage;

/// How the review ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The user quit; nothing is to be deleted.
    Abandoned,
    /// The user confirmed deletion of the marked images.
    Confirmed(Vec<UnusedImage>),
}

/// One reviewable entry: an unused image plus its deletion mark.
#[derive(Debug, Clone)]
struct ReviewEntry {
    image: UnusedImage,
    marked: bool,
}

/// Application state for the review UI.
pub struct ReviewApp {
    entries: Vec<ReviewEntry>,
    /// Selected position within the current (possibly filtered) view.
    selected_index: usize,
    list_state: ListState,
    /// Whether the search prompt is capturing keystrokes.
    pub search_active: bool,
    /// Current search query.
    pub search_query: String,
    /// Indices into `entries` matching the query.
    filtered: Vec<usize>,
    /// Whether the confirm-deletion overlay is showing.
    pub confirm_active: bool,
    outcome: Option<ReviewOutcome>,
}

impl ReviewApp {
    /// Create the review state over the unused images.
    pub fn new(unused: &[UnusedImage]) -> Self {
        let entries = unused
            .iter()
            .map(|image| ReviewEntry {
                image: image.clone(),
                marked: false,
            })
            .collect();
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            entries,
            selected_index: 0,
            list_state,
            search_active: false,
            search_query: String::new(),
            filtered: Vec::new(),
            confirm_active: false,
            outcome: None,
        }
    }

    /// Indices of the entries in the current view.
    fn visible(&self) -> Vec<usize> {
        if self.search_query.is_empty() {
            (0..self.entries.len()).collect()
        } else {
            self.filtered.clone()
        }
    }

    fn visible_len(&self) -> usize {
        if self.search_query.is_empty() {
            self.entries.len()
        } else {
            self.filtered.len()
        }
    }

    /// Move selection to the next item.
    pub fn select_next(&mut self) {
        let total = self.visible_len();
        if total > 0 {
            self.selected_index = (self.selected_index + 1).min(total - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    /// Move selection to the previous item.
    pub fn select_previous(&mut self) {
        if self.visible_len() > 0 && self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        if self.visible_len() > 0 {
            self.selected_index = 0;
            self.list_state.select(Some(0));
        }
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        let total = self.visible_len();
        if total > 0 {
            self.selected_index = total - 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    /// Toggle the deletion mark on the selected item.
    pub fn toggle_mark(&mut self) {
        let visible = self.visible();
        if let Some(&entry_idx) = visible.get(self.selected_index) {
            self.entries[entry_idx].marked = !self.entries[entry_idx].marked;
        }
    }

    /// Mark every item in the current view for deletion.
    pub fn mark_all(&mut self) {
        for idx in self.visible() {
            self.entries[idx].marked = true;
        }
    }

    /// Clear every deletion mark.
    pub fn clear_marks(&mut self) {
        for entry in &mut self.entries {
            entry.marked = false;
        }
    }

    /// Number of marked items.
    pub fn marked_count(&self) -> usize {
        self.entries.iter().filter(|e| e.marked).count()
    }

    /// The marked images, in list order.
    pub fn marked_images(&self) -> Vec<UnusedImage> {
        self.entries
            .iter()
            .filter(|e| e.marked)
            .map(|e| e.image.clone())
            .collect()
    }

    /// Open the confirmation overlay; a no-op when nothing is marked.
    pub fn request_commit(&mut self) {
        if self.marked_count() > 0 {
            self.confirm_active = true;
        }
    }

    /// Confirm the commit: the marks become the outcome.
    pub fn confirm_commit(&mut self) {
        self.confirm_active = false;
        self.outcome = Some(ReviewOutcome::Confirmed(self.marked_images()));
    }

    /// Dismiss the confirmation overlay without committing.
    pub fn cancel_commit(&mut self) {
        self.confirm_active = false;
    }

    /// End the review without deleting anything.
    pub fn abandon(&mut self) {
        self.outcome = Some(ReviewOutcome::Abandoned);
    }

    /// The outcome, once one of the ending actions ran.
    pub fn outcome(&self) -> Option<&ReviewOutcome> {
        self.outcome.as_ref()
    }

    fn take_outcome(&mut self) -> Option<ReviewOutcome> {
        self.outcome.take()
    }

    /// Start search mode.
    pub fn start_search(&mut self) {
        self.search_active = true;
        self.search_query.clear();
        self.update_filter();
    }

    /// Clear search and return to the full list.
    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.filtered.clear();
        self.selected_index = 0;
        self.list_state.select(Some(0));
    }

    /// Add a character to the search query.
    pub fn search_push(&mut self, c: char) {
        self.search_query.push(c);
        self.update_filter();
    }

    /// Remove the last character from the search query.
    pub fn search_pop(&mut self) {
        self.search_query.pop();
        self.update_filter();
    }

    fn update_filter(&mut self) {
        self.filtered = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| fuzzy_match(&e.image.id, &self.search_query))
            .map(|(i, _)| i)
            .collect();
        self.selected_index = 0;
        self.list_state.select(Some(0));
    }
}

/// Fuzzy matching of query against text (case-insensitive): every query
/// character must appear in order in the text.
fn fuzzy_match(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let text_lower = text.to_lowercase();
    let query_lower = query.to_lowercase();

    let mut query_chars = query_lower.chars().peekable();
    for c in text_lower.chars() {
        if let Some(&q) = query_chars.peek() {
            if c == q {
                query_chars.next();
            }
        }
        if query_chars.peek().is_none() {
            return true;
        }
    }
    query_chars.peek().is_none()
}

/// Run the review event loop until an outcome is reached.
pub fn run_review<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut ReviewApp,
) -> io::Result<ReviewOutcome> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if app.confirm_active {
                    match key.code {
                        KeyCode::Char('y') | KeyCode::Enter => app.confirm_commit(),
                        KeyCode::Char('n') | KeyCode::Esc => app.cancel_commit(),
                        _ => {}
                    }
                } else if app.search_active {
                    match key.code {
                        KeyCode::Esc => app.clear_search(),
                        KeyCode::Enter => app.search_active = false,
                        KeyCode::Backspace => app.search_pop(),
                        KeyCode::Down | KeyCode::Tab => app.select_next(),
                        KeyCode::Up | KeyCode::BackTab => app.select_previous(),
                        KeyCode::Char(c) => app.search_push(c),
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') => app.abandon(),
                        KeyCode::Esc => {
                            if !app.search_query.is_empty() {
                                app.clear_search();
                            } else {
                                app.abandon();
                            }
                        }
                        KeyCode::Char('/') => app.start_search(),
                        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
                        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
                        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
                        KeyCode::End | KeyCode::Char('G') => app.select_last(),
                        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_mark(),
                        KeyCode::Char('a') => app.mark_all(),
                        KeyCode::Char('n') => app.clear_marks(),
                        KeyCode::Char('d') => app.request_commit(),
                        _ => {}
                    }
                }
            }
        }

        if let Some(outcome) = app.take_outcome() {
            return Ok(outcome);
        }
    }
}

/// Render the application UI.
fn render(frame: &mut Frame, app: &mut ReviewApp) {
    let show_search = app.search_active || !app.search_query.is_empty();

    let constraints = if show_search {
        vec![
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // List
            Constraint::Length(3), // Footer
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    if show_search {
        render_header(frame, app, chunks[0]);
        render_search_bar(frame, app, chunks[1]);
        render_list(frame, app, chunks[2]);
        render_footer(frame, app, chunks[3]);
    } else {
        render_header(frame, app, chunks[0]);
        render_list(frame, app, chunks[1]);
        render_footer(frame, app, chunks[2]);
    }

    if app.confirm_active {
        render_confirm(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &ReviewApp, area: Rect) {
    let title = format!(
        "AssetScope - Review Unused Images ({} unused, {} marked)",
        app.entries.len(),
        app.marked_count()
    );
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_search_bar(frame: &mut Frame, app: &ReviewApp, area: Rect) {
    let (border_color, title) = if app.search_active {
        (Color::Yellow, "Search (Enter to confirm, Esc to cancel)")
    } else {
        (Color::Gray, "Filter (/ to edit, Esc to clear)")
    };

    let search_display = format!("/{}", app.search_query);
    let cursor = if app.search_active { "_" } else { "" };
    let result_count = if !app.search_query.is_empty() {
        format!(" ({} matches)", app.filtered.len())
    } else {
        String::new()
    };

    let content = Line::from(vec![
        Span::styled(search_display, Style::default().fg(Color::White)),
        Span::styled(
            cursor,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
        Span::styled(result_count, Style::default().fg(Color::DarkGray)),
    ]);

    let search_bar = Paragraph::new(content).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(search_bar, area);
}

fn render_list(frame: &mut Frame, app: &mut ReviewApp, area: Rect) {
    let visible = app.visible();

    let items: Vec<ListItem> = visible
        .iter()
        .map(|&idx| {
            let entry = &app.entries[idx];
            let (mark, mark_color) = if entry.marked {
                ("[x] ", Color::Red)
            } else {
                ("[ ] ", Color::DarkGray)
            };
            let file_note = if entry.image.paths.len() > 1 {
                format!(" ({} files)", entry.image.paths.len())
            } else {
                String::new()
            };

            let spans = vec![
                Span::styled(mark, Style::default().fg(mark_color)),
                Span::styled(
                    entry.image.id.clone(),
                    if entry.marked {
                        Style::default()
                            .fg(Color::Red)
                            .add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
                Span::styled(file_note, Style::default().fg(Color::DarkGray)),
            ];
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if app.search_query.is_empty() {
        format!("Unused Images ({})", visible.len())
    } else {
        format!("Unused Images (filtered: {} matches)", visible.len())
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_footer(frame: &mut Frame, app: &ReviewApp, area: Rect) {
    let help_text = if app.search_active {
        Line::from(vec![
            Span::styled("Type", Style::default().fg(Color::Yellow)),
            Span::raw(" to filter  "),
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(" Navigate  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Confirm  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ])
    } else {
        Line::from(vec![
            Span::styled("j/k", Style::default().fg(Color::Yellow)),
            Span::raw(" Nav  "),
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw(" Mark  "),
            Span::styled("a", Style::default().fg(Color::Yellow)),
            Span::raw(" Mark all  "),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw(" Clear  "),
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(" Filter  "),
            Span::styled("d", Style::default().fg(Color::Yellow)),
            Span::raw(" Delete marked  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" Quit without deleting"),
        ])
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_confirm(frame: &mut Frame, app: &ReviewApp) {
    let marked = app.marked_count();
    let files: usize = app
        .entries
        .iter()
        .filter(|e| e.marked)
        .map(|e| e.image.paths.len())
        .sum();

    let area = centered_rect(50, 20, frame.area());
    let text = vec![
        Line::from(format!(
            "Permanently delete {} image{} ({} file{})?",
            marked,
            if marked == 1 { "" } else { "s" },
            files,
            if files == 1 { "" } else { "s" },
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw(" go back"),
        ]),
    ];

    let dialog = Paragraph::new(text).block(
        Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

/// A centered rect occupying the given percentages of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
