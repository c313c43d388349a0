pub mod grid;

use std::rc::Rc;
use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Cursor, Popup};
use crate::game::lifecycle::Phase;
use crate::game::{Board, RevealState};
use crate::theme::Theme;
use grid::GridLayout;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from config. Only the first call has an effect.
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn board_bg() -> Color { theme().board }
fn mask() -> Color { theme().mask }
fn question() -> Color { theme().question }
fn answer() -> Color { theme().answer }
fn header() -> Color { theme().header }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn inactive() -> Color { theme().inactive }

/// Rows given to the selected-clue strip under the board
const DETAIL_HEIGHT: u16 = 6;

fn main_chunks(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Min(0),    // Board
            Constraint::Length(DETAIL_HEIGHT), // Full text of the selected clue
            Constraint::Length(1), // Footer
        ])
        .split(area)
}

fn board_block() -> Block<'static> {
    Block::default()
        .title(Span::styled(" Trivia Board ", Style::default().fg(accent()).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()))
}

/// Region the clue grid occupies for a given terminal area
pub fn board_area(area: Rect) -> Rect {
    board_block().inner(main_chunks(area)[1])
}

pub fn draw<S>(f: &mut Frame, app: &App<S>) {
    let chunks = main_chunks(f.area());

    draw_info_line(f, app, chunks[0]);

    let block = board_block();
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    match app.lifecycle.phase() {
        Phase::Ready(board) => draw_grid(f, board, app.cursor, inner),
        Phase::Loading => draw_loading(f, app.load_error.as_deref(), inner),
        Phase::Idle => {}
    }

    if let Phase::Ready(board) = app.lifecycle.phase() {
        draw_detail(f, board, app.cursor, chunks[2]);
    }

    draw_footer(f, chunks[3]);

    if app.popup == Popup::Help {
        draw_help_popup(f);
    }
}

fn draw_info_line<S>(f: &mut Frame, app: &App<S>, area: Rect) {
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status.as_str(), Style::default().fg(accent())))
    } else {
        match app.lifecycle.phase() {
            Phase::Ready(board) => {
                let total = board.categories().iter().map(|c| c.clues().len()).sum::<usize>();
                Line::from(vec![
                    Span::styled("Revealed ", Style::default().fg(text_dim())),
                    Span::styled(board.revealed_count().to_string(), Style::default().fg(text())),
                    Span::styled(format!(" of {} clues", total), Style::default().fg(text_dim())),
                ])
            }
            Phase::Loading => Line::from(Span::styled("Loading…", Style::default().fg(text_dim()))),
            Phase::Idle => Line::from(Span::styled("Press r to start", Style::default().fg(text_dim()))),
        }
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_grid(f: &mut Frame, board: &Board, cursor: Cursor, area: Rect) {
    let grid = GridLayout::new(area);

    for (category_idx, category) in board.categories().iter().enumerate() {
        if let Some(rect) = grid.header(category_idx) {
            let title = Paragraph::new(category.title().to_uppercase())
                .style(Style::default().fg(header()).bg(board_bg()).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(inactive())),
                );
            f.render_widget(title, rect);
        }

        for (clue_idx, clue) in category.clues().iter().enumerate() {
            let Some(rect) = grid.cell(category_idx, clue_idx) else {
                continue;
            };

            let is_selected = cursor == Cursor { category: category_idx, clue: clue_idx };
            let border_style = if is_selected {
                Style::default().fg(accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(inactive())
            };
            let text_style = match clue.reveal_state() {
                RevealState::Hidden => Style::default().fg(mask()).add_modifier(Modifier::BOLD),
                RevealState::Question => Style::default().fg(question()),
                RevealState::Answer => Style::default().fg(answer()).add_modifier(Modifier::ITALIC),
            };

            let cell = Paragraph::new(Span::styled(clue.display_text(), text_style))
                .style(Style::default().bg(board_bg()))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(border_style));
            f.render_widget(cell, rect);
        }
    }
}

/// Cells only fit a few words; the strip shows the selected clue in full.
fn draw_detail(f: &mut Frame, board: &Board, cursor: Cursor, area: Rect) {
    let Some(category) = board.categories().get(cursor.category) else {
        return;
    };
    let Some(clue) = category.clues().get(cursor.clue) else {
        return;
    };

    let (label, body) = match clue.reveal_state() {
        RevealState::Hidden => (
            "Hidden",
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(text_dim())),
                Span::styled("Enter", Style::default().fg(accent())),
                Span::styled(" or click to reveal", Style::default().fg(text_dim())),
            ]),
        ),
        RevealState::Question => (
            "Question",
            Line::from(Span::styled(clue.display_text(), Style::default().fg(text()))),
        ),
        RevealState::Answer => (
            "Answer",
            Line::from(Span::styled(
                clue.display_text(),
                Style::default().fg(answer()).add_modifier(Modifier::ITALIC),
            )),
        ),
    };

    let title = format!(" {} · row {} · {} ", category.title().to_uppercase(), cursor.clue + 1, label);
    let detail = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(header()).add_modifier(Modifier::BOLD)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(inactive())),
        );
    f.render_widget(detail, area);
}

fn draw_loading(f: &mut Frame, load_error: Option<&str>, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "󰔟 Loading categories…",
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        )),
    ];

    if let Some(error) = load_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("Load failed: {}", error), Style::default().fg(danger()))));
        lines.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(text_dim())),
            Span::styled("r", Style::default().fg(accent())),
            Span::styled(" to try a new board", Style::default().fg(text_dim())),
        ]));
    }

    let loading = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(loading, centered_rect(80, 50, area));
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let hints = [
        ("←↑↓→", "move"),
        ("Enter", "reveal"),
        ("click", "reveal"),
        ("r", "restart"),
        ("?", "help"),
        ("q", "quit"),
    ];

    let mut spans = Vec::new();
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(inactive())));
        }
        spans.push(Span::styled(*key, Style::default().fg(accent())));
        spans.push(Span::styled(format!(" {}", label), Style::default().fg(text_dim())));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 60 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled("═══ Board ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  ←↑↓→ hjkl  ", Style::default().fg(accent())),
            Span::raw("Move between clues"),
        ]),
        Line::from(vec![
            Span::styled("  Enter/Space ", Style::default().fg(accent())),
            Span::raw("Show the question, then the answer"),
        ]),
        Line::from(vec![
            Span::styled("  Click       ", Style::default().fg(accent())),
            Span::raw("Same as Enter on the clicked clue"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Game ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  r           ", Style::default().fg(accent())),
            Span::raw("Restart with six new categories"),
        ]),
        Line::from(vec![
            Span::styled("  q / Ctrl-C  ", Style::default().fg(accent())),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
