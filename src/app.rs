use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::game::board::{CATEGORY_COUNT, CLUES_PER_CATEGORY};
use crate::game::{sampler, Board, Lifecycle, RevealOutcome, RevealState};
use crate::trivia::{load_board, TriviaError, TriviaSource};
use crate::ui::grid::GridLayout;

/// How long a status message stays on the info line
const STATUS_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

/// Keyboard cursor over the clue grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub category: usize,
    pub clue: usize,
}

/// Result of one fetch cycle, tagged with the generation that started it
struct LoadEvent {
    generation: u64,
    result: Result<Board, TriviaError>,
}

pub struct App<S> {
    pub popup: Popup,
    pub cursor: Cursor,

    // Board and Idle/Loading/Ready state
    pub lifecycle: Lifecycle,

    // Why the last fetch cycle failed, shown under the loading indicator
    pub load_error: Option<String>,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    source: Arc<S>,
    rng: StdRng,
    events_tx: mpsc::UnboundedSender<LoadEvent>,
    events_rx: mpsc::UnboundedReceiver<LoadEvent>,
    load_task: Option<JoinHandle<()>>,
}

impl<S: TriviaSource + 'static> App<S> {
    pub fn new(source: S, seed: Option<u64>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            popup: Popup::None,
            cursor: Cursor::default(),

            lifecycle: Lifecycle::new(),
            load_error: None,

            status_message: None,
            status_message_time: None,

            source: Arc::new(source),
            rng: sampler::rng_from_seed(seed),
            events_tx,
            events_rx,
            load_task: None,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn board(&self) -> Option<&Board> {
        self.lifecycle.board()
    }

    /// Throw away the current board and start a fresh fetch cycle.
    ///
    /// A cycle still in flight is aborted; if its result is already queued it
    /// carries an old generation and `tick` drops it.
    pub fn restart(&mut self) {
        if let Some(task) = self.load_task.take() {
            if !task.is_finished() {
                tracing::info!(
                    generation = self.lifecycle.generation(),
                    "Cancelling in-flight board load"
                );
                task.abort();
            }
        }

        let generation = self.lifecycle.begin_loading();
        self.cursor = Cursor::default();
        self.load_error = None;
        tracing::info!(generation, "Loading new board");

        let source = Arc::clone(&self.source);
        let events_tx = self.events_tx.clone();
        let mut rng = StdRng::seed_from_u64(self.rng.random());

        self.load_task = Some(tokio::spawn(async move {
            let result = load_board(source.as_ref(), &mut rng).await;
            // Receiver lives as long as the app; a send error means we're shutting down
            let _ = events_tx.send(LoadEvent { generation, result });
        }));
    }

    /// Apply finished fetch cycles and expire the status message.
    pub fn tick(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_load_event(event);
        }

        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    fn apply_load_event(&mut self, event: LoadEvent) {
        if event.generation != self.lifecycle.generation() {
            tracing::debug!(generation = event.generation, "Dropping stale board load");
            return;
        }

        match event.result {
            Ok(board) => {
                if self.lifecycle.finish_loading(event.generation, board) {
                    self.load_task = None;
                    self.set_status("New board ready");
                }
            }
            Err(e) => {
                // No retry: stay in Loading until the user restarts
                tracing::error!(generation = event.generation, error = %e, "Board load failed");
                self.load_task = None;
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Advance the clue at `(category, clue)` one reveal step.
    pub fn reveal(&mut self, category: usize, clue: usize) -> Result<()> {
        let Some(board) = self.lifecycle.board_mut() else {
            return Ok(());
        };

        match board.reveal(category, clue)? {
            RevealOutcome::Revealed(state) => {
                let what = match state {
                    RevealState::Question => "question",
                    _ => "answer",
                };
                tracing::debug!(category, clue, "Revealed {}", what);
            }
            RevealOutcome::Unchanged => {}
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup == Popup::Help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')
            ) {
                self.popup = Popup::None;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor.category = self.cursor.category.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.cursor.category = (self.cursor.category + 1).min(CATEGORY_COUNT - 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor.clue = self.cursor.clue.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor.clue = (self.cursor.clue + 1).min(CLUES_PER_CATEGORY - 1);
            }

            KeyCode::Char(' ') | KeyCode::Enter => {
                let Cursor { category, clue } = self.cursor;
                self.reveal(category, clue)?;
            }

            KeyCode::Char('r') => self.restart(),

            KeyCode::Char('?') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    /// Left click on a clue cell moves the cursor there and reveals it.
    /// `area` is the whole terminal.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect) -> Result<()> {
        if self.popup != Popup::None || !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return Ok(());
        }
        if self.lifecycle.board().is_none() {
            return Ok(());
        }

        let grid = GridLayout::new(crate::ui::board_area(area));
        if let Some((category, clue)) = grid.hit_test(mouse.column, mouse.row) {
            self.cursor = Cursor { category, clue };
            self.reveal(category, clue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trivia::fake::FakeSource;
    use crossterm::event::KeyModifiers;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Tick until the current cycle resolves one way or the other
    async fn settle<S: TriviaSource + 'static>(app: &mut App<S>) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while app.lifecycle.is_loading() && app.load_error.is_none() {
                tokio::time::sleep(Duration::from_millis(5)).await;
                app.tick();
            }
        })
        .await
        .expect("board load did not settle");
    }

    #[tokio::test]
    async fn test_initial_load_builds_full_board() {
        let mut app = App::new(FakeSource::new(100), Some(1));
        assert!(app.board().is_none());

        app.restart();
        assert!(app.lifecycle.is_loading());
        settle(&mut app).await;

        let board = app.board().unwrap();
        assert_eq!(board.categories().len(), 6);
        assert!(board.categories().iter().all(|c| c.clues().len() == 5));
        assert_eq!(board.revealed_count(), 0);
    }

    #[tokio::test]
    async fn test_keyboard_reveal_sequence() {
        let mut app = App::new(FakeSource::new(100), Some(2));
        app.restart();
        settle(&mut app).await;

        for _ in 0..2 {
            app.handle_key(key(KeyCode::Right)).unwrap();
        }
        for _ in 0..3 {
            app.handle_key(key(KeyCode::Down)).unwrap();
        }
        assert_eq!(app.cursor, Cursor { category: 2, clue: 3 });

        let (question, answer) = {
            let clue = app.board().unwrap().clue(2, 3).unwrap();
            (clue.question().to_string(), clue.answer().to_string())
        };

        let mut shown = Vec::new();
        for _ in 0..3 {
            app.handle_key(key(KeyCode::Enter)).unwrap();
            shown.push(app.board().unwrap().clue(2, 3).unwrap().display_text().to_string());
        }
        assert_eq!(shown, [question, answer.clone(), answer]);
    }

    #[tokio::test]
    async fn test_cursor_stays_on_board() {
        let mut app = App::new(FakeSource::new(100), Some(2));
        for _ in 0..10 {
            app.handle_key(key(KeyCode::Right)).unwrap();
            app.handle_key(key(KeyCode::Down)).unwrap();
        }
        assert_eq!(app.cursor, Cursor { category: 5, clue: 4 });

        for _ in 0..10 {
            app.handle_key(key(KeyCode::Left)).unwrap();
            app.handle_key(key(KeyCode::Up)).unwrap();
        }
        assert_eq!(app.cursor, Cursor::default());
    }

    #[tokio::test]
    async fn test_restart_replaces_board() {
        let mut app = App::new(FakeSource::new(100), Some(3));
        app.restart();
        settle(&mut app).await;
        app.reveal(0, 0).unwrap();
        app.reveal(1, 1).unwrap();
        assert_eq!(app.board().unwrap().revealed_count(), 2);

        app.handle_key(key(KeyCode::Char('r'))).unwrap();
        assert!(app.board().is_none());
        settle(&mut app).await;

        assert_eq!(app.lifecycle.generation(), 2);
        assert_eq!(app.board().unwrap().revealed_count(), 0);
    }

    #[tokio::test]
    async fn test_restart_while_loading_keeps_latest() {
        let mut app = App::new(FakeSource::new(100).with_reverse_latency(), Some(4));
        app.restart();
        app.restart();
        app.restart();
        settle(&mut app).await;

        assert_eq!(app.lifecycle.generation(), 3);
        assert!(app.board().is_some());

        // Nothing from the cancelled cycles can land afterwards
        tokio::time::sleep(Duration::from_millis(150)).await;
        app.tick();
        assert_eq!(app.lifecycle.generation(), 3);
        assert!(app.board().is_some());
    }

    #[tokio::test]
    async fn test_failed_load_stays_loading() {
        let mut app = App::new(FakeSource::new(100).failing_detail_for_all(), Some(5));
        app.restart();
        settle(&mut app).await;

        assert!(app.lifecycle.is_loading());
        assert!(app.board().is_none());
        assert!(app.load_error.as_deref().unwrap().contains("500"));

        // Selecting cells without a board is harmless
        app.handle_key(key(KeyCode::Enter)).unwrap();

        // Restart is still available and clears the error
        app.restart();
        assert!(app.load_error.is_none());
        assert_eq!(app.source.listings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mouse_click_reveals_cell() {
        let mut app = App::new(FakeSource::new(100), Some(6));
        app.restart();
        settle(&mut app).await;

        let area = Rect::new(0, 0, 120, 40);
        let grid = GridLayout::new(crate::ui::board_area(area));
        let cell = grid.cell(4, 1).unwrap();
        let (x, y) = (cell.x + cell.width / 2, cell.y + cell.height / 2);

        app.handle_mouse(click(x, y), area).unwrap();
        assert_eq!(app.cursor, Cursor { category: 4, clue: 1 });
        assert_eq!(
            app.board().unwrap().clue(4, 1).unwrap().reveal_state(),
            RevealState::Question
        );

        // Clicking a header does nothing
        let header = grid.header(4).unwrap();
        app.handle_mouse(click(header.x + 1, header.y + 1), area).unwrap();
        assert_eq!(app.board().unwrap().revealed_count(), 1);
    }

    #[tokio::test]
    async fn test_help_popup_swallows_keys() {
        let mut app = App::new(FakeSource::new(100), Some(7));
        app.restart();
        settle(&mut app).await;

        app.handle_key(key(KeyCode::Char('?'))).unwrap();
        assert_eq!(app.popup, Popup::Help);
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.board().unwrap().revealed_count(), 0);
    }
}
