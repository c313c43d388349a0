//! Idle -> Loading -> Ready state machine that owns the current board.
//!
//! Every fetch cycle gets a generation number. Starting a new cycle
//! supersedes the previous one, so a result that arrives for an older
//! generation is dropped instead of overwriting the newer board.

use super::board::Board;

#[derive(Debug, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready(Board),
}

#[derive(Debug, Default)]
pub struct Lifecycle {
    phase: Phase,
    generation: u64,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn board(&self) -> Option<&Board> {
        match &self.phase {
            Phase::Ready(board) => Some(board),
            _ => None,
        }
    }

    pub fn board_mut(&mut self) -> Option<&mut Board> {
        match &mut self.phase {
            Phase::Ready(board) => Some(board),
            _ => None,
        }
    }

    /// Drop the current board and enter Loading. Returns the generation the
    /// new fetch cycle must report back with.
    pub fn begin_loading(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.generation
    }

    /// Install `board` if it belongs to the cycle currently loading.
    /// Returns false when the result is stale and was discarded.
    pub fn finish_loading(&mut self, generation: u64, board: Board) -> bool {
        if generation != self.generation || !self.is_loading() {
            return false;
        }
        self.phase = Phase::Ready(board);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::tests::sample_board;

    #[test]
    fn test_starts_idle_without_board() {
        let lifecycle = Lifecycle::new();
        assert!(matches!(lifecycle.phase(), Phase::Idle));
        assert!(lifecycle.board().is_none());
        assert_eq!(lifecycle.generation(), 0);
    }

    #[test]
    fn test_loading_then_ready() {
        let mut lifecycle = Lifecycle::new();
        let generation = lifecycle.begin_loading();
        assert!(lifecycle.is_loading());
        assert!(lifecycle.board().is_none());

        assert!(lifecycle.finish_loading(generation, sample_board()));
        assert!(!lifecycle.is_loading());
        assert_eq!(lifecycle.board().unwrap().categories().len(), 6);
    }

    #[test]
    fn test_restart_discards_board() {
        let mut lifecycle = Lifecycle::new();
        let first = lifecycle.begin_loading();
        lifecycle.finish_loading(first, sample_board());
        lifecycle.board_mut().unwrap().reveal(0, 0).unwrap();

        lifecycle.begin_loading();
        assert!(lifecycle.board().is_none());
        assert!(lifecycle.board_mut().is_none());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut lifecycle = Lifecycle::new();
        let stale = lifecycle.begin_loading();
        let current = lifecycle.begin_loading();
        assert_ne!(stale, current);

        assert!(!lifecycle.finish_loading(stale, sample_board()));
        assert!(lifecycle.is_loading());

        assert!(lifecycle.finish_loading(current, sample_board()));
        // A late duplicate for the same cycle cannot replace a board in play
        assert!(!lifecycle.finish_loading(current, sample_board()));
    }
}
