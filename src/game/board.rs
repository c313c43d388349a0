//! Board model and the per-clue reveal state machine.

use serde::Serialize;
use thiserror::Error;

/// Categories across the board
pub const CATEGORY_COUNT: usize = 6;

/// Clues down each category column
pub const CLUES_PER_CATEGORY: usize = 5;

/// Glyph shown on a clue that has not been revealed yet
pub const MASK: &str = "?";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("category '{title}' needs {expected} clues, got {found}")]
    WrongClueCount {
        title: String,
        expected: usize,
        found: usize,
    },

    #[error("board needs {expected} categories, got {found}")]
    WrongCategoryCount { expected: usize, found: usize },

    #[error("no clue at category {category}, row {clue}")]
    NoSuchCell { category: usize, clue: usize },
}

/// How much of a clue is showing. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealState {
    #[default]
    Hidden,
    Question,
    Answer,
}

impl RevealState {
    /// The state a selection moves this one to. `Answer` is terminal.
    pub fn advance(self) -> Self {
        match self {
            RevealState::Hidden => RevealState::Question,
            RevealState::Question | RevealState::Answer => RevealState::Answer,
        }
    }
}

/// Result of selecting a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The clue moved to this state and its cell text changed
    Revealed(RevealState),
    /// The answer was already showing
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clue {
    question: String,
    answer: String,
    reveal: RevealState,
}

impl Clue {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            reveal: RevealState::Hidden,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn reveal_state(&self) -> RevealState {
        self.reveal
    }

    /// Text the cell for this clue should currently show
    pub fn display_text(&self) -> &str {
        match self.reveal {
            RevealState::Hidden => MASK,
            RevealState::Question => &self.question,
            RevealState::Answer => &self.answer,
        }
    }

    fn reveal(&mut self) -> RevealOutcome {
        let next = self.reveal.advance();
        if next == self.reveal {
            return RevealOutcome::Unchanged;
        }
        self.reveal = next;
        RevealOutcome::Revealed(next)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    title: String,
    clues: Vec<Clue>,
}

impl Category {
    pub fn new(title: impl Into<String>, clues: Vec<Clue>) -> Result<Self, BoardError> {
        let title = title.into();
        if clues.len() != CLUES_PER_CATEGORY {
            return Err(BoardError::WrongClueCount {
                title,
                expected: CLUES_PER_CATEGORY,
                found: clues.len(),
            });
        }
        Ok(Self { title, clues })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }
}

/// A full game: `CATEGORY_COUNT` columns of `CLUES_PER_CATEGORY` clues.
///
/// Built once per fetch cycle and replaced wholesale on restart. The only
/// mutation after construction is [`Board::reveal`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    categories: Vec<Category>,
}

impl Board {
    pub fn new(categories: Vec<Category>) -> Result<Self, BoardError> {
        if categories.len() != CATEGORY_COUNT {
            return Err(BoardError::WrongCategoryCount {
                expected: CATEGORY_COUNT,
                found: categories.len(),
            });
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn clue(&self, category: usize, clue: usize) -> Option<&Clue> {
        self.categories.get(category)?.clues.get(clue)
    }

    /// Advance the clue at `(category, clue)` one step through
    /// Hidden -> Question -> Answer. Selecting an answered clue does nothing.
    pub fn reveal(&mut self, category: usize, clue: usize) -> Result<RevealOutcome, BoardError> {
        let target = self
            .categories
            .get_mut(category)
            .and_then(|c| c.clues.get_mut(clue))
            .ok_or(BoardError::NoSuchCell { category, clue })?;
        Ok(target.reveal())
    }

    /// Number of clues no longer hidden
    pub fn revealed_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| c.clues.iter())
            .filter(|c| c.reveal != RevealState::Hidden)
            .count()
    }
}
