//! Trivia API access and turning raw API data into a playable board.

pub mod jservice;

#[cfg(test)]
pub mod fake;

use futures_util::future::try_join_all;
use rand::Rng;
use serde::{Deserialize, Deserializer};
use std::future::Future;
use thiserror::Error;

use crate::game::board::{CATEGORY_COUNT, CLUES_PER_CATEGORY};
use crate::game::sampler::{self, SampleError};
use crate::game::{Board, BoardError, Category, Clue};

pub use jservice::JServiceClient;

#[derive(Debug, Error)]
pub enum TriviaError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("category '{title}' has only {found} clues")]
    NotEnoughClues { title: String, found: usize },

    #[error("not enough candidates: {0}")]
    Sample(#[from] SampleError),

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}

/// Category entry from the bulk listing
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Not every deployment reports this
    #[serde(default)]
    pub clues_count: Option<usize>,
}

/// One category with every clue the API holds for it
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDetail {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub clues: Vec<RawClue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawClue {
    #[serde(default, deserialize_with = "lenient_text")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub answer: String,
}

/// Some upstream answers are bare numbers or null rather than strings.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    use serde_json::Value;

    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Where categories and clues come from.
pub trait TriviaSource: Send + Sync {
    /// Ids of the categories a board may be drawn from.
    fn fetch_candidate_category_ids(
        &self,
    ) -> impl Future<Output = Result<Vec<u64>, TriviaError>> + Send;

    /// Full clue list for one category.
    fn fetch_category_detail(
        &self,
        id: u64,
    ) -> impl Future<Output = Result<CategoryDetail, TriviaError>> + Send;
}

/// Ids from a bulk listing, skipping categories known to be too small to fill a column.
pub fn candidate_ids(summaries: Vec<CategorySummary>) -> Vec<u64> {
    summaries
        .into_iter()
        .filter(|c| c.clues_count.map_or(true, |n| n >= CLUES_PER_CATEGORY))
        .map(|c| c.id)
        .collect()
}

/// Pick `CLUES_PER_CATEGORY` clues at random and wrap them as hidden clues.
pub fn category_from_detail<R: Rng + ?Sized>(
    detail: CategoryDetail,
    rng: &mut R,
) -> Result<Category, TriviaError> {
    if detail.clues.len() < CLUES_PER_CATEGORY {
        return Err(TriviaError::NotEnoughClues {
            title: detail.title,
            found: detail.clues.len(),
        });
    }

    let clues = sampler::sample(&detail.clues, CLUES_PER_CATEGORY, rng)?
        .into_iter()
        .map(|raw| Clue::new(raw.question, raw.answer))
        .collect();

    Ok(Category::new(detail.title, clues)?)
}

/// One complete fetch cycle: candidate ids, a random six, their details,
/// five clues each. Any failure aborts the whole cycle.
///
/// Details are fetched concurrently; the board keeps the order the ids were
/// drawn in.
pub async fn load_board<S, R>(source: &S, rng: &mut R) -> Result<Board, TriviaError>
where
    S: TriviaSource,
    R: Rng + ?Sized,
{
    let candidates = source.fetch_candidate_category_ids().await?;
    let ids = sampler::sample(&candidates, CATEGORY_COUNT, rng)?;
    tracing::debug!(pool = candidates.len(), ?ids, "Selected categories");

    let details = try_join_all(ids.iter().map(|&id| source.fetch_category_detail(id))).await?;

    let categories = details
        .into_iter()
        .map(|detail| category_from_detail(detail, rng))
        .collect::<Result<Vec<_>, _>>()?;

    let board = Board::new(categories)?;
    tracing::debug!(
        titles = ?board.categories().iter().map(|c| c.title()).collect::<Vec<_>>(),
        "Board built"
    );
    Ok(board)
}
