//! In-memory trivia source for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{CategoryDetail, RawClue, TriviaError, TriviaSource};

/// Serves categories `1..=pool` with eight clues each.
pub struct FakeSource {
    pool: u64,
    reverse_latency: bool,
    fail_details: bool,
    pub listings: AtomicUsize,
}

impl FakeSource {
    pub fn new(pool: u64) -> Self {
        Self {
            pool,
            reverse_latency: false,
            fail_details: false,
            listings: AtomicUsize::new(0),
        }
    }

    /// Higher ids respond sooner
    pub fn with_reverse_latency(mut self) -> Self {
        self.reverse_latency = true;
        self
    }

    pub fn failing_detail_for_all(mut self) -> Self {
        self.fail_details = true;
        self
    }

    pub fn title(id: u64) -> String {
        format!("Category {}", id)
    }
}

impl TriviaSource for FakeSource {
    async fn fetch_candidate_category_ids(&self) -> Result<Vec<u64>, TriviaError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        Ok((1..=self.pool).collect())
    }

    async fn fetch_category_detail(&self, id: u64) -> Result<CategoryDetail, TriviaError> {
        if self.reverse_latency {
            tokio::time::sleep(Duration::from_millis(self.pool.saturating_sub(id))).await;
        }
        if self.fail_details {
            return Err(TriviaError::Status {
                url: format!("fake://category/{}", id),
                status: 500,
            });
        }

        Ok(CategoryDetail {
            title: Self::title(id),
            clues: (0..8)
                .map(|n| RawClue {
                    question: format!("Q{}.{}", id, n),
                    answer: format!("A{}.{}", id, n),
                })
                .collect(),
        })
    }
}
