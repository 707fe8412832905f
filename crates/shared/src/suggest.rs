use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::Suggestion;

/// Quiet time after the last keystroke before a lookup is issued.
pub const DEBOUNCE_MS: u32 = 350;
/// Shorter queries clear the list instead of searching.
pub const MIN_QUERY_CHARS: usize = 3;
/// Results requested from the geocoder.
pub const SUGGESTION_LIMIT: usize = 5;

/// Trimmed query, or `None` when it is too short to search.
pub fn normalize_query(raw: &str) -> Option<&str> {
    let query = raw.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        None
    } else {
        Some(query)
    }
}

/// Generation counter shared by every lookup of one search box.
///
/// Each keystroke issues a new ticket; a lookup holding an older ticket is
/// stale and must not touch the suggestion list.
#[derive(Debug, Clone, Default)]
pub struct LookupGate {
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket(u64);

impl LookupGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate all outstanding tickets and hand out a fresh one.
    pub fn next_ticket(&self) -> LookupTicket {
        LookupTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }
}

/// Wait out the debounce, run `lookup`, and return the suggestions to apply.
///
/// Returns `None` when a newer ticket was issued before or during the lookup;
/// the caller must then leave the list alone. A failed lookup yields an
/// empty list.
pub async fn debounced_lookup<D, L, Fut, E>(
    gate: &LookupGate,
    ticket: LookupTicket,
    delay: D,
    lookup: L,
) -> Option<Vec<Suggestion>>
where
    D: Future<Output = ()>,
    L: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<Suggestion>, E>>,
    E: std::fmt::Display,
{
    delay.await;
    if !gate.is_current(ticket) {
        return None;
    }

    let suggestions = match lookup().await {
        Ok(list) => list,
        Err(e) => {
            tracing::debug!(error = %e, "suggestion lookup failed");
            Vec::new()
        }
    };

    gate.is_current(ticket).then_some(suggestions)
}
