//! Suggestion debouncing.
//!
//! `SuggestionDebouncer` turns a burst of keystroke-driven query strings into
//! at most one catalog lookup per quiet period:
//!
//! 1. A query shorter than `min_query_chars` cancels any pending lookup and
//!    tells the caller to clear suggestions. No lookup is issued.
//! 2. Any other query (re)arms the single timer. A timer that has not fired
//!    yet is superseded, never executed.
//! 3. When the timer fires, `suggest_drugs` runs and its result is sent as a
//!    `LookupEvent::Suggestions` tagged with the sequence number of the call
//!    that armed it.
//!
//! Every call bumps the sequence, so the receiver can discard any response
//! that is not the latest, whatever order the backend answers in.

use std::{sync::Arc, time::Duration};

use tracing::debug;

use crate::{
    config::SearchSettings,
    event::{LookupEvent, LookupSender},
    timer::CancelableTimer,
    traits::DrugCatalog,
};

/// What `on_query_change` did with the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Debounced {
    /// Query too short: suggestions must be cleared and hidden.
    Cleared { seq: u64 },
    /// A lookup is scheduled after the quiet period.
    Scheduled { seq: u64 },
}

impl Debounced {
    pub fn seq(self) -> u64 {
        match self {
            Debounced::Cleared { seq } | Debounced::Scheduled { seq } => seq,
        }
    }
}

pub struct SuggestionDebouncer {
    catalog: Arc<dyn DrugCatalog>,
    events: LookupSender,
    timer: CancelableTimer,
    quiet_period: Duration,
    min_query_chars: usize,
    seq: u64,
}

impl SuggestionDebouncer {
    pub fn new(catalog: Arc<dyn DrugCatalog>, events: LookupSender, settings: &SearchSettings) -> Self {
        Self {
            catalog,
            events,
            timer: CancelableTimer::new(),
            quiet_period: settings.quiet_period(),
            min_query_chars: settings.min_query_chars,
            seq: 0,
        }
    }

    /// Feed the current contents of the query input.
    ///
    /// Must be called from within a tokio runtime when the query is long
    /// enough to schedule a lookup.
    pub fn on_query_change(&mut self, query: &str) -> Debounced {
        self.timer.cancel();
        self.seq += 1;
        let seq = self.seq;

        if query.chars().count() < self.min_query_chars {
            debug!(seq, "query below minimum length, suggestions cleared");
            return Debounced::Cleared { seq };
        }

        let catalog = Arc::clone(&self.catalog);
        let events = self.events.clone();
        let query = query.to_string();

        debug!(seq, query = %query, quiet_ms = self.quiet_period.as_millis() as u64, "suggestion lookup armed");

        self.timer.arm(self.quiet_period, async move {
            debug!(seq, query = %query, "quiet period elapsed, fetching suggestions");
            let result = catalog
                .suggest_drugs(&query)
                .await
                .map_err(|e| e.into_lookup_failure("suggestions"));
            if events
                .send(LookupEvent::Suggestions { seq, query, result })
                .is_err()
            {
                debug!(seq, "workflow closed, suggestions dropped");
            }
        });

        Debounced::Scheduled { seq }
    }

    /// Cancel any pending lookup and invalidate every earlier sequence.
    ///
    /// Returns the new latest sequence number.
    pub fn cancel(&mut self) -> u64 {
        if self.timer.cancel() {
            debug!(seq = self.seq, "pending suggestion lookup canceled");
        }
        self.seq += 1;
        self.seq
    }

    /// Sequence number of the most recent call.
    pub fn latest_seq(&self) -> u64 {
        self.seq
    }

    /// True while a lookup is waiting for its quiet period or running.
    pub fn is_pending(&self) -> bool {
        self.timer.is_armed()
    }
}
