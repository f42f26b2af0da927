use log::{debug, error, info};
use crate::error::LookupFailure;
use crate::geocode::{lookup_first, GeocodeProvider, GeocodeResult};
use crate::place::{normalize, PlaceRecord};

/// Sequence number handed out when a selection starts. Newer tickets win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// What happened to a finished lookup
#[derive(Debug, PartialEq)]
pub enum Completion {
    /// the record was replaced
    Applied,
    /// a newer selection already finished, the result was dropped
    Stale,
    /// the lookup failed, the record is unchanged
    Failed,
}

/// Holds the one displayed place and decides which finished lookups may replace it.
///
/// Lookups can finish out of order; a completion only counts if no newer
/// selection has finished before it, whether that one succeeded or failed.
#[derive(Debug, Default)]
pub struct SearchSession {
    next_ticket: u64,
    settled: Option<Ticket>,
    current: PlaceRecord,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &PlaceRecord {
        &self.current
    }

    /// Start a selection. Call before issuing the lookup.
    pub fn begin(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Feed back the outcome of the lookup started with `ticket`.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<GeocodeResult, LookupFailure>) -> Completion {
        if self.settled.is_some_and(|settled| settled > ticket) {
            debug!("dropping stale completion {:?}, {:?} already finished", ticket, self.settled);
            return Completion::Stale;
        }
        self.settled = Some(ticket);
        match outcome {
            Ok(result) => {
                self.current = normalize(&result);
                info!("showing [{}]", self.current.display_name);
                Completion::Applied
            }
            Err(e) => {
                error!("cannot look up address: {}", e);
                Completion::Failed
            }
        }
    }

    /// Look up `query`, take the first result and show it.
    pub async fn select<P: GeocodeProvider>(&mut self, provider: &P, query: &str) -> Completion {
        let ticket = self.begin();
        let outcome = lookup_first(provider, query).await;
        self.complete(ticket, outcome)
    }
}
