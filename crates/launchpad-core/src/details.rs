use crate::{Criterion, Document, Scheme};

/// Shown when either detail request fails. The cause is logged, never shown.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data. Please try again later.";

/// Shown when the presented scheme has no identifier to fetch with.
pub const INVALID_SCHEME_MESSAGE: &str = "Invalid scheme data";

/// Criteria and documents for one scheme, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemeDetails {
    pub criteria: Vec<Criterion>,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loading,
    Ready(SchemeDetails),
    Failed(String),
}

/// Identifies one load cycle. A result is only applied if its ticket is
/// still the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    scheme_id: i64,
}

impl LoadTicket {
    pub fn scheme_id(&self) -> i64 {
        self.scheme_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Load state of the scheme currently presented in the apply panel.
///
/// Each call to [`begin`](Self::begin) starts a new cycle and resets the
/// outcome to `Loading`. Within a cycle the outcome moves to `Ready` or
/// `Failed` exactly once; later results for the same cycle, and any result
/// carrying an older ticket, are dropped.
#[derive(Debug, Clone)]
pub struct DetailsLoad {
    generation: u64,
    scheme_id: Option<i64>,
    outcome: FetchOutcome,
}

impl Default for DetailsLoad {
    fn default() -> Self {
        Self {
            generation: 0,
            scheme_id: None,
            outcome: FetchOutcome::Loading,
        }
    }
}

impl DetailsLoad {
    /// Start a cycle for `scheme`.
    ///
    /// Returns the ticket to fetch with, or `None` when the scheme is absent
    /// or has no id. In that case the outcome is already `Failed` and no
    /// request should be made.
    pub fn begin(&mut self, scheme: Option<&Scheme>) -> Option<LoadTicket> {
        self.generation += 1;
        match scheme.and_then(|s| s.id) {
            Some(id) => {
                self.scheme_id = Some(id);
                self.outcome = FetchOutcome::Loading;
                Some(LoadTicket {
                    generation: self.generation,
                    scheme_id: id,
                })
            }
            None => {
                self.scheme_id = None;
                self.outcome = FetchOutcome::Failed(INVALID_SCHEME_MESSAGE.into());
                None
            }
        }
    }

    /// Apply a settled fetch. Returns `false` if the result was discarded.
    pub fn resolve<E>(&mut self, ticket: LoadTicket, result: Result<SchemeDetails, E>) -> bool {
        if !self.is_current(ticket) || !self.is_loading() {
            return false;
        }
        self.outcome = match result {
            Ok(details) => FetchOutcome::Ready(details),
            Err(_) => FetchOutcome::Failed(LOAD_FAILED_MESSAGE.into()),
        };
        true
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation && Some(ticket.scheme_id) == self.scheme_id
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Loading)
    }

    pub fn outcome(&self) -> &FetchOutcome {
        &self.outcome
    }

    pub fn details(&self) -> Option<&SchemeDetails> {
        match &self.outcome {
            FetchOutcome::Ready(d) => Some(d),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            FetchOutcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn scheme_id(&self) -> Option<i64> {
        self.scheme_id
    }
}
