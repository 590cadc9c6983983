// Dataset domain model - the single in-memory snapshot and its load state
use super::sample::Sample;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub samples: Vec<Sample>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub enum DatasetState {
    #[default]
    Empty,
    Loading,
    Loaded(Snapshot),
}

/// Proof that a load was started; only the most recent ticket can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateName {
    Empty,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStatus {
    pub state: StateName,
    pub samples: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Empty → Loading → Loaded, with `clear` returning to Empty from anywhere.
///
/// Every `begin_load` and `clear` bumps the generation, so a load that was
/// overtaken by either is discarded when it finishes.
#[derive(Debug, Default)]
pub struct Dataset {
    state: DatasetState,
    generation: u64,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = DatasetState::Loading;
        LoadTicket(self.generation)
    }

    /// Install the samples of a finished load. Returns false if superseded.
    pub fn complete_load(&mut self, ticket: LoadTicket, samples: Vec<Sample>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = DatasetState::Loaded(Snapshot {
            samples,
            loaded_at: Utc::now(),
        });
        true
    }

    /// A failed load leaves no data behind. Returns false if superseded.
    pub fn fail_load(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = DatasetState::Empty;
        true
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.state = DatasetState::Empty;
    }

    /// Samples of the loaded snapshot, empty in any other state.
    pub fn samples(&self) -> &[Sample] {
        match &self.state {
            DatasetState::Loaded(snapshot) => &snapshot.samples,
            _ => &[],
        }
    }

    pub fn status(&self) -> DatasetStatus {
        match &self.state {
            DatasetState::Empty => DatasetStatus {
                state: StateName::Empty,
                samples: 0,
                loaded_at: None,
            },
            DatasetState::Loading => DatasetStatus {
                state: StateName::Loading,
                samples: 0,
                loaded_at: None,
            },
            DatasetState::Loaded(snapshot) => DatasetStatus {
                state: StateName::Loaded,
                samples: snapshot.samples.len(),
                loaded_at: Some(snapshot.loaded_at),
            },
        }
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation && matches!(self.state, DatasetState::Loading)
    }
}
