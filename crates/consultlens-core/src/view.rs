//! Per-view state and the stale-response guard.
//!
//! Every navigation issues a [`FetchTicket`] carrying the requested id and a
//! fresh generation number. A response is installed only if its ticket is
//! still the active one; responses for superseded navigations are dropped.

use tracing::debug;

use crate::consultation::LoadedConsultation;

/// Identifies one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// Nothing requested yet, or the view was left.
    #[default]
    Idle,
    Loading {
        id: u64,
    },
    Ready(LoadedConsultation),
    /// Terminal: the route did not name a consultation we could even placeholder.
    NotFound {
        requested: String,
    },
}

#[derive(Debug, Default)]
pub struct ViewSession {
    generation: u64,
    active: Option<FetchTicket>,
    state: ViewState,
}

impl ViewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Start loading consultation `id`, superseding any load in flight.
    pub fn navigate(&mut self, id: u64) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            id,
            generation: self.generation,
        };
        self.active = Some(ticket);
        self.state = ViewState::Loading { id };
        ticket
    }

    /// Navigate from a raw route parameter.
    ///
    /// A parameter that is not a non-negative integer moves the view to
    /// [`ViewState::NotFound`] and issues no ticket.
    pub fn navigate_raw(&mut self, requested: &str) -> Option<FetchTicket> {
        match requested.trim().parse::<u64>() {
            Ok(id) => Some(self.navigate(id)),
            Err(_) => {
                self.generation += 1;
                self.active = None;
                self.state = ViewState::NotFound {
                    requested: requested.to_string(),
                };
                None
            }
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.active.as_ref() == Some(ticket)
    }

    /// Install a finished load if `ticket` is still current.
    ///
    /// Returns `false`, leaving the state untouched, for a stale ticket.
    pub fn resolve(&mut self, ticket: FetchTicket, loaded: LoadedConsultation) -> bool {
        if !self.is_current(&ticket) {
            debug!(
                id = ticket.id,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale consultation response"
            );
            return false;
        }
        self.state = ViewState::Ready(loaded);
        true
    }

    /// Drop the current view and invalidate any load in flight.
    pub fn leave(&mut self) {
        self.generation += 1;
        self.active = None;
        self.state = ViewState::Idle;
    }
}
