//! Tournament schedule record, search parameters, and TournamentError.

use crate::models::participant::HorseId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// The entrant list cannot be seeded into a bracket.
    #[error("Invalid bracket input: {0}")]
    InvalidBracketInput(String),
    /// Regenerating the first round would discard recorded results.
    #[error("Cannot generate first round: there are already entries of rounds")]
    AlreadyStarted,
    /// Winner assignment violates round order or match membership.
    #[error("Illegal advance: {0}")]
    IllegalAdvance(String),
    /// A structural bracket invariant does not hold.
    #[error("Bracket corrupted: {0}")]
    BracketCorrupted(String),
    /// No tournament with this id.
    #[error("No tournament with id {0}")]
    NotFound(TournamentId),
    /// Create request rejected; one message per failed check.
    #[error("Validation of tournament failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    /// The store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Longest accepted tournament name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// A scheduled tournament (bracket state lives in `TournamentStandings`).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Tournament {
    /// Create a tournament with a fresh id.
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            end_date,
        }
    }
}

/// Request body for scheduling a tournament. Participants are directory ids in seeding order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentCreate {
    #[serde(default)]
    pub name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub participants: Vec<HorseId>,
}

/// Search filter; every given field must match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSearch {
    #[serde(default)]
    pub name: Option<String>,
    /// Tournaments ending on or after this date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Tournaments starting on or before this date.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl TournamentSearch {
    pub fn matches(&self, tournament: &Tournament) -> bool {
        let name_ok = self.name.as_deref().map_or(true, |q| {
            tournament
                .name
                .to_lowercase()
                .contains(&q.trim().to_lowercase())
        });
        let start_ok = self.start_date.map_or(true, |d| tournament.end_date >= d);
        let end_ok = self.end_date.map_or(true, |d| tournament.start_date <= d);
        name_ok && start_ok && end_ok
    }
}
