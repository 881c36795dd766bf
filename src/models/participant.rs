//! Participant: a horse entered in a tournament.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a horse in the participant directory (used in brackets and lookups).
pub type HorseId = i64;

/// A horse entered in one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub horse_id: HorseId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    /// Seed position, assigned when the first round is generated.
    #[serde(default)]
    pub entry_number: Option<u32>,
    /// Highest round the horse is resident in (0 = first round or not yet placed).
    #[serde(default)]
    pub round_reached: u32,
}

impl Participant {
    /// Create an unseeded participant.
    pub fn new(horse_id: HorseId, name: impl Into<String>, date_of_birth: NaiveDate) -> Self {
        Self {
            horse_id,
            name: name.into(),
            date_of_birth,
            entry_number: None,
            round_reached: 0,
        }
    }

    /// Case-insensitive substring match against the name. An empty query matches everyone.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name
            .to_lowercase()
            .contains(&query.trim().to_lowercase())
    }

    /// Drop seeding data (entry number and round reached).
    pub fn unseeded(&self) -> Self {
        Self {
            entry_number: None,
            round_reached: 0,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.date_of_birth)
    }
}
