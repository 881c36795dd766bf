//! Data structures for horse tournaments: participants, the bracket tree, standings.

mod bracket;
mod participant;
mod standings;
mod tournament;

pub use bracket::{rounds_for, Branch, BracketNode, BracketPath, ParseBracketPathError};
pub use participant::{HorseId, Participant};
pub use standings::TournamentStandings;
pub use tournament::{
    Tournament, TournamentCreate, TournamentError, TournamentId, TournamentSearch, MAX_NAME_LEN,
};
