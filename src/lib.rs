//! Horse tournament standings: library with the bracket model and business logic.

pub mod directory;
pub mod logic;
pub mod models;
pub mod store;

pub use directory::ParticipantDirectory;
pub use logic::{
    build_first_round, draw_seeding, generate_first_round, is_match_decidable,
    is_match_incomplete, is_winner_set, load_standings, ranking_points, record_match_result,
    save_standings, schedule_tournament, seed_by_ranking, set_winner, suggest_candidates,
    validate_standings, validate_tree,
};
pub use models::{
    rounds_for, Branch, BracketNode, BracketPath, HorseId, Participant, Tournament,
    TournamentCreate, TournamentError, TournamentId, TournamentSearch, TournamentStandings,
};
pub use store::TournamentStore;
