//! Tournament business logic: bracket building, validation, standings, seeding, scheduling.

mod builder;
mod schedule;
mod seeding;
mod standings;
mod validator;

pub use builder::build_first_round;
pub use schedule::schedule_tournament;
pub use seeding::{
    draw_seeding, ranking_points, seed_by_ranking, CHAMPION_POINTS, FINALIST_POINTS,
    SEMI_FINALIST_POINTS,
};
pub use standings::{
    generate_first_round, load_standings, record_match_result, save_standings,
    suggest_candidates,
};
pub use validator::{
    is_match_decidable, is_match_incomplete, is_winner_set, set_winner, validate_standings,
    validate_tree,
};
