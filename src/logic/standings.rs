//! Standings service: first-round generation, match results, suggestions, load and save.

use crate::logic::builder::build_first_round;
use crate::logic::validator::{set_winner, validate_standings};
use crate::models::{
    BracketNode, BracketPath, HorseId, Participant, TournamentError, TournamentId,
    TournamentStandings,
};
use crate::store::TournamentStore;

/// Seed the first round from the roster in its current order, replacing the bracket.
///
/// Fails with `AlreadyStarted` once any horse has reached round 1, byes included; the standings
/// stay untouched on any error.
pub fn generate_first_round(standings: &mut TournamentStandings) -> Result<(), TournamentError> {
    log::trace!("generate_first_round({})", standings.id);
    if standings.has_history() {
        log::warn!(
            "refusing to regenerate tournament {}: rounds already reached",
            standings.id
        );
        return Err(TournamentError::AlreadyStarted);
    }
    let mut roster = standings.participants.clone();
    let tree = build_first_round(&mut roster)?;
    standings.participants = roster;
    standings.tree = tree;
    log::debug!(
        "generated first round of tournament {} with {} participants",
        standings.id,
        standings.participants.len()
    );
    Ok(())
}

/// Record `horse_id` as winner of the match at `path`, then advance anyone left facing a bye
/// and refresh the roster's rounds.
pub fn record_match_result(
    standings: &mut TournamentStandings,
    path: &BracketPath,
    horse_id: HorseId,
) -> Result<(), TournamentError> {
    log::trace!("record_match_result({}, {path:?}, {horse_id})", standings.id);
    let node = standings.tree.node_at_mut(path).ok_or_else(|| {
        TournamentError::IllegalAdvance(format!("no match at bracket path {path:?}"))
    })?;
    if let Err(e) = set_winner(node, horse_id) {
        log::warn!("rejected result for tournament {}: {e}", standings.id);
        return Err(e);
    }
    standings.tree.settle_byes();
    standings.sync_roster();
    if let Some(champion) = standings.champion() {
        log::info!("tournament {} decided: {champion} wins", standings.id);
    }
    Ok(())
}

/// Who may be picked as the resident of `branch`.
///
/// For a match node only its two contenders are eligible; for a first-round slot any entrant
/// is. Candidates are filtered by a case-insensitive substring of their name.
pub fn suggest_candidates<'a>(
    branch: &'a BracketNode,
    all_participants: &'a [Participant],
    query: &str,
) -> Vec<&'a Participant> {
    let candidates: Vec<&Participant> = match branch.child_winners() {
        Some(residents) => residents.into_iter().flatten().collect(),
        None => all_participants.iter().collect(),
    };
    candidates
        .into_iter()
        .filter(|p| p.name_matches(query))
        .collect()
}

/// Fetch the standings of one tournament.
pub fn load_standings(
    store: &TournamentStore,
    id: TournamentId,
) -> Result<TournamentStandings, TournamentError> {
    log::trace!("load_standings({id})");
    store.standings(id)
}

/// Validate and persist `standings` as a full replace, returning what was stored.
///
/// A corrupted bracket fails with `BracketCorrupted` and is not repaired. Entry numbers and
/// rounds on the roster are re-derived from the tree before storing.
pub fn save_standings(
    store: &TournamentStore,
    mut standings: TournamentStandings,
) -> Result<TournamentStandings, TournamentError> {
    log::trace!("save_standings({})", standings.id);
    validate_standings(&standings)?;
    standings.sync_roster();
    store.replace_standings(standings.clone())?;
    Ok(standings)
}
