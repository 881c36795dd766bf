//! Bracket validation: decidability checks, guarded winner assignment, consistency checks.

use crate::models::{rounds_for, Branch, BracketNode, HorseId, TournamentError, TournamentStandings};
use std::collections::HashSet;

/// A match can be decided once both contenders are known and no winner is set yet.
///
/// Round order follows from this: a match whose child is still undecided is not decidable.
/// A match resolved by a bye already has its winner and is never decidable.
pub fn is_match_decidable(node: &BracketNode) -> bool {
    match node.child_winners() {
        Some([Some(_), Some(_)]) => !is_winner_set(node),
        _ => false,
    }
}

/// True if either contender slot of this match is still empty. Leaves are never incomplete.
pub fn is_match_incomplete(node: &BracketNode) -> bool {
    node.child_winners()
        .is_some_and(|residents| residents.iter().any(Option::is_none))
}

/// True once this node has produced a result.
pub fn is_winner_set(node: &BracketNode) -> bool {
    node.winner().is_some()
}

/// Record `horse_id` as the winner of the match at `node`.
///
/// Fails with `IllegalAdvance`, leaving the node untouched, unless the match is decidable and
/// `horse_id` is one of its two contenders. The winner's `round_reached` is raised to the
/// match's round.
pub fn set_winner(node: &mut BracketNode, horse_id: HorseId) -> Result<(), TournamentError> {
    if node.is_leaf() {
        return Err(TournamentError::IllegalAdvance(
            "a first-round slot is not a match".to_string(),
        ));
    }
    if is_winner_set(node) {
        return Err(TournamentError::IllegalAdvance(
            "match already has a winner".to_string(),
        ));
    }
    if !is_match_decidable(node) {
        return Err(TournamentError::IllegalAdvance(
            "previous round of this match is not complete".to_string(),
        ));
    }
    let side = node.contender_side(horse_id).ok_or_else(|| {
        TournamentError::IllegalAdvance(format!(
            "horse {horse_id} is not a contender of this match"
        ))
    })?;
    let round = node.round();
    if let BracketNode::Match { winner, branches } = node {
        *winner = Some(side);
        if let Some(participant) = branches[side.index()].resident_mut() {
            participant.round_reached = participant.round_reached.max(round);
            log::debug!("{participant} advances to round {round}");
        }
    }
    Ok(())
}

/// Check every structural invariant of `tree`; read-only.
///
/// - perfect binary shape (all leaves at the same depth)
/// - a decided match's winning branch has a resident
/// - a decided match had both contenders, unless the losing side is a bye
/// - an undecided match never has a resident facing a bye
/// - no horse is seeded twice
/// - with at least two entrants, depth is ⌈log2 entrants⌉
pub fn validate_tree(tree: &BracketNode) -> Result<(), TournamentError> {
    check_node(tree)?;

    let entrants = tree.entrants();
    let mut seen = HashSet::with_capacity(entrants.len());
    if let Some(p) = entrants.iter().find(|p| !seen.insert(p.horse_id)) {
        return Err(corrupted(format!("{p} is seeded more than once")));
    }
    if entrants.len() >= 2 && tree.round() != rounds_for(entrants.len()) {
        return Err(corrupted(format!(
            "{} rounds do not fit {} entrants",
            tree.round(),
            entrants.len()
        )));
    }
    Ok(())
}

/// Returns the subtree's depth after checking shape and winner invariants.
fn check_node(node: &BracketNode) -> Result<u32, TournamentError> {
    let BracketNode::Match { winner, branches } = node else {
        return Ok(0);
    };
    let upper = check_node(&branches[0])?;
    let lower = check_node(&branches[1])?;
    if upper != lower {
        return Err(corrupted(format!(
            "branches have unequal depth ({upper} and {lower})"
        )));
    }
    if let Some(side) = winner {
        let won = &branches[side.index()];
        let lost = &branches[side.other().index()];
        if won.winner().is_none() {
            return Err(corrupted(format!(
                "round {} winner comes from an undecided branch",
                upper + 1
            )));
        }
        if lost.winner().is_none() && !lost.is_bye() {
            return Err(corrupted(format!(
                "round {} decided before its opponent was known",
                upper + 1
            )));
        }
    } else if Branch::BOTH.into_iter().any(|side| {
        branches[side.index()].winner().is_some() && branches[side.other().index()].is_bye()
    }) {
        return Err(corrupted(format!(
            "round {} has an entrant facing a bye who was not advanced",
            upper + 1
        )));
    }
    Ok(upper + 1)
}

/// `validate_tree` plus roster consistency: depth fits the roster, every seeded horse is on it,
/// and no horse is listed twice.
pub fn validate_standings(standings: &TournamentStandings) -> Result<(), TournamentError> {
    log::trace!("validate_standings({})", standings.id);
    let result = check_standings(standings);
    if let Err(e) = &result {
        log::warn!("standings of tournament {} rejected: {e}", standings.id);
    }
    result
}

fn check_standings(standings: &TournamentStandings) -> Result<(), TournamentError> {
    validate_tree(&standings.tree)?;

    let mut roster = HashSet::with_capacity(standings.participants.len());
    if let Some(p) = standings
        .participants
        .iter()
        .find(|p| !roster.insert(p.horse_id))
    {
        return Err(corrupted(format!("{p} is listed twice")));
    }
    let expected = rounds_for(standings.participants.len());
    if standings.tree.round() != expected {
        return Err(corrupted(format!(
            "bracket has {} rounds, {} participants need {expected}",
            standings.tree.round(),
            standings.participants.len()
        )));
    }
    if let Some(p) = standings
        .tree
        .entrants()
        .into_iter()
        .find(|p| !roster.contains(&p.horse_id))
    {
        return Err(corrupted(format!("{p} is seeded but not a participant")));
    }
    Ok(())
}

fn corrupted(message: String) -> TournamentError {
    TournamentError::BracketCorrupted(message)
}
