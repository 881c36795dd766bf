//! First round: seed entrants into a fresh bracket.

use crate::models::{rounds_for, BracketNode, HorseId, Participant, TournamentError};
use std::collections::HashSet;

/// Build the round-0 bracket from `participants` in the order given.
///
/// 1. Reject fewer than 2 entrants, duplicate horses, or any entrant with a recorded round.
/// 2. Assign entry numbers 1..N in list order (no reordering).
/// 3. Fill leaves 1..N with the entrants and pad with byes up to the next power of two.
/// 4. Pair leaves bottom-up; an entrant facing a bye advances immediately.
///
/// On success the entry numbers and bye advances are written back to `participants`.
pub fn build_first_round(participants: &mut [Participant]) -> Result<BracketNode, TournamentError> {
    log::trace!("build_first_round({} participants)", participants.len());
    if participants.len() < 2 {
        return Err(TournamentError::InvalidBracketInput(format!(
            "need at least 2 participants, got {}",
            participants.len()
        )));
    }
    if let Some(p) = participants.iter().find(|p| p.round_reached != 0) {
        return Err(TournamentError::InvalidBracketInput(format!(
            "{p} already reached round {}",
            p.round_reached
        )));
    }
    let mut seen: HashSet<HorseId> = HashSet::with_capacity(participants.len());
    if let Some(p) = participants.iter().find(|p| !seen.insert(p.horse_id)) {
        return Err(TournamentError::InvalidBracketInput(format!(
            "{p} is entered more than once"
        )));
    }

    for (p, entry_number) in participants.iter_mut().zip(1..) {
        p.entry_number = Some(entry_number);
    }

    let size = 1usize << rounds_for(participants.len());
    let mut level: Vec<BracketNode> = participants
        .iter()
        .cloned()
        .map(Some)
        .chain(std::iter::repeat(None))
        .take(size)
        .map(BracketNode::leaf)
        .collect();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len() / 2);
        let mut nodes = level.into_iter();
        while let (Some(upper), Some(lower)) = (nodes.next(), nodes.next()) {
            let mut node = BracketNode::pair(upper, lower);
            node.settle_byes();
            next.push(node);
        }
        level = next;
    }
    let tree = level.pop().ok_or_else(|| {
        TournamentError::InvalidBracketInput("no bracket could be built".to_string())
    })?;

    for p in participants.iter_mut() {
        p.round_reached = tree.round_reached(p.horse_id).unwrap_or(0);
    }
    log::debug!(
        "built bracket: {} rounds, {} byes",
        tree.round(),
        size - participants.len()
    );
    Ok(tree)
}
