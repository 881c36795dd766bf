//! TournamentStandings: the roster plus the authoritative bracket tree.

use crate::models::bracket::{rounds_for, BracketNode};
use crate::models::participant::{HorseId, Participant};
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};

/// Standings of one tournament, as edited by one operator session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentStandings {
    pub id: TournamentId,
    pub name: String,
    /// Flat roster for lookups and suggestions; `entry_number`/`round_reached` mirror the tree.
    pub participants: Vec<Participant>,
    pub tree: BracketNode,
}

impl TournamentStandings {
    /// New standings with an empty bracket sized for the roster.
    pub fn new(id: TournamentId, name: impl Into<String>, participants: Vec<Participant>) -> Self {
        let tree = BracketNode::empty(rounds_for(participants.len()));
        Self {
            id,
            name: name.into(),
            participants,
            tree,
        }
    }

    pub fn participant(&self, horse_id: HorseId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.horse_id == horse_id)
    }

    /// True once anyone has reached round 1 or later, in the tree or on the roster. Advances
    /// through byes count.
    pub fn has_history(&self) -> bool {
        self.participants.iter().any(|p| p.round_reached > 0)
            || self
                .tree
                .entrants()
                .iter()
                .any(|p| self.tree.round_reached(p.horse_id).is_some_and(|r| r > 0))
    }

    /// Re-derive `round_reached` and `entry_number` on the roster (and leaf copies) from the tree.
    pub fn sync_roster(&mut self) {
        self.tree.project_rounds();
        for participant in &mut self.participants {
            participant.round_reached = self.tree.round_reached(participant.horse_id).unwrap_or(0);
            participant.entry_number = self
                .tree
                .entrant(participant.horse_id)
                .and_then(|e| e.entry_number);
        }
    }

    /// Closed once the root is decided. Advisory only.
    pub fn is_closed(&self) -> bool {
        self.tree.is_decided()
    }

    pub fn champion(&self) -> Option<&Participant> {
        self.tree.champion()
    }
}
