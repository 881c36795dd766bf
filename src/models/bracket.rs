//! Bracket tree: the single-elimination ladder as a perfect binary tree.
//!
//! Leaves are first-round seed slots. A match node records which of its two
//! branches won rather than a copy of the winner, so a winner that did not
//! take part in the match cannot be represented. Rounds count up from the
//! leaves: a leaf is round 0, the matches above them round 1, and the root
//! is round `rounds_for(entrants)`.

use crate::models::participant::{HorseId, Participant};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the two children of a match node.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Upper,
    Lower,
}

impl Branch {
    pub const BOTH: [Branch; 2] = [Branch::Upper, Branch::Lower];

    pub fn index(self) -> usize {
        match self {
            Branch::Upper => 0,
            Branch::Lower => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Branch::Upper => Branch::Lower,
            Branch::Lower => Branch::Upper,
        }
    }
}

/// Number of rounds needed for `count` entrants: ⌈log2 count⌉ (0 below two entrants).
pub fn rounds_for(count: usize) -> u32 {
    if count < 2 {
        0
    } else {
        count.next_power_of_two().trailing_zeros()
    }
}

/// A node of the bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRepr", into = "NodeRepr")]
pub enum BracketNode {
    /// First-round slot; `None` is a bye (or a slot not seeded yet).
    Leaf(Option<Participant>),
    /// A contest between the residents of the two branches.
    Match {
        winner: Option<Branch>,
        branches: Box<[BracketNode; 2]>,
    },
}

impl BracketNode {
    pub fn leaf(participant: Option<Participant>) -> Self {
        BracketNode::Leaf(participant)
    }

    /// Undecided match over two subtrees.
    pub fn pair(upper: BracketNode, lower: BracketNode) -> Self {
        BracketNode::Match {
            winner: None,
            branches: Box::new([upper, lower]),
        }
    }

    /// Skeleton of `rounds` rounds with every slot empty.
    pub fn empty(rounds: u32) -> Self {
        if rounds == 0 {
            BracketNode::Leaf(None)
        } else {
            BracketNode::pair(Self::empty(rounds - 1), Self::empty(rounds - 1))
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BracketNode::Leaf(_))
    }

    /// Resident participant: the seeded entrant of a leaf, or the winner of a match.
    pub fn winner(&self) -> Option<&Participant> {
        match self {
            BracketNode::Leaf(participant) => participant.as_ref(),
            BracketNode::Match { winner, branches } => {
                winner.and_then(|side| branches[side.index()].winner())
            }
        }
    }

    /// Residents of both children; `None` for a leaf.
    pub fn child_winners(&self) -> Option<[Option<&Participant>; 2]> {
        self.branches()
            .map(|[upper, lower]| [upper.winner(), lower.winner()])
    }

    pub fn branches(&self) -> Option<&[BracketNode; 2]> {
        match self {
            BracketNode::Leaf(_) => None,
            BracketNode::Match { branches, .. } => Some(branches),
        }
    }

    /// Height above the leaves.
    pub fn round(&self) -> u32 {
        match self {
            BracketNode::Leaf(_) => 0,
            BracketNode::Match { branches, .. } => 1 + branches[0].round(),
        }
    }

    /// True if no entrant is seeded anywhere in this subtree.
    pub fn is_bye(&self) -> bool {
        match self {
            BracketNode::Leaf(participant) => participant.is_none(),
            BracketNode::Match { branches, .. } => branches.iter().all(BracketNode::is_bye),
        }
    }

    /// Branch whose resident is `horse_id`, for a match node.
    pub fn contender_side(&self, horse_id: HorseId) -> Option<Branch> {
        let residents = self.child_winners()?;
        Branch::BOTH.into_iter().find(|side| {
            residents[side.index()].is_some_and(|p| p.horse_id == horse_id)
        })
    }

    pub fn node_at(&self, path: &BracketPath) -> Option<&BracketNode> {
        path.steps()
            .iter()
            .try_fold(self, |node, step| node.branches().map(|b| &b[step.index()]))
    }

    pub fn node_at_mut(&mut self, path: &BracketPath) -> Option<&mut BracketNode> {
        let mut node = self;
        for step in path.steps() {
            node = match node {
                BracketNode::Leaf(_) => return None,
                BracketNode::Match { branches, .. } => &mut branches[step.index()],
            };
        }
        Some(node)
    }

    /// Seeded entrants in slot order.
    pub fn entrants(&self) -> Vec<&Participant> {
        let mut out = Vec::new();
        self.collect_entrants(&mut out);
        out
    }

    fn collect_entrants<'a>(&'a self, out: &mut Vec<&'a Participant>) {
        match self {
            BracketNode::Leaf(participant) => out.extend(participant.as_ref()),
            BracketNode::Match { branches, .. } => {
                for branch in branches.iter() {
                    branch.collect_entrants(out);
                }
            }
        }
    }

    /// Seeded copy of the entrant with this id.
    pub fn entrant(&self, horse_id: HorseId) -> Option<&Participant> {
        match self {
            BracketNode::Leaf(participant) => {
                participant.as_ref().filter(|p| p.horse_id == horse_id)
            }
            BracketNode::Match { branches, .. } => {
                branches.iter().find_map(|b| b.entrant(horse_id))
            }
        }
    }

    pub(crate) fn entrant_mut(&mut self, horse_id: HorseId) -> Option<&mut Participant> {
        match self {
            BracketNode::Leaf(participant) => {
                participant.as_mut().filter(|p| p.horse_id == horse_id)
            }
            BracketNode::Match { branches, .. } => {
                branches.iter_mut().find_map(|b| b.entrant_mut(horse_id))
            }
        }
    }

    /// Seeded copy of the resident, reached by following decided branches down to a leaf.
    pub(crate) fn resident_mut(&mut self) -> Option<&mut Participant> {
        match self {
            BracketNode::Leaf(participant) => participant.as_mut(),
            BracketNode::Match {
                winner: Some(side),
                branches,
            } => branches[side.index()].resident_mut(),
            BracketNode::Match { winner: None, .. } => None,
        }
    }

    /// Round of the deepest node where `horse_id` is resident; `None` if not in this subtree.
    pub fn round_reached(&self, horse_id: HorseId) -> Option<u32> {
        match self {
            BracketNode::Leaf(participant) => participant
                .as_ref()
                .filter(|p| p.horse_id == horse_id)
                .map(|_| 0),
            BracketNode::Match { branches, .. } => {
                if self.winner().is_some_and(|p| p.horse_id == horse_id) {
                    return Some(self.round());
                }
                branches.iter().filter_map(|b| b.round_reached(horse_id)).max()
            }
        }
    }

    /// True once the root holds a champion.
    pub fn is_decided(&self) -> bool {
        self.winner().is_some()
    }

    pub fn champion(&self) -> Option<&Participant> {
        match self {
            BracketNode::Leaf(_) => None,
            BracketNode::Match { .. } => self.winner(),
        }
    }

    /// True if any match was decided between two real contenders (bye advances don't count).
    pub fn has_contested_result(&self) -> bool {
        match self {
            BracketNode::Leaf(_) => false,
            BracketNode::Match { winner, branches } => {
                (winner.is_some() && !branches.iter().any(BracketNode::is_bye))
                    || branches.iter().any(BracketNode::has_contested_result)
            }
        }
    }

    /// Advance every resident whose opponent subtree is a bye, bottom-up.
    pub(crate) fn settle_byes(&mut self) {
        let round = self.round();
        let BracketNode::Match { winner, branches } = self else {
            return;
        };
        for branch in branches.iter_mut() {
            branch.settle_byes();
        }
        if winner.is_some() {
            return;
        }
        let advancing = match (branches[0].is_bye(), branches[1].is_bye()) {
            (false, true) if branches[0].winner().is_some() => Branch::Upper,
            (true, false) if branches[1].winner().is_some() => Branch::Lower,
            _ => return,
        };
        *winner = Some(advancing);
        if let Some(participant) = branches[advancing.index()].resident_mut() {
            participant.round_reached = participant.round_reached.max(round);
        }
    }

    /// Rewrite every seeded entrant's `round_reached` from the tree.
    pub(crate) fn project_rounds(&mut self) {
        let rounds: Vec<(HorseId, u32)> = self
            .entrants()
            .iter()
            .map(|p| (p.horse_id, self.round_reached(p.horse_id).unwrap_or(0)))
            .collect();
        for (horse_id, round) in rounds {
            if let Some(participant) = self.entrant_mut(horse_id) {
                participant.round_reached = round;
            }
        }
    }
}

/// Route from the root to a node, written as `u`/`l` steps (`""` is the root).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BracketPath(Vec<Branch>);

impl BracketPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[Branch] {
        &self.0
    }

    /// Path to one child of the node this path points at.
    pub fn child(&self, side: Branch) -> Self {
        let mut steps = self.0.clone();
        steps.push(side);
        Self(steps)
    }
}

impl From<Vec<Branch>> for BracketPath {
    fn from(steps: Vec<Branch>) -> Self {
        Self(steps)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid bracket path {0:?}: expected only 'u' and 'l' steps")]
pub struct ParseBracketPathError(String);

impl FromStr for BracketPath {
    type Err = ParseBracketPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .chars()
            .map(|c| match c.to_ascii_lowercase() {
                'u' => Ok(Branch::Upper),
                'l' => Ok(Branch::Lower),
                _ => Err(ParseBracketPathError(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(BracketPath)
    }
}

impl TryFrom<String> for BracketPath {
    type Error = ParseBracketPathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BracketPath> for String {
    fn from(path: BracketPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for BracketPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            f.write_str(match step {
                Branch::Upper => "u",
                Branch::Lower => "l",
            })?;
        }
        Ok(())
    }
}

/// Wire shape of a node: the resident participant plus, for matches, both branches.
#[derive(Serialize, Deserialize)]
struct NodeRepr {
    participant: Option<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    branches: Option<Vec<NodeRepr>>,
}

impl From<BracketNode> for NodeRepr {
    fn from(node: BracketNode) -> Self {
        let participant = node.winner().cloned();
        match node {
            BracketNode::Leaf(_) => NodeRepr {
                participant,
                branches: None,
            },
            BracketNode::Match { branches, .. } => {
                let [upper, lower] = *branches;
                NodeRepr {
                    participant,
                    branches: Some(vec![upper.into(), lower.into()]),
                }
            }
        }
    }
}

impl TryFrom<NodeRepr> for BracketNode {
    type Error = TournamentError;

    fn try_from(repr: NodeRepr) -> Result<Self, Self::Error> {
        let Some(branches) = repr.branches else {
            return Ok(BracketNode::Leaf(repr.participant));
        };
        let [upper, lower]: [NodeRepr; 2] = branches.try_into().map_err(|b: Vec<NodeRepr>| {
            TournamentError::BracketCorrupted(format!(
                "match node has {} branches, expected 2",
                b.len()
            ))
        })?;
        let branches: Box<[BracketNode; 2]> = Box::new([upper.try_into()?, lower.try_into()?]);
        let winner = match repr.participant {
            None => None,
            Some(participant) => {
                let side = Branch::BOTH
                    .into_iter()
                    .find(|side| {
                        branches[side.index()]
                            .winner()
                            .is_some_and(|w| w.horse_id == participant.horse_id)
                    })
                    .ok_or_else(|| {
                        TournamentError::BracketCorrupted(format!(
                            "{participant} is recorded as winner of a match it did not play"
                        ))
                    })?;
                Some(side)
            }
        };
        Ok(BracketNode::Match { winner, branches })
    }
}
