//! Property-based tests for bracket building and advancing, using proptest.

use chrono::NaiveDate;
use horse_tournament_standings::{
    build_first_round, generate_first_round, is_match_decidable, record_match_result, rounds_for,
    set_winner, validate_tree, Branch, BracketNode, BracketPath, Participant, TournamentError,
    TournamentStandings,
};
use proptest::prelude::*;
use uuid::Uuid;

fn roster(n: usize) -> Vec<Participant> {
    let dob = NaiveDate::from_ymd_opt(2014, 5, 1).unwrap();
    (1..=n as i64)
        .map(|id| Participant::new(id, format!("Horse {id}"), dob))
        .collect()
}

fn leaves(node: &BracketNode, out: &mut Vec<Option<i64>>) {
    match node {
        BracketNode::Leaf(p) => out.push(p.as_ref().map(|p| p.horse_id)),
        BracketNode::Match { branches, .. } => {
            for b in branches.iter() {
                leaves(b, out);
            }
        }
    }
}

fn matches_of<'a>(node: &'a BracketNode, out: &mut Vec<&'a BracketNode>) {
    if let Some(branches) = node.branches() {
        out.push(node);
        for b in branches.iter() {
            matches_of(b, out);
        }
    }
}

fn decidable_paths(node: &BracketNode, path: BracketPath, out: &mut Vec<BracketPath>) {
    if is_match_decidable(node) {
        out.push(path.clone());
    }
    if let Some(branches) = node.branches() {
        for side in Branch::BOTH {
            decidable_paths(&branches[side.index()], path.child(side), out);
        }
    }
}

proptest! {
    #[test]
    fn built_bracket_is_perfect_and_padded_with_byes(n in 2usize..=70) {
        let mut ps = roster(n);
        let tree = build_first_round(&mut ps).unwrap();
        let size = 1usize << rounds_for(n);

        prop_assert_eq!(tree.round(), rounds_for(n));
        let mut slots = Vec::new();
        leaves(&tree, &mut slots);
        prop_assert_eq!(slots.len(), size);
        prop_assert_eq!(slots.iter().filter(|s| s.is_some()).count(), n);
        prop_assert!(slots[n..].iter().all(Option::is_none));

        let entries: Vec<_> = ps.iter().map(|p| p.entry_number).collect();
        let expected: Vec<_> = (1..=n as u32).map(Some).collect();
        prop_assert_eq!(entries, expected);
        prop_assert!(validate_tree(&tree).is_ok());
    }

    #[test]
    fn entrant_facing_a_bye_is_advanced_at_build(n in 2usize..=70) {
        let mut ps = roster(n);
        let tree = build_first_round(&mut ps).unwrap();
        let mut all = Vec::new();
        matches_of(&tree, &mut all);
        for m in all {
            let [upper, lower] = m.branches().unwrap();
            let one_sided = (upper.is_bye() && lower.winner().is_some())
                || (lower.is_bye() && upper.winner().is_some());
            if one_sided {
                prop_assert!(m.winner().is_some());
            }
        }
        prop_assert!(!tree.has_contested_result());
    }

    #[test]
    fn set_winner_only_accepts_contenders_of_decidable_matches(
        n in 2usize..=40,
        pick in any::<prop::sample::Index>(),
        horse_id in 1i64..=45,
    ) {
        let mut ps = roster(n);
        let tree = build_first_round(&mut ps).unwrap();
        let mut all = Vec::new();
        matches_of(&tree, &mut all);
        let mut node = BracketNode::clone(*pick.get(&all));
        let before = node.clone();
        let contender = node.contender_side(horse_id).is_some();

        match set_winner(&mut node, horse_id) {
            Ok(()) => {
                prop_assert!(is_match_decidable(&before));
                prop_assert!(contender);
                prop_assert_eq!(node.winner().map(|p| p.horse_id), Some(horse_id));
            }
            Err(e) => {
                prop_assert!(matches!(e, TournamentError::IllegalAdvance(_)));
                prop_assert_eq!(node, before);
            }
        }
    }

    #[test]
    fn playing_out_a_bracket_keeps_it_valid(
        n in 2usize..=40,
        choices in prop::collection::vec(any::<bool>(), 64),
    ) {
        let mut s = TournamentStandings::new(Uuid::new_v4(), "Prop Cup", roster(n));
        generate_first_round(&mut s).unwrap();

        let mut choice = choices.iter().cycle();
        loop {
            let mut open = Vec::new();
            decidable_paths(&s.tree, BracketPath::root(), &mut open);
            let Some(path) = open.first() else { break };
            let [upper, lower] = s.tree.node_at(path).unwrap().child_winners().unwrap();
            let winner = if *choice.next().unwrap() { upper } else { lower };
            let horse_id = winner.unwrap().horse_id;

            record_match_result(&mut s, path, horse_id).unwrap();
            prop_assert!(validate_tree(&s.tree).is_ok());
            // byes above the match may carry the winner further
            let reached = s.tree.round_reached(horse_id).unwrap();
            prop_assert!(reached >= s.tree.node_at(path).unwrap().round());
        }

        prop_assert!(s.is_closed());
        let champion = s.champion().unwrap().horse_id;
        for p in &s.participants {
            prop_assert_eq!(Some(p.round_reached), s.tree.round_reached(p.horse_id));
        }
        prop_assert_eq!(s.tree.round_reached(champion), Some(rounds_for(n)));
        prop_assert_eq!(generate_first_round(&mut s), Err(TournamentError::AlreadyStarted));
    }
}
