//! Seeding: order the roster before the first round is generated.

use crate::models::{HorseId, Participant, TournamentError, TournamentStandings};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

pub const CHAMPION_POINTS: u32 = 5;
pub const FINALIST_POINTS: u32 = 3;
pub const SEMI_FINALIST_POINTS: u32 = 1;

/// Points earned in one past tournament, by how close to the final the horse got.
pub fn ranking_points(past: &TournamentStandings, horse_id: HorseId) -> u32 {
    let Some(round) = past.tree.round_reached(horse_id) else {
        return 0;
    };
    let rounds = past.tree.round();
    if rounds == 0 {
        return 0;
    }
    match rounds - round {
        0 => CHAMPION_POINTS,
        1 => FINALIST_POINTS,
        2 => SEMI_FINALIST_POINTS,
        _ => 0,
    }
}

/// Reorder the roster by points over `history` so that top seeds meet bottom seeds.
///
/// Horses are ranked by total points (ties by name), then laid out as
/// 1st, last, 2nd, second-to-last, ... so the first-round pairs are strongest vs weakest.
pub fn seed_by_ranking(
    standings: &mut TournamentStandings,
    history: &[TournamentStandings],
) -> Result<(), TournamentError> {
    log::trace!("seed_by_ranking({}, {} past)", standings.id, history.len());
    if standings.has_history() {
        return Err(TournamentError::AlreadyStarted);
    }
    let points: HashMap<HorseId, u32> = standings
        .participants
        .iter()
        .map(|p| {
            let total = history.iter().map(|past| ranking_points(past, p.horse_id)).sum();
            (p.horse_id, total)
        })
        .collect();

    let mut ranked: Vec<Participant> = std::mem::take(&mut standings.participants);
    ranked.sort_by(|a, b| {
        points[&b.horse_id]
            .cmp(&points[&a.horse_id])
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut ordered = Vec::with_capacity(ranked.len());
    let mut remaining = ranked.into_iter();
    loop {
        match (remaining.next(), remaining.next_back()) {
            (Some(strong), Some(weak)) => {
                ordered.push(strong);
                ordered.push(weak);
            }
            (Some(last), None) => {
                ordered.push(last);
                break;
            }
            _ => break,
        }
    }
    standings.participants = ordered;
    log::debug!("seeded tournament {} by ranking", standings.id);
    Ok(())
}

/// Random draw of the roster order.
pub fn draw_seeding<R: Rng + ?Sized>(
    standings: &mut TournamentStandings,
    rng: &mut R,
) -> Result<(), TournamentError> {
    log::trace!("draw_seeding({})", standings.id);
    if standings.has_history() {
        return Err(TournamentError::AlreadyStarted);
    }
    standings.participants.shuffle(rng);
    Ok(())
}
