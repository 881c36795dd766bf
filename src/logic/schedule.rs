//! Scheduling: validate a create request and set up empty standings.

use crate::directory::ParticipantDirectory;
use crate::models::{
    Participant, Tournament, TournamentCreate, TournamentError, TournamentStandings, MAX_NAME_LEN,
};
use std::collections::HashSet;

/// Validate `create` against the directory and build the tournament with an empty bracket.
///
/// All failed checks are reported together in `TournamentError::Validation`.
pub fn schedule_tournament(
    create: &TournamentCreate,
    directory: &ParticipantDirectory,
) -> Result<(Tournament, TournamentStandings), TournamentError> {
    log::trace!("schedule_tournament({create:?})");
    let mut errors = Vec::new();

    let name = create.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.push("No name given".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.push(format!("Name longer than {MAX_NAME_LEN} characters"));
    }
    if create.start_date >= create.end_date {
        errors.push("Start date must be before end date".to_string());
    }
    if create.participants.len() < 2 {
        errors.push("At least 2 participants are required".to_string());
    }

    let mut seen = HashSet::new();
    let mut participants: Vec<Participant> = Vec::with_capacity(create.participants.len());
    for &horse_id in &create.participants {
        if !seen.insert(horse_id) {
            errors.push(format!("Horse {horse_id} is entered more than once"));
            continue;
        }
        match directory.get(horse_id) {
            Some(p) => participants.push(p.unseeded()),
            None => errors.push(format!("Horse {horse_id} does not exist")),
        }
    }

    if !errors.is_empty() {
        log::warn!("Validation of tournament for create failed: {errors:?}");
        return Err(TournamentError::Validation(errors));
    }

    let tournament = Tournament::new(name, create.start_date, create.end_date);
    let standings = TournamentStandings::new(tournament.id, name, participants);
    log::debug!(
        "scheduled tournament {} ({}) with {} participants",
        tournament.id,
        tournament.name,
        standings.participants.len()
    );
    Ok((tournament, standings))
}
