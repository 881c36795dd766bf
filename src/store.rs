//! In-memory tournament store: one entry (schedule + standings) per tournament id.
//!
//! Mutation goes through `update_standings`, which holds the write lock for the whole edit and
//! commits only if the edit succeeds, so one tournament never sees interleaved or partial writes.

use crate::models::{
    Tournament, TournamentError, TournamentId, TournamentSearch, TournamentStandings,
};
use chrono::Months;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// How far back past results count towards seeding.
pub const RANKING_WINDOW_MONTHS: u32 = 12;

#[derive(Clone, Debug)]
struct TournamentEntry {
    tournament: Tournament,
    standings: TournamentStandings,
}

#[derive(Debug, Default)]
pub struct TournamentStore {
    entries: RwLock<HashMap<TournamentId, TournamentEntry>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<TournamentId, TournamentEntry>>, TournamentError> {
        self.entries
            .read()
            .map_err(|_| TournamentError::Storage("lock error".to_string()))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<TournamentId, TournamentEntry>>, TournamentError> {
        self.entries
            .write()
            .map_err(|_| TournamentError::Storage("lock error".to_string()))
    }

    /// Add a newly scheduled tournament with its initial standings.
    pub fn insert(
        &self,
        tournament: Tournament,
        standings: TournamentStandings,
    ) -> Result<(), TournamentError> {
        let mut g = self.write()?;
        g.insert(
            tournament.id,
            TournamentEntry {
                tournament,
                standings,
            },
        );
        Ok(())
    }

    pub fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.read()?
            .get(&id)
            .map(|e| e.tournament.clone())
            .ok_or(TournamentError::NotFound(id))
    }

    pub fn standings(&self, id: TournamentId) -> Result<TournamentStandings, TournamentError> {
        self.read()?
            .get(&id)
            .map(|e| e.standings.clone())
            .ok_or(TournamentError::NotFound(id))
    }

    /// Tournaments matching `search`, earliest start first.
    pub fn search(&self, search: &TournamentSearch) -> Result<Vec<Tournament>, TournamentError> {
        let mut found: Vec<Tournament> = self
            .read()?
            .values()
            .filter(|e| search.matches(&e.tournament))
            .map(|e| e.tournament.clone())
            .collect();
        found.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.name.cmp(&b.name)));
        Ok(found)
    }

    /// Full replace of the standings of an existing tournament.
    pub fn replace_standings(&self, standings: TournamentStandings) -> Result<(), TournamentError> {
        let mut g = self.write()?;
        let entry = g
            .get_mut(&standings.id)
            .ok_or(TournamentError::NotFound(standings.id))?;
        entry.standings = standings;
        Ok(())
    }

    /// Apply `edit` to a copy of the standings; store and return the copy only if it succeeds.
    pub fn update_standings<F>(
        &self,
        id: TournamentId,
        edit: F,
    ) -> Result<TournamentStandings, TournamentError>
    where
        F: FnOnce(&mut TournamentStandings) -> Result<(), TournamentError>,
    {
        let mut g = self.write()?;
        let entry = g.get_mut(&id).ok_or(TournamentError::NotFound(id))?;
        let mut standings = entry.standings.clone();
        edit(&mut standings)?;
        entry.standings = standings.clone();
        Ok(standings)
    }

    /// Standings of the other tournaments that started within the ranking window before `id`.
    pub fn history_before(
        &self,
        id: TournamentId,
    ) -> Result<Vec<TournamentStandings>, TournamentError> {
        let g = self.read()?;
        let current = g.get(&id).ok_or(TournamentError::NotFound(id))?;
        let until = current.tournament.start_date;
        let since = until
            .checked_sub_months(Months::new(RANKING_WINDOW_MONTHS))
            .unwrap_or(chrono::NaiveDate::MIN);
        Ok(g
            .values()
            .filter(|e| e.tournament.id != id)
            .filter(|e| e.tournament.start_date >= since && e.tournament.start_date < until)
            .map(|e| e.standings.clone())
            .collect())
    }
}
