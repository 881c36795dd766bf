//! Participant directory: the read-only registry of horses that can be entered.

use crate::models::{HorseId, Participant};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// One row of the directory CSV: `horse_id,name,date_of_birth` (ISO date).
#[derive(Debug, Deserialize)]
struct DirectoryRecord {
    horse_id: HorseId,
    name: String,
    date_of_birth: NaiveDate,
}

#[derive(Clone, Debug, Default)]
pub struct ParticipantDirectory {
    horses: BTreeMap<HorseId, Participant>,
}

impl ParticipantDirectory {
    pub fn new(horses: impl IntoIterator<Item = Participant>) -> Self {
        Self {
            horses: horses
                .into_iter()
                .map(|p| (p.horse_id, p.unseeded()))
                .collect(),
        }
    }

    /// Load from CSV with a header row. Later rows with the same id replace earlier ones.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut horses = Vec::new();
        for record in rdr.deserialize() {
            let r: DirectoryRecord = record?;
            horses.push(Participant::new(r.horse_id, r.name, r.date_of_birth));
        }
        Ok(Self::new(horses))
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn get(&self, horse_id: HorseId) -> Option<&Participant> {
        self.horses.get(&horse_id)
    }

    /// Horses whose name contains `query` (case-insensitive), ordered by id, at most `limit`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Participant> {
        self.horses
            .values()
            .filter(|p| p.name_matches(query))
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.horses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.horses.is_empty()
    }
}
