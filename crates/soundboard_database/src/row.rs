//! Raw metadata rows and their conversion to validated entries.

use serde::{Deserialize, Serialize};
use soundboard_core::{BlobKey, SoundEntry, SoundName};
use soundboard_error::SoundError;

/// A sound row as stored by the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "postgres",
    derive(diesel::Queryable, diesel::Selectable),
    diesel(table_name = crate::schema::sounds)
)]
pub struct SoundRow {
    /// Display name
    pub name: String,
    /// Blob key of the audio file
    pub file_name: String,
}

impl From<&SoundEntry> for SoundRow {
    fn from(entry: &SoundEntry) -> Self {
        Self {
            name: entry.name().to_string(),
            file_name: entry.blob_key().to_string(),
        }
    }
}

impl TryFrom<SoundRow> for SoundEntry {
    type Error = SoundError;

    fn try_from(row: SoundRow) -> Result<Self, Self::Error> {
        Ok(SoundEntry::new(
            SoundName::new(row.name)?,
            BlobKey::new(row.file_name)?,
        ))
    }
}

/// Convert rows to entries, skipping rows whose values fail validation.
///
/// Rows written by other tools may hold names no command can address; those
/// are logged and left out.
pub fn rows_to_entries(rows: Vec<SoundRow>) -> Vec<SoundEntry> {
    rows.into_iter()
        .filter_map(|row| {
            let name = row.name.clone();
            SoundEntry::try_from(row)
                .inspect_err(|e| tracing::warn!(name = %name, error = %e, "Skipping invalid sound row"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, file_name: &str) -> SoundRow {
        SoundRow {
            name: name.to_string(),
            file_name: file_name.to_string(),
        }
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let entries = rows_to_entries(vec![
            row("Red Flags", "rf.mp3"),
            row("###", "bad.mp3"),
            row("Horn", "../etc/passwd"),
            row("Horn", "horn.wav"),
        ]);

        let names: Vec<_> = entries.iter().map(|e| e.name().as_str()).collect();
        assert_eq!(names, vec!["Red Flags", "Horn"]);
    }

    #[test]
    fn test_row_round_trip_through_entry() {
        let original = row("Red Flags", "rf.mp3");
        let entry = SoundEntry::try_from(original.clone()).unwrap();
        assert_eq!(SoundRow::from(&entry), original);
    }
}
