//! Schedule source: one departure per record, `line id; start station; hh:mm`.

use std::path::Path;

use tracing::debug;

use crate::domain::{LineId, ScheduleEntry, TimeOfDay};

use super::{LoadError, read_source, records};

const FIELDS: usize = 3;

/// Read and parse a schedule file.
pub fn load_schedule(path: &Path) -> Result<Vec<ScheduleEntry>, LoadError> {
    let text = read_source(path)?;
    let entries = parse_schedule(&text)?;
    debug!(path = %path.display(), entries = entries.len(), "schedule loaded");
    Ok(entries)
}

pub fn parse_schedule(text: &str) -> Result<Vec<ScheduleEntry>, LoadError> {
    records(text)
        .map(|(line, fields)| {
            let [id, station, time] = fields.as_slice() else {
                return Err(LoadError::format(
                    line,
                    format!("expected {FIELDS} fields, found {}", fields.len()),
                ));
            };
            if id.is_empty() {
                return Err(LoadError::format(line, "line id is empty"));
            }
            if station.is_empty() {
                return Err(LoadError::format(line, "station name is empty"));
            }
            let departure =
                TimeOfDay::parse(time).map_err(|e| LoadError::format(line, e.to_string()))?;
            Ok(ScheduleEntry::new(LineId::parse(id), station, departure))
        })
        .collect()
}
