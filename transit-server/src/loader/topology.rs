//! Topology source: one section per record.
//!
//! ```text
//! Lourmel; 2.2822,48.8386; Boucicaut; 2.2879,48.8410; 8 variant 1; 01:02; 486
//! ```
//!
//! Fields are start name, start coordinate, arrival name, arrival
//! coordinate, line id, duration as `mm:ss` and distance in meters.

use std::path::Path;

use tracing::debug;

use crate::domain::{Coord, LineId, Plan, PlanBuilder, Station};

use super::{LoadError, read_source, records};

const FIELDS: usize = 7;

/// Read and parse a topology file.
pub fn load_topology(path: &Path) -> Result<Plan, LoadError> {
    let text = read_source(path)?;
    let plan = parse_topology(&text)?;
    debug!(
        path = %path.display(),
        stations = plan.station_count(),
        sections = plan.section_count(),
        lines = plan.line_count(),
        "topology loaded"
    );
    Ok(plan)
}

/// Parse topology records into a plan.
pub fn parse_topology(text: &str) -> Result<Plan, LoadError> {
    let mut builder = PlanBuilder::new();

    for (line, fields) in records(text) {
        if fields.len() != FIELDS {
            return Err(LoadError::format(
                line,
                format!("expected {FIELDS} fields, found {}", fields.len()),
            ));
        }
        let start = station(line, fields[0], fields[1])?;
        let arrival = station(line, fields[2], fields[3])?;
        if fields[4].is_empty() {
            return Err(LoadError::format(line, "line id is empty"));
        }
        let line_id = LineId::parse(fields[4]);
        let duration = parse_duration(fields[5])
            .ok_or_else(|| LoadError::format(line, format!("invalid duration {:?}", fields[5])))?;
        let distance = parse_distance(fields[6])
            .ok_or_else(|| LoadError::format(line, format!("invalid distance {:?}", fields[6])))?;

        builder.add_section(start, arrival, distance, duration, line_id);
    }

    Ok(builder.build())
}

fn station(line: usize, name: &str, coord: &str) -> Result<Station, LoadError> {
    let coord = Coord::parse(unquote(coord)).map_err(|e| LoadError::format(line, e.to_string()))?;
    Station::new(name, coord).map_err(|e| LoadError::format(line, e.to_string()))
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// Parse `mm:ss` into seconds. Minutes are unbounded, seconds must be below 60.
fn parse_duration(s: &str) -> Option<u32> {
    let (minutes, seconds) = s.split_once(':')?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    let seconds: u32 = seconds.trim().parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

fn parse_distance(s: &str) -> Option<f64> {
    let distance: f64 = s.parse().ok()?;
    (distance.is_finite() && distance >= 0.0).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Balard; 2.2785,48.8366; Lourmel; 2.2822,48.8386; 8 variant 1; 01:00; 431
Lourmel; \"2.2822,48.8386\"; Boucicaut; 2.2879,48.8410; 8 variant 1; 01:02; 486.5

Boucicaut; 2.2879,48.8410; Félix Faure; 2.2918,48.8426; 8 variant 1; 00:58; 338
";

    #[test]
    fn parses_sections_and_lines() {
        let plan = parse_topology(SAMPLE).unwrap();
        assert_eq!(plan.station_count(), 4);
        assert_eq!(plan.section_count(), 3);
        assert_eq!(plan.line_count(), 1);

        let section = &plan.sections_from("Lourmel")[0];
        assert_eq!(section.arrival().name(), "Boucicaut");
        assert_eq!(section.duration(), 62);
        assert_eq!(section.distance(), 486.5);
        assert_eq!(section.line(), Some(&LineId::new("8", "1")));
    }

    #[test]
    fn shared_stations_are_interned() {
        let plan = parse_topology(SAMPLE).unwrap();
        assert_eq!(plan.stations().len(), 4);
    }

    #[test]
    fn empty_source_gives_empty_plan() {
        let plan = parse_topology("\n  \n").unwrap();
        assert_eq!(plan.station_count(), 0);
    }

    #[test]
    fn wrong_field_count_reports_line() {
        let text = "A; 1,1; B; 1,2; 1; 01:00; 100\nA; 1,1; B\n";
        match parse_topology(text) {
            Err(LoadError::Format { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("found 3"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blank_lines_still_count() {
        let text = "\n\nA; x,1; B; 1,2; 1; 01:00; 100\n";
        assert!(matches!(
            parse_topology(text),
            Err(LoadError::Format { line: 3, .. })
        ));
    }

    #[test]
    fn rejects_malformed_fields() {
        for bad in [
            "A; 1,1; B; 1,2; 1; 0100; 100",
            "A; 1,1; B; 1,2; 1; 01:75; 100",
            "A; 1,1; B; 1,2; 1; 01:00; far",
            "A; 1,1; B; 1,2; 1; 01:00; -5",
            "A; 1; B; 1,2; 1; 01:00; 100",
            " ; 1,1; B; 1,2; 1; 01:00; 100",
            "A; 1,1; B; 1,2;  ; 01:00; 100",
        ] {
            assert!(
                matches!(parse_topology(bad), Err(LoadError::Format { line: 1, .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("01:02"), Some(62));
        assert_eq!(parse_duration("75:00"), Some(4500));
        assert_eq!(parse_duration("00:60"), None);
        assert_eq!(parse_duration("1"), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_topology(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let plan = load_topology(&path).unwrap();
        assert_eq!(plan.section_count(), 3);
    }
}
