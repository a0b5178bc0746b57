//! Lines: ordered chains of sections sharing one departure schedule.
//!
//! A line knows its sections, the section its vehicles leave from, and the
//! times they leave. From those it derives, for every section on the chain,
//! how long after departure a vehicle reaches that section's arrival station.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{DomainError, LineId, Section, TimeOfDay};

/// Time a vehicle stands at each intermediate stop, in seconds.
pub const DWELL_SECS: u32 = 20;

/// One scheduled vehicle run over a single section.
///
/// Times are seconds since midnight of the departure day and may exceed one
/// day for runs that continue past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// When the vehicle leaves the section's start station.
    pub departure: u32,
    /// When the vehicle reaches the section's arrival station.
    pub arrival: u32,
}

type HopKey = (String, String);

fn hop_key(section: &Section) -> HopKey {
    (
        section.start().name().to_string(),
        section.arrival().name().to_string(),
    )
}

/// A named line and its schedule.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,

    /// Every section of the line, in the order they were loaded.
    sections: Vec<Arc<Section>>,

    /// Index into `sections` of the section vehicles depart from.
    start: Option<usize>,

    /// Departure times at the start section, sorted and unique.
    departures: Vec<TimeOfDay>,

    /// Cumulative duration from the line's departure to the end of each
    /// section reached by walking the chain forward from `start`.
    cumulative: HashMap<HopKey, u32>,
}

impl Line {
    /// Create an empty line.
    pub fn new(id: LineId) -> Self {
        Self {
            id,
            sections: Vec::new(),
            start: None,
            departures: Vec::new(),
            cumulative: HashMap::new(),
        }
    }

    pub fn id(&self) -> &LineId {
        &self.id
    }

    pub fn sections(&self) -> &[Arc<Section>] {
        &self.sections
    }

    /// The section vehicles depart from, once declared by a schedule.
    pub fn start(&self) -> Option<&Arc<Section>> {
        self.start.map(|idx| &self.sections[idx])
    }

    pub fn departures(&self) -> &[TimeOfDay] {
        &self.departures
    }

    /// True once the line has a start section and at least one departure.
    pub fn is_scheduled(&self) -> bool {
        self.start.is_some() && !self.departures.is_empty()
    }

    pub(crate) fn push_section(&mut self, section: Arc<Section>) {
        self.sections.push(section);
        if self.start.is_some() {
            self.rebuild_durations();
        }
    }

    /// Declare the station vehicles depart from.
    ///
    /// The first declaration picks the first section leaving `station`.
    /// Later declarations must name the same station.
    pub fn set_start(&mut self, station: &str) -> Result<(), DomainError> {
        let station = station.trim();
        match self.start() {
            Some(current) => {
                let current = current.start().name();
                if current != station {
                    return Err(DomainError::DifferentStart {
                        line: self.id.clone(),
                        current: current.to_string(),
                        requested: station.to_string(),
                    });
                }
                Ok(())
            }
            None => {
                let idx = self
                    .sections
                    .iter()
                    .position(|s| s.start().name() == station)
                    .ok_or_else(|| DomainError::StartStationNotFound {
                        station: station.to_string(),
                        line: self.id.clone(),
                    })?;
                self.start = Some(idx);
                self.rebuild_durations();
                Ok(())
            }
        }
    }

    /// Add a departure time at the start section. Duplicates are ignored.
    pub fn add_departure(&mut self, time: TimeOfDay) {
        if let Err(pos) = self.departures.binary_search(&time) {
            self.departures.insert(pos, time);
        }
    }

    /// Recompute cumulative durations with one forward pass from the start.
    ///
    /// The pass follows "arrival of this section == start of the next" and
    /// stops at a dead end or at the first station it has already visited.
    /// Branches beyond the first matching section are not followed.
    fn rebuild_durations(&mut self) {
        self.cumulative.clear();
        let Some(start_idx) = self.start else {
            return;
        };

        let mut current = &self.sections[start_idx];
        let mut total = current.duration();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(current.start().name());
        self.cumulative.insert(hop_key(current), total);

        loop {
            let here = current.arrival().name();
            if !visited.insert(here) {
                break;
            }
            let Some(next) = self.sections.iter().find(|s| s.start().name() == here) else {
                break;
            };
            total += next.duration() + DWELL_SECS;
            self.cumulative.insert(hop_key(next), total);
            current = next;
        }
    }

    /// Cumulative duration from the line's departure to the end of `section`.
    ///
    /// `None` if the section is not on the chain reachable from the start.
    pub fn duration_from_start(&self, section: &Section) -> Option<u32> {
        self.cumulative.get(&hop_key(section)).copied()
    }

    /// For each departure, the time the vehicle leaves the arrival station
    /// of `section` (arrival there plus one dwell).
    pub fn times_at_arrival(&self, section: &Section) -> Vec<TimeOfDay> {
        let Some(offset) = self.duration_from_start(section) else {
            return Vec::new();
        };
        self.departures
            .iter()
            .map(|d| d.add_seconds(offset + DWELL_SECS))
            .collect()
    }

    /// The earliest run leaving the start of `section` at or after `at`.
    ///
    /// `at` is in seconds since midnight of the query day. Runs belong to
    /// that day only; there is no rollover to the next day's schedule.
    pub fn next_run(&self, section: &Section, at: u32) -> Option<Run> {
        let arrive_offset = self.duration_from_start(section)?;
        let depart_offset = arrive_offset.saturating_sub(section.duration());

        let first = self
            .departures
            .partition_point(|d| d.seconds_from_midnight() + depart_offset < at);
        self.departures.get(first).map(|d| {
            let base = d.seconds_from_midnight();
            Run {
                departure: base + depart_offset,
                arrival: base + arrive_offset,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coord, Station};

    fn station(name: &str) -> Arc<Station> {
        Arc::new(Station::new(name, Coord::new(2.0, 48.0)).unwrap())
    }

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn id() -> LineId {
        LineId::new("1", "0")
    }

    /// A -> B -> C -> D with 120/130/140 s, pushed out of order.
    fn abcd() -> (Line, Vec<Arc<Section>>) {
        let (a, b, c, d) = (station("A"), station("B"), station("C"), station("D"));
        let ab = Arc::new(Section::new(a, b.clone(), 500.0, 120, id()));
        let bc = Arc::new(Section::new(b, c.clone(), 600.0, 130, id()));
        let cd = Arc::new(Section::new(c, d, 700.0, 140, id()));
        let mut line = Line::new(id());
        line.push_section(cd.clone());
        line.push_section(ab.clone());
        line.push_section(bc.clone());
        (line, vec![ab, bc, cd])
    }

    #[test]
    fn no_durations_before_start_declared() {
        let (line, s) = abcd();
        assert!(line.start().is_none());
        assert_eq!(line.duration_from_start(&s[0]), None);
        assert!(!line.is_scheduled());
    }

    #[test]
    fn cumulative_durations_include_dwell() {
        let (mut line, s) = abcd();
        line.set_start("A").unwrap();
        assert_eq!(line.duration_from_start(&s[0]), Some(120));
        assert_eq!(line.duration_from_start(&s[1]), Some(120 + 130 + 20));
        assert_eq!(line.duration_from_start(&s[2]), Some(120 + 130 + 20 + 140 + 20));
    }

    #[test]
    fn start_mid_chain_skips_earlier_sections() {
        let (mut line, s) = abcd();
        line.set_start("B").unwrap();
        assert_eq!(line.duration_from_start(&s[0]), None);
        assert_eq!(line.duration_from_start(&s[1]), Some(130));
        assert_eq!(line.duration_from_start(&s[2]), Some(130 + 140 + 20));
    }

    #[test]
    fn unknown_start_station_rejected() {
        let (mut line, _) = abcd();
        let err = line.set_start("Z").unwrap_err();
        assert!(matches!(err, DomainError::StartStationNotFound { .. }));
        assert!(line.start().is_none());
    }

    #[test]
    fn different_start_rejected_same_start_accepted() {
        let (mut line, _) = abcd();
        line.set_start("A").unwrap();
        assert!(line.set_start("A").is_ok());
        let err = line.set_start("B").unwrap_err();
        assert!(matches!(err, DomainError::DifferentStart { .. }));
    }

    #[test]
    fn departures_sorted_and_unique() {
        let (mut line, _) = abcd();
        line.add_departure(t("09:00"));
        line.add_departure(t("08:00"));
        line.add_departure(t("09:00"));
        assert_eq!(line.departures(), &[t("08:00"), t("09:00")]);
    }

    #[test]
    fn times_at_arrival_add_offset_and_dwell() {
        let (mut line, s) = abcd();
        line.set_start("A").unwrap();
        line.add_departure(t("08:00"));
        line.add_departure(t("09:00"));
        // B -> C ends 270 s after departure, plus 20 s dwell.
        assert_eq!(
            line.times_at_arrival(&s[1]),
            vec![t("08:04:50"), t("09:04:50")]
        );
    }

    #[test]
    fn next_run_waits_for_following_departure() {
        let (mut line, s) = abcd();
        line.set_start("A").unwrap();
        line.add_departure(t("08:00"));
        line.add_departure(t("09:00"));
        let eight = t("08:00").seconds_from_midnight();
        let nine = t("09:00").seconds_from_midnight();

        // B -> C leaves B at departure + 140 s.
        let run = line.next_run(&s[1], eight + 140).unwrap();
        assert_eq!(run, Run { departure: eight + 140, arrival: eight + 270 });

        let run = line.next_run(&s[1], eight + 141).unwrap();
        assert_eq!(run.departure, nine + 140);

        assert!(line.next_run(&s[1], nine + 141).is_none());
    }

    #[test]
    fn next_run_after_midnight_exceeds_one_day() {
        let (mut line, s) = abcd();
        line.set_start("A").unwrap();
        line.add_departure(t("23:59"));
        let run = line.next_run(&s[2], 0).unwrap();
        assert!(run.arrival > crate::domain::SECONDS_PER_DAY);
    }

    #[test]
    fn cycle_terminates() {
        let (a, b) = (station("A"), station("B"));
        let mut line = Line::new(id());
        let ab = Arc::new(Section::new(a.clone(), b.clone(), 1.0, 10, id()));
        let ba = Arc::new(Section::new(b, a, 1.0, 10, id()));
        line.push_section(ab.clone());
        line.push_section(ba.clone());
        line.set_start("A").unwrap();
        assert_eq!(line.duration_from_start(&ab), Some(10));
        assert_eq!(line.duration_from_start(&ba), Some(40));
    }

    #[test]
    fn pushing_after_start_extends_chain() {
        let (a, b, c) = (station("A"), station("B"), station("C"));
        let mut line = Line::new(id());
        let ab = Arc::new(Section::new(a, b.clone(), 1.0, 10, id()));
        let bc = Arc::new(Section::new(b, c, 1.0, 10, id()));
        line.push_section(ab);
        line.set_start("A").unwrap();
        assert_eq!(line.duration_from_start(&bc), None);
        line.push_section(bc.clone());
        assert_eq!(line.duration_from_start(&bc), Some(40));
    }
}
