//! The live plan and its publisher.
//!
//! Readers take a clone of the current `Arc<Plan>` under a short read lock
//! and search on it without holding any lock. Publishing swaps the `Arc`;
//! plans already handed out stay valid until their last reader drops them.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::info;

use crate::domain::Plan;
use crate::loader::{LoadError, load_schedule, load_topology};

/// Handle on the plan currently served.
#[derive(Debug)]
pub struct LivePlan {
    current: RwLock<Arc<Plan>>,

    /// Held for a whole read-modify-publish cycle. Holds the version.
    publish: Mutex<u64>,
}

impl LivePlan {
    /// Serve `plan` as version 1.
    pub fn new(plan: Plan) -> Self {
        Self {
            current: RwLock::new(Arc::new(plan)),
            publish: Mutex::new(1),
        }
    }

    /// The plan in effect now.
    pub fn current(&self) -> Arc<Plan> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of the plan in effect; starts at 1 and grows by one per publish.
    pub fn version(&self) -> u64 {
        *self.publish.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the live plan, returning the new version.
    pub fn publish(&self, plan: Plan) -> u64 {
        let mut version = self.publish.lock().unwrap_or_else(PoisonError::into_inner);
        self.swap(&mut version, plan)
    }

    /// Load a new topology and serve it in place of the current plan.
    ///
    /// Schedules merged into the previous plan are not carried over.
    pub fn reload_topology(&self, path: &Path) -> Result<u64, LoadError> {
        let plan = load_topology(path)?;
        Ok(self.publish(plan))
    }

    /// Merge a schedule into a copy of the current plan and serve the copy.
    ///
    /// On error nothing is published.
    pub fn merge_schedule(&self, path: &Path) -> Result<u64, LoadError> {
        let entries = load_schedule(path)?;
        let mut version = self.publish.lock().unwrap_or_else(PoisonError::into_inner);
        let merged = self.current().with_schedule(&entries)?;
        Ok(self.swap(&mut version, merged))
    }

    fn swap(&self, version: &mut u64, plan: Plan) -> u64 {
        let stations = plan.station_count();
        let sections = plan.section_count();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(plan);
        *version += 1;
        info!(version = *version, stations, sections, "plan published");
        *version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coord, LineId, PlanBuilder, Station};
    use crate::planner::{Planner, SearchConfig, SearchError};

    const TOPOLOGY: &str = "\
A; 2.00,48.0; X; 2.05,48.0; 1 variant 1; 02:00; 500
X; 2.05,48.0; B; 2.10,48.0; 1 variant 1; 02:00; 500
";

    fn chain(names: &[&str]) -> Plan {
        let mut builder = PlanBuilder::new();
        for (i, pair) in names.windows(2).enumerate() {
            builder.add_section(
                Station::new(pair[0], Coord::new(i as f64 * 0.05, 48.0)).unwrap(),
                Station::new(pair[1], Coord::new((i + 1) as f64 * 0.05, 48.0)).unwrap(),
                500.0,
                120,
                LineId::parse("1 variant 1"),
            );
        }
        builder.build()
    }

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn publish_bumps_version() {
        let live = LivePlan::new(chain(&["A", "B"]));
        assert_eq!(live.version(), 1);
        assert_eq!(live.publish(chain(&["A", "C"])), 2);
        assert_eq!(live.version(), 2);
        assert!(live.current().contains_station("C"));
    }

    #[test]
    fn captured_snapshot_survives_swap() {
        let live = LivePlan::new(chain(&["A", "X", "B"]));
        let config = SearchConfig::default();

        let captured = live.current();
        live.publish(chain(&["A", "B"]));

        let route = Planner::new(&captured, &config)
            .find_path_dist_opt("A", "X")
            .unwrap();
        assert_eq!(route.len(), 1);

        let fresh = live.current();
        assert!(matches!(
            Planner::new(&fresh, &config).find_path_dist_opt("A", "X"),
            Err(SearchError::NotFound { .. })
        ));
    }

    #[test]
    fn reload_topology_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "map.csv", TOPOLOGY);
        let live = LivePlan::new(Plan::empty());

        assert_eq!(live.reload_topology(&path).unwrap(), 2);
        assert_eq!(live.current().station_count(), 3);
    }

    #[test]
    fn failed_reload_keeps_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "map.csv", "A; 2.0,48.0; B\n");
        let live = LivePlan::new(chain(&["A", "B"]));
        let before = live.current();

        assert!(matches!(
            live.reload_topology(&path),
            Err(LoadError::Format { line: 1, .. })
        ));
        assert!(Arc::ptr_eq(&before, &live.current()));
        assert_eq!(live.version(), 1);
    }

    #[test]
    fn merge_schedule_copies_then_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "times.csv", "1 variant 1; A; 08:00\n");
        let live = LivePlan::new(chain(&["A", "X", "B"]));
        let before = live.current();

        assert_eq!(live.merge_schedule(&path).unwrap(), 2);

        let id = LineId::parse("1 variant 1");
        assert!(!before.line(&id).unwrap().is_scheduled());
        assert!(live.current().line(&id).unwrap().is_scheduled());
    }

    #[test]
    fn failed_merge_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "times.csv", "1 variant 1; A; 08:00\n2 variant 1; A; 08:00\n");
        let live = LivePlan::new(chain(&["A", "X", "B"]));
        let before = live.current();

        assert!(matches!(
            live.merge_schedule(&path),
            Err(LoadError::Schedule(_))
        ));
        assert!(Arc::ptr_eq(&before, &live.current()));
        assert_eq!(live.version(), 1);
    }

    #[test]
    fn concurrent_merges_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let live = LivePlan::new(chain(&["A", "X", "B"]));
        let paths: Vec<_> = (0..8)
            .map(|i| write(&dir, &format!("t{i}.csv"), &format!("1 variant 1; A; 08:{i:02}\n")))
            .collect();

        std::thread::scope(|scope| {
            for path in &paths {
                let live = &live;
                scope.spawn(move || live.merge_schedule(path).unwrap());
            }
        });

        assert_eq!(live.version(), 9);
        let plan = live.current();
        let line = plan.line(&LineId::parse("1 variant 1")).unwrap();
        assert_eq!(line.departures().len(), 8);
    }
}
