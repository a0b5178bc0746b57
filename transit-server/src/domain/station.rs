//! Station and coordinate types.

use std::fmt;
use std::hash::{Hash, Hasher};

use geo::{HaversineDistance, Point};

/// Walking speed used to estimate walking durations: 5 km/h.
pub const WALKING_SPEED_M_PER_S: f64 = 5_000.0 / 3_600.0;

/// Error returned when a station or coordinate is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station: {reason}")]
pub struct InvalidStation {
    reason: &'static str,
}

impl InvalidStation {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A geographic coordinate: `x` is the longitude and `y` the latitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse a coordinate written as `"x,y"`.
    ///
    /// ```
    /// use transit_server::domain::Coord;
    ///
    /// let c = Coord::parse("2.2822, 48.8386").unwrap();
    /// assert_eq!(c.x, 2.2822);
    /// assert!(Coord::parse("2.28").is_err());
    /// assert!(Coord::parse("a,b").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidStation> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| InvalidStation::new("coordinate must be \"x,y\""))?;
        let x: f64 = x
            .trim()
            .parse()
            .map_err(|_| InvalidStation::new("coordinate x is not a number"))?;
        let y: f64 = y
            .trim()
            .parse()
            .map_err(|_| InvalidStation::new("coordinate y is not a number"))?;
        Ok(Self { x, y })
    }

    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A station: a name and a location.
///
/// Two stations are the same station only when both the name and the
/// coordinate match. Stops sharing a name in different zones stay distinct.
#[derive(Debug, Clone)]
pub struct Station {
    name: String,
    coord: Coord,
}

impl Station {
    /// Create a station.
    ///
    /// The name is trimmed and must not be empty. Coordinates must be finite.
    pub fn new(name: &str, coord: Coord) -> Result<Self, InvalidStation> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InvalidStation::new("name must not be empty"));
        }
        if !coord.x.is_finite() || !coord.y.is_finite() {
            return Err(InvalidStation::new("coordinates must be finite"));
        }
        // Normalise -0.0 so equal coordinates hash equally.
        let coord = Coord::new(coord.x + 0.0, coord.y + 0.0);
        Ok(Self {
            name: name.to_string(),
            coord,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Great-circle distance to another station, in meters.
    pub fn distance_to(&self, other: &Station) -> f64 {
        self.coord.point().haversine_distance(&other.coord.point())
    }

    /// Estimated walking time to another station, in whole seconds (rounded up).
    pub fn walk_duration_to(&self, other: &Station) -> u32 {
        (self.distance_to(other) / WALKING_SPEED_M_PER_S).ceil() as u32
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.coord.x.to_bits() == other.coord.x.to_bits()
            && self.coord.y.to_bits() == other.coord.y.to_bits()
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.coord.x.to_bits().hash(state);
        self.coord.y.to_bits().hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.coord.x, self.coord.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str, x: f64, y: f64) -> Station {
        Station::new(name, Coord::new(x, y)).unwrap()
    }

    #[test]
    fn rejects_empty_name() {
        assert!(Station::new("", Coord::new(0.0, 0.0)).is_err());
        assert!(Station::new("   ", Coord::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        assert!(Station::new("A", Coord::new(f64::NAN, 0.0)).is_err());
        assert!(Station::new("A", Coord::new(0.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn name_is_trimmed() {
        assert_eq!(station("  Lourmel ", 2.28, 48.83).name(), "Lourmel");
    }

    #[test]
    fn equality_needs_name_and_coordinates() {
        let a = station("Lourmel", 2.2822, 48.8386);
        let b = station("Lourmel", 2.2822, 48.8386);
        let c = station("Lourmel", 2.3000, 48.8386);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn negative_zero_matches_zero() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(station("Origin", 0.0, 0.0));
        assert!(set.contains(&station("Origin", -0.0, 0.0)));
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = station("A", 2.2822, 48.8386);
        let b = station("B", 2.2950, 48.8420);
        assert_eq!(a.distance_to(&a), 0.0);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
    }

    #[test]
    fn distance_of_a_thousandth_degree_latitude() {
        // 0.001 degree of latitude is about 111 m.
        let a = station("A", 2.0, 48.0);
        let b = station("B", 2.0, 48.001);
        let d = a.distance_to(&b);
        assert!((d - 111.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn walk_duration_rounds_up() {
        let a = station("A", 2.0, 48.0);
        let b = station("B", 2.0, 48.001);
        let secs = a.walk_duration_to(&b);
        // ~111 m at 1.39 m/s
        assert_eq!(secs, (a.distance_to(&b) / WALKING_SPEED_M_PER_S).ceil() as u32);
        assert!((79..=81).contains(&secs), "got {secs}");
    }
}
