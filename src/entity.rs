// src/entity.rs
//
// One ranking row. Identity fields are fixed at load time; the only thing a
// resolution pass may change is `location`, and only forward
// (Unresolved → Resolved).

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self { Self { lat, lon } }

    /// Both halves of a pair, or nothing. A lone lat or lon is discarded.
    pub fn from_pair(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some(Self { lat, lon }),
            _ => None,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Per-entity resolution state.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Location {
    #[default]
    Unresolved,
    Resolved(Coordinates),
}

impl Location {
    pub fn is_resolved(&self) -> bool { matches!(self, Location::Resolved(_)) }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Location::Resolved(c) => Some(*c),
            Location::Unresolved  => None,
        }
    }
}

impl From<Option<Coordinates>> for Location {
    fn from(c: Option<Coordinates>) -> Self {
        c.map(Location::Resolved).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    rank: u32,
    name: String,
    country: String,
    score: f64,
    location: Location,
}

impl Entity {
    pub fn new(rank: u32, name: impl Into<String>, country: impl Into<String>, score: f64) -> Self {
        Self {
            rank,
            name: name.into(),
            country: country.into(),
            score,
            location: Location::Unresolved,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_coordinates(self, lat: f64, lon: f64) -> Self {
        self.with_location(Location::Resolved(Coordinates::new(lat, lon)))
    }

    #[inline] pub fn rank(&self) -> u32 { self.rank }
    #[inline] pub fn name(&self) -> &str { &self.name }
    #[inline] pub fn country(&self) -> &str { &self.country }
    #[inline] pub fn score(&self) -> f64 { self.score }
    #[inline] pub fn location(&self) -> Location { self.location }
    #[inline] pub fn coordinates(&self) -> Option<Coordinates> { self.location.coordinates() }
    #[inline] pub fn is_resolved(&self) -> bool { self.location.is_resolved() }

    /// Record a lookup hit. Ignored if the entity already has coordinates.
    pub fn mark_resolved(&mut self, coords: Coordinates) -> bool {
        if self.location.is_resolved() {
            return false;
        }
        self.location = Location::Resolved(coords);
        true
    }

    /// Identity used to match rows across files (source vs. prior output).
    pub fn key(&self) -> EntityKey {
        EntityKey {
            rank: self.rank,
            name: self.name.trim().to_lowercase(),
            country: self.country.trim().to_lowercase(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityKey {
    rank: u32,
    name: String,
    country: String,
}
