// src/geo/lookup.rs
use std::time::Duration;

use crate::{entity::Coordinates, error::LookupError};

/// Free text → coordinates. `Ok(None)` is a legitimate "not found".
pub trait Geocoder {
    fn lookup(&mut self, query: &str, timeout: Duration) -> Result<Option<Coordinates>, LookupError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &mut G {
    fn lookup(&mut self, query: &str, timeout: Duration) -> Result<Option<Coordinates>, LookupError> {
        (**self).lookup(query, timeout)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn lookup(&mut self, query: &str, timeout: Duration) -> Result<Option<Coordinates>, LookupError> {
        (**self).lookup(query, timeout)
    }
}
