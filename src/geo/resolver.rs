// src/geo/resolver.rs
//
// Two-stage lookup for one entity, strict order, first hit wins:
//   1. "{name}, {country}"
//   2. "{name}"
// A transport error ends the attempt right there; the entity is simply left
// for the next run.

use super::{lookup::Geocoder, pacer::{Clock, RateLimitedClient}};
use crate::{entity::{Coordinates, Entity}, error::LookupError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    NameAndCountry,
    NameOnly,
}

#[derive(Debug)]
pub enum Attempt {
    Found { coords: Coordinates, stage: Stage },
    /// Both stages answered "not found".
    Miss,
    /// Timeout / network / garbage response; stage that failed.
    Failed { stage: Stage, error: LookupError },
}

pub fn composite_query(e: &Entity) -> String {
    format!("{}, {}", e.name(), e.country())
}

pub struct Resolver<G, C> {
    client: RateLimitedClient<G, C>,
}

impl<G: Geocoder, C: Clock> Resolver<G, C> {
    pub fn new(client: RateLimitedClient<G, C>) -> Self { Self { client } }

    pub fn resolve(&mut self, entity: &Entity) -> Attempt {
        let stages = [
            (Stage::NameAndCountry, composite_query(entity)),
            (Stage::NameOnly, s!(entity.name())),
        ];

        for (stage, query) in stages {
            match self.client.lookup(&query) {
                Ok(Some(coords)) => return Attempt::Found { coords, stage },
                Ok(None) => logd!("Resolve: no hit for '{query}' ({stage:?})"),
                Err(error) => return Attempt::Failed { stage, error },
            }
        }
        Attempt::Miss
    }

    pub fn client(&self) -> &RateLimitedClient<G, C> { &self.client }
}
