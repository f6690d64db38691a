// src/geo/nominatim.rs
//
// OpenStreetMap Nominatim search over blocking HTTPS.
// GET {endpoint}?q=<text>&format=json&limit=1 → `[{"lat":"..","lon":"..",..}]`
//
// No pacing here; wrap it in `RateLimitedClient`.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use super::lookup::Geocoder;
use crate::{config::options::PacingOptions, entity::Coordinates, error::LookupError};

pub struct Nominatim {
    client: Client,
    endpoint: String,
}

impl Nominatim {
    pub fn new(pacing: &PacingOptions) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(pacing.user_agent.clone())
            .timeout(pacing.timeout)
            .build()
            .map_err(|e| LookupError::Transport {
                query: s!(),
                reason: format!("could not build HTTP client: {e}"),
            })?;
        Ok(Self { client, endpoint: pacing.endpoint.clone() })
    }
}

/// Nominatim sends coordinates as strings; accept numbers too.
#[derive(Deserialize)]
#[serde(untagged)]
enum Degrees {
    Text(String),
    Number(f64),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        match self {
            Degrees::Text(s)   => s.trim().parse().ok(),
            Degrees::Number(n) => Some(*n),
        }
    }
}

#[derive(Deserialize)]
struct Place {
    lat: Degrees,
    lon: Degrees,
}

/// First place in a search response, if any.
pub fn parse_places(body: &str, query: &str) -> Result<Option<Coordinates>, LookupError> {
    let places: Vec<Place> = serde_json::from_str(body).map_err(|e| LookupError::BadResponse {
        query: s!(query),
        reason: e.to_string(),
    })?;

    let Some(first) = places.first() else {
        return Ok(None);
    };

    match Coordinates::from_pair(first.lat.value(), first.lon.value()) {
        Some(c) => Ok(Some(c)),
        None => Err(LookupError::BadResponse {
            query: s!(query),
            reason: s!("place without usable lat/lon"),
        }),
    }
}

fn classify(e: reqwest::Error, query: &str) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout { query: s!(query) }
    } else {
        LookupError::Transport { query: s!(query), reason: e.to_string() }
    }
}

impl Geocoder for Nominatim {
    fn lookup(&mut self, query: &str, timeout: Duration) -> Result<Option<Coordinates>, LookupError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .timeout(timeout)
            .send()
            .map_err(|e| classify(e, query))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Transport {
                query: s!(query),
                reason: format!("HTTP {status}"),
            });
        }

        let body = resp.text().map_err(|e| classify(e, query))?;
        parse_places(&body, query)
    }
}
