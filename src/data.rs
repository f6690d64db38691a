// src/data.rs
//
// Read-only data layer behind the dashboard.
//
// - Dataset: the table being shown, plus where it came from. If only the raw
//            ranking was found, each row also gets a jittered display point.
//            Those points live here only; they are never saved.
// - Filter:  country + score range (sidebar).
// - View:    row indexes into a Dataset that pass the filter, with the
//            aggregates the dashboard draws (counts, histogram, map points)
//            and the table search.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::{
    config::options::DashboardOptions,
    entity::{Coordinates, Entity},
    error::StoreError,
    geo::jitter,
    store,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Resolver output; coordinates are real lookups.
    Enriched,
    /// Raw ranking; coordinates are centroid + jitter, display only.
    Approximate,
}

#[derive(Clone, Debug)]
pub struct Dataset {
    path: PathBuf,
    origin: Origin,
    entities: Vec<Entity>,
    /// One display point per entity (same index).
    points: Vec<Option<Coordinates>>,
}

impl Dataset {
    /// Resolver output as-is; rows without coordinates simply don't plot.
    pub fn enriched(path: impl Into<PathBuf>, entities: Vec<Entity>) -> Self {
        let points = entities.iter().map(|e| e.coordinates()).collect();
        Self { path: path.into(), origin: Origin::Enriched, entities, points }
    }

    /// Raw ranking. Rows that happen to carry coordinates keep them; the rest
    /// get a fresh jittered point on every call.
    pub fn approximate<R: Rng + ?Sized>(path: impl Into<PathBuf>, entities: Vec<Entity>, rng: &mut R) -> Self {
        let points = entities
            .iter()
            .map(|e| Some(e.coordinates().unwrap_or_else(|| jitter::approximate(e.country(), rng))))
            .collect();
        Self { path: path.into(), origin: Origin::Approximate, entities, points }
    }

    /// Enriched paths first, then raw paths (with jitter). Nothing found is an error.
    pub fn load<R: Rng + ?Sized>(opts: &DashboardOptions, rng: &mut R) -> Result<Self, StoreError> {
        match store::load_first(&opts.enriched_paths) {
            Ok((path, rows)) => {
                logf!("Data: enriched table {} ({} rows)", path.display(), rows.len());
                return Ok(Self::enriched(path, rows));
            }
            Err(StoreError::NoSourceFound(_)) => {}
            Err(e) => return Err(e),
        }

        let (path, rows) = store::load_first(&opts.raw_paths).map_err(|e| match e {
            StoreError::NoSourceFound(_) => {
                let mut tried = opts.enriched_paths.clone();
                tried.extend(opts.raw_paths.iter().cloned());
                StoreError::NoSourceFound(tried)
            }
            other => other,
        })?;
        logw!("Data: no enriched table; approximating {} rows from {}", rows.len(), path.display());
        Ok(Self::approximate(path, rows, rng))
    }

    #[inline] pub fn path(&self) -> &Path { &self.path }
    #[inline] pub fn origin(&self) -> Origin { self.origin }
    #[inline] pub fn entities(&self) -> &[Entity] { &self.entities }
    #[inline] pub fn len(&self) -> usize { self.entities.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.entities.is_empty() }

    /// Display point for row `ix` (real or approximate).
    pub fn point(&self, ix: usize) -> Option<Coordinates> {
        self.points.get(ix).copied().flatten()
    }

    /// Distinct countries in first-appearance order.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entities
            .iter()
            .map(|e| e.country())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Whole-number slider bounds that contain every score.
    pub fn score_bounds(&self) -> Option<(f64, f64)> {
        let mut it = self.entities.iter().map(|e| e.score());
        let first = it.next()?;
        let (lo, hi) = it.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s)));
        Some((lo.floor(), hi.ceil()))
    }

    pub fn view(&self, filter: &Filter) -> View<'_> {
        let row_ix = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.matches(e))
            .map(|(i, _)| i)
            .collect();
        View { row_ix, ds: self }
    }
}

/// Sidebar filter. `None` means "no restriction".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    pub country: Option<String>,
    /// Inclusive (min, max)
    pub score: Option<(f64, f64)>,
}

impl Filter {
    pub fn matches(&self, e: &Entity) -> bool {
        if let Some(c) = &self.country {
            if e.country() != c {
                return false;
            }
        }
        if let Some((lo, hi)) = self.score {
            if e.score() < lo || e.score() > hi {
                return false;
            }
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean_score: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        if self.counts.is_empty() { 0.0 } else { (self.max - self.min) / self.counts.len() as f64 }
    }

    /// `[lo, hi)` for bin `i` (the last bin is closed).
    pub fn bin_range(&self, i: usize) -> (f64, f64) {
        let w = self.bin_width();
        (self.min + w * i as f64, self.min + w * (i + 1) as f64)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapPoint<'a> {
    pub index: usize,
    pub coords: Coordinates,
    pub entity: &'a Entity,
    /// Position of the row's country in `Dataset::countries()`; stable across filters.
    pub country_ix: usize,
    /// Score scaled into the view's score span, 0.0 (lowest) to 1.0 (highest).
    pub weight: f64,
}

/// Filtered projection: row indexes into the dataset.
#[derive(Clone, Debug)]
pub struct View<'a> {
    pub row_ix: Vec<usize>,
    ds: &'a Dataset,
}

impl<'a> View<'a> {
    /// Rebuild from cached indexes (GUI keeps these between frames).
    pub fn from_indices(ds: &'a Dataset, row_ix: Vec<usize>) -> Self {
        Self { row_ix, ds }
    }

    pub fn len(&self) -> usize { self.row_ix.len() }
    pub fn is_empty(&self) -> bool { self.row_ix.is_empty() }

    pub fn rows(&self) -> impl Iterator<Item = &'a Entity> + '_ {
        let ds = self.ds;
        self.row_ix.iter().filter_map(move |&i| ds.entities.get(i))
    }

    pub fn summary(&self) -> Summary {
        let count = self.len();
        let mean_score = if count == 0 {
            None
        } else {
            Some(self.rows().map(|e| e.score()).sum::<f64>() / count as f64)
        };
        Summary { count, mean_score }
    }

    /// Rows per country, most first; ties keep first-appearance order.
    pub fn top_countries(&self, n: usize) -> Vec<(String, usize)> {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for e in self.rows() {
            let c = counts.entry(e.country()).or_insert(0);
            if *c == 0 {
                order.push(e.country());
            }
            *c += 1;
        }
        let mut out: Vec<(String, usize)> = order
            .into_iter()
            .map(|c| (s!(c), counts[c]))
            .collect();
        // stable sort keeps first-appearance order among equal counts
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out.truncate(n);
        out
    }

    /// Lowest and highest score among the filtered rows.
    pub fn score_span(&self) -> Option<(f64, f64)> {
        let mut it = self.rows().map(|e| e.score());
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s))))
    }

    /// Equal-width score bins over the filtered span. `None` if empty.
    pub fn histogram(&self, bins: usize) -> Option<Histogram> {
        if bins == 0 {
            return None;
        }
        let (min, max) = self.score_span()?;

        let mut counts = vec![0usize; bins];
        let span = max - min;
        for s in self.rows().map(|e| e.score()) {
            let ix = if span > 0.0 {
                (((s - min) / span) * bins as f64).floor() as usize
            } else {
                0
            };
            counts[ix.min(bins - 1)] += 1;
        }
        Some(Histogram { min, max, counts })
    }

    /// Filtered rows that have a display point, with their marker style inputs.
    pub fn map_points(&self) -> Vec<MapPoint<'a>> {
        let ds = self.ds;
        let palette: HashMap<&str, usize> = ds.countries().into_iter().enumerate().map(|(i, c)| (c, i)).collect();
        let (lo, hi) = self.score_span().unwrap_or((0.0, 0.0));
        let span = hi - lo;

        self.row_ix
            .iter()
            .filter_map(|&i| {
                let coords = ds.point(i)?;
                let entity = &ds.entities[i];
                let weight = if span > 0.0 { (entity.score() - lo) / span } else { 1.0 };
                Some(MapPoint {
                    index: i,
                    coords,
                    entity,
                    country_ix: palette.get(entity.country()).copied().unwrap_or(0),
                    weight,
                })
            })
            .collect()
    }

    /// Case-insensitive substring over name or country. Empty term keeps everything.
    pub fn search(&self, term: &str) -> Vec<usize> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.row_ix.clone();
        }
        self.row_ix
            .iter()
            .copied()
            .filter(|&i| {
                let e = &self.ds.entities[i];
                e.name().to_lowercase().contains(&needle) || e.country().to_lowercase().contains(&needle)
            })
            .collect()
    }
}
