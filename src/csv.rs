// src/csv.rs
//
// Ranking table codec: `Rank,Universitas,Negara,Score[,lat,lon]`.
// Columns are located by header name, so extra or reordered input columns are
// fine; output always uses the canonical order with both coordinate columns.

use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::config::consts::*;
use crate::entity::{Coordinates, Entity, Location};
use crate::error::StoreError;

/* ---------------- Parsing ---------------- */

struct Columns {
    rank: usize,
    name: usize,
    country: usize,
    score: usize,
    lat: Option<usize>,
    lon: Option<usize>,
}

fn find(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn locate_columns(headers: &StringRecord, origin: &Path) -> Result<Columns, StoreError> {
    let need = |column: &'static str| {
        find(headers, column).ok_or_else(|| StoreError::MissingColumn {
            path: origin.to_path_buf(),
            column,
        })
    };
    Ok(Columns {
        rank: need(COL_RANK)?,
        name: need(COL_NAME)?,
        country: need(COL_COUNTRY)?,
        score: need(COL_SCORE)?,
        lat: find(headers, COL_LAT),
        lon: find(headers, COL_LON),
    })
}

/// Ranks are integers, but spreadsheets like to save them as `12.0`.
pub fn parse_rank(cell: &str) -> Option<u32> {
    let t = cell.trim();
    if let Ok(v) = t.parse::<u32>() {
        return Some(v);
    }
    match t.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Some(f as u32),
        _ => None,
    }
}

/// Empty cells and NaN both mean "no value".
pub fn parse_float(cell: &str) -> Option<f64> {
    let t = cell.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read every entity from a CSV stream. `origin` is only used in error messages.
pub fn read_entities<R: Read>(reader: R, origin: &Path) -> Result<Vec<Entity>, StoreError> {
    let csv_err = |source| StoreError::Csv { path: origin.to_path_buf(), source };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let cols = locate_columns(&headers, origin)?;

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(csv_err)?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);

        // Blank trailing lines
        if rec.iter().all(|c| c.is_empty()) {
            continue;
        }

        let invalid = |reason: String| StoreError::InvalidRow {
            path: origin.to_path_buf(),
            line,
            reason,
        };
        let cell = |ix: usize| rec.get(ix).unwrap_or("");

        let rank = parse_rank(cell(cols.rank))
            .ok_or_else(|| invalid(format!("bad rank '{}'", cell(cols.rank))))?;
        let name = cell(cols.name);
        if name.is_empty() {
            return Err(invalid(s!("empty name")));
        }
        let country = cell(cols.country);
        if country.is_empty() {
            return Err(invalid(s!("empty country")));
        }
        let score = parse_float(cell(cols.score))
            .ok_or_else(|| invalid(format!("bad score '{}'", cell(cols.score))))?;

        let lat = cols.lat.and_then(|ix| parse_float(cell(ix)));
        let lon = cols.lon.and_then(|ix| parse_float(cell(ix)));
        let coords = Coordinates::from_pair(lat, lon);
        if coords.is_none() && (lat.is_some() || lon.is_some()) {
            logw!("Row {line}: '{name}' has only one coordinate, treating as unresolved");
        }

        out.push(Entity::new(rank, name, country, score).with_location(Location::from(coords)));
    }

    Ok(out)
}

/* ---------------- Writing ---------------- */

/// Canonical cell text for one entity. Floats use the shortest repr that
/// round-trips, so writing the same entities twice gives the same bytes.
pub fn entity_cells(e: &Entity) -> [String; 6] {
    let (lat, lon) = match e.coordinates() {
        Some(c) => (c.lat.to_string(), c.lon.to_string()),
        None    => (s!(), s!()),
    };
    [
        e.rank().to_string(),
        s!(e.name()),
        s!(e.country()),
        e.score().to_string(),
        lat,
        lon,
    ]
}

/// Write header + rows to any writer.
pub fn write_entities<'a, W, I>(writer: W, entities: I, sep: u8) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Entity>,
{
    let mut wtr = WriterBuilder::new()
        .delimiter(sep)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(HEADERS)?;
    for e in entities {
        wtr.write_record(entity_cells(e))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Whole table as text (clipboard, previews).
pub fn to_export_string<'a, I>(entities: I, sep: u8) -> String
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut buf: Vec<u8> = Vec::new();
    if let Err(e) = write_entities(&mut buf, entities, sep) {
        loge!("Export: in-memory write failed: {e}");
    }
    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}
