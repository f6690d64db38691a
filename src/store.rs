// src/store.rs
//
// Record Store: the ranking table on disk.
//
// - `load` / `load_first`: read a table (or the first of several candidates).
// - `save`: full working set, unresolved rows included (checkpoints).
// - `save_resolved`: only rows with coordinates (final output).
// - `carry_over`: copy coordinates from a prior output onto a fresh load.
//
// Every write goes through a temp file + rename.

use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    csv::{read_entities, write_entities},
    entity::{Coordinates, Entity, EntityKey},
    error::StoreError,
    file,
};

pub fn load(path: &Path) -> Result<Vec<Entity>, StoreError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StoreError::SourceNotFound(path.to_path_buf()),
        _ => StoreError::io(path, e),
    })?;
    let rows = read_entities(BufReader::new(file), path)?;
    logd!("Store: Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Try each candidate in order. A missing file moves on to the next one; any
/// other failure (bad CSV, permissions) is returned as-is.
pub fn load_first(paths: &[PathBuf]) -> Result<(PathBuf, Vec<Entity>), StoreError> {
    for p in paths {
        match load(p) {
            Ok(rows) => return Ok((p.clone(), rows)),
            Err(StoreError::SourceNotFound(_)) => {
                logd!("Store: {} not found, trying next", p.display());
            }
            Err(e) => return Err(e),
        }
    }
    Err(StoreError::NoSourceFound(paths.to_vec()))
}

fn write_rows<'a, I>(path: &Path, rows: I) -> Result<(), StoreError>
where
    I: IntoIterator<Item = &'a Entity>,
{
    file::write_atomic(path, |w| {
        write_entities(w, rows, b',').map_err(std::io::Error::from)
    })
    .map_err(|e| StoreError::io(path, e))
}

/// Write every entity, resolved or not.
pub fn save(entities: &[Entity], path: &Path) -> Result<(), StoreError> {
    write_rows(path, entities)
}

/// Write only resolved entities. Returns how many rows were written.
pub fn save_resolved(entities: &[Entity], path: &Path) -> Result<usize, StoreError> {
    let kept: Vec<&Entity> = entities.iter().filter(|e| e.is_resolved()).collect();
    write_rows(path, kept.iter().copied())?;
    Ok(kept.len())
}

/// Copy coordinates from `prior` onto unresolved rows of `working` with the
/// same (rank, name, country). Rows that already have coordinates keep them.
/// Returns how many rows picked up coordinates.
pub fn carry_over(working: &mut [Entity], prior: &[Entity]) -> usize {
    let known: HashMap<EntityKey, Coordinates> = prior
        .iter()
        .filter_map(|e| e.coordinates().map(|c| (e.key(), c)))
        .collect();

    if known.is_empty() {
        return 0;
    }

    let mut picked = 0;
    for e in working.iter_mut().filter(|e| !e.is_resolved()) {
        if let Some(c) = known.get(&e.key()) {
            if e.mark_resolved(*c) {
                picked += 1;
            }
        }
    }
    picked
}
