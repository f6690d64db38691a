// src/progress.rs
use std::path::Path;

/// Lightweight progress reporting used by long-running operations (resolution passes).
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of rows that still need a lookup.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One entity got coordinates. `index` is its position in the working set.
    fn item_done(&mut self, _index: usize, _name: &str) {}

    /// One entity stayed unresolved this pass (miss or transport error).
    fn item_failed(&mut self, _index: usize, _name: &str) {}

    /// A checkpoint of `rows` entities landed at `path`.
    fn checkpoint(&mut self, _path: &Path, _rows: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
