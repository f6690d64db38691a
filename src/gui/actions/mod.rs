// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Submodules stay private; consumers only see actions::{copy, resolve, ...}.

mod copy;     // src/gui/actions/copy.rs
mod resolve;  // src/gui/actions/resolve.rs

pub use copy::copy;
pub use resolve::{ResolveJob, poll_resolve, start_resolve, stop_resolve};
