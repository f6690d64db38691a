// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;

pub mod csv;
pub mod data;
pub mod entity;
pub mod error;
pub mod file;
pub mod geo;
pub mod gui;
pub mod progress;
pub mod store;
