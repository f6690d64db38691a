// src/config/state.rs
use super::options::{DashboardOptions, ResolveOptions};
use crate::data::Filter;

#[derive(Clone, Debug)]
pub struct GuiState {
    /// Sidebar filter (country + score range)
    pub filter: Filter,

    /// Free-text search over name/country, table only
    pub search: String,

    pub window_w: u32,
    pub window_h: u32,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            search: s!(),
            window_w: 1280,
            window_h: 860,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub resolve: ResolveOptions,
    pub dashboard: DashboardOptions,
    pub gui: GuiState,
}
