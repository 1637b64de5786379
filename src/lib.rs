//! citycast - weather forecast TUI
//!
//! The binary wires these modules to a terminal; tests drive them directly.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod reducer;
pub mod runtime;
pub mod sprites;
pub mod state;
pub mod storage;
pub mod theme;
