//! Personal task tracker: a JSON-backed REST service plus terminal and
//! command-line clients that talk to it over HTTP.

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod form;
pub mod models;
pub mod state;
pub mod storage;
pub mod tui;
pub mod view;
