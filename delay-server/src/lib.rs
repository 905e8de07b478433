//! Shinkansen delay registry server.
//!
//! A small web application where users share the current delay of trains
//! departing one station: they report delays against a fixed timetable,
//! view the shared list with effective departure times, and reorder or
//! remove entries.

pub mod config;
pub mod domain;
pub mod registry;
pub mod store;
pub mod timetable;
pub mod web;
