//! `price-estimator` library crate.
//!
//! The binary (`estimate`) is a thin wrapper around this library so that:
//!
//! - the prediction pipeline is testable without spawning processes
//! - the geocoder sits behind a trait and tests never touch the network
//! - artifacts are loaded and cross-checked in one place

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod encode;
pub mod error;
pub mod features;
pub mod geo;
pub mod io;
pub mod models;
pub mod report;
pub mod validate;
