//! End-to-end tests for the find-and-replace pipeline.

#[path = "../common/mod.rs"]
mod common;

mod dump_files;
mod multisite;
mod properties;
mod scenarios;
mod snapshot;
