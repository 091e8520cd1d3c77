//! policy-maker CLI library: argument parsing and run assembly, exposed for tests.

pub mod app;
pub mod commands;
