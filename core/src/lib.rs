//! Core of the policy-maker agent pipeline: definitions, variable resolution,
//! prompt assembly, artifact storage, summary synthesis and the phase
//! scheduler. Process spawning and output rendering live in the plugins crate.

pub mod api;
pub mod artifact;
pub mod config;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod prompt;
pub mod runner;
pub mod session;
pub mod util;
