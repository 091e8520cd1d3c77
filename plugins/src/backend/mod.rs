pub mod strategy;

pub use strategy::{
    detect_available_clis, detect_clis, find_strategy, require_strategy, resolve_binary,
    supported_clis, CliStrategy, DetectedCli, CLI_STRATEGIES,
};
