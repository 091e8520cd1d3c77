pub mod config;
pub mod context;
pub mod result;

pub use config::*;
pub use context::*;
pub use result::*;
