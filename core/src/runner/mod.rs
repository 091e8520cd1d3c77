mod traits;

pub use traits::AgentInvoker;
