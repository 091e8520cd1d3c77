use async_trait::async_trait;

use crate::error::InvokeError;

/// Boundary to an external agent: prompt in on stdin, full stdout back.
///
/// Implementations must not retry and must not impose a timeout.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(&self, prompt: &str) -> Result<String, InvokeError>;
}
