use async_trait::async_trait;
use tracing::info;

use ticketgate_core::GatewayResult;

/// Acknowledgement-mail boundary. The returned bool is the "sent" contract:
/// implementations must report honestly whether a message went out.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_ack(&self, to: &str, ticket_number: &str, topic: &str) -> GatewayResult<bool>;

    /// Name of the delivery provider, if one is wired up.
    fn provider(&self) -> Option<String> {
        None
    }
}

/// No provider is wired up yet. This stub reports an explicit, observable
/// "not sent" rather than pretending delivery happened.
pub struct StubMailer;

#[async_trait]
impl Mailer for StubMailer {
    async fn send_ack(&self, to: &str, ticket_number: &str, _topic: &str) -> GatewayResult<bool> {
        info!(
            to,
            ticket_number, "no mail provider configured, acknowledgement not sent"
        );
        Ok(false)
    }
}
