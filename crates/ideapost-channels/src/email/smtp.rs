//! Outbound delivery over STARTTLS SMTP.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use ideapost_core::render::RenderedEmail;
use ideapost_core::traits::Mailer;
use ideapost_types::ChannelError;

use super::types::SmtpSettings;

/// Sends rendered messages as `multipart/alternative` (plain + HTML).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

fn parse_mailbox(role: &str, address: &str) -> Result<Mailbox, ChannelError> {
    address
        .parse()
        .map_err(|e| ChannelError::Other(format!("invalid {role} address {address:?}: {e}")))
}

impl SmtpMailer {
    /// Build the transport. No connection is made until the first send.
    pub fn new(settings: SmtpSettings) -> Result<Self, ChannelError> {
        let from = parse_mailbox("sender", &settings.from)?;
        let to = parse_mailbox("recipient", &settings.to)?;
        let credentials = Credentials::new(
            settings.username.clone(),
            settings.password.expose().to_owned(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| ChannelError::ConnectionFailed(format!("{}: {e}", settings.host)))?
            .port(settings.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport, from, to })
    }

    /// Assemble the MIME message for `email`.
    pub fn build_message(&self, email: &RenderedEmail) -> Result<Message, ChannelError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| ChannelError::SendFailed(format!("failed to build message: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &RenderedEmail) -> Result<(), ChannelError> {
        let message = self.build_message(email)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;
        debug!(code = %response.code(), to = %self.to, "smtp accepted message");
        Ok(())
    }
}
