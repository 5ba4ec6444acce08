//! Account flows: password-reset notices through the mail relay.
//!
//! Registration, login lookup and the password mutation itself live on the
//! repository; this module adds the external mail collaborator. The relay
//! accepts a POST with an `email` form field and either succeeds or fails,
//! nothing more is promised about it.

use async_trait::async_trait;

use crate::config::MailConfig;
use crate::error::{Error, Result};
use crate::repo::Repository;
use crate::store::StoreBackend;

/// Username used for a session without an account.
pub const GUEST_USERNAME: &str = "Guest";

/// Sends the password-reset notice.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_reset_notice(&self, email: &str) -> Result<()>;
}

/// HTTP client for the mail relay endpoint.
#[derive(Debug, Clone)]
pub struct MailRelay {
    client: reqwest::Client,
    url: String,
}

impl MailRelay {
    pub fn new(config: &MailConfig) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            url: config.relay_url.clone(),
        })
    }
}

#[async_trait]
impl Mailer for MailRelay {
    async fn send_reset_notice(&self, email: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .form(&[("email", email)])
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::OperationFailed(format!(
                "mail relay answered {}",
                response.status()
            )))
        }
    }
}

/// Ask the relay to mail a reset notice, but only for a registered email.
pub async fn request_password_reset<S: StoreBackend>(
    repo: &Repository<S>,
    mailer: &dyn Mailer,
    email: &str,
) -> Result<()> {
    if repo.user_by_email(email).is_none() {
        return Err(Error::UnknownAccount(email.to_string()));
    }
    mailer.send_reset_notice(email).await
}
