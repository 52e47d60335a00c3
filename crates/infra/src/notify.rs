//! Notification dispatch seam.
//!
//! The core triggers four fire-and-forget mails on lifecycle events. Mail
//! content/transport is a deployment concern; the default implementation
//! logs the delivery. Dispatch failure must never fail the operation that
//! triggered it — callers spawn these and log errors.

use async_trait::async_trait;

/// Outbound notification capability.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Welcome a new doctor with their system-generated password.
    async fn doctor_welcome(
        &self,
        email: &str,
        full_name: &str,
        system_password: &str,
    ) -> anyhow::Result<()>;

    /// Welcome a new patient with their account verification token.
    async fn patient_welcome(
        &self,
        email: &str,
        full_name: &str,
        verify_token: &str,
    ) -> anyhow::Result<()>;

    /// Deliver a password-reset token.
    async fn password_reset_requested(
        &self,
        email: &str,
        full_name: &str,
        token: &str,
    ) -> anyhow::Result<()>;

    /// Confirm a completed password reset.
    async fn password_reset_completed(&self, email: &str, full_name: &str) -> anyhow::Result<()>;
}

/// Log-only notifier: stands in for the mail transport in dev and tests.
/// The secret is the mail body here, so it lands in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn doctor_welcome(
        &self,
        email: &str,
        full_name: &str,
        system_password: &str,
    ) -> anyhow::Result<()> {
        tracing::info!(email, full_name, system_password, "doctor welcome mail");
        Ok(())
    }

    async fn patient_welcome(
        &self,
        email: &str,
        full_name: &str,
        verify_token: &str,
    ) -> anyhow::Result<()> {
        tracing::info!(email, full_name, verify_token, "patient welcome mail");
        Ok(())
    }

    async fn password_reset_requested(
        &self,
        email: &str,
        full_name: &str,
        token: &str,
    ) -> anyhow::Result<()> {
        tracing::info!(email, full_name, token, "password reset mail");
        Ok(())
    }

    async fn password_reset_completed(&self, email: &str, full_name: &str) -> anyhow::Result<()> {
        tracing::info!(email, full_name, "password reset confirmation mail");
        Ok(())
    }
}
