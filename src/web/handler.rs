//! The waitlist intake handler. One request in, one response out, at most one store write.

use std::sync::Arc;

use axum::{body::Bytes, extract::rejection::BytesRejection};
use chrono::Utc;
use tracing::{error, info, warn};

use super::{
    types::{DeserSignup, IntakeRequest, IntakeResponse, WaitlistEmail},
    Result,
};
use crate::store::{WaitlistEntry, WaitlistStore};

/// Validates signups and writes them to the `WaitlistStore` it was built with.
///
/// Holds nothing but a shared handle to the store, so it can be cloned into every request.
#[derive(Clone)]
pub struct WaitlistHandler {
    store: Arc<dyn WaitlistStore>,
}

impl WaitlistHandler {
    pub fn new(store: Arc<dyn WaitlistStore>) -> Self {
        WaitlistHandler { store }
    }

    /// Never fails: every error is turned into a response here.
    #[tracing::instrument(name = "Handling waitlist request", skip_all, fields(method = %request.method))]
    pub async fn handle(&self, request: IntakeRequest) -> IntakeResponse {
        if request.is_preflight() {
            return IntakeResponse::preflight();
        }

        match self.sign_up(request.body).await {
            Ok(()) => IntakeResponse::success(),
            Err(er) => {
                let (status, client_error) = er.status_code_and_client_error();
                if status.is_server_error() {
                    error!("{:<12} - {er:?}", "SERVER ERROR");
                } else {
                    warn!("{:<12} - {client_error}", "CLIENT ERROR");
                }
                IntakeResponse::failure(er)
            }
        }
    }

    async fn sign_up(&self, body: core::result::Result<Bytes, BytesRejection>) -> Result<()> {
        let body = body?;
        let signup = DeserSignup::from_body(&body)?;
        let email = WaitlistEmail::parse(signup.email)?;
        let entry = WaitlistEntry::new(&email, Utc::now());

        self.store.put_entry(&entry).await?;
        info!("New waitlist entry successfully stored.");

        Ok(())
    }
}
