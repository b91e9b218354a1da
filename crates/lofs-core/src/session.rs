//! Session state machine around the pipeline.
//!
//! `Unauthenticated -> Verifying -> Authenticated`, where the only proof of a
//! correct password is a successful pipeline run. The password itself is
//! never stored; only the decoded notes are kept, in memory.

use secrecy::{ExposeSecret, SecretString};

use crate::catalog::NoteCatalog;
use crate::error::PipelineError;
use crate::fetch::ProgressFn;
use crate::pipeline::NotesPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Verifying,
    Authenticated,
}

pub struct Session {
    pipeline: NotesPipeline,
    state: AuthState,
    catalog: Option<NoteCatalog>,
}

impl Session {
    pub fn new(pipeline: NotesPipeline) -> Self {
        Self {
            pipeline,
            state: AuthState::Unauthenticated,
            catalog: None,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// Notes of the current session; `None` unless authenticated.
    pub fn catalog(&self) -> Option<&NoteCatalog> {
        self.catalog.as_ref()
    }

    /// Runs the pipeline with `password`.
    ///
    /// Already authenticated sessions return immediately and keep their
    /// notes. An empty password is rejected without touching the network.
    /// Any failure drops back to `Unauthenticated`.
    pub async fn login(
        &mut self,
        password: &SecretString,
        progress: Option<ProgressFn>,
    ) -> Result<(), PipelineError> {
        if self.is_authenticated() && self.catalog.is_some() {
            return Ok(());
        }
        if password.expose_secret().is_empty() {
            self.state = AuthState::Unauthenticated;
            return Err(PipelineError::InvalidCredentials { stage: "session" });
        }
        self.state = AuthState::Verifying;
        self.catalog = None;
        match self.pipeline.run(password, progress).await {
            Ok(notes) => {
                tracing::info!(notes = notes.len(), "session authenticated");
                self.catalog = Some(NoteCatalog::new(notes));
                self.state = AuthState::Authenticated;
                Ok(())
            }
            Err(e) => {
                if e.is_invalid_credentials() {
                    tracing::info!("login rejected");
                } else {
                    tracing::warn!("login failed: {}", e);
                }
                self.state = AuthState::Unauthenticated;
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        self.catalog = None;
        self.state = AuthState::Unauthenticated;
        tracing::info!("session logged out");
    }
}
