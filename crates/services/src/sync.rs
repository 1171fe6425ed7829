//! Remote profile sync over HTTP, with a local fallback for attempts.
//!
//! All network calls are best effort from the caller's point of view: the
//! session never blocks on the remote endpoint being up. [`AttemptRecorder`]
//! encodes the write policy for graded attempts: try the remote endpoint
//! first, fall back to the local attempt log, and if both fail log the loss
//! and move on.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use lingo_core::model::{AttemptRecord, Milestone, ProfileUpdate, UserId};
use storage::repository::AttemptLogRepository;

use crate::error::SyncError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ─── CONFIG ──────────────────────────────────────────────────────────────

/// Sync endpoint settings, usually sourced from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    base_url: Option<String>,
    token: Option<String>,
}

impl SyncConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Reads `LINGO_SYNC_URL` and `LINGO_SYNC_TOKEN`. An absent or empty
    /// URL leaves sync disabled.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("LINGO_SYNC_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let token = std::env::var("LINGO_SYNC_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self { base_url, token }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }
}

// ─── TRAIT ───────────────────────────────────────────────────────────────

/// Remote side of the profile state: attempts, profile snapshots and
/// milestone notifications.
#[async_trait]
pub trait ProfileSync: Send + Sync {
    async fn record_attempt(&self, record: &AttemptRecord) -> Result<(), SyncError>;

    async fn push_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<(), SyncError>;

    async fn report_milestone(
        &self,
        user_id: &UserId,
        milestone: Milestone,
    ) -> Result<(), SyncError>;
}

// ─── HTTP IMPLEMENTATION ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MilestonePayload<'a> {
    user_id: &'a str,
    milestone: String,
}

/// `ProfileSync` against a JSON HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpProfileSync {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpProfileSync {
    /// # Errors
    ///
    /// Returns `SyncError::Disabled` when the config carries no base URL,
    /// and `SyncError::Http` if the client cannot be built.
    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        let Some(base_url) = config.base_url.clone() else {
            return Err(SyncError::Disabled);
        };
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: Serialize + Sync + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &T,
    ) -> Result<(), SyncError> {
        let response = self.request(method, path).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus(status));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileSync for HttpProfileSync {
    async fn record_attempt(&self, record: &AttemptRecord) -> Result<(), SyncError> {
        self.send(reqwest::Method::POST, "attempts", record).await
    }

    async fn push_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<(), SyncError> {
        let path = format!("profiles/{}", user_id.as_str());
        self.send(reqwest::Method::PUT, &path, update).await
    }

    async fn report_milestone(
        &self,
        user_id: &UserId,
        milestone: Milestone,
    ) -> Result<(), SyncError> {
        let payload = MilestonePayload {
            user_id: user_id.as_str(),
            milestone: milestone.key(),
        };
        self.send(reqwest::Method::POST, "milestones", &payload).await
    }
}

// ─── ATTEMPT RECORDER ────────────────────────────────────────────────────

/// Two-step write policy for graded attempts.
///
/// Primary is the remote sync endpoint; fallback is the local attempt log.
/// A failure on the primary is expected offline operation and logged at
/// debug; losing the record entirely is logged at warn. Neither failure is
/// surfaced to the caller, so a flaky network can never interrupt a lesson.
pub struct AttemptRecorder {
    primary: Option<Arc<dyn ProfileSync>>,
    fallback: Arc<dyn AttemptLogRepository>,
}

impl AttemptRecorder {
    #[must_use]
    pub fn new(
        primary: Option<Arc<dyn ProfileSync>>,
        fallback: Arc<dyn AttemptLogRepository>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Persist one graded attempt. Infallible: failures are logged and the
    /// record is dropped at worst.
    pub async fn record(&self, record: &AttemptRecord) {
        if let Some(primary) = &self.primary {
            match primary.record_attempt(record).await {
                Ok(()) => return,
                Err(err) => {
                    tracing::debug!(
                        attempt_id = %record.id,
                        error = %err,
                        "remote attempt write failed, falling back to local log"
                    );
                }
            }
        }

        if let Err(err) = self.fallback.insert_attempt(record).await {
            tracing::warn!(
                attempt_id = %record.id,
                error = %err,
                "attempt record dropped: local fallback write failed"
            );
        }
    }
}
