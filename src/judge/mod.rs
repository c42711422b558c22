//! Reqwest-based client for a Judge0-compatible judging service.
//!
//! One [`execute`](JudgeClient::execute) call submits a source payload,
//! then polls the returned token until the judge reports a terminal status
//! or the poll budget runs out. Judge-reported failures (compile errors,
//! runtime errors, limit violations) are normal terminal results, not
//! errors; only transport and validation failures surface as [`JudgeError`].

pub mod language;
pub mod types;

use std::time::Duration;

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::{debug, warn};
use serde_json::json;
use thiserror::Error;

use crate::config::Config;
use types::{ExecutionRequest, ExecutionResult, RawSubmission};

const SUBMIT_FIELDS: &str = "stdout,stderr,compile_output,exit_code,time,memory,status,token";
const POLL_FIELDS: &str = "stdout,stderr,compile_output,exit_code,time,memory,status";

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("judge request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("judge returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed judge response: {0}")]
    MalformedResponse(String),
}

/// Immutable client configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct JudgeOptions {
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    /// CPU seconds granted to the submission.
    pub cpu_time_limit: f64,
    /// Wall-clock seconds granted to the submission.
    pub wall_time_limit: f64,
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl JudgeOptions {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let base_url = cfg
            .get("JUDGE_API_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("Missing JUDGE_API_URL. Set it in env or ~/.config/jrun/.jrunrc")
            })?;
        let api_key = cfg.get("JUDGE_API_KEY").filter(|s| !s.trim().is_empty());

        let request_timeout = Duration::from_secs(cfg.get_u64("REQUEST_TIMEOUT").unwrap_or(60));
        let poll_interval = Duration::from_millis(cfg.get_u64("POLL_INTERVAL_MS").unwrap_or(1000));
        let max_polls = cfg.get_u64("MAX_POLLS").unwrap_or(60) as u32;
        let cpu_time_limit = cfg.get_f64("CPU_TIME_LIMIT").unwrap_or(10.0);
        let wall_time_limit = cfg.get_f64("WALL_TIME_LIMIT").unwrap_or(15.0);

        Ok(Self {
            base_url,
            api_key,
            request_timeout,
            cpu_time_limit,
            wall_time_limit,
            poll_interval,
            max_polls,
        })
    }
}

pub struct JudgeClient {
    http: reqwest::Client,
    opts: JudgeOptions,
}

impl JudgeClient {
    pub fn new(opts: JudgeOptions) -> Result<Self, JudgeError> {
        let http = reqwest::Client::builder()
            .timeout(opts.request_timeout)
            .build()?;
        Ok(Self { http, opts })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let opts = JudgeOptions::from_config(cfg)?;
        Ok(Self::new(opts)?)
    }

    /// Run one submission to completion.
    ///
    /// The language tag is validated against the catalog before any network
    /// I/O. If the judge resolves the submission synchronously (`wait=true`),
    /// the result is returned without a single poll; otherwise the token is
    /// polled every `poll_interval` up to `max_polls` times. An exhausted
    /// budget yields the sentinel timeout result rather than an error.
    pub async fn execute(&self, req: &ExecutionRequest) -> Result<ExecutionResult, JudgeError> {
        let language_id = language::language_id(&req.language)
            .ok_or_else(|| JudgeError::UnsupportedLanguage(req.language.clone()))?;

        let first = self.submit(req, language_id).await?;
        let token = first.token.clone().ok_or_else(|| {
            JudgeError::MalformedResponse("submission response missing token".to_string())
        })?;

        // Early return only on an explicit terminal status: a submission
        // response with no status block at all still has to be polled.
        let terminal_now = first
            .status
            .as_ref()
            .is_some_and(|s| !types::is_pending(s.id));
        if terminal_now {
            debug!("submission {token} resolved synchronously");
            return first.into_result(token);
        }

        for attempt in 1..=self.opts.max_polls {
            tokio::time::sleep(self.opts.poll_interval).await;
            let raw = self.fetch(&token).await?;
            if !raw.pending() {
                debug!("submission {token} terminal after {attempt} polls");
                return raw.into_result(token);
            }
            debug!(
                "submission {token} still pending (poll {attempt}/{})",
                self.opts.max_polls
            );
        }

        warn!(
            "submission {token} not terminal after {} polls, giving up",
            self.opts.max_polls
        );
        Ok(ExecutionResult::polling_timeout(token))
    }

    async fn submit(
        &self,
        req: &ExecutionRequest,
        language_id: u32,
    ) -> Result<RawSubmission, JudgeError> {
        let url = format!("{}/submissions", self.opts.base_url.trim_end_matches('/'));
        let body = json!({
            "source_code": BASE64.encode(&req.source_code),
            "language_id": language_id,
            "stdin": req.stdin.as_ref().map(|s| BASE64.encode(s)),
            "cpu_time_limit": self.opts.cpu_time_limit,
            "wall_time_limit": self.opts.wall_time_limit,
        });

        let mut request = self
            .http
            .post(&url)
            .query(&[
                ("base64_encoded", "true"),
                ("wait", "true"),
                ("fields", SUBMIT_FIELDS),
            ])
            .json(&body);
        if let Some(key) = &self.opts.api_key {
            request = request.header("X-Auth-Token", key);
        }

        self.read_envelope(request.send().await?).await
    }

    async fn fetch(&self, token: &str) -> Result<RawSubmission, JudgeError> {
        let url = format!(
            "{}/submissions/{token}",
            self.opts.base_url.trim_end_matches('/')
        );
        let mut request = self
            .http
            .get(&url)
            .query(&[("base64_encoded", "true"), ("fields", POLL_FIELDS)]);
        if let Some(key) = &self.opts.api_key {
            request = request.header("X-Auth-Token", key);
        }

        self.read_envelope(request.send().await?).await
    }

    async fn read_envelope(
        &self,
        response: reqwest::Response,
    ) -> Result<RawSubmission, JudgeError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(JudgeError::Api { status, body });
        }
        serde_json::from_str(&body).map_err(|e| JudgeError::MalformedResponse(e.to_string()))
    }
}
