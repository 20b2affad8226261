// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the external NLQ service.
//!
//! Provides [`NlqClient`] which handles request construction and explicit
//! outcome classification: transport failures, service-reported rejections,
//! and success payloads each map to a distinct error path. There is no
//! retry at any layer; a failed submission is for the caller to re-submit.

use std::time::Duration;

use askdb_config::model::NlqConfig;
use askdb_core::AskdbError;
use tracing::debug;

use crate::types::{
    ChatOutcome, ChatRequest, ChatSuccess, RecommendRequest, RecommendResponse, ServiceErrorBody,
};

/// HTTP client for NLQ service communication.
#[derive(Debug, Clone)]
pub struct NlqClient {
    client: reqwest::Client,
    base_url: String,
}

impl NlqClient {
    /// Creates a new NLQ client from configuration.
    ///
    /// The configured timeout is the only cancellation mechanism: a hung
    /// service blocks the single request that hit it, nothing else.
    pub fn new(config: &NlqConfig) -> Result<Self, AskdbError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AskdbError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends a question plus connection descriptor to `/chat`.
    ///
    /// Outcome classification:
    /// - transport failure or 5xx -> [`AskdbError::Unavailable`]
    /// - 4xx, or 2xx with an embedded error payload -> [`AskdbError::Rejected`]
    /// - 2xx success payload -> `Ok`
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatSuccess, AskdbError> {
        let body = self.post_json("/chat", request).await?;

        match serde_json::from_str::<ChatOutcome>(&body) {
            Ok(ChatOutcome::Success(success)) => {
                debug!(
                    has_sql = success.sql_query.is_some(),
                    has_title = success.title.is_some(),
                    "chat succeeded"
                );
                Ok(success)
            }
            Ok(ChatOutcome::Failure(failure)) => {
                debug!(error = %failure.error, "chat rejected by service");
                Err(AskdbError::Rejected {
                    detail: failure.error,
                })
            }
            Err(e) => Err(AskdbError::Unavailable {
                message: format!("malformed response from query service: {e}"),
                source: Some(Box::new(e)),
            }),
        }
    }

    /// Asks `/recommend` for natural-language questions suited to the
    /// given connection's schema.
    pub async fn recommend(&self, request: &RecommendRequest) -> Result<Vec<String>, AskdbError> {
        let body = self.post_json("/recommend", request).await?;

        let response: RecommendResponse =
            serde_json::from_str(&body).map_err(|e| AskdbError::Unavailable {
                message: format!("malformed response from query service: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(response.recommended_queries)
    }

    /// POST a JSON body and return the raw response text of a 2xx reply.
    /// Non-2xx replies are classified into the error taxonomy here.
    async fn post_json<T: serde::Serialize>(
        &self,
        path: &str,
        request: &T,
    ) -> Result<String, AskdbError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AskdbError::Unavailable {
                message: format!("request to query service failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AskdbError::Unavailable {
            message: format!("failed to read query service response: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(%status, path, "query service responded");

        if status.is_success() {
            Ok(body)
        } else if status.is_client_error() {
            // The service was reached and turned the request down; surface
            // its own detail text.
            let detail = serde_json::from_str::<ServiceErrorBody>(&body)
                .map(|b| b.detail)
                .unwrap_or(body);
            Err(AskdbError::Rejected { detail })
        } else {
            Err(AskdbError::Unavailable {
                message: format!("query service returned {status}: {body}"),
                source: None,
            })
        }
    }
}
