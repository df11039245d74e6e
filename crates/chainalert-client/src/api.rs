//! Transport to the remote subscription service.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::normalize_base_url;
use crate::error::ClientError;
use crate::platform::PushSubscription;

pub const SUBSCRIBE_REJECTED_FALLBACK: &str = "Subscription failed";
pub const UNSUBSCRIBE_REJECTED_FALLBACK: &str = "Unsubscribe failed";
pub const SUBSCRIPTIONS_REJECTED_FALLBACK: &str = "Failed to load subscriptions";

/// Remote subscription service, JSON over HTTP.
#[async_trait(?Send)]
pub trait SubscriptionApi {
    /// Which network ids the given subscription is tied to.
    async fn subscribed_networks(
        &self,
        subscription: &PushSubscription,
    ) -> Result<Vec<String>, ClientError>;

    async fn subscribe(
        &self,
        subscription: &PushSubscription,
        network_id: &str,
    ) -> Result<(), ClientError>;

    async fn unsubscribe(
        &self,
        subscription: &PushSubscription,
        network_id: &str,
    ) -> Result<(), ClientError>;
}

/// reqwest-backed [`SubscriptionApi`].
///
/// Deliberately performs a single attempt per call with no client-side
/// timeout: failures surface to the caller and a manual retry is the only
/// recovery path.
#[derive(Debug, Clone)]
pub struct HttpSubscriptionApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpSubscriptionApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            http: reqwest::Client::new(),
        })
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> Option<String> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with('/') {
            Some(format!("{}{}", self.base_url, trimmed))
        } else {
            Some(format!("{}/{}", self.base_url, trimmed))
        }
    }

    #[must_use]
    pub fn subscriptions_path() -> &'static str {
        "/subscriptions"
    }

    #[must_use]
    pub fn subscribe_path(network_id: &str) -> String {
        format!("/subscribe/{}", network_id.trim())
    }

    #[must_use]
    pub fn unsubscribe_path(network_id: &str) -> String {
        format!("/unsubscribe/{}", network_id.trim())
    }

    async fn post(
        &self,
        path: &str,
        subscription: &PushSubscription,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.endpoint(path).ok_or(ClientError::InvalidPath)?;
        self.http
            .post(url.as_str())
            .header("x-request-id", format!("req_{}", Uuid::new_v4().simple()))
            .json(subscription)
            .send()
            .await
            .map_err(|error| ClientError::Request {
                message: error.to_string(),
            })
    }

    async fn check_status(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<reqwest::Response, ClientError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let bytes = response.bytes().await.unwrap_or_default();
        Err(ClientError::Rejected {
            message: parse_error_message(&bytes).unwrap_or_else(|| fallback.to_string()),
        })
    }
}

#[async_trait(?Send)]
impl SubscriptionApi for HttpSubscriptionApi {
    async fn subscribed_networks(
        &self,
        subscription: &PushSubscription,
    ) -> Result<Vec<String>, ClientError> {
        let response = self.post(Self::subscriptions_path(), subscription).await?;
        let response = Self::check_status(response, SUBSCRIPTIONS_REJECTED_FALLBACK).await?;
        let bytes = response.bytes().await.map_err(|error| ClientError::Read {
            message: error.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|error| ClientError::Decode {
            message: error.to_string(),
        })
    }

    async fn subscribe(
        &self,
        subscription: &PushSubscription,
        network_id: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .post(Self::subscribe_path(network_id).as_str(), subscription)
            .await?;
        Self::check_status(response, SUBSCRIBE_REJECTED_FALLBACK).await?;
        Ok(())
    }

    async fn unsubscribe(
        &self,
        subscription: &PushSubscription,
        network_id: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .post(Self::unsubscribe_path(network_id).as_str(), subscription)
            .await?;
        Self::check_status(response, UNSUBSCRIBE_REJECTED_FALLBACK).await?;
        Ok(())
    }
}

/// Pull the `message` field out of a JSON error body, if there is one.
#[must_use]
pub fn parse_error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_builder_normalizes_paths() {
        let api = HttpSubscriptionApi::new("https://alerts.example.com/").expect("api client");

        assert_eq!(
            api.endpoint("/subscriptions"),
            Some("https://alerts.example.com/subscriptions".to_string())
        );
        assert_eq!(
            api.endpoint("subscriptions"),
            Some("https://alerts.example.com/subscriptions".to_string())
        );
        assert_eq!(api.endpoint("  "), None);
    }

    #[test]
    fn path_helpers_are_deterministic() {
        assert_eq!(HttpSubscriptionApi::subscriptions_path(), "/subscriptions");
        assert_eq!(
            HttpSubscriptionApi::subscribe_path("polkadot"),
            "/subscribe/polkadot"
        );
        assert_eq!(
            HttpSubscriptionApi::unsubscribe_path(" kusama "),
            "/unsubscribe/kusama"
        );
    }

    #[test]
    fn base_url_missing_is_rejected() {
        let result = HttpSubscriptionApi::new("   ");
        assert!(matches!(result, Err(ClientError::BaseUrlMissing)));
    }

    #[test]
    fn error_body_message_is_extracted() {
        assert_eq!(
            parse_error_message(br#"{"message":"quota exceeded"}"#),
            Some("quota exceeded".to_string())
        );
    }

    #[test]
    fn missing_or_blank_message_yields_none() {
        assert_eq!(parse_error_message(br#"{"code":42}"#), None);
        assert_eq!(parse_error_message(br#"{"message":"  "}"#), None);
        assert_eq!(parse_error_message(b"not json"), None);
        assert_eq!(parse_error_message(b""), None);
    }
}
