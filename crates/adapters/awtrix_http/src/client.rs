//! HTTP implementation of [`AppClient`].

use std::time::Duration;

use pixelhub_app::ports::AppClient;
use pixelhub_domain::error::RemoteError;

use crate::config::AwtrixConfig;
use crate::error::AwtrixError;

const CUSTOM_APP_PATH: &str = "/api/custom";

/// Talks to one device over its HTTP API.
#[derive(Clone)]
pub struct AwtrixClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<(String, Option<String>)>,
}

impl AwtrixClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AwtrixError::MissingHost`] for an empty host and
    /// [`AwtrixError::Build`] when the HTTP client cannot be created.
    pub fn new(config: &AwtrixConfig) -> Result<Self, AwtrixError> {
        if config.host.is_empty() {
            return Err(AwtrixError::MissingHost);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AwtrixError::Build)?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    /// Post to the custom-app endpoint for `name`.
    ///
    /// Without a payload the device deletes the app.
    async fn post_custom_app(
        &self,
        name: &str,
        payload: Option<&serde_json::Value>,
    ) -> Result<(), RemoteError> {
        let mut request = self
            .http
            .post(format!("{}{CUSTOM_APP_PATH}", self.base_url))
            .query(&[("name", name)]);
        request = match payload {
            Some(payload) => request.json(payload),
            None => request.body(""),
        };
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|err| RemoteError::Unreachable {
                app: name.to_string(),
                source: Box::new(err),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Rejected {
                app: name.to_string(),
                status: status.as_u16(),
            });
        }
        tracing::trace!(app = name, status = status.as_u16(), "device accepted request");
        Ok(())
    }
}

impl AppClient for AwtrixClient {
    async fn remove_app(&self, name: &str) -> Result<(), RemoteError> {
        self.post_custom_app(name, None).await
    }

    async fn update_app(&self, name: &str, payload: &serde_json::Value) -> Result<(), RemoteError> {
        self.post_custom_app(name, Some(payload)).await
    }
}
