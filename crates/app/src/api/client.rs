//! HTTP client shared by every API seam.

use std::{fmt, sync::Arc};

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    api::ApiError,
    storage::{KeyValueStore, TOKEN_KEY},
};

/// Talks to the laundry backend.
///
/// The bearer token is read from the store on every request, so signing in
/// or out takes effect immediately.
#[derive(Clone)]
pub struct HttpApi {
    http: Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpApi {
    #[must_use]
    pub fn new(base_url: &str, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let mut builder = self.http.request(method, self.url(path));

        if let Some(token) = self.store.get(TOKEN_KEY)?
            && !token.trim().is_empty()
        {
            builder = builder.bearer_auth(token.trim());
        }

        Ok(builder)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build().map_err(ApiError::Network)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        debug!(%method, %path, "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status, &text);

        warn!(%method, %path, %status, error = %error, "request failed");

        Err(error)
    }

    /// Send a request and decode the JSON body.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        let text = response.text().await.map_err(ApiError::Network)?;

        serde_json::from_str(&text).map_err(ApiError::Decode)
    }

    /// Send a request and ignore the body.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.execute(builder).await.map(|_response| ())
    }
}
