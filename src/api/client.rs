//! HTTP client wrapper shared by every domain API module

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::BackendConfig,
    error::{AppError, AppResult},
};

/// Outgoing request, relative to the backend origin
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> AppResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Raw response; status handling happens in [`ApiClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam; the reqwest implementation is the only production one
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse>;
}

/// Cookie-session transport over `reqwest`
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let url = self.url(&request.path);
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        if status >= 400 {
            tracing::debug!("{} {} -> {}", request.method, url, status);
        }

        Ok(ApiResponse { status, body })
    }
}

/// Typed JSON calls over a [`Transport`]
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &BackendConfig) -> AppResult<Self> {
        let transport = ReqwestTransport::new(config.base_url.clone())?;
        Ok(Self::new(Arc::new(transport)))
    }

    async fn execute(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method, path, e);
            e
        })?;

        if response.is_success() {
            Ok(response)
        } else {
            let error = AppError::from_response(response.status, &response.body);
            tracing::warn!("{} {} rejected: {}", method, path, error);
            Err(error)
        }
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: ApiRequest) -> AppResult<T> {
        let response = self.execute(request).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> AppResult<T> {
        self.execute_json(ApiRequest::new(Method::GET, path).query(query))
            .await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        self.execute_json(ApiRequest::new(Method::POST, path).json(body)?)
            .await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        self.execute_json(ApiRequest::new(Method::PUT, path).json(body)?)
            .await
    }

    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        self.execute_json(ApiRequest::new(Method::PATCH, path).json(body)?)
            .await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.execute_json(ApiRequest::new(Method::DELETE, path)).await
    }

    /// Raw body of a successful GET (CSV downloads)
    pub async fn get_bytes(&self, path: &str, query: Vec<(String, String)>) -> AppResult<Vec<u8>> {
        let response = self
            .execute(ApiRequest::new(Method::GET, path).query(query))
            .await?;
        Ok(response.body)
    }
}
