//! Consul HTTP API client.

use crate::error::RegistryError;
use crate::traits::RegistryClient;
use crate::types::CatalogRegistration;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use std::time::Duration;

/// Agent address used when none is configured.
pub const DEFAULT_HTTP_ADDR: &str = "http://127.0.0.1:8500";

/// Connection settings for [`ConsulClient`].
#[derive(Debug, Clone)]
pub struct ConsulConfig {
    /// Agent address, with or without scheme (`127.0.0.1:8500`,
    /// `https://consul.service:8501`)
    pub address: String,
    /// ACL token sent as `X-Consul-Token`
    pub token: Option<String>,
    /// Datacenter sent as the `dc` query parameter
    pub datacenter: Option<String>,
    /// Per-request timeout; `None` waits as long as the agent does
    pub request_timeout: Option<Duration>,
}

impl Default for ConsulConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_HTTP_ADDR.to_string(),
            token: None,
            datacenter: None,
            request_timeout: None,
        }
    }
}

/// Client for a Consul agent's HTTP API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ConsulClient {
    http: Client,
    base_url: String,
    base: Url,
    token: Option<String>,
    datacenter: Option<String>,
}

impl ConsulClient {
    /// Create a client. No request is made until the first write.
    pub fn new(config: ConsulConfig) -> Result<Self, RegistryError> {
        let base_url = normalize_address(&config.address)?;
        let base = Url::parse(&base_url)
            .map_err(|_| RegistryError::InvalidAddress(config.address.clone()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(RegistryError::Build)?;

        tracing::debug!("Consul client configured for {base_url}");

        Ok(Self {
            http,
            base_url,
            base,
            token: config.token.filter(|t| !t.is_empty()),
            datacenter: config.datacenter.filter(|dc| !dc.is_empty()),
        })
    }

    /// Base URL requests are sent to (scheme and host, no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL for `segments` under the base URL. Each segment is
    /// percent-encoded, so `?`, `#` and `%` stay part of the path.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, RegistryError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RegistryError::InvalidAddress(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Endpoint for a KV key or prefix; `/` in the key separates segments.
    fn kv_endpoint(&self, key: &str) -> Result<Url, RegistryError> {
        let key = key.trim_start_matches('/');
        self.endpoint(["v1", "kv"].into_iter().chain(key.split('/')))
    }

    fn request(&self, method: Method, url: Url) -> (RequestBuilder, String) {
        let display = url.to_string();
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.token {
            req = req.header("X-Consul-Token", token);
        }
        if let Some(dc) = &self.datacenter {
            req = req.query(&[("dc", dc)]);
        }
        (req, display)
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        req: RequestBuilder,
    ) -> Result<Response, RegistryError> {
        let response = req.send().await.map_err(|source| RegistryError::Request {
            method: method.to_string(),
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Body is best effort; the status alone is enough to report
        let body = response.text().await.unwrap_or_default();
        Err(RegistryError::Status {
            method: method.to_string(),
            url,
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl RegistryClient for ConsulClient {
    async fn catalog_register(
        &self,
        registration: &CatalogRegistration,
    ) -> Result<(), RegistryError> {
        let endpoint = self.endpoint(["v1", "catalog", "register"])?;
        let (req, url) = self.request(Method::PUT, endpoint);
        self.send(Method::PUT, url, req.json(registration)).await?;
        Ok(())
    }

    async fn kv_put(&self, key: &str, value: &[u8]) -> Result<(), RegistryError> {
        let endpoint = self.kv_endpoint(key)?;
        let (req, url) = self.request(Method::PUT, endpoint);
        self.send(Method::PUT, url, req.body(value.to_vec())).await?;
        Ok(())
    }

    async fn kv_delete_tree(&self, prefix: &str) -> Result<(), RegistryError> {
        let endpoint = self.kv_endpoint(prefix)?;
        let (req, url) = self.request(Method::DELETE, endpoint);
        self.send(Method::DELETE, url, req.query(&[("recurse", "")]))
            .await?;
        Ok(())
    }
}

/// Turn `host:port` or a URL into a base URL without trailing slash.
fn normalize_address(address: &str) -> Result<String, RegistryError> {
    let address = address.trim().trim_end_matches('/');
    if address.is_empty() {
        return Err(RegistryError::InvalidAddress(address.to_string()));
    }

    let url = if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else if address.contains("://") {
        // unix:// and friends are not supported by this client
        return Err(RegistryError::InvalidAddress(address.to_string()));
    } else {
        format!("http://{address}")
    };

    reqwest::Url::parse(&url).map_err(|_| RegistryError::InvalidAddress(address.to_string()))?;
    Ok(url)
}
