use crate::core::payload;
use crate::domain::model::{DeviceAddress, MethodCall};
use crate::domain::ports::{ConfigProvider, Transport};
use crate::utils::error::{Result, RpcError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::net::Ipv6Addr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT_PATH: &str = "/xmlrpc.cgi";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Plain-HTTP transport: `POST http://<device><endpoint_path>` with a
/// `text/xml` body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint_path: String,
}

impl HttpTransport {
    pub fn new(timeout: Duration, endpoint_path: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint_path: endpoint_path.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.timeout(), config.endpoint_path())
    }

    pub fn endpoint_for(&self, device: &DeviceAddress) -> std::result::Result<Url, RpcError> {
        let host = match device.as_str().parse::<Ipv6Addr>() {
            Ok(v6) => format!("[{}]", v6),
            Err(_) => device.to_string(),
        };
        let raw = format!("http://{}{}", host, self.endpoint_path);
        Url::parse(&raw).map_err(|e| {
            RpcError::Transport(format!("invalid device address '{}': {}", device, e))
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        device: &DeviceAddress,
        call: &MethodCall,
    ) -> std::result::Result<String, RpcError> {
        let document = payload::to_xml(call)?;
        let url = self.endpoint_for(device)?;

        tracing::debug!("POST {} {}", url, call.method_name());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/xml")
            .body(document)
            .send()
            .await?;

        // The status is informational only; the body decides the outcome.
        tracing::debug!("{} answered HTTP {}", device, response.status());

        // Consumes the response, so the connection goes back before returning.
        let body = response.text().await?;
        Ok(body)
    }
}
