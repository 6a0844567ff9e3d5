// src/upstream.rs
use async_trait::async_trait;
use reqwest::Url;

/// Raw upstream answer, before any interpretation.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One outbound GET. Errors are transport failures only; HTTP error statuses
/// come back as an `UpstreamReply`.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn get(&self, url: &Url) -> Result<UpstreamReply, String>;
}

#[derive(Clone, Default)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstream {
    async fn get(&self, url: &Url) -> Result<UpstreamReply, String> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| e.to_string())?;

        Ok(UpstreamReply { status, body: body.to_vec() })
    }
}
