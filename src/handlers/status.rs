// src/handlers/status.rs
use actix_web::{web, HttpResponse};
use log::{debug, error, warn};
use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;
use crate::upstream::UpstreamClient;
use crate::utils::{is_success, ProxyError};

/// Stateless passthrough to the upstream status backend.
pub struct StatusProxy {
    upstream_url: Option<Url>,
    client: Arc<dyn UpstreamClient>,
}

impl StatusProxy {
    pub fn new(upstream_url: Option<Url>, client: Arc<dyn UpstreamClient>) -> Self {
        Self { upstream_url, client }
    }

    /// One upstream round trip. The JSON body is returned untouched.
    pub async fn fetch(&self) -> Result<Value, ProxyError> {
        let url = self.upstream_url.as_ref().ok_or(ProxyError::MissingUpstreamUrl)?;

        let reply = match self.client.get(url).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Upstream request to {} failed: {}", url, e);
                return Err(ProxyError::Transport(e));
            }
        };

        if !is_success(reply.status) {
            warn!("Upstream {} answered with status {}", url, reply.status);
            return Err(ProxyError::UpstreamStatus(reply.status));
        }

        match serde_json::from_slice::<Value>(&reply.body) {
            Ok(data) => {
                debug!("Forwarding {} byte status payload", reply.body.len());
                Ok(data)
            }
            Err(e) => {
                error!("Upstream {} returned invalid JSON: {}", url, e);
                Err(ProxyError::Transport(e.to_string()))
            }
        }
    }
}

pub async fn get_status(proxy: web::Data<StatusProxy>) -> Result<HttpResponse, ProxyError> {
    let data = proxy.fetch().await?;
    Ok(HttpResponse::Ok().json(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::server::sample_status;
    use crate::upstream::UpstreamReply;
    use actix_web::{http::header, test, App};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockUpstream {
        reply: Result<UpstreamReply, String>,
        calls: AtomicUsize,
    }

    impl MockUpstream {
        fn new(reply: Result<UpstreamReply, String>) -> Arc<Self> {
            Arc::new(Self { reply, calls: AtomicUsize::new(0) })
        }

        fn json(status: u16, body: &Value) -> Arc<Self> {
            Self::new(Ok(UpstreamReply { status, body: serde_json::to_vec(body).unwrap() }))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UpstreamClient for MockUpstream {
        async fn get(&self, _url: &Url) -> Result<UpstreamReply, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn upstream_url() -> Option<Url> {
        Url::parse("http://backend.test/status").ok()
    }

    async fn call(proxy: StatusProxy) -> (u16, Option<String>, Vec<u8>) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(proxy))
                .route("/api/valheim", web::get().to(get_status)),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/valheim").to_request();
        let resp = test::call_service(&app, req).await;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = test::read_body(resp).await.to_vec();
        (status, content_type, body)
    }

    #[actix_web::test]
    async fn missing_config_answers_500_without_network() {
        let upstream = MockUpstream::json(200, &serde_json::json!({}));
        let proxy = StatusProxy::new(None, upstream.clone());

        let (status, _, body) = call(proxy).await;
        assert_eq!(status, 500);
        assert_eq!(body, b"Backend URL is not configured");
        assert_eq!(upstream.calls(), 0);
    }

    #[actix_web::test]
    async fn forwards_upstream_error_status() {
        for code in [400u16, 404, 429, 500, 502, 503, 599] {
            let upstream = MockUpstream::new(Ok(UpstreamReply {
                status: code,
                body: b"<html>gateway exploded</html>".to_vec(),
            }));
            let proxy = StatusProxy::new(upstream_url(), upstream.clone());

            let (status, _, body) = call(proxy).await;
            assert_eq!(status, code);
            assert_eq!(body, b"Failed to fetch server data");
            assert_eq!(upstream.calls(), 1);
        }
    }

    #[actix_web::test]
    async fn forwards_json_verbatim() {
        let payload = serde_json::to_value(sample_status(3)).unwrap();
        for code in [200u16, 203, 299] {
            let upstream = MockUpstream::json(code, &payload);
            let proxy = StatusProxy::new(upstream_url(), upstream);

            let (status, content_type, body) = call(proxy).await;
            assert_eq!(status, 200);
            assert_eq!(content_type.as_deref(), Some("application/json"));
            let forwarded: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(forwarded, payload);
        }
    }

    #[actix_web::test]
    async fn forwards_unknown_fields_untouched() {
        let payload = serde_json::json!({
            "server_name": "Midgard",
            "steam_id": 90198765432101234u64,
            "extra": {"nested": [1, 2, 3]}
        });
        let proxy = StatusProxy::new(upstream_url(), MockUpstream::json(200, &payload));

        let (status, _, body) = call(proxy).await;
        assert_eq!(status, 200);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), payload);
    }

    #[actix_web::test]
    async fn transport_failure_answers_500() {
        let upstream = MockUpstream::new(Err("connection reset by peer".to_string()));
        let proxy = StatusProxy::new(upstream_url(), upstream.clone());

        let (status, _, body) = call(proxy).await;
        assert_eq!(status, 500);
        assert_eq!(body, b"An error occurred while fetching server data");
        assert_eq!(upstream.calls(), 1);
    }

    #[actix_web::test]
    async fn malformed_body_is_a_transport_failure() {
        let upstream = MockUpstream::new(Ok(UpstreamReply { status: 200, body: b"{not json".to_vec() }));
        let proxy = StatusProxy::new(upstream_url(), upstream);

        assert!(matches!(proxy.fetch().await, Err(ProxyError::Transport(_))));
    }

    #[actix_web::test]
    async fn upstream_status_is_kept_apart_from_transport_failure() {
        let proxy = StatusProxy::new(
            upstream_url(),
            MockUpstream::new(Ok(UpstreamReply { status: 500, body: Vec::new() })),
        );
        assert_eq!(proxy.fetch().await, Err(ProxyError::UpstreamStatus(500)));
    }
}
