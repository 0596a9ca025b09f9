//! Shared utilities for integration testing.

use std::net::SocketAddr;

use instafood_proxy::config::ProxyConfig;
use instafood_proxy::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A proxy running on an ephemeral local port.
pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a proxy pointed at `upstream_base_url`.
pub async fn start_proxy(upstream_base_url: &str) -> RunningProxy {
    let mut config = ProxyConfig::default();
    config.upstream.base_url = upstream_base_url.to_string();
    start_proxy_with(config).await
}

/// Start a proxy with an explicit configuration. The listener is always
/// bound to an ephemeral port.
pub async fn start_proxy_with(config: ProxyConfig) -> RunningProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        server
            .run(listener, server_shutdown)
            .await
            .expect("proxy server failed");
    });

    RunningProxy { addr, shutdown }
}

/// Client that never routes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
