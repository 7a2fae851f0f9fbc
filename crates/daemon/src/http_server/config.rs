use std::net::SocketAddr;

use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // Public gateway base for share and preview links
    pub public_url: Url,
    // log level for http tracing
    pub log_level: tracing::Level,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, public_url: Url) -> Self {
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, public_url={}",
            listen_addr,
            public_url
        );
        Self {
            listen_addr,
            public_url,
            log_level: tracing::Level::INFO,
        }
    }

    pub fn share_url(&self, token: &str) -> String {
        self.link("s", token)
    }

    pub fn preview_url(&self, token: &str) -> String {
        self.link("p", token)
    }

    fn link(&self, prefix: &str, token: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_url.as_str().trim_end_matches('/'),
            prefix,
            token
        )
    }
}
