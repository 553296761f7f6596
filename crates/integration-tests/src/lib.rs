//! Integration test support for the Fix EV Garage storefront.
//!
//! [`TestContext`] boots the real application on an ephemeral loopback port
//! with a scratch data directory and a [`RecordingSubmitter`], then drives it
//! over HTTP with `reqwest`.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_storefront_health() {
//!     let ctx = TestContext::start().await;
//!     let resp = ctx.get("/health").await;
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fixev_core::{Catalog, RecordingSubmitter};
use fixev_storefront::config::StorefrontConfig;
use fixev_storefront::state::AppState;
use fixev_storefront::storage::FileCartRepository;
use reqwest::{Client, Response, redirect};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running storefront plus a client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub submitter: Arc<RecordingSubmitter>,
    server: JoinHandle<()>,
    keep_data_dir: bool,
}

/// Fresh, unique data directory under the system temp dir.
#[must_use]
pub fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("fixev-it-{}", uuid::Uuid::new_v4()))
}

fn static_dir() -> String {
    format!("{}/../storefront/static", env!("CARGO_MANIFEST_DIR"))
}

impl TestContext {
    /// Start against an empty scratch data directory.
    pub async fn start() -> Self {
        Self::start_in(&scratch_dir()).await
    }

    /// Start against `data_dir`, rehydrating whatever cart it holds.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started; this is test support code.
    pub async fn start_in(data_dir: &Path) -> Self {
        let data = data_dir.display().to_string();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "FIXEV_DATA_DIR" => Some(data.clone()),
            "FIXEV_STATIC_DIR" => Some(static_dir()),
            _ => None,
        })
        .expect("test configuration is valid");

        let repository = FileCartRepository::open(data_dir).expect("data dir is writable");
        let submitter = Arc::new(RecordingSubmitter::new());
        let state = AppState::new(
            config,
            Catalog::builtin(),
            Arc::new(repository),
            submitter.clone(),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener has an address");
        let app = fixev_storefront::app(state);
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("build reqwest client");

        Self {
            client,
            addr,
            data_dir: data_dir.to_path_buf(),
            submitter,
            server,
            keep_data_dir: false,
        }
    }

    /// Absolute URL for a path on the running server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    /// GET and return the body, asserting the status.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the status differs.
    pub async fn get_text(&self, path: &str, status: u16) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status().as_u16(), status, "GET {path}");
        resp.text().await.expect("response body")
    }

    /// POST an urlencoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("POST request")
    }

    /// Stop the server, leaving the data directory in place for a restart.
    ///
    /// The next context started in that directory removes it when dropped.
    pub async fn stop(mut self) -> PathBuf {
        self.keep_data_dir = true;
        self.server.abort();
        (&mut self.server).await.ok();
        self.data_dir.clone()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
        if !self.keep_data_dir {
            std::fs::remove_dir_all(&self.data_dir).ok();
        }
    }
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(resp: &Response) -> Option<&str> {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Cart badge markup as rendered in the header.
#[must_use]
pub fn badge(count: u32) -> String {
    format!("<span class=\"cart-badge\">{count}</span>")
}
