//! Shared fixtures for integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;

use content_router::config::ServerConfig;
use content_router::http::HttpServer;
use content_router::lifecycle::Shutdown;
use content_router::repository::{build_snapshot, SnapshotStore};

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
pub const ICO_BYTES: &[u8] = b"\x00\x00\x01\x00\x01\x00\x10\x10";

/// A repository and theme laid out in a temporary directory.
///
/// ```text
/// repo/README.md                 # Home
/// repo/docs/intro/intro.md       # Intro
/// repo/docs/intro/diagram.png
/// repo/docs/guide/guide.md       # Guide
/// theme/favicon.ico
/// theme/site.css
/// ```
pub struct Fixture {
    pub dir: TempDir,
    pub config: ServerConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("repo");
        let theme = dir.path().join("theme");

        write(&repo.join("README.md"), b"# Home\n\nWelcome.\n");
        write(&repo.join("docs/intro/intro.md"), b"# Intro\n\nStart here.\n");
        write(&repo.join("docs/intro/diagram.png"), PNG_BYTES);
        write(&repo.join("docs/guide/guide.md"), b"# Guide\n");
        write(&theme.join("favicon.ico"), ICO_BYTES);
        write(&theme.join("site.css"), b"body { margin: 0; }\n");

        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.repository.path = repo;
        config.repository.theme_dir = Some(theme);
        config.repository.watch = false;

        Self { dir, config }
    }

    pub fn repo(&self) -> PathBuf {
        self.config.repository.path.clone()
    }

    #[allow(dead_code)]
    pub fn theme(&self) -> PathBuf {
        self.dir.path().join("theme")
    }
}

pub fn write(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// A server running on an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<SnapshotStore>,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Index `config` and serve it until the returned server's shutdown fires.
#[allow(dead_code)]
pub async fn start_server(config: ServerConfig) -> TestServer {
    let store = Arc::new(SnapshotStore::new(build_snapshot(&config).unwrap()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(Arc::new(config), Arc::clone(&store));
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        store,
        shutdown,
        handle,
    }
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
