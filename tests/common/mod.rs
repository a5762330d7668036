//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use flext::AppServer;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Write a handler file below `root`, creating directories as needed.
pub fn write_handler(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A manifest answering `status` with a JSON body (inline TOML table).
pub fn json_manifest(status: u16, json: &str) -> String {
    format!("[response]\nstatus = {status}\njson = {json}\n")
}

/// A running server; dropping the handle's sender stops it.
pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Serve `server` on an ephemeral local port.
pub async fn start_server(server: AppServer) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let _ = server
            .run_until(listener, async {
                let _ = rx.await;
            })
            .await;
    });

    RunningServer {
        addr,
        shutdown: Some(tx),
    }
}

/// Client without connection pooling or proxies, for test stability.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
