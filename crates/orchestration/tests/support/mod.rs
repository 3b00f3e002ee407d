#![allow(dead_code)]

use axum::Router;
use tokio::net::TcpListener;
use url::Url;

/// Serves an axum app on an ephemeral port, returning its base URL.
pub async fn spawn_app(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Failed to start test server");
    });

    Url::parse(&format!("http://{address}/")).expect("Failed to parse test server url")
}

/// A port with nothing listening on it.
pub async fn unused_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = listener.local_addr().expect("Failed to read local addr");
    drop(listener);

    Url::parse(&format!("http://{address}/api/feature")).expect("Failed to parse url")
}
