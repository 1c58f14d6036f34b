// tests/common/mod.rs
//
// Loopback payload server for fan-out tests: serves canned bodies on an
// OS-assigned port so no test ever leaves 127.0.0.1.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve payloads");
    });
    addr
}
