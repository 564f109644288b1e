//! Local tunnel forwarding through a group.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use urltest_proxy::group::UrlTestGroup;
use urltest_proxy::lifecycle::Shutdown;
use urltest_proxy::outbound::{Candidate, Destination, HttpConnect, Proxy};
use urltest_proxy::probe::ConcurrentProber;
use urltest_proxy::tunnel::{Listener, Tunnel};

mod common;

const TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_tunnel_forwards_through_selected_candidate() {
    let backend = common::start_http_backend().await;
    let echo = common::start_echo_backend().await;
    let proxy = common::start_connect_proxy(Duration::ZERO).await;

    let server = Destination::new(proxy.addr.ip().to_string(), proxy.addr.port());
    let candidate: Arc<dyn Candidate> =
        Arc::new(Proxy::new(HttpConnect::new("upstream", server, TIMEOUT), TIMEOUT));
    let group = Arc::new(
        UrlTestGroup::new(
            "auto",
            vec![candidate],
            &format!("http://{}/", backend),
            Duration::from_secs(3600),
            Arc::new(ConcurrentProber::new(Duration::from_secs(5))),
        )
        .unwrap(),
    );

    let listener = Listener::bind("127.0.0.1:0", 4).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let tunnel = Tunnel::new(listener, group, Destination::new("127.0.0.1", echo.port()));
    let task = tokio::spawn(tunnel.run(shutdown.subscribe()));

    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(b"ping").await.unwrap();
    let mut buf = [0u8; 4];
    client.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"ping");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .unwrap()
        .unwrap();
}
