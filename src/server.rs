use anyhow::Context;
use std::net::{IpAddr, SocketAddr};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::blackboard::{self, Blackboard};
use crate::settings::NetworkSettings;
use crate::surface;

const RESPONSE_HEADER: &str = "HTTP/1.0 200 OK\r\nContent-type: text/html\r\n\r\n";

/// Accept connections one at a time: read one command, answer, close.
///
/// The next connection is not accepted until the current command, including
/// any settling wait, has finished.
pub async fn serve(
    listener: TcpListener,
    bb: Blackboard,
    network: NetworkSettings,
) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };
        info!(%peer, "client connected");

        if let Err(e) = handle_connection(stream, &bb, &network).await {
            warn!(%peer, error = %e, "connection closed");
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    bb: &Blackboard,
    network: &NetworkSettings,
) -> anyhow::Result<()> {
    let mut buf = vec![0u8; network.max_request_bytes];
    let n = stream.read(&mut buf).await.context("reading request")?;
    let request = String::from_utf8_lossy(&buf[..n]);
    let target = request_target(&request).to_string();
    info!(%target, "request");

    let local = stream.local_addr().context("reading local address")?;
    let node = node_address(network.advertised_host.as_deref(), local);

    // The state change is complete before anything is sent back.
    let reply = blackboard::dispatch(bb, target).await?;
    debug!(?reply, "reply");

    let body = surface::render(&reply, &node);
    stream
        .write_all(RESPONSE_HEADER.as_bytes())
        .await
        .context("sending header")?;
    stream
        .write_all(body.as_bytes())
        .await
        .context("sending body")?;
    stream.shutdown().await.context("closing connection")?;
    Ok(())
}

/// The target of an HTTP request line, or the whole text when there is none.
pub fn request_target(request: &str) -> &str {
    let line = request.lines().next().unwrap_or_default();
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(_method), Some(target)) if target.starts_with('/') => target,
        _ => request,
    }
}

/// The address the control surface should send commands to.
///
/// The port is left out when it is the HTTP default.
pub fn node_address(advertised_host: Option<&str>, local: SocketAddr) -> String {
    let host = match advertised_host {
        Some(host) => host.to_string(),
        None => match local.ip() {
            IpAddr::V4(ip) => ip.to_string(),
            IpAddr::V6(ip) => format!("[{}]", ip),
        },
    };
    if local.port() == 80 {
        host
    } else {
        format!("{}:{}", host, local.port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trundle_command::DriveController;
    use trundle_drive::devices::sim::{InstantSettle, sim_pins};
    use trundle_drive::{MIN_SETTLE_TIME, OutputDriver};
    use trundle_motion::{DirectionMode, Speed};

    #[test]
    fn test_request_target() {
        assert_eq!(
            request_target("GET /speed/100 HTTP/1.1\r\nHost: x\r\n\r\n"),
            "/speed/100"
        );
        assert_eq!(request_target("GET / HTTP/1.0\r\n\r\n"), "/");
        assert_eq!(request_target("/forward/"), "/forward/");
        assert_eq!(request_target(""), "");
        assert_eq!(request_target("garbage"), "garbage");
    }

    #[test]
    fn test_headers_do_not_leak_into_target() {
        let request = "GET / HTTP/1.1\r\nReferer: http://10.0.0.2/speed/99\r\n\r\n";
        assert_eq!(request_target(request), "/");
    }

    #[test]
    fn test_node_address() {
        let default_port: SocketAddr = "192.168.4.1:80".parse().unwrap();
        let other_port: SocketAddr = "10.0.0.2:8080".parse().unwrap();
        let v6: SocketAddr = "[::1]:8080".parse().unwrap();

        assert_eq!(node_address(None, default_port), "192.168.4.1");
        assert_eq!(node_address(None, other_port), "10.0.0.2:8080");
        assert_eq!(node_address(None, v6), "[::1]:8080");
        assert_eq!(node_address(Some("rover.local"), default_port), "rover.local");
        assert_eq!(node_address(Some("rover.local"), other_port), "rover.local:8080");
    }

    async fn round_trip(addr: SocketAddr, request: &str) -> String {
        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        client.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serve_round_trip() {
        let bb = blackboard::new(DriveController::new(OutputDriver::new(
            sim_pins(),
            InstantSettle::default(),
            MIN_SETTLE_TIME,
        )));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener, bb.clone(), NetworkSettings::default()));

        let response = round_trip(addr, "GET /forward/ HTTP/1.1\r\n\r\n").await;
        assert_eq!(response, format!("{}Invalid or missing speed", RESPONSE_HEADER));

        let response = round_trip(addr, "GET /speed/300 HTTP/1.1\r\n\r\n").await;
        assert!(response.ends_with("Speed set to left: 255, right: 255"));

        let response = round_trip(addr, "GET / HTTP/1.1\r\n\r\n").await;
        assert!(response.starts_with(RESPONSE_HEADER));
        assert!(response.contains(&format!("const node = \"127.0.0.1:{}\";", addr.port())));

        let state = blackboard::snapshot(&bb);
        assert_eq!(state.direction(), DirectionMode::Forward);
        assert_eq!(state.speeds(), Some((Speed::MAX, Speed::MAX)));

        server.abort();
    }
}
