use anyhow::{Context, Result};
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::input::{InputKind, ResolvedInput};

const DEFAULT_TLS_PORT: u16 = 443;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Turn a resolved input into a blob of PEM certificate bytes. File and
/// device inputs are read whole; server inputs go through a TLS handshake.
/// A single attempt, no retries: any failure is terminal for this invocation.
pub fn acquire(input: &ResolvedInput) -> Result<Vec<u8>> {
    match input.kind {
        InputKind::File | InputKind::Device => std::fs::read(&input.identifier)
            .with_context(|| format!("failed to read certificate data from {}", input.identifier)),
        InputKind::Server => fetch_server_chain(&input.identifier),
    }
}

// Unverified handshake: the point is to inspect whatever the server
// presents, including chains that would never validate.
fn fetch_server_chain(target: &str) -> Result<Vec<u8>> {
    let (host, port) = split_host_port(target);
    let addr = format!("{}:{}", host, port);
    let sock_addr = addr
        .to_socket_addrs()
        .with_context(|| format!("failed to resolve {}", addr))?
        .next()
        .with_context(|| format!("no address found for {}", addr))?;
    let tcp = TcpStream::connect_timeout(&sock_addr, CONNECT_TIMEOUT)
        .with_context(|| format!("failed to connect to {}", addr))?;

    let mut builder = SslConnector::builder(SslMethod::tls())?;
    builder.set_verify(SslVerifyMode::NONE);
    let connector = builder.build();

    // SNI and any hostname checks want the bare hostname, not host:port.
    let ssl_stream = connector
        .connect(host, tcp)
        .with_context(|| format!("TLS handshake with {} failed", addr))?;
    let ssl = ssl_stream.ssl();

    // Re-encode the presented chain as concatenated PEM, leaf first. The
    // chain stack usually repeats the leaf, so it is skipped there.
    let mut pem = Vec::new();
    let leaf = ssl.peer_certificate();
    if let Some(leaf) = leaf.as_ref() {
        pem.extend_from_slice(&leaf.to_pem()?);
    }
    let leaf_der = leaf.as_ref().and_then(|c| c.to_der().ok());
    if let Some(stack) = ssl.peer_cert_chain() {
        for cert in stack {
            if let Ok(der) = cert.to_der() {
                if Some(&der) == leaf_der.as_ref() {
                    continue;
                }
            }
            pem.extend_from_slice(&cert.to_pem()?);
        }
    }
    Ok(pem)
}

/// Split "host:port" into its parts; a missing or non-numeric port falls
/// back to 443.
pub fn split_host_port(target: &str) -> (&str, u16) {
    match target.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(p) => (host, p),
            Err(_) => (target, DEFAULT_TLS_PORT),
        },
        None => (target, DEFAULT_TLS_PORT),
    }
}
