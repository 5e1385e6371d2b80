//! Probe Runner: opens a transport per probe, exchanges bytes, enforces a
//! timeout, and bounds concurrency with a counting semaphore. Probes are
//! isolated — any fault anywhere in a single probe's sequence degrades only
//! that probe's slot in the fingerprint, never the whole scan.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use jarm_core::random::{GreaseChooser, RandomSource};
use jarm_core::{build, parse, ParseOutcome, ProbeProfile, TEN_PROFILES};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Semaphore;

use crate::proxy::{self, ProxyConfig};
use crate::transport::{AddressFamily, Resolver, Transport};

/// The single recv cap every probe reads under, matching the reference
/// scanner's one-shot blocking read.
const RECV_CAP: usize = 1484;

/// Per-scan knobs threaded down from the CLI.
pub struct ScanOptions {
    pub port: u16,
    pub timeout_secs: u64,
    pub address_family: AddressFamily,
    pub concurrency: usize,
    pub proxy: Option<ProxyConfig>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            port: 443,
            timeout_secs: 20,
            address_family: AddressFamily::Any,
            concurrency: 2,
            proxy: None,
        }
    }
}

/// Runs all ten probes against `host`, with bounded concurrency, and folds
/// the results into a JARM string. Never returns an error: a resolver or
/// transport fault just fails the affected probe(s), and an all-failure
/// scan naturally assembles to the all-zero sentinel.
pub async fn scan(
    host: &str,
    options: &ScanOptions,
    resolver: Arc<dyn Resolver>,
    transport: Arc<dyn Transport>,
    random: Arc<dyn RandomSource>,
    grease: Arc<dyn GreaseChooser>,
) -> String {
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut handles = Vec::with_capacity(10);

    for profile in TEN_PROFILES.iter() {
        let semaphore = Arc::clone(&semaphore);
        let resolver = Arc::clone(&resolver);
        let transport = Arc::clone(&transport);
        let random = Arc::clone(&random);
        let grease = Arc::clone(&grease);
        let host = host.to_string();
        let port = options.port;
        let timeout_secs = options.timeout_secs;
        let address_family = options.address_family;
        let proxy = options.proxy.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await;
            run_one_probe(
                profile,
                &host,
                port,
                timeout_secs,
                address_family,
                proxy.as_ref(),
                resolver.as_ref(),
                transport.as_ref(),
                random.as_ref(),
                grease.as_ref(),
            )
            .await
        }));
    }

    // Reassemble in canonical profile order — a JARM is order-sensitive,
    // and probes may have completed in any order.
    let mut renderings: [String; 10] = std::array::from_fn(|_| String::new());
    for (i, handle) in handles.into_iter().enumerate() {
        let outcome = handle.await.unwrap_or(ParseOutcome::Failed);
        renderings[i] = outcome.render();
    }

    jarm_core::assemble(&renderings)
}

#[allow(clippy::too_many_arguments)]
async fn run_one_probe(
    profile: &ProbeProfile,
    host: &str,
    port: u16,
    timeout_secs: u64,
    address_family: AddressFamily,
    proxy: Option<&ProxyConfig>,
    resolver: &dyn Resolver,
    transport: &dyn Transport,
    random: &dyn RandomSource,
    grease: &dyn GreaseChooser,
) -> ParseOutcome {
    let attempt = probe_once(profile, host, port, address_family, proxy, resolver, transport, random, grease);

    match tokio::time::timeout(Duration::from_secs(timeout_secs), attempt).await {
        Ok(Ok(buf)) => parse(&buf),
        Ok(Err(err)) => {
            log::debug!("probe {} against {host}:{port} failed: {err}", profile.name);
            ParseOutcome::Failed
        }
        Err(_) => {
            log::debug!("probe {} against {host}:{port} timed out", profile.name);
            ParseOutcome::Failed
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn probe_once(
    profile: &ProbeProfile,
    host: &str,
    port: u16,
    address_family: AddressFamily,
    proxy: Option<&ProxyConfig>,
    resolver: &dyn Resolver,
    transport: &dyn Transport,
    random: &dyn RandomSource,
    grease: &dyn GreaseChooser,
) -> std::io::Result<Vec<u8>> {
    let (connect_host, connect_port) = match proxy {
        Some(p) => (p.host.as_str(), p.port),
        None => (host, port),
    };

    let ip = resolver.resolve(connect_host, address_family).await?;
    let addr = SocketAddr::new(ip, connect_port);
    let stream = transport.connect(addr).await?;

    #[cfg(feature = "proxy-tls")]
    let mut stream = maybe_wrap_tls(stream, connect_host, proxy).await?;
    #[cfg(not(feature = "proxy-tls"))]
    let mut stream = stream;

    if let Some(p) = proxy {
        proxy::tunnel(&mut stream, host, port, p.auth.as_ref())
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    }

    let payload = build(profile, host, random, grease);
    stream.write_all(&payload).await?;
    stream.flush().await?;

    let mut buf = vec![0u8; RECV_CAP];
    let n = stream.read(&mut buf).await?;
    buf.truncate(n);
    Ok(buf)
}

/// TLS-wraps the stream when the proxy itself is reached over `https://`.
/// Plain `http://` proxies and direct (non-proxied) connections pass through.
#[cfg(feature = "proxy-tls")]
async fn maybe_wrap_tls(
    stream: Box<dyn crate::transport::AsyncDuplex>,
    connect_host: &str,
    proxy: Option<&ProxyConfig>,
) -> std::io::Result<Box<dyn crate::transport::AsyncDuplex>> {
    let Some(p) = proxy else {
        return Ok(stream);
    };
    if p.scheme != crate::proxy::ProxyScheme::Https {
        return Ok(stream);
    }
    let tls = crate::tls::wrap(stream, connect_host, p.insecure)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    Ok(Box::new(tls))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{LoopbackResolver, ScriptedTransport};
    use jarm_core::random::{FixedGreaseChooser, FixedRandomSource};

    fn random_source() -> Arc<dyn RandomSource> {
        Arc::new(FixedRandomSource::new(vec![0x42; 32]))
    }

    fn grease_chooser() -> Arc<dyn GreaseChooser> {
        Arc::new(FixedGreaseChooser(0x5a5a))
    }

    #[tokio::test]
    async fn all_probes_timing_out_yields_all_zero_jarm() {
        let options = ScanOptions {
            port: 443,
            timeout_secs: 20,
            address_family: AddressFamily::Any,
            concurrency: 2,
            proxy: None,
        };
        // No scripted responses at all: every connect gets an empty read,
        // which the parser renders as Failed.
        let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport::new(vec![]));
        let resolver: Arc<dyn Resolver> = Arc::new(LoopbackResolver);

        let jarm = scan("example.com", &options, resolver, transport, random_source(), grease_chooser()).await;
        assert_eq!(jarm, "0".repeat(62));
    }
}
