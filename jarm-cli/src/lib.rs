//! Library half of the `jarm` CLI: argument parsing, proxy/target
//! resolution, and the scan driver. Split out from `main.rs` so the
//! integration tests under `tests/` can drive [`run`] with mock transports
//! instead of real sockets.

pub mod cli;
pub mod csv_writer;
pub mod error;
pub mod proxy;
pub mod runner;
#[cfg(feature = "proxy-tls")]
pub mod tls;
pub mod transport;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;

use jarm_core::random::{GreaseChooser, RandomSource};

use cli::Cli;
use csv_writer::ScanRecord;
use error::{Error, Result};
use runner::ScanOptions;

/// Runs the full CLI flow against real sockets: parse targets, resolve the
/// proxy, scan each target, print progress, and write CSV if requested.
pub async fn run(cli: Cli) -> Result<()> {
    let resolver: Arc<dyn transport::Resolver> = Arc::new(transport::TokioResolver);
    let transport: Arc<dyn transport::Transport> = Arc::new(transport::TokioTransport);
    let random: Arc<dyn RandomSource> = Arc::new(jarm_core::random::OsRandomSource);
    let grease: Arc<dyn GreaseChooser> = Arc::new(jarm_core::random::UniformGreaseChooser);

    run_with(cli, resolver, transport, random, grease).await
}

/// Same as [`run`], but with the network-facing collaborators injected —
/// the seam integration tests scan through.
pub async fn run_with(
    cli: Cli,
    resolver: Arc<dyn transport::Resolver>,
    transport: Arc<dyn transport::Transport>,
    random: Arc<dyn RandomSource>,
    grease: Arc<dyn GreaseChooser>,
) -> Result<()> {
    let targets = collect_targets(&cli)?;
    let proxy = resolve_proxy(&cli)?;
    let address_family = cli.address_family();

    let mut records = Vec::with_capacity(targets.len());

    for (host, port) in targets {
        let options = ScanOptions {
            port,
            timeout_secs: cli.timeout,
            address_family,
            concurrency: cli.concurrency.max(1),
            proxy: proxy.clone(),
        };

        let jarm = runner::scan(
            &host,
            &options,
            Arc::clone(&resolver),
            Arc::clone(&transport),
            Arc::clone(&random),
            Arc::clone(&grease),
        )
        .await;

        if !cli.suppress {
            println!("Target: {host}:{port}");
            println!("JARM: {jarm}");
        }

        records.push(ScanRecord { host, port, jarm });
    }

    if let Some(output) = &cli.output {
        let file = File::create(output)?;
        csv_writer::write_csv(file, &records)?;
    }

    Ok(())
}

pub fn collect_targets(cli: &Cli) -> Result<Vec<(String, u16)>> {
    if let Some(path) = &cli.input {
        let file = File::open(path)?;
        let mut targets = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            targets.push(parse_host_port(line));
        }
        Ok(targets)
    } else {
        let target = cli
            .target
            .as_deref()
            .ok_or_else(|| Error::Argument("no target given".to_string()))?;
        Ok(vec![parse_host_port(target)])
    }
}

/// Splits `host:port` or `[ipv6]:port`. A bare IPv6 literal (no brackets)
/// has no unambiguous port suffix, so it is kept whole with the default
/// port rather than guessing which colon-separated tail is a port.
pub fn parse_host_port(spec: &str) -> (String, u16) {
    if let Some(rest) = spec.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            let host = rest[..end].to_string();
            let port = rest[end + 1..]
                .strip_prefix(':')
                .and_then(|p| p.parse().ok())
                .unwrap_or(443);
            return (host, port);
        }
    }

    match spec.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => match port.parse() {
            Ok(port) => (host.to_string(), port),
            Err(_) => (spec.to_string(), 443),
        },
        _ => (spec.to_string(), 443),
    }
}

/// Resolves the effective proxy configuration: `--proxy` wins outright;
/// otherwise `HTTPS_PROXY` is used unless `--proxy ignore` was passed.
pub fn resolve_proxy(cli: &Cli) -> Result<Option<proxy::ProxyConfig>> {
    let url = match cli.proxy.as_deref() {
        Some("ignore") => return Ok(None),
        Some(url) => Some(url.to_string()),
        None => proxy::env_proxy(),
    };

    let Some(url) = url else {
        return Ok(None);
    };

    let config = proxy::parse_proxy_url(&url, cli.proxy_auth.as_deref(), cli.proxy_insecure)?;

    #[cfg(not(feature = "proxy-tls"))]
    if config.scheme == proxy::ProxyScheme::Https {
        return Err(Error::Argument(
            "https:// proxy support requires the proxy-tls feature".to_string(),
        ));
    }

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_host_with_default_port() {
        assert_eq!(parse_host_port("google.com"), ("google.com".to_string(), 443));
    }

    #[test]
    fn parses_host_with_explicit_port() {
        assert_eq!(parse_host_port("google.com:8443"), ("google.com".to_string(), 8443));
    }

    #[test]
    fn falls_back_to_default_port_on_unparsable_suffix() {
        assert_eq!(parse_host_port("2001:db8::1"), ("2001:db8::1".to_string(), 443));
    }

    #[test]
    fn ipv6_literal_with_brackets_splits_on_the_bracket() {
        assert_eq!(parse_host_port("[2001:db8::1]:8443"), ("2001:db8::1".to_string(), 8443));
    }
}
