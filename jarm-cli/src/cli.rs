//! Command-line surface: `jarm scan <host[:port]>` or `jarm -i <file>`.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "jarm", version, about = "Active TLS fingerprint (JARM) scanner")]
pub struct Cli {
    /// Target as `host` or `host:port` (default port 443).
    #[arg(required_unless_present = "input")]
    pub target: Option<String>,

    /// Read one target (`host` or `host:port`) per line from a file instead.
    #[arg(short = 'i', long = "input", conflicts_with = "target")]
    pub input: Option<PathBuf>,

    /// Write results as CSV to this path.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Force IPv4 resolution.
    #[arg(short = '4', conflicts_with = "ipv6")]
    pub ipv4: bool,

    /// Force IPv6 resolution.
    #[arg(short = '6', conflicts_with = "ipv4")]
    pub ipv6: bool,

    /// Maximum simultaneous probes per target.
    #[arg(short = 'c', long = "concurrency", default_value_t = 2)]
    pub concurrency: usize,

    /// Proxy URL (`http://` or `https://`), or the literal `ignore` to
    /// disable the `HTTPS_PROXY` environment fallback.
    #[arg(long = "proxy")]
    pub proxy: Option<String>,

    /// Raw `Proxy-Authorization` header value; overrides credentials
    /// embedded in `--proxy`.
    #[arg(long = "proxy-auth")]
    pub proxy_auth: Option<String>,

    /// Skip certificate verification when connecting to an `https://` proxy.
    #[arg(long = "proxy-insecure")]
    pub proxy_insecure: bool,

    /// Enable debug logging.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Per-probe timeout in seconds.
    #[arg(long = "timeout", default_value_t = 20)]
    pub timeout: u64,

    /// Suppress the per-target `Target:` / `JARM:` stdout lines.
    #[arg(long = "suppress")]
    pub suppress: bool,
}

impl Cli {
    pub fn address_family(&self) -> crate::transport::AddressFamily {
        if self.ipv4 {
            crate::transport::AddressFamily::V4
        } else if self.ipv6 {
            crate::transport::AddressFamily::V6
        } else {
            crate::transport::AddressFamily::Any
        }
    }
}
