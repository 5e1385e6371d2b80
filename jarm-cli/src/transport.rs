//! Injected collaborators for DNS resolution and raw byte-stream transport.
//!
//! Neither trait is async-trait-derived — both return a boxed future by
//! hand, the same pattern the core crate uses for injected randomness:
//! production wires up real sockets, tests wire up in-memory fixtures that
//! replay recorded ServerHello bytes.

use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Which address family a probe is restricted to, per `-4`/`-6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Any,
    V4,
    V6,
}

/// A duplex byte stream — `TcpStream`, or a TLS stream wrapping one when
/// tunneling through an `https://` proxy.
pub trait AsyncDuplex: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> AsyncDuplex for T {}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Resolves a hostname to a single address, honoring the requested family.
pub trait Resolver: Send + Sync {
    fn resolve<'a>(&'a self, host: &'a str, family: AddressFamily) -> BoxFuture<'a, io::Result<IpAddr>>;
}

/// Opens a raw byte-stream connection to a resolved endpoint.
pub trait Transport: Send + Sync {
    fn connect<'a>(&'a self, addr: SocketAddr) -> BoxFuture<'a, io::Result<Box<dyn AsyncDuplex>>>;
}

/// Production [`Resolver`] backed by Tokio's async DNS lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioResolver;

impl Resolver for TokioResolver {
    fn resolve<'a>(&'a self, host: &'a str, family: AddressFamily) -> BoxFuture<'a, io::Result<IpAddr>> {
        Box::pin(async move {
            if let Ok(ip) = host.parse::<IpAddr>() {
                return Ok(ip);
            }
            let addrs = tokio::net::lookup_host((host, 0)).await?;
            addrs
                .filter_map(|sa| {
                    let ip = sa.ip();
                    match family {
                        AddressFamily::Any => Some(ip),
                        AddressFamily::V4 if ip.is_ipv4() => Some(ip),
                        AddressFamily::V6 if ip.is_ipv6() => Some(ip),
                        _ => None,
                    }
                })
                .next()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no matching address"))
        })
    }
}

/// Production [`Transport`] backed by a plain Tokio TCP socket.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTransport;

impl Transport for TokioTransport {
    fn connect<'a>(&'a self, addr: SocketAddr) -> BoxFuture<'a, io::Result<Box<dyn AsyncDuplex>>> {
        Box::pin(async move {
            let stream = TcpStream::connect(addr).await?;
            Ok(Box::new(stream) as Box<dyn AsyncDuplex>)
        })
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{duplex, DuplexStream};

    /// A [`Transport`] that hands back one scripted response per connect,
    /// keyed by the order probes connect in. Used by integration tests to
    /// replay a fixture dataset without touching the network.
    pub struct ScriptedTransport {
        responses: Mutex<Vec<Vec<u8>>>,
    }

    impl ScriptedTransport {
        pub fn new(responses: Vec<Vec<u8>>) -> Self {
            Self { responses: Mutex::new(responses) }
        }
    }

    impl Transport for ScriptedTransport {
        fn connect<'a>(&'a self, _addr: SocketAddr) -> BoxFuture<'a, io::Result<Box<dyn AsyncDuplex>>> {
            Box::pin(async move {
                let response = {
                    let mut responses = self.responses.lock().unwrap();
                    if responses.is_empty() {
                        Vec::new()
                    } else {
                        responses.remove(0)
                    }
                };
                let (client, server): (DuplexStream, DuplexStream) = duplex(4096);
                tokio::spawn(async move {
                    use tokio::io::{AsyncReadExt, AsyncWriteExt};
                    let mut server = server;
                    let mut sink = vec![0u8; 4096];
                    let _ = server.read(&mut sink).await;
                    let _ = server.write_all(&response).await;
                });
                Ok(Box::new(client) as Box<dyn AsyncDuplex>)
            })
        }
    }

    /// Always resolves to `127.0.0.1`, ignoring the requested host/family.
    #[derive(Default)]
    pub struct LoopbackResolver;

    impl Resolver for LoopbackResolver {
        fn resolve<'a>(&'a self, _host: &'a str, _family: AddressFamily) -> BoxFuture<'a, io::Result<IpAddr>> {
            Box::pin(async move { Ok(IpAddr::from([127, 0, 0, 1])) })
        }
    }

}
