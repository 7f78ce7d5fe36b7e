//! In-memory and loopback streams for exercising packet connections.

use std::{
    io,
    net::{Ipv4Addr, SocketAddr},
    pin::Pin,
    task::{Context, Poll},
};

use seqframe::{PacketConfig, PacketConn};
use tokio::{
    io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf, duplex},
    net::{TcpListener, TcpStream},
};

/// Duplex buffer size large enough to keep maximal packets moving without
/// excessive task switching.
pub const LOOPBACK_CAPACITY: usize = 1 << 20;

/// Two connected packet connections over an in-memory duplex stream.
#[must_use]
pub fn loopback() -> (PacketConn<DuplexStream>, PacketConn<DuplexStream>) {
    loopback_with_config(PacketConfig::default())
}

/// Like [`loopback`], applying `config` to both ends.
#[must_use]
pub fn loopback_with_config(
    config: PacketConfig,
) -> (PacketConn<DuplexStream>, PacketConn<DuplexStream>) {
    let (a, b) = duplex(LOOPBACK_CAPACITY);
    (
        PacketConn::with_config(a, config),
        PacketConn::with_config(b, config),
    )
}

/// Two connected TCP streams on an ephemeral localhost port.
///
/// # Errors
///
/// Returns any I/O error raised while binding, connecting, or accepting.
pub async fn tcp_pair() -> io::Result<(TcpStream, TcpStream)> {
    let listener = TcpListener::bind(SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0)).await?;
    let addr = listener.local_addr()?;
    let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
    Ok((client?, accepted?.0))
}

/// Reader yielding pre-recorded bytes at most `chunk` bytes per read, then
/// EOF.
#[derive(Debug)]
pub struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl ChunkedReader {
    /// Serve `data` in pieces of at most `chunk` bytes (minimum one).
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            chunk: chunk.max(1),
        }
    }
}

impl AsyncRead for ChunkedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(self.chunk).min(buf.remaining());
        buf.put_slice(&remaining[..n]);
        self.pos += n;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for ChunkedReader {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// How a [`LimitedWriter`] misbehaves once its budget is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exhaustion {
    /// Report zero bytes written, which `write_all` surfaces as `WriteZero`.
    ShortWrite,
    /// Fail with an error of the given kind.
    Error(io::ErrorKind),
}

/// Writer that accepts `budget` bytes, then misbehaves as configured.
///
/// Accepted bytes are kept so tests can inspect the prefix that reached the
/// "wire". Reads always report EOF.
#[derive(Debug)]
pub struct LimitedWriter {
    budget: usize,
    exhaustion: Exhaustion,
    written: Vec<u8>,
    shutdown_error: Option<io::ErrorKind>,
}

impl LimitedWriter {
    /// Create a writer that accepts `budget` bytes before misbehaving.
    #[must_use]
    pub fn new(budget: usize, exhaustion: Exhaustion) -> Self {
        Self {
            budget,
            exhaustion,
            written: Vec::new(),
            shutdown_error: None,
        }
    }

    /// Make `poll_shutdown` fail with `kind`.
    #[must_use]
    pub fn failing_shutdown(mut self, kind: io::ErrorKind) -> Self {
        self.shutdown_error = Some(kind);
        self
    }

    /// Bytes accepted so far.
    #[must_use]
    pub fn written(&self) -> &[u8] { &self.written }
}

impl AsyncWrite for LimitedWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.budget == 0 && !buf.is_empty() {
            return Poll::Ready(match self.exhaustion {
                Exhaustion::ShortWrite => Ok(0),
                Exhaustion::Error(kind) => Err(io::Error::new(kind, "writer budget exhausted")),
            });
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        self.written.extend_from_slice(&buf[..n]);
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(match self.shutdown_error {
            Some(kind) => Err(io::Error::new(kind, "shutdown failed")),
            None => Ok(()),
        })
    }
}

impl AsyncRead for LimitedWriter {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
