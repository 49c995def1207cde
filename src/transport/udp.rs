use std::io::ErrorKind;
use std::net::SocketAddr;

use tokio::net::{lookup_host, ToSocketAddrs, UdpSocket};

use crate::transport::Transport;

/// Port both nodes listen on.
pub const DEFAULT_PORT: u16 = 8888;
/// Receive buffer size. One byte is kept free, so longer datagrams are cut at 255 bytes.
pub const RECV_BUFFER: usize = 256;

/// UDP link to a single fixed peer.
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
    buf: [u8; RECV_BUFFER],
}

impl UdpTransport {
    /// Bind `local` and connect the socket to `peer`, so only the peer's
    /// datagrams are received.
    pub async fn bind<A: ToSocketAddrs, B: ToSocketAddrs>(local: A, peer: B) -> anyhow::Result<Self> {
        let peer = lookup_host(peer)
            .await?
            .next()
            .ok_or_else(|| anyhow::anyhow!("peer address did not resolve"))?;
        let socket = UdpSocket::bind(local).await?;
        socket.connect(peer).await?;
        log::info!("udp link {} -> {}", socket.local_addr()?, peer);
        Ok(Self {
            socket,
            peer,
            buf: [0; RECV_BUFFER],
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

#[async_trait::async_trait]
impl Transport for UdpTransport {
    async fn send(&mut self, datagram: &str) -> anyhow::Result<()> {
        match self.socket.send(datagram.as_bytes()).await {
            Ok(_) => Ok(()),
            // The peer is not up yet; the datagram is simply lost.
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                log::debug!("peer {} refused {:?}", self.peer, datagram);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn try_recv(&mut self) -> anyhow::Result<Option<String>> {
        let usable = RECV_BUFFER - 1;
        match self.socket.try_recv(&mut self.buf[..usable]) {
            Ok(len) => Ok(Some(String::from_utf8_lossy(&self.buf[..len]).into_owned())),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            // ICMP port unreachable from an earlier send.
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
