//! Datagram transports between the two nodes.
//!
//! A transport moves whole text datagrams. Delivery is best effort: datagrams
//! may be lost, repeated or reordered, and the engine copes with all three.

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send one datagram.
    async fn send(&mut self, datagram: &str) -> anyhow::Result<()>;

    /// Take one received datagram without waiting; `None` when nothing is pending.
    fn try_recv(&mut self) -> anyhow::Result<Option<String>>;
}

pub mod in_memory;
pub mod lossy;
pub mod udp;
