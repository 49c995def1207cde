use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::link::{LinkProfile, LinkQueue, LinkStats};
use crate::transport::Transport;

/// Wraps a transport and applies seeded faults to incoming datagrams.
pub struct LossyTransport<T: Transport> {
    inner: T,
    link: LinkQueue,
    rng: SmallRng,
}

impl<T: Transport> LossyTransport<T> {
    pub fn new(inner: T, profile: LinkProfile, seed: u64) -> Self {
        Self {
            inner,
            link: LinkQueue::new(profile),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Counters of the faults applied so far.
    pub fn stats(&self) -> LinkStats {
        self.link.stats()
    }
}

#[async_trait::async_trait]
impl<T: Transport> Transport for LossyTransport<T> {
    async fn send(&mut self, datagram: &str) -> anyhow::Result<()> {
        self.inner.send(datagram).await
    }

    fn try_recv(&mut self) -> anyhow::Result<Option<String>> {
        while let Some(datagram) = self.inner.try_recv()? {
            self.link.push(datagram, &mut self.rng);
        }
        Ok(self.link.pop())
    }
}
