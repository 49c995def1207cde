use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::transport::Transport;

type Queue = Arc<Mutex<VecDeque<String>>>;

/// Lossless in-process link, useful for tests and local matches.
pub struct InMemoryTransport {
    recv_queue: Queue,
    send_queue: Queue,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let q1 = Arc::new(Mutex::new(VecDeque::new()));
        let q2 = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                recv_queue: q1.clone(),
                send_queue: q2.clone(),
            },
            Self {
                recv_queue: q2,
                send_queue: q1,
            },
        )
    }

    /// Datagrams waiting to be received on this end.
    pub fn pending(&self) -> usize {
        self.recv_queue.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, datagram: &str) -> anyhow::Result<()> {
        if Arc::strong_count(&self.send_queue) == 1 {
            return Err(anyhow::anyhow!("Channel closed"));
        }
        let mut queue = self
            .send_queue
            .lock()
            .map_err(|_| anyhow::anyhow!("send queue poisoned"))?;
        queue.push_back(datagram.to_owned());
        Ok(())
    }

    fn try_recv(&mut self) -> anyhow::Result<Option<String>> {
        let mut queue = self
            .recv_queue
            .lock()
            .map_err(|_| anyhow::anyhow!("receive queue poisoned"))?;
        Ok(queue.pop_front())
    }
}
