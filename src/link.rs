//! Simulated datagram link: seeded loss, duplication and reordering.

use alloc::collections::VecDeque;
use alloc::string::String;

use rand::Rng;

/// Per-datagram fault probabilities, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkProfile {
    /// Datagram never arrives.
    pub drop: f64,
    /// Datagram arrives twice.
    pub duplicate: f64,
    /// Datagram overtakes the one queued before it.
    pub reorder: f64,
}

impl LinkProfile {
    /// Every datagram arrives once, in order.
    pub const PERFECT: LinkProfile = LinkProfile {
        drop: 0.0,
        duplicate: 0.0,
        reorder: 0.0,
    };

    pub fn new(drop: f64, duplicate: f64, reorder: f64) -> Self {
        Self {
            drop,
            duplicate,
            reorder,
        }
    }
}

/// Delivery counters of one link direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkStats {
    pub sent: usize,
    pub dropped: usize,
    pub duplicated: usize,
    pub reordered: usize,
}

fn roll<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    p > 0.0 && rng.random_bool(p.clamp(0.0, 1.0))
}

/// One direction of a faulty link, queueing datagrams for the receiver.
#[derive(Debug, Clone, Default)]
pub struct LinkQueue {
    profile: LinkProfile,
    queue: VecDeque<String>,
    stats: LinkStats,
}

impl LinkQueue {
    pub fn new(profile: LinkProfile) -> Self {
        Self {
            profile,
            queue: VecDeque::new(),
            stats: LinkStats::default(),
        }
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Offer a datagram to the link; faults are rolled on `rng`.
    pub fn push<R: Rng + ?Sized>(&mut self, datagram: String, rng: &mut R) {
        self.stats.sent += 1;
        if roll(rng, self.profile.drop) {
            self.stats.dropped += 1;
            log::trace!("link dropped {:?}", datagram);
            return;
        }
        if roll(rng, self.profile.duplicate) {
            self.stats.duplicated += 1;
            self.queue.push_back(datagram.clone());
        }
        self.queue.push_back(datagram);
        if self.queue.len() >= 2 && roll(rng, self.profile.reorder) {
            self.stats.reordered += 1;
            let last = self.queue.len() - 1;
            self.queue.swap(last - 1, last);
        }
    }

    /// Next datagram for the receiver.
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }
}
