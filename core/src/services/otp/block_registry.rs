//! Registry of temporarily blocked IP addresses

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;

use crate::domain::entities::{BlockReason, IpBlock};

use super::clock::Clock;
use super::lock;
use super::types::{BlockSnapshot, BlockStatus};

/// Blocked IPs keyed by address
///
/// A new block for an IP overwrites the reason and start of the existing
/// one, but never moves a live `blocked_until` earlier.
pub struct IpBlockRegistry {
    blocks: Mutex<HashMap<String, IpBlock>>,
    clock: Arc<dyn Clock>,
}

impl IpBlockRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            blocks: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Check whether an IP is blocked, dropping an expired entry first
    pub fn is_blocked(&self, ip: &str) -> BlockStatus {
        let now = self.clock.now();
        let mut blocks = lock(&self.blocks);

        let Some(block) = blocks.get(ip) else {
            return BlockStatus::unblocked();
        };

        if block.is_active(now) {
            return BlockStatus::blocked(block.reason, block.remaining_ms(now));
        }

        blocks.remove(ip);
        tracing::debug!(ip = ip, event = "ip_block_expired", "Removed expired IP block");
        BlockStatus::unblocked()
    }

    /// Block an IP for `duration` from now
    ///
    /// An unexpired block that already ends later keeps its end time.
    pub fn block(&self, ip: &str, reason: BlockReason, duration: Duration) -> IpBlock {
        let now = self.clock.now();
        let mut block = IpBlock::new(now, duration, reason);

        {
            let mut blocks = lock(&self.blocks);
            if let Some(existing) = blocks.get(ip) {
                if existing.is_active(now) && existing.blocked_until > block.blocked_until {
                    block.blocked_until = existing.blocked_until;
                }
            }
            blocks.insert(ip.to_string(), block.clone());
        }

        tracing::warn!(
            ip = ip,
            event = "ip_blocked",
            reason = %reason,
            blocked_until = %block.blocked_until,
            duration_ms = duration.num_milliseconds(),
            "IP blocked"
        );

        block
    }

    /// Lift a block manually; returns whether one existed
    pub fn unblock(&self, ip: &str) -> bool {
        let removed = lock(&self.blocks).remove(ip).is_some();
        if removed {
            tracing::info!(ip = ip, event = "ip_unblocked", "IP block lifted manually");
        }
        removed
    }

    /// Remove every expired block, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut blocks = lock(&self.blocks);
        let before = blocks.len();
        blocks.retain(|_, block| block.is_active(now));
        before - blocks.len()
    }

    /// Read-only view of an IP's block, without lazy deletion
    pub fn snapshot(&self, ip: &str) -> Option<BlockSnapshot> {
        let now = self.clock.now();
        lock(&self.blocks).get(ip).map(|block| BlockSnapshot {
            ip: ip.to_string(),
            reason: block.reason,
            blocked_at: block.blocked_at,
            blocked_until: block.blocked_until,
            remaining_ms: block.remaining_ms(now),
            active: block.is_active(now),
        })
    }

    pub fn len(&self) -> usize {
        lock(&self.blocks).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.blocks).clear();
    }
}
