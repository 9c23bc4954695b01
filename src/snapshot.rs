//! Capture and restoration of the original desktop layout.
//!
//! A [`Snapshot`] is taken once, before any icon is moved, and written back
//! once on the way out.  [`RestoreGuard`] ties the restore to a scope so that
//! a panic unwinding through the game loop still puts every icon back.

use crate::grid::PixelPosition;
use crate::traits::{IconHost, IconIndex};
use log::{info, warn};
use std::collections::BTreeMap;

/// Original position of every icon that could be read at capture time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    positions: BTreeMap<IconIndex, PixelPosition>,
}

impl Snapshot {
    /// Read and store the position of icons `0..count`.
    ///
    /// Icons whose position cannot be read are left out; they are never
    /// moved, so there is nothing to restore for them.
    pub fn capture<H: IconHost>(host: &H, count: usize) -> Self {
        let mut positions = BTreeMap::new();
        for index in 0..count {
            match host.icon_position(index) {
                Some(pos) => {
                    positions.insert(index, pos);
                }
                None => warn!("icon {} has no readable position, leaving it alone", index),
            }
        }
        info!("captured {} of {} icon position(s)", positions.len(), count);
        Self { positions }
    }

    /// Write every stored position back.
    ///
    /// Safe to call more than once; an empty snapshot is a no-op.
    pub fn restore<H: IconHost>(&self, host: &H) {
        if self.positions.is_empty() {
            return;
        }
        for (&index, &pos) in &self.positions {
            host.set_icon_position(index, pos);
        }
        info!("restored {} icon position(s)", self.positions.len());
    }

    /// Captured icon indices in ascending order.
    pub fn indices(&self) -> Vec<IconIndex> {
        self.positions.keys().copied().collect()
    }

    /// Original position of `index`, if it was captured.
    pub fn get(&self, index: IconIndex) -> Option<PixelPosition> {
        self.positions.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Restores a [`Snapshot`] when dropped, unless [`restore`](RestoreGuard::restore)
/// already ran.
pub struct RestoreGuard<'a, H: IconHost> {
    host: &'a H,
    snapshot: Snapshot,
    restored: bool,
}

impl<'a, H: IconHost> RestoreGuard<'a, H> {
    pub fn new(host: &'a H, snapshot: Snapshot) -> Self {
        Self {
            host,
            snapshot,
            restored: false,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Restore now and disarm the guard.
    pub fn restore(mut self) {
        self.snapshot.restore(self.host);
        self.restored = true;
    }
}

impl<H: IconHost> Drop for RestoreGuard<'_, H> {
    fn drop(&mut self) {
        if !self.restored {
            warn!("session ended abnormally, restoring desktop");
            self.snapshot.restore(self.host);
        }
    }
}
