use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::PracticeMode;
use crate::generator::pipeline::{self, GenRequest};
use crate::keyboard::resolver::KeyMapping;
use crate::session::chunk::PracticeChunk;

/// A finished prefetch result waiting in the slot, tagged with the mode it
/// was generated for.
#[derive(Debug)]
struct ReadyChunk {
    chunk: PracticeChunk,
    mode: PracticeMode,
}

/// Single-slot background generator for the next practice chunk.
///
/// One producer (the worker thread) and one consumer (the chunk-advance
/// step) share the slot under a mutex. Each `start` bumps an epoch counter
/// that the worker re-checks before storing, so a discarded generation can
/// finish late without its result ever becoming visible.
pub struct Prefetcher {
    slot: Arc<Mutex<Option<ReadyChunk>>>,
    epoch: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

impl Prefetcher {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            epoch: Arc::new(AtomicU64::new(0)),
            worker: None,
        }
    }

    /// Kick off generation of the next chunk under a snapshot of the current
    /// mode and config. Any previous pending or completed result is
    /// discarded first.
    pub fn start(&mut self, request: GenRequest, mapping: Arc<KeyMapping>) {
        self.discard();
        let launched_epoch = self.epoch.load(Ordering::SeqCst);
        let slot = Arc::clone(&self.slot);
        let epoch = Arc::clone(&self.epoch);

        self.worker = Some(std::thread::spawn(move || {
            let mut rng = SmallRng::from_entropy();
            let chunk = pipeline::generate(&request, &mapping, &mut rng);

            let mut guard = lock_slot(&slot);
            if epoch.load(Ordering::SeqCst) == launched_epoch {
                *guard = Some(ReadyChunk {
                    chunk,
                    mode: request.mode,
                });
            } else {
                log::debug!("dropping prefetch result from a cancelled generation");
            }
        }));
    }

    /// Take the prefetched chunk if one is ready *and* was generated for the
    /// requested mode. A mode mismatch empties the slot and returns `None`,
    /// forcing the caller onto the synchronous path; stale content is
    /// discarded, never served.
    pub fn take(&mut self, mode: PracticeMode) -> Option<PracticeChunk> {
        let mut guard = lock_slot(&self.slot);
        match guard.take() {
            Some(ready) if ready.mode == mode => Some(ready.chunk),
            Some(ready) => {
                log::debug!(
                    "discarding prefetched {:?} chunk while in {:?} mode",
                    ready.mode,
                    mode
                );
                None
            }
            None => None,
        }
    }

    /// Drop any completed result and invalidate any generation in flight.
    pub fn discard(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *lock_slot(&self.slot) = None;
    }

    /// Test hook: block until the current worker finishes.
    #[allow(dead_code)]
    pub fn wait_for_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Default for Prefetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// A worker panicking while holding the lock must not wedge the session;
/// the slot content is a plain `Option` and stays coherent either way.
fn lock_slot<'a>(
    slot: &'a Arc<Mutex<Option<ReadyChunk>>>,
) -> MutexGuard<'a, Option<ReadyChunk>> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
