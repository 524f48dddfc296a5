#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeferredSignal {
    ShowWin,
}

#[derive(Debug, Clone, Copy)]
struct DeferredEntry {
    generation: u64,
    remaining: Duration,
    signal: DeferredSignal,
}

/// One-shot delayed signals tagged with the session generation that scheduled them.
/// Advanced by simulated time only, so it never outlives the scene that owns it.
#[derive(Debug, Default)]
pub(crate) struct DeferredQueue {
    entries: Vec<DeferredEntry>,
}

impl DeferredQueue {
    pub(crate) fn schedule(&mut self, generation: u64, delay: Duration, signal: DeferredSignal) {
        self.entries.push(DeferredEntry {
            generation,
            remaining: delay,
            signal,
        });
    }

    /// Returns `(generation, signal)` for every entry that came due, in scheduling order.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> Vec<(u64, DeferredSignal)> {
        let mut due = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.remaining = entry.remaining.saturating_sub(elapsed);
            if entry.remaining.is_zero() {
                due.push((entry.generation, entry.signal));
                false
            } else {
                true
            }
        });
        due
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
