//! Deferred actions on the audio clock.
//!
//! The engine never sleeps or spawns timers. Anything that has to happen
//! later (a cue's second note, the end of a timed note, freeing a released
//! voice) is queued here with a due time and run by `ToneEngine::tick`.
//! Actions that belong to a voice can be cancelled when that voice is
//! superseded, so no stale action outlives the voice it was aimed at.

use crate::engine::voice::VoiceId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    /// Start a tone now and stop it again at `stop_at`
    PlayHeld { frequency: f32, stop_at: f64 },
    /// Stop `voice`, provided it still owns `frequency`
    Stop { frequency: f32, voice: VoiceId },
    /// Free the oscillator and gain of a released voice. Never cancelled.
    Dispose { voice: VoiceId },
}

impl Deferred {
    fn is_cancellable_for(&self, id: VoiceId) -> bool {
        matches!(*self, Deferred::Stop { voice, .. } if voice == id)
    }
}

#[derive(Debug)]
struct Pending {
    at: f64,
    seq: u64,
    action: Deferred,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    /// Sorted by (at, seq): due order, ties in enqueue order
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, at: f64, action: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let idx = self.pending.partition_point(|p| p.at <= at);
        self.pending.insert(idx, Pending { at, seq, action });
    }

    /// Cancel the pending stops aimed at `voice`. Disposals are kept: a
    /// voice's teardown always runs once it has been scheduled.
    pub fn cancel_voice(&mut self, voice: VoiceId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !p.action.is_cancellable_for(voice));
        before - self.pending.len()
    }

    /// Remove and return the earliest action due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<Deferred> {
        match self.pending.first() {
            Some(first) if first.at <= now => {
                let pending = self.pending.remove(0);
                log::trace!(
                    "dispatch #{} due {:.3}s at {:.3}s: {:?}",
                    pending.seq,
                    pending.at,
                    now,
                    pending.action
                );
                Some(pending.action)
            }
            _ => None,
        }
    }

    /// Due time of the next action, if any.
    pub fn next_due(&self) -> Option<f64> {
        self.pending.first().map(|p| p.at)
    }

    /// Remove everything, handing back the voices still awaiting disposal.
    pub fn drain_disposals(&mut self) -> Vec<VoiceId> {
        self.pending
            .drain(..)
            .filter_map(|p| match p.action {
                Deferred::Dispose { voice } => Some(voice),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
