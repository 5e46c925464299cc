/// Detection backpressure and result ordering
///
/// The hand tracker may deliver frames faster than they can be classified.
/// [`DetectionGate`] admits one classification at a time and drops the rest;
/// [`ResultInbox`] discards results that arrive after a newer one was applied.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::ControlConfig;
use crate::gesture::{classify, GestureCategory};
use crate::landmarks::{ControlTargets, LandmarkSample};

/// What one detection cycle saw, before debouncing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    NoHand,
    Hand {
        raw: GestureCategory,
        targets: ControlTargets,
    },
}

impl Observation {
    /// Classify a tracker sample. Missing or short samples are `NoHand`.
    pub fn from_sample(sample: Option<&LandmarkSample>, controls: &ControlConfig) -> Self {
        let Some(sample) = sample else {
            return Observation::NoHand;
        };
        match ControlTargets::from_sample(sample, controls) {
            Some(targets) => Observation::Hand {
                raw: classify(sample),
                targets,
            },
            None => Observation::NoHand,
        }
    }
}

/// Monotonic frame number assigned when a sample is admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameStamp(pub u64);

/// A classified frame travelling back to the tick loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub stamp: FrameStamp,
    pub observation: Observation,
}

/// Admits at most one in-flight classification
#[derive(Debug, Clone, Default)]
pub struct DetectionGate {
    busy: Arc<AtomicBool>,
    next_stamp: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
}

/// Proof of admission; releases the gate when dropped
#[derive(Debug)]
pub struct DetectionPermit {
    busy: Arc<AtomicBool>,
    stamp: FrameStamp,
}

impl DetectionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate for one sample, or `None` (sample dropped) if a
    /// classification is already running.
    pub fn try_admit(&self) -> Option<DetectionPermit> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            trace!(dropped, "detection in flight, dropping sample");
            return None;
        }
        let stamp = FrameStamp(self.next_stamp.fetch_add(1, Ordering::Relaxed));
        Some(DetectionPermit {
            busy: Arc::clone(&self.busy),
            stamp,
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Samples turned away so far
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl DetectionPermit {
    pub fn stamp(&self) -> FrameStamp {
        self.stamp
    }

    /// Classify under this permit; the gate reopens when the result is built.
    pub fn classify(self, sample: Option<&LandmarkSample>, controls: &ControlConfig) -> Detection {
        Detection {
            stamp: self.stamp,
            observation: Observation::from_sample(sample, controls),
        }
    }
}

impl Drop for DetectionPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Single-consumer filter that keeps results in frame order
#[derive(Debug, Default)]
pub struct ResultInbox {
    newest: Option<FrameStamp>,
}

impl ResultInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a detection unless a newer one has already been accepted.
    pub fn accept(&mut self, detection: Detection) -> Option<Observation> {
        if let Some(newest) = self.newest {
            if detection.stamp <= newest {
                debug!(stale = detection.stamp.0, newest = newest.0, "dropping stale detection");
                return None;
            }
        }
        self.newest = Some(detection.stamp);
        Some(detection.observation)
    }
}
