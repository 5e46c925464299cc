/// Off-thread gesture classification
///
/// The render loop offers one sample per frame. The gate admits it only when
/// the worker is idle, so a slow classifier drops frames instead of queueing
/// them, and the inbox keeps whatever comes back in frame order.
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use burst3d_core::config::ControlConfig;
use burst3d_core::detection::Detection;
use burst3d_core::{DetectionGate, DetectionPermit, LandmarkSample, Observation, ResultInbox};
use tracing::{debug, warn};

struct Job {
    permit: DetectionPermit,
    sample: Option<LandmarkSample>,
}

pub struct DetectionWorker {
    gate: DetectionGate,
    jobs: Option<Sender<Job>>,
    results: Receiver<Detection>,
    inbox: ResultInbox,
    handle: Option<JoinHandle<()>>,
}

impl DetectionWorker {
    pub fn spawn(controls: ControlConfig) -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel::<Detection>();

        let handle = thread::Builder::new()
            .name("gesture-detector".into())
            .spawn(move || {
                for job in job_rx {
                    let detection = job.permit.classify(job.sample.as_ref(), &controls);
                    if result_tx.send(detection).is_err() {
                        break;
                    }
                }
                debug!("detector thread exiting");
            })
            .context("failed to spawn detector thread")?;

        Ok(Self {
            gate: DetectionGate::new(),
            jobs: Some(job_tx),
            results: result_rx,
            inbox: ResultInbox::new(),
            handle: Some(handle),
        })
    }

    /// Hand a sample to the worker. Returns false if it was dropped because
    /// a classification is still running.
    pub fn offer(&self, sample: Option<LandmarkSample>) -> bool {
        let Some(permit) = self.gate.try_admit() else {
            return false;
        };
        let Some(jobs) = &self.jobs else {
            return false;
        };
        // A failed send drops the permit along with the job, reopening the gate
        if jobs.send(Job { permit, sample }).is_err() {
            warn!("detector thread is gone, dropping sample");
            return false;
        }
        true
    }

    /// Everything classified since the last call, oldest first, stale
    /// results removed.
    pub fn drain(&mut self) -> Vec<Observation> {
        let mut fresh = Vec::new();
        loop {
            match self.results.try_recv() {
                Ok(detection) => fresh.extend(self.inbox.accept(detection)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        fresh
    }

    pub fn dropped(&self) -> u64 {
        self.gate.dropped()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }
}

impl Drop for DetectionWorker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("detector thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burst3d_core::{GestureCategory, HandPose};
    use nalgebra::Point2;
    use std::time::{Duration, Instant};

    fn wait_for(worker: &mut DetectionWorker) -> Vec<Observation> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let results = worker.drain();
            if !results.is_empty() || Instant::now() > deadline {
                return results;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_classifies_offered_sample() {
        let mut worker = DetectionWorker::spawn(ControlConfig::default()).unwrap();
        let sample = HandPose::OpenPalm.sample(Point2::new(0.5, 0.5), 0.2);
        assert!(worker.offer(Some(sample)));

        let results = wait_for(&mut worker);
        assert_eq!(results.len(), 1);
        match results[0] {
            Observation::Hand { raw, .. } => assert_eq!(raw, GestureCategory::OpenPalm),
            other => panic!("expected a hand, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_hand_comes_back_as_no_hand() {
        let mut worker = DetectionWorker::spawn(ControlConfig::default()).unwrap();
        assert!(worker.offer(None));
        assert_eq!(wait_for(&mut worker), vec![Observation::NoHand]);
    }

    #[test]
    fn test_gate_reopens_after_result() {
        let mut worker = DetectionWorker::spawn(ControlConfig::default()).unwrap();
        assert!(worker.offer(None));
        wait_for(&mut worker);
        let deadline = Instant::now() + Duration::from_secs(5);
        while worker.is_busy() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(worker.offer(None));
    }
}
