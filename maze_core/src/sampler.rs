//! Background sensor sampling.
//!
//! One thread per sensor stream polls its probe on a fixed period and
//! publishes the latest value into lock-free slots. Readers never block and
//! may see a value up to one period old.
//!
//! Each `Sampler` owns exactly one thread, which is signalled and joined
//! when the `Sampler` is dropped. A stop request takes effect within one
//! period.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use maze_traits::clock::Clock;
use maze_traits::{AngleProbe, DistanceProbe, DistanceSensors, DistanceSnapshot, Gyro};

/// Reading published before the first successful sample ("nothing in range").
pub const NO_READING_CM: f64 = 255.0;

#[derive(Debug)]
struct F64Slot(AtomicU64);

impl F64Slot {
    fn new(v: f64) -> Self {
        Self(AtomicU64::new(v.to_bits()))
    }
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }
    fn store(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Release);
    }
}

/// Latest distances published by a distance sampler.
#[derive(Debug, Clone)]
pub struct SharedDistances {
    slots: Arc<[F64Slot; 3]>,
}

impl SharedDistances {
    fn new() -> Self {
        Self {
            slots: Arc::new([
                F64Slot::new(NO_READING_CM),
                F64Slot::new(NO_READING_CM),
                F64Slot::new(NO_READING_CM),
            ]),
        }
    }

    fn publish(&self, s: DistanceSnapshot) {
        self.slots[0].store(s.left);
        self.slots[1].store(s.front);
        self.slots[2].store(s.right);
    }
}

impl DistanceSensors for SharedDistances {
    fn distances(&self) -> DistanceSnapshot {
        DistanceSnapshot::new(
            self.slots[0].load(),
            self.slots[1].load(),
            self.slots[2].load(),
        )
    }
}

/// Latest heading published by a gyro sampler.
#[derive(Debug, Clone)]
pub struct SharedAngle {
    angle: Arc<F64Slot>,
    reset_requested: Arc<AtomicBool>,
}

impl SharedAngle {
    fn new() -> Self {
        Self {
            angle: Arc::new(F64Slot::new(0.0)),
            reset_requested: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Gyro for SharedAngle {
    fn orientation(&self) -> f64 {
        self.angle.load()
    }

    /// Zeroes the published angle now; the sampler resets the probe on its next tick.
    fn reset(&mut self) {
        self.reset_requested.store(true, Ordering::Release);
        self.angle.store(0.0);
    }
}

pub struct Sampler {
    name: &'static str,
    /// Shutdown flag checked once per period
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Sampler {
    fn spawn_loop<C, F>(name: &'static str, period: Duration, clock: C, mut tick: F) -> Self
    where
        C: Clock + Send + 'static,
        F: FnMut() + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!(sampler = name, "sampler thread received shutdown signal");
                    break;
                }
                let cycle_start = clock.now();
                tick();

                // Check shutdown before sleep to avoid an extra period of delay
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep_until_end_of_cycle(cycle_start, period);
            }
            tracing::trace!(sampler = name, "sampler thread exiting cleanly");
        });

        Self {
            name,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Poll `probe` every `period`; failed reads keep the previous values.
    pub fn spawn_distances<P, C>(mut probe: P, period: Duration, clock: C) -> (Self, SharedDistances)
    where
        P: DistanceProbe + Send + 'static,
        C: Clock + Send + 'static,
    {
        let shared = SharedDistances::new();
        let publish = shared.clone();
        let sampler = Self::spawn_loop("distances", period, clock, move || {
            match probe.read_distances() {
                Ok(s) => publish.publish(s),
                Err(e) => tracing::debug!(error = %e, "distance read failed, keeping last values"),
            }
        });
        (sampler, shared)
    }

    /// Poll `probe` every `period`, honouring reset requests from `SharedAngle::reset`.
    pub fn spawn_gyro<P, C>(mut probe: P, period: Duration, clock: C) -> (Self, SharedAngle)
    where
        P: AngleProbe + Send + 'static,
        C: Clock + Send + 'static,
    {
        let shared = SharedAngle::new();
        let angle = shared.angle.clone();
        let reset_requested = shared.reset_requested.clone();
        let sampler = Self::spawn_loop("gyro", period, clock, move || {
            if reset_requested.swap(false, Ordering::AcqRel) {
                if let Err(e) = probe.reset() {
                    tracing::warn!(error = %e, "gyro reset failed");
                }
            }
            match probe.read_angle() {
                Ok(a) => angle.store(a),
                Err(e) => tracing::debug!(error = %e, "gyro read failed, keeping last angle"),
            }
        });
        (sampler, shared)
    }

    /// Ask the thread to stop without waiting for it.
    pub fn request_stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.join_handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!(sampler = self.name, "sampler thread joined"),
                Err(e) => tracing::warn!(sampler = self.name, ?e, "sampler thread panicked during shutdown"),
            }
        }
    }
}
