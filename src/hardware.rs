//! Accelerator memory sampling. A dedicated thread polls a probe on a fixed
//! interval while a generation runs; the orchestrator reads the collected
//! buffer only after `stop()` has joined the thread, so no locking is needed.

use crate::events::{EventSink, RunEvent};
use crate::score::round2;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Peak VRAM above this threshold is taken as evidence that an accelerator
/// actually held the model.
const GPU_DETECTED_THRESHOLD_MB: f64 = 500.0;

/// Source of "current accelerator memory usage" readings. The discovery
/// mechanics (NVML, perf counters, registry) live outside this crate.
pub trait MemoryProbe: Send + Sync {
    fn current_accelerator_memory_mb(&self) -> f64;
}

/// Probe for hosts without a usable accelerator probe. Always reads 0.
pub struct NullProbe;

impl MemoryProbe for NullProbe {
    fn current_accelerator_memory_mb(&self) -> f64 {
        0.0
    }
}

/// Fixed-value probe, for tests.
pub struct StaticProbe(pub f64);

impl MemoryProbe for StaticProbe {
    fn current_accelerator_memory_mb(&self) -> f64 {
        self.0
    }
}

/// Host description captured once per run and embedded in the result file.
/// Populated by an external discovery collaborator; `unknown()` is the
/// stand-in when none is wired up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub os: String,
    pub cpu: String,
    pub ram_total_gb: f64,
    pub gpu: Option<String>,
    pub vram_total_mb: Option<f64>,
    pub vram_used_mb: Option<f64>,
    pub date_utc: String,
}

impl SystemSnapshot {
    pub fn unknown() -> Self {
        SystemSnapshot {
            os: std::env::consts::OS.to_string(),
            cpu: "Unknown".to_string(),
            ram_total_gb: 0.0,
            gpu: None,
            vram_total_mb: None,
            vram_used_mb: None,
            date_utc: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// What one sampling session observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplerReading {
    pub peak_mb: f64,
    pub average_mb: f64,
    pub samples: usize,
}

impl SamplerReading {
    pub fn gpu_detected(&self) -> bool {
        self.peak_mb > GPU_DETECTED_THRESHOLD_MB
    }

    fn from_samples(peak: f64, samples: &[f64]) -> Self {
        let average_mb = if samples.is_empty() {
            0.0
        } else {
            round2(samples.iter().sum::<f64>() / samples.len() as f64)
        };
        SamplerReading {
            peak_mb: peak,
            average_mb,
            samples: samples.len(),
        }
    }
}

pub struct MemorySampler {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<(f64, Vec<f64>)>>,
    last: SamplerReading,
}

impl MemorySampler {
    /// Spawn the sampling thread. Every reading updates the running peak, is
    /// appended to the history, and is emitted as a live event.
    pub fn start(probe: Arc<dyn MemoryProbe>, interval: Duration, events: EventSink) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = std::thread::spawn(move || {
            let mut peak = 0.0_f64;
            let mut samples = Vec::new();
            while flag.load(Ordering::Relaxed) {
                let mb = probe.current_accelerator_memory_mb();
                if mb > peak {
                    peak = mb;
                }
                samples.push(mb);
                events.emit(RunEvent::MemorySample(mb));
                std::thread::sleep(interval);
            }
            (peak, samples)
        });
        MemorySampler {
            running,
            handle: Some(handle),
            last: SamplerReading::default(),
        }
    }

    /// Stop sampling and block until the thread has exited. Safe to call more
    /// than once; later calls return the reading from the first.
    pub fn stop(&mut self) -> SamplerReading {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let (peak, samples) = handle.join().unwrap_or((0.0, Vec::new()));
            self.last = SamplerReading::from_samples(peak, &samples);
        }
        self.last.clone()
    }
}

impl Drop for MemorySampler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_samples_average_to_zero() {
        let reading = SamplerReading::from_samples(0.0, &[]);
        assert_eq!(reading.average_mb, 0.0);
        assert_eq!(reading.samples, 0);
        assert!(!reading.gpu_detected());
    }

    #[test]
    fn average_is_rounded_mean() {
        let reading = SamplerReading::from_samples(1200.0, &[1000.0, 1100.0, 1200.0]);
        assert_eq!(reading.average_mb, 1100.0);
        assert_eq!(reading.peak_mb, 1200.0);
        assert!(reading.gpu_detected());
    }

    #[test]
    fn sampler_collects_and_stops() {
        let probe = Arc::new(StaticProbe(2048.0));
        let mut sampler =
            MemorySampler::start(probe, Duration::from_millis(5), EventSink::disabled());
        std::thread::sleep(Duration::from_millis(40));

        let reading = sampler.stop();
        assert!(reading.samples >= 1);
        assert_eq!(reading.peak_mb, 2048.0);
        assert_eq!(reading.average_mb, 2048.0);
        assert!(reading.gpu_detected());
    }

    #[test]
    fn stop_is_idempotent() {
        let probe = Arc::new(StaticProbe(100.0));
        let mut sampler =
            MemorySampler::start(probe, Duration::from_millis(5), EventSink::disabled());
        std::thread::sleep(Duration::from_millis(20));

        let first = sampler.stop();
        let second = sampler.stop();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn samples_are_emitted_as_events() {
        let (sink, mut rx) = crate::events::channel();
        let probe = Arc::new(StaticProbe(4096.0));
        let mut sampler = MemorySampler::start(probe, Duration::from_millis(5), sink);
        std::thread::sleep(Duration::from_millis(30));
        sampler.stop();

        let mut saw_sample = false;
        while let Ok(event) = rx.try_recv() {
            if let RunEvent::MemorySample(mb) = event {
                assert_eq!(mb, 4096.0);
                saw_sample = true;
            }
        }
        assert!(saw_sample);
    }

    #[test]
    fn null_probe_reads_zero() {
        assert_eq!(NullProbe.current_accelerator_memory_mb(), 0.0);
    }
}
