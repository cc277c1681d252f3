use diagrams_core::config::{SignalConfig, Waveform, DEFAULT_SAMPLE_PERIOD_MS};
use diagrams_core::feed::FeedSender;
use diagrams_core::{FeedError, Layout};
use std::f64::consts::PI;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Writes synthetic test signals into the value handler at a fixed period.
///
/// Each loop of a channel gets its own phase so loops are distinguishable.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    signals: Vec<SignalConfig>,
    period: Duration,
}

impl SignalGenerator {
    pub fn new(layout: &Layout) -> Self {
        Self {
            signals: layout.signals.clone(),
            period: Duration::try_from_secs_f64(layout.generator.period_ms / 1000.0)
                .unwrap_or(Duration::from_millis(DEFAULT_SAMPLE_PERIOD_MS as u64)),
        }
    }

    pub fn value(signal: &SignalConfig, loop_index: usize, time_s: f64) -> f64 {
        let phase = loop_index as f64 * PI / 4.0;
        match signal.waveform {
            Waveform::Sine => {
                let angle = 2.0 * PI * time_s / signal.period_s + phase;
                signal.offset + signal.amplitude * angle.sin()
            }
            Waveform::Ramp => {
                let cycles = time_s / signal.period_s + phase / (2.0 * PI);
                signal.offset + signal.amplitude * cycles.fract()
            }
            Waveform::Constant => signal.offset,
        }
    }

    /// Writes every signal for `tick` and commits it.
    pub fn step(&self, sender: &FeedSender, tick: u64) -> Result<(), FeedError> {
        let time_s = tick as f64 * self.period.as_secs_f64();
        for signal in &self.signals {
            for loop_index in 0..signal.loops {
                sender.set(&signal.channel, loop_index, Self::value(signal, loop_index, time_s));
            }
        }
        sender.commit(tick, time_s)
    }

    /// Runs on its own thread until the receiver goes away.
    pub fn spawn(self, sender: FeedSender) -> JoinHandle<()> {
        thread::spawn(move || {
            let mut tick = 0u64;
            loop {
                if let Err(err) = self.step(&sender, tick) {
                    log::info!("signal generator stopped after {tick} ticks: {err}");
                    break;
                }
                tick += 1;
                thread::sleep(self.period);
            }
        })
    }
}
