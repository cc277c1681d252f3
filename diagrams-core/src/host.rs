use crate::config::DiagramConfig;
use crate::error::{FeedError, FrameError};
use crate::feed::{FeedReceiver, Tick};
use crate::registry::{FrameRegistry, OpenOutcome, UpdateReport};

#[derive(Debug)]
pub enum PollOutcome {
    /// No tick arrived since the last poll.
    Idle,
    Updated { tick: Tick, report: UpdateReport },
    /// The producer went away; reported once.
    ProducerStopped,
}

/// Registry plus the feed that tells it when to refresh.
///
/// Lives on the UI thread; [`DiagramHost::poll`] is called once per frame.
pub struct DiagramHost {
    registry: FrameRegistry,
    feed: FeedReceiver,
    last_tick: Option<Tick>,
    producer_connected: bool,
}

impl DiagramHost {
    pub fn new(registry: FrameRegistry, feed: FeedReceiver) -> Self {
        Self {
            registry,
            feed,
            last_tick: None,
            producer_connected: true,
        }
    }

    pub fn registry(&self) -> &FrameRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FrameRegistry {
        &mut self.registry
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    pub fn producer_connected(&self) -> bool {
        self.producer_connected
    }

    pub fn open(&mut self, config: &DiagramConfig) -> Result<OpenOutcome, FrameError> {
        self.registry.open(config)
    }

    /// Opens every diagram, returning each outcome in input order.
    pub fn open_all<'a>(
        &mut self,
        configs: impl IntoIterator<Item = &'a DiagramConfig>,
    ) -> Vec<Result<OpenOutcome, FrameError>> {
        configs
            .into_iter()
            .map(|config| self.registry.open(config))
            .collect()
    }

    /// Refreshes all frames if the producer committed since the last poll.
    pub fn poll(&mut self) -> PollOutcome {
        match self.feed.try_latest() {
            Ok(Some(tick)) => {
                self.last_tick = Some(tick);
                let report = self.registry.update_plots();
                PollOutcome::Updated { tick, report }
            }
            Ok(None) => PollOutcome::Idle,
            Err(FeedError::Disconnected) => {
                if self.producer_connected {
                    self.producer_connected = false;
                    log::info!("producer disconnected");
                    PollOutcome::ProducerStopped
                } else {
                    PollOutcome::Idle
                }
            }
        }
    }
}
