//! Hand-off of "new data available" notifications from a producer thread to
//! the thread that owns the frames.

use crate::error::FeedError;
use crate::value_handler::ValueHandler;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub tick: u64,
    pub time_s: f64,
}

/// Producer side: writes into the shared handler and announces commits.
#[derive(Debug, Clone)]
pub struct FeedSender {
    handler: Arc<ValueHandler>,
    sender: Sender<Tick>,
}

/// Consumer side, polled once per UI frame.
#[derive(Debug)]
pub struct FeedReceiver {
    receiver: Receiver<Tick>,
}

pub fn channel(handler: Arc<ValueHandler>) -> (FeedSender, FeedReceiver) {
    let (sender, receiver) = mpsc::channel();
    (FeedSender { handler, sender }, FeedReceiver { receiver })
}

impl FeedSender {
    pub fn handler(&self) -> &ValueHandler {
        &self.handler
    }

    pub fn set(&self, channel: &str, loop_index: usize, value: f64) -> bool {
        self.handler.set(channel, loop_index, value)
    }

    /// Stamps the staged values and notifies the receiver.
    pub fn commit(&self, tick: u64, time_s: f64) -> Result<(), FeedError> {
        self.handler.commit(tick, time_s);
        self.sender
            .send(Tick { tick, time_s })
            .map_err(|_| FeedError::Disconnected)
    }
}

impl FeedReceiver {
    /// Drains every queued tick and returns the newest one.
    ///
    /// Returns `Err(Disconnected)` only once the producer is gone and the
    /// queue is empty.
    pub fn try_latest(&self) -> Result<Option<Tick>, FeedError> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(tick) => latest = Some(tick),
                Err(TryRecvError::Empty) => return Ok(latest),
                Err(TryRecvError::Disconnected) => {
                    return match latest {
                        Some(tick) => Ok(Some(tick)),
                        None => Err(FeedError::Disconnected),
                    }
                }
            }
        }
    }
}
