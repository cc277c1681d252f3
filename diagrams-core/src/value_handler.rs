use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Metadata and latest per-loop values of one measured quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub unit: String,
    pub values: Vec<f64>,
}

impl Channel {
    pub fn loop_count(&self) -> usize {
        self.values.len()
    }
}

/// Immutable copy of the handler contents at one commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSnapshot {
    pub tick: Option<u64>,
    pub time_s: f64,
    pub channels: HashMap<String, Channel>,
}

impl ValueSnapshot {
    pub fn value(&self, channel: &str, loop_index: usize) -> Option<f64> {
        self.channels
            .get(channel)
            .and_then(|c| c.values.get(loop_index))
            .copied()
    }
}

/// Shared store of named channels written by a producer and read by frames.
///
/// Each channel holds a fixed number of loops. Writes stage values; `commit`
/// publishes the staged values together with the tick and time. Readers only
/// ever see published data.
#[derive(Debug, Default)]
pub struct ValueHandler {
    inner: RwLock<Store>,
}

#[derive(Debug, Default)]
struct Store {
    published: ValueSnapshot,
    staged: HashMap<String, Vec<f64>>,
}

impl ValueHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a channel, or resizes an existing one to `loops` entries.
    pub fn register_channel(&self, name: &str, unit: &str, loops: usize) {
        let mut inner = self.write();
        let channel = inner
            .published
            .channels
            .entry(name.to_string())
            .or_insert_with(|| Channel {
                unit: unit.to_string(),
                values: Vec::new(),
            });
        channel.unit = unit.to_string();
        channel.values.resize(loops, 0.0);
        let staged = channel.values.clone();
        inner
            .staged
            .entry(name.to_string())
            .or_insert(staged)
            .resize(loops, 0.0);
    }

    /// Stages a value for the next commit. Returns false when the channel or
    /// loop does not exist.
    pub fn set(&self, name: &str, loop_index: usize, value: f64) -> bool {
        let mut inner = self.write();
        match inner
            .staged
            .get_mut(name)
            .and_then(|values| values.get_mut(loop_index))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Publishes every staged value stamped with `tick` and `time_s`.
    pub fn commit(&self, tick: u64, time_s: f64) {
        let mut inner = self.write();
        let Store { published, staged } = &mut *inner;
        for (name, values) in staged.iter() {
            if let Some(channel) = published.channels.get_mut(name) {
                channel.values.copy_from_slice(values);
            }
        }
        published.tick = Some(tick);
        published.time_s = time_s;
    }

    pub fn value(&self, name: &str, loop_index: usize) -> Option<f64> {
        self.read().published.value(name, loop_index)
    }

    pub fn loop_count(&self, name: &str) -> Option<usize> {
        self.read()
            .published
            .channels
            .get(name)
            .map(Channel::loop_count)
    }

    pub fn unit(&self, name: &str) -> Option<String> {
        self.read().published.channels.get(name).map(|c| c.unit.clone())
    }

    pub fn tick(&self) -> Option<u64> {
        self.read().published.tick
    }

    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().published.channels.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn snapshot(&self) -> ValueSnapshot {
        self.read().published.clone()
    }

    /// Copies the values of `channels` at `loop_index` together with the
    /// current tick and time, without cloning the whole store.
    pub fn sample(&self, channels: &[String], loop_index: usize) -> Sample {
        let inner = self.read();
        let published = &inner.published;
        Sample {
            tick: published.tick,
            time_s: published.time_s,
            values: channels
                .iter()
                .map(|name| published.value(name, loop_index))
                .collect(),
        }
    }
}

/// Values of selected channels at a single loop, taken under one read lock.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub tick: Option<u64>,
    pub time_s: f64,
    pub values: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::ValueHandler;

    #[test]
    fn set_rejects_unknown_loop() {
        let handler = ValueHandler::new();
        handler.register_channel("coolant_temp", "degC", 2);
        assert!(handler.set("coolant_temp", 1, 280.0));
        assert!(!handler.set("coolant_temp", 2, 280.0));
        assert!(!handler.set("missing", 0, 1.0));
        handler.commit(1, 0.02);
        assert_eq!(handler.value("coolant_temp", 1), Some(280.0));
    }

    #[test]
    fn register_resizes_existing_channel() {
        let handler = ValueHandler::new();
        handler.register_channel("flow", "kg/s", 1);
        handler.set("flow", 0, 4.0);
        handler.commit(1, 0.02);
        handler.register_channel("flow", "kg/s", 3);
        assert_eq!(handler.loop_count("flow"), Some(3));
        assert_eq!(handler.value("flow", 0), Some(4.0));
    }

    #[test]
    fn sample_reads_one_loop() {
        let handler = ValueHandler::new();
        handler.register_channel("a", "", 2);
        handler.register_channel("b", "", 2);
        handler.set("a", 1, 1.5);
        handler.set("b", 1, -2.0);
        handler.commit(7, 0.7);
        let sample = handler.sample(&["a".to_string(), "b".to_string(), "c".to_string()], 1);
        assert_eq!(sample.tick, Some(7));
        assert_eq!(sample.values, vec![Some(1.5), Some(-2.0), None]);
    }

    #[test]
    fn staged_values_stay_hidden_until_commit() {
        let handler = ValueHandler::new();
        handler.register_channel("coolant_temp", "degC", 1);
        handler.set("coolant_temp", 0, 1.0);
        handler.commit(1, 0.1);

        handler.set("coolant_temp", 0, 999.0);
        let channels = ["coolant_temp".to_string()];
        let sample = handler.sample(&channels, 0);
        assert_eq!(sample.tick, Some(1));
        assert_eq!(sample.time_s, 0.1);
        assert_eq!(sample.values, vec![Some(1.0)]);
        assert_eq!(handler.snapshot().value("coolant_temp", 0), Some(1.0));

        handler.commit(2, 0.2);
        assert_eq!(handler.sample(&channels, 0).values, vec![Some(999.0)]);
    }
}
