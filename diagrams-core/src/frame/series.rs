use std::collections::VecDeque;

const MIN_POINTS: usize = 200;
const TARGET_POINTS: usize = 12_000;

/// Linear transformation applied to a channel before display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesTransform {
    pub scale: f64,
    pub offset: f64,
}

impl Default for SeriesTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

impl SeriesTransform {
    pub fn apply(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }
}

/// One displayed channel: legend name and `(time_s, value)` points.
#[derive(Debug, Clone)]
pub(crate) struct TimeSeries {
    pub name: String,
    pub transform: SeriesTransform,
    pub points: VecDeque<(f64, f64)>,
}

/// Min/max of the samples aggregated into the current bucket.
#[derive(Debug, Clone, Copy, Default)]
struct SeriesMinMax {
    min: Option<(f64, f64)>,
    max: Option<(f64, f64)>,
}

impl SeriesMinMax {
    fn record(&mut self, point: (f64, f64)) {
        self.min = Some(match self.min {
            Some(prev) if prev.1 <= point.1 => prev,
            _ => point,
        });
        self.max = Some(match self.max {
            Some(prev) if prev.1 >= point.1 => prev,
            _ => point,
        });
    }

    /// Emits the bucket extrema in time order, once if they coincide.
    fn drain_into(&mut self, points: &mut VecDeque<(f64, f64)>) {
        match (self.min.take(), self.max.take()) {
            (Some(a), Some(b)) => {
                let (first, second) = if a.0 <= b.0 { (a, b) } else { (b, a) };
                points.push_back(first);
                if first != second {
                    points.push_back(second);
                }
            }
            (Some(a), None) | (None, Some(a)) => points.push_back(a),
            (None, None) => {}
        }
    }
}

/// Rolling time window of samples for a set of series.
///
/// When the expected number of samples in the window exceeds the point cap,
/// samples are grouped into buckets and only each bucket's minimum and
/// maximum are kept, so spikes survive decimation.
#[derive(Debug, Clone)]
pub(crate) struct SeriesBuffer {
    pub(crate) series: Vec<TimeSeries>,
    window_ms: f64,
    max_points: usize,
    max_points_effective: usize,
    bucket_size: u64,
    bucket_count: u64,
    bucket_minmax: Vec<SeriesMinMax>,
    last_tick: Option<u64>,
    last_time_s: Option<f64>,
}

impl SeriesBuffer {
    pub(crate) fn new(window_ms: f64) -> Self {
        Self {
            series: Vec::new(),
            window_ms: if window_ms <= 0.0 { 1.0 } else { window_ms },
            max_points: MIN_POINTS,
            max_points_effective: MIN_POINTS,
            bucket_size: 1,
            bucket_count: 0,
            bucket_minmax: Vec::new(),
            last_tick: None,
            last_time_s: None,
        }
    }

    /// Sets up one series per `(name, transform)` and derives decimation from
    /// the producer period. Drops any buffered points.
    pub(crate) fn configure(&mut self, series: Vec<(String, SeriesTransform)>, period_s: f64) {
        let period_s = period_s.max(0.0);
        let expected_points = if period_s > 0.0 {
            (self.window_ms / (period_s * 1000.0)).ceil() as usize
        } else {
            0
        };
        self.max_points = if expected_points == 0 {
            MIN_POINTS
        } else {
            expected_points.clamp(MIN_POINTS, TARGET_POINTS)
        };
        self.bucket_size = if expected_points > self.max_points {
            expected_points.div_ceil(self.max_points) as u64
        } else {
            1
        };
        self.bucket_count = 0;
        self.max_points_effective = if self.bucket_size > 1 {
            self.max_points.saturating_mul(2)
        } else {
            self.max_points
        };
        self.bucket_minmax = vec![SeriesMinMax::default(); series.len()];
        self.series = series
            .into_iter()
            .map(|(name, transform)| TimeSeries {
                name,
                transform,
                points: VecDeque::new(),
            })
            .collect();
        self.last_tick = None;
        self.last_time_s = None;
    }

    pub(crate) fn window_ms(&self) -> f64 {
        self.window_ms
    }

    #[cfg(test)]
    pub(crate) fn bucket_size(&self) -> u64 {
        self.bucket_size
    }

    pub(crate) fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    /// Appends one sample. A repeated tick is ignored; a time that runs
    /// backwards means the producer restarted and clears the window.
    /// Returns whether the sample was taken.
    pub(crate) fn push(&mut self, tick: u64, time_s: f64, values: &[Option<f64>]) -> bool {
        if self.last_tick == Some(tick) {
            return false;
        }
        if matches!(self.last_time_s, Some(prev) if time_s < prev) {
            self.clear();
        }
        self.last_tick = Some(tick);
        self.last_time_s = Some(time_s);

        if self.bucket_size == 1 {
            for (series, value) in self.series.iter_mut().zip(values) {
                if let Some(value) = value {
                    series.points.push_back((time_s, series.transform.apply(*value)));
                }
            }
        } else {
            for ((entry, series), value) in
                self.bucket_minmax.iter_mut().zip(&self.series).zip(values)
            {
                if let Some(value) = value {
                    entry.record((time_s, series.transform.apply(*value)));
                }
            }
            self.bucket_count += 1;
            if self.bucket_count >= self.bucket_size {
                self.flush_pending_bucket();
            }
        }
        self.prune_old(time_s);
        true
    }

    pub(crate) fn flush_pending_bucket(&mut self) {
        if self.bucket_size <= 1 || self.bucket_count == 0 {
            return;
        }
        self.bucket_count = 0;
        for (entry, series) in self.bucket_minmax.iter_mut().zip(&mut self.series) {
            entry.drain_into(&mut series.points);
        }
    }

    fn clear(&mut self) {
        for series in &mut self.series {
            series.points.clear();
        }
        self.bucket_count = 0;
        for entry in &mut self.bucket_minmax {
            *entry = SeriesMinMax::default();
        }
    }

    fn prune_old(&mut self, now_s: f64) {
        let min_time = now_s - self.window_ms / 1000.0;
        for series in &mut self.series {
            while let Some((t, _)) = series.points.front().copied() {
                if t >= min_time {
                    break;
                }
                series.points.pop_front();
            }
            while series.points.len() > self.max_points_effective {
                series.points.pop_front();
            }
        }
    }

    /// Returns `(min_time, max_time, min_y, max_y)` over the visible window,
    /// or `None` before the first sample.
    pub(crate) fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let max_time = self.last_time_s?;
        let min_time = max_time - self.window_ms / 1000.0;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for series in &self.series {
            for (t, y) in &series.points {
                if *t < min_time || *t > max_time {
                    continue;
                }
                min_y = min_y.min(*y);
                max_y = max_y.max(*y);
            }
        }
        if min_y.is_infinite() || max_y.is_infinite() {
            return Some((min_time, max_time, -1.0, 1.0));
        }
        if min_y == max_y {
            min_y -= 1.0;
            max_y += 1.0;
        } else {
            let pad = (max_y - min_y) * 0.05;
            min_y -= pad;
            max_y += pad;
        }
        Some((min_time, max_time, min_y, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::{SeriesBuffer, SeriesTransform};

    fn single(window_ms: f64, period_s: f64) -> SeriesBuffer {
        let mut buffer = SeriesBuffer::new(window_ms);
        buffer.configure(vec![("in".to_string(), SeriesTransform::default())], period_s);
        buffer
    }

    #[test]
    fn high_rate_window_uses_bucketing() {
        let buffer = single(50_000.0, 0.0001);
        assert!(buffer.bucket_size() > 1);
        assert!(buffer.max_points_effective <= 2 * 12_000);
    }

    #[test]
    fn repeated_tick_is_ignored() {
        let mut buffer = single(1_000.0, 0.01);
        assert!(buffer.push(1, 0.01, &[Some(2.0)]));
        assert!(!buffer.push(1, 0.01, &[Some(3.0)]));
        assert_eq!(buffer.series[0].points.len(), 1);
        assert_eq!(buffer.series[0].points[0], (0.01, 2.0));
    }

    #[test]
    fn old_points_leave_the_window() {
        let mut buffer = single(100.0, 0.01);
        for tick in 0..50u64 {
            buffer.push(tick, tick as f64 * 0.01, &[Some(tick as f64)]);
        }
        let points = &buffer.series[0].points;
        let (first_t, _) = points.front().copied().expect("points");
        assert!(first_t >= 0.49 - 0.1 - 1e-9);
    }

    #[test]
    fn bucket_keeps_extrema() {
        let mut buffer = single(50_000.0, 0.0001);
        let size = buffer.bucket_size();
        for tick in 0..size {
            let value = if tick == 1 { 100.0 } else { 0.0 };
            buffer.push(tick, tick as f64 * 0.0001, &[Some(value)]);
        }
        let max = buffer.series[0]
            .points
            .iter()
            .map(|(_, y)| *y)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max, 100.0);
    }

    #[test]
    fn flat_series_gets_unit_padding() {
        let mut buffer = single(1_000.0, 0.01);
        buffer.push(0, 0.0, &[Some(5.0)]);
        buffer.push(1, 0.01, &[Some(5.0)]);
        let (_, _, min_y, max_y) = buffer.bounds().expect("bounds");
        assert_eq!((min_y, max_y), (4.0, 6.0));
    }

    #[test]
    fn time_going_backwards_clears() {
        let mut buffer = single(1_000.0, 0.01);
        buffer.push(5, 0.5, &[Some(1.0)]);
        buffer.push(1, 0.01, &[Some(2.0)]);
        assert_eq!(buffer.series[0].points.len(), 1);
        assert_eq!(buffer.series[0].points[0], (0.01, 2.0));
    }
}
