use crate::config::DiagramConfig;
use crate::error::FrameError;
use crate::frame::series::SeriesBuffer;
use crate::frame::{
    DiagramFrame, DiagramKind, FrameCore, FrameState, LineSeriesView, PlotBounds, PlotContent,
    PlotName, PlotView,
};
use crate::value_handler::ValueHandler;
use std::sync::Arc;

/// Time-series plot of the configured channels at one loop.
#[derive(Debug)]
pub struct LinePlotFrame {
    core: FrameCore,
    buffer: SeriesBuffer,
}

impl LinePlotFrame {
    pub fn new(config: DiagramConfig) -> Self {
        let buffer = SeriesBuffer::new(config.window_ms);
        Self {
            core: FrameCore::new(config),
            buffer,
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.buffer.window_ms()
    }

    /// Tick of the newest sample taken, if any.
    pub fn last_tick(&self) -> Option<u64> {
        self.buffer.last_tick()
    }

    pub fn point_count(&self) -> usize {
        self.buffer.series.iter().map(|s| s.points.len()).sum()
    }
}

impl DiagramFrame for LinePlotFrame {
    fn init_plots(&mut self, source: Arc<ValueHandler>, index: usize) -> Result<(), FrameError> {
        self.core.bind(source, index)?;
        let period_s = self.core.config.sample_period_ms / 1000.0;
        self.buffer.configure(self.core.series_specs(), period_s);
        log::debug!(
            "line frame {} bound to {} channels",
            self.core.name,
            self.core.channel_names.len()
        );
        Ok(())
    }

    fn update_plots(&mut self) -> Result<(), FrameError> {
        let sample = self
            .core
            .live_source()?
            .sample(&self.core.channel_names, self.core.config.loop_index);
        // Nothing has been committed yet.
        let Some(tick) = sample.tick else {
            return Ok(());
        };
        self.buffer.push(tick, sample.time_s, &sample.values);
        Ok(())
    }

    fn plot_name(&self) -> &PlotName {
        &self.core.name
    }

    fn state(&self) -> FrameState {
        self.core.state
    }

    fn kind(&self) -> DiagramKind {
        DiagramKind::Line
    }

    fn close(&mut self) {
        self.core.close();
    }

    fn view(&self) -> PlotView {
        let mut buffer = self.buffer.clone();
        buffer.flush_pending_bucket();
        let series = buffer
            .series
            .iter()
            .enumerate()
            .map(|(idx, series)| LineSeriesView {
                name: series.name.clone(),
                color_index: idx,
                points: series.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();
        let bounds = buffer
            .bounds()
            .map(|(min_x, max_x, min_y, max_y)| PlotBounds {
                min: [min_x, min_y],
                max: [max_x, max_y],
            });
        PlotView {
            title: self.core.name.to_string(),
            x_label: "time_s".to_string(),
            y_label: self.core.y_label(),
            content: PlotContent::Lines { series, bounds },
        }
    }
}
