use crate::config::DiagramConfig;
use crate::error::FrameError;
use crate::frame::{
    BarView, DiagramFrame, DiagramKind, FrameCore, FrameState, PlotContent, PlotName, PlotView,
    SeriesTransform,
};
use crate::value_handler::ValueHandler;
use std::sync::Arc;

/// Current value of each configured channel at one loop, drawn as bars.
#[derive(Debug)]
pub struct BarPlotFrame {
    core: FrameCore,
    labels: Vec<(String, SeriesTransform)>,
    values: Vec<Option<f64>>,
    last_tick: Option<u64>,
}

impl BarPlotFrame {
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            core: FrameCore::new(config),
            labels: Vec::new(),
            values: Vec::new(),
            last_tick: None,
        }
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }
}

impl DiagramFrame for BarPlotFrame {
    fn init_plots(&mut self, source: Arc<ValueHandler>, index: usize) -> Result<(), FrameError> {
        self.core.bind(source, index)?;
        self.labels = self.core.series_specs();
        self.values = vec![None; self.labels.len()];
        Ok(())
    }

    fn update_plots(&mut self) -> Result<(), FrameError> {
        let sample = self
            .core
            .live_source()?
            .sample(&self.core.channel_names, self.core.config.loop_index);
        if sample.tick.is_none() {
            return Ok(());
        }
        self.values = sample
            .values
            .iter()
            .zip(&self.labels)
            .map(|(value, (_, transform))| value.map(|v| transform.apply(v)))
            .collect();
        self.last_tick = sample.tick;
        Ok(())
    }

    fn plot_name(&self) -> &PlotName {
        &self.core.name
    }

    fn state(&self) -> FrameState {
        self.core.state
    }

    fn kind(&self) -> DiagramKind {
        DiagramKind::Bar
    }

    fn close(&mut self) {
        self.core.close();
    }

    fn view(&self) -> PlotView {
        let bars = self
            .labels
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(idx, ((name, _), value))| BarView {
                name: name.clone(),
                color_index: idx,
                value: *value,
            })
            .collect();
        PlotView {
            title: self.core.name.to_string(),
            x_label: "channel".to_string(),
            y_label: self.core.y_label(),
            content: PlotContent::Bars(bars),
        }
    }
}
