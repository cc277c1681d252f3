//! Diagram frames: the windows that plot values pulled from a [`ValueHandler`].
//!
//! A frame goes through `Uninitialized -> Live -> Closed`. It is bound to a
//! data source once with [`DiagramFrame::init_plots`], refreshed any number of
//! times with [`DiagramFrame::update_plots`], and identified for its whole
//! lifetime by [`DiagramFrame::plot_name`].

pub mod bar;
pub mod line;
pub(crate) mod series;

pub use bar::BarPlotFrame;
pub use line::LinePlotFrame;
pub use series::SeriesTransform;

use crate::config::{ChannelSpec, DiagramConfig};
use crate::error::FrameError;
use crate::value_handler::ValueHandler;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable identifier used to deduplicate open frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlotName(String);

impl PlotName {
    pub fn new(title: &str, loop_index: usize) -> Self {
        Self(format!("{title}#{loop_index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlotName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Uninitialized,
    Live,
    Closed,
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FrameState::Uninitialized => "uninitialized",
            FrameState::Live => "live",
            FrameState::Closed => "closed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    #[default]
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeriesView {
    pub name: String,
    pub color_index: usize,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarView {
    pub name: String,
    pub color_index: usize,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlotContent {
    Lines {
        series: Vec<LineSeriesView>,
        bounds: Option<PlotBounds>,
    },
    Bars(Vec<BarView>),
}

/// Render-ready contents of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotView {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub content: PlotContent,
}

impl PlotView {
    pub fn is_empty(&self) -> bool {
        match &self.content {
            PlotContent::Lines { series, .. } => series.iter().all(|s| s.points.is_empty()),
            PlotContent::Bars(bars) => bars.iter().all(|b| b.value.is_none()),
        }
    }
}

/// A window that plots values from a shared [`ValueHandler`].
///
/// All methods are expected to run on the UI thread. Producers hand values
/// over through the handler and notify through [`crate::feed`].
pub trait DiagramFrame: Send {
    /// Binds the frame to `source` and selects loop `index`.
    ///
    /// Fails with [`FrameError::InvalidArgument`] when the source lacks a
    /// configured channel or loop, or when `index` is not the loop the frame
    /// was named after. A second call fails with
    /// [`FrameError::AlreadyInitialized`] and keeps the first binding.
    fn init_plots(&mut self, source: Arc<ValueHandler>, index: usize) -> Result<(), FrameError>;

    /// Pulls the current values from the bound source into the plot data.
    fn update_plots(&mut self) -> Result<(), FrameError>;

    fn plot_name(&self) -> &PlotName;

    fn state(&self) -> FrameState;

    fn kind(&self) -> DiagramKind;

    fn close(&mut self);

    fn view(&self) -> PlotView;
}

/// Binding and lifecycle bookkeeping shared by the concrete frames.
#[derive(Debug)]
pub(crate) struct FrameCore {
    pub(crate) config: DiagramConfig,
    pub(crate) name: PlotName,
    pub(crate) state: FrameState,
    pub(crate) source: Option<Arc<ValueHandler>>,
    pub(crate) channel_names: Vec<String>,
}

impl FrameCore {
    pub(crate) fn new(config: DiagramConfig) -> Self {
        let name = config.plot_name();
        let channel_names = config.channels.iter().map(|c| c.name.clone()).collect();
        Self {
            config,
            name,
            state: FrameState::Uninitialized,
            source: None,
            channel_names,
        }
    }

    /// Validates `source` and `index` and moves to `Live`.
    pub(crate) fn bind(
        &mut self,
        source: Arc<ValueHandler>,
        index: usize,
    ) -> Result<(), FrameError> {
        match self.state {
            FrameState::Uninitialized => {}
            FrameState::Live => return Err(FrameError::AlreadyInitialized(self.name.clone())),
            FrameState::Closed => return Err(self.invalid_state()),
        }
        if index != self.config.loop_index {
            return Err(FrameError::InvalidArgument(format!(
                "index {index} does not match loop {} of {}",
                self.config.loop_index, self.name
            )));
        }
        if self.channel_names.is_empty() {
            return Err(FrameError::InvalidArgument(format!(
                "{} has no channels",
                self.name
            )));
        }
        for channel in &self.channel_names {
            match source.loop_count(channel) {
                None => {
                    return Err(FrameError::InvalidArgument(format!(
                        "data source has no channel '{channel}'"
                    )))
                }
                Some(loops) if index >= loops => {
                    return Err(FrameError::InvalidArgument(format!(
                        "channel '{channel}' has {loops} loops, index {index} is out of range"
                    )))
                }
                Some(_) => {}
            }
        }
        self.source = Some(source);
        self.state = FrameState::Live;
        Ok(())
    }

    /// The bound source, or `InvalidState` when the frame is not live.
    pub(crate) fn live_source(&self) -> Result<&ValueHandler, FrameError> {
        match (&self.state, &self.source) {
            (FrameState::Live, Some(source)) => Ok(source),
            _ => Err(self.invalid_state()),
        }
    }

    pub(crate) fn close(&mut self) {
        self.state = FrameState::Closed;
        self.source = None;
    }

    pub(crate) fn invalid_state(&self) -> FrameError {
        FrameError::InvalidState {
            name: self.name.clone(),
            state: self.state,
        }
    }

    /// Legend names with duplicate labels numbered, plus each transform.
    pub(crate) fn series_specs(&self) -> Vec<(String, SeriesTransform)> {
        let labels = series_labels(&self.config.channels);
        labels
            .into_iter()
            .zip(&self.config.channels)
            .map(|(label, channel)| (label, channel.transform()))
            .collect()
    }

    pub(crate) fn y_label(&self) -> String {
        if let Some(label) = &self.config.y_label {
            return label.clone();
        }
        let unit = self
            .source
            .as_ref()
            .zip(self.channel_names.first())
            .and_then(|(source, name)| source.unit(name))
            .unwrap_or_default();
        if unit.is_empty() {
            "value".to_string()
        } else {
            unit
        }
    }
}

fn series_labels(channels: &[ChannelSpec]) -> Vec<String> {
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    channels
        .iter()
        .map(|channel| {
            let name = channel.display_label().to_string();
            let entry = counts.entry(name.clone()).or_insert(0);
            *entry += 1;
            if *entry == 1 {
                name
            } else {
                format!("{name} ({})", *entry)
            }
        })
        .collect()
}
