use crate::error::ConfigError;
use crate::frame::{
    BarPlotFrame, DiagramFrame, DiagramKind, LinePlotFrame, PlotName, SeriesTransform,
};
use crate::value_handler::ValueHandler;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_WINDOW_MS: f64 = 10_000.0;
pub const DEFAULT_SAMPLE_PERIOD_MS: f64 = 20.0;
pub const DEFAULT_REFRESH_HZ: f64 = 30.0;
pub const MIN_REFRESH_HZ: f64 = 1.0;
pub const MIN_WINDOW_MS: f64 = 1.0;
pub const MAX_SAMPLE_PERIOD_MS: f64 = 60_000.0;

fn default_window_ms() -> f64 {
    DEFAULT_WINDOW_MS
}

fn default_sample_period_ms() -> f64 {
    DEFAULT_SAMPLE_PERIOD_MS
}

fn default_refresh_hz() -> f64 {
    DEFAULT_REFRESH_HZ
}

fn default_scale() -> f64 {
    1.0
}

fn default_loops() -> usize {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub offset: f64,
}

impl ChannelSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            scale: 1.0,
            offset: 0.0,
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn transform(&self) -> SeriesTransform {
        SeriesTransform {
            scale: self.scale,
            offset: self.offset,
        }
    }
}

/// Configuration of one logical plot. Its title and loop index form the
/// [`PlotName`] used for deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramConfig {
    pub title: String,
    #[serde(default)]
    pub kind: DiagramKind,
    #[serde(default)]
    pub loop_index: usize,
    pub channels: Vec<ChannelSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(default = "default_window_ms")]
    pub window_ms: f64,
    /// Producer period; filled from the layout's generator settings.
    #[serde(skip, default = "default_sample_period_ms")]
    pub sample_period_ms: f64,
}

impl DiagramConfig {
    pub fn new(title: &str, kind: DiagramKind, loop_index: usize, channels: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            kind,
            loop_index,
            channels: channels.iter().map(|name| ChannelSpec::new(name)).collect(),
            y_label: None,
            window_ms: DEFAULT_WINDOW_MS,
            sample_period_ms: DEFAULT_SAMPLE_PERIOD_MS,
        }
    }

    pub fn with_window_ms(mut self, window_ms: f64) -> Self {
        self.window_ms = window_ms;
        self
    }

    pub fn with_sample_period_ms(mut self, period_ms: f64) -> Self {
        self.sample_period_ms = period_ms;
        self
    }

    pub fn plot_name(&self) -> PlotName {
        PlotName::new(&self.title, self.loop_index)
    }

    /// Creates an uninitialized frame of the configured kind.
    pub fn build(&self) -> Box<dyn DiagramFrame> {
        match self.kind {
            DiagramKind::Line => Box::new(LinePlotFrame::new(self.clone())),
            DiagramKind::Bar => Box::new(BarPlotFrame::new(self.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: f64,
    #[serde(default = "default_true")]
    pub dark_theme: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            refresh_hz: DEFAULT_REFRESH_HZ,
            dark_theme: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_sample_period_ms")]
    pub period_ms: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_SAMPLE_PERIOD_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    #[default]
    Sine,
    Ramp,
    Constant,
}

/// A synthetic test signal written by the demo generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    pub channel: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_loops")]
    pub loops: usize,
    #[serde(default)]
    pub waveform: Waveform,
    #[serde(default = "default_scale")]
    pub amplitude: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default = "default_scale")]
    pub period_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Layout {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default, rename = "diagram")]
    pub diagrams: Vec<DiagramConfig>,
    #[serde(default, rename = "signal")]
    pub signals: Vec<SignalConfig>,
}

impl Layout {
    /// Reads a `.toml` or `.json` layout, normalizes and validates it.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let data = std::fs::read_to_string(path)?;
        let layout = match extension.as_str() {
            "toml" => Self::from_toml_str(&data)?,
            "json" => Self::from_json_str(&data)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        log::info!(
            "loaded layout {} with {} diagrams and {} signals",
            path.display(),
            layout.diagrams.len(),
            layout.signals.len()
        );
        Ok(layout)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        let layout: Layout = toml::from_str(data)?;
        let layout = layout.normalized();
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let layout: Layout = serde_json::from_str(data)?;
        let layout = layout.normalized();
        layout.validate()?;
        Ok(layout)
    }

    pub fn normalized(mut self) -> Self {
        let refresh = self.display.refresh_hz;
        self.display.refresh_hz = if refresh.is_finite() {
            refresh.max(MIN_REFRESH_HZ)
        } else {
            DEFAULT_REFRESH_HZ
        };
        if !self.generator.period_ms.is_finite() || self.generator.period_ms <= 0.0 {
            self.generator.period_ms = DEFAULT_SAMPLE_PERIOD_MS;
        }
        self.generator.period_ms = self.generator.period_ms.min(MAX_SAMPLE_PERIOD_MS);
        for diagram in &mut self.diagrams {
            diagram.title = diagram.title.trim().to_string();
            diagram.window_ms = if diagram.window_ms.is_finite() {
                diagram.window_ms.max(MIN_WINDOW_MS)
            } else {
                DEFAULT_WINDOW_MS
            };
            diagram.sample_period_ms = self.generator.period_ms;
        }
        for signal in &mut self.signals {
            signal.loops = signal.loops.max(1);
            if !signal.period_s.is_finite() || signal.period_s <= 0.0 {
                signal.period_s = 1.0;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for diagram in &self.diagrams {
            if diagram.title.is_empty() {
                return Err(ConfigError::Invalid("diagram without title".to_string()));
            }
            if diagram.channels.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "diagram '{}' has no channels",
                    diagram.title
                )));
            }
            if let Some(channel) = diagram
                .channels
                .iter()
                .find(|c| !c.scale.is_finite() || !c.offset.is_finite())
            {
                return Err(ConfigError::Invalid(format!(
                    "channel '{}' of '{}' has a non-finite transform",
                    channel.name, diagram.title
                )));
            }
        }
        let mut channels = HashSet::new();
        for signal in &self.signals {
            if signal.channel.trim().is_empty() {
                return Err(ConfigError::Invalid("signal without channel".to_string()));
            }
            if !channels.insert(signal.channel.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "channel '{}' is defined by more than one signal",
                    signal.channel
                )));
            }
        }
        Ok(())
    }

    /// Registers every signal channel with its loop count.
    pub fn register_channels(&self, handler: &ValueHandler) {
        for signal in &self.signals {
            handler.register_channel(&signal.channel, &signal.unit, signal.loops);
        }
    }

    /// Plot names that occur more than once, in layout order.
    pub fn duplicate_names(&self) -> Vec<PlotName> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for diagram in &self.diagrams {
            let name = diagram.plot_name();
            if !seen.insert(name.clone()) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }
}
