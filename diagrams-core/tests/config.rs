use diagrams_core::config::{Waveform, MAX_SAMPLE_PERIOD_MS};
use diagrams_core::{ConfigError, DiagramKind, Layout, PlotName, ValueHandler};

const LAYOUT_TOML: &str = r#"
[display]
refresh_hz = 0.2

[generator]
period_ms = 10.0

[[signal]]
channel = "coolant_temp"
unit = "degC"
loops = 2
amplitude = 5.0
offset = 280.0

[[signal]]
channel = "rod_position"
waveform = "ramp"

[[diagram]]
title = " LoopTemp "
loop_index = 1
channels = [{ name = "coolant_temp", label = "T" }]

[[diagram]]
title = "Rods"
kind = "bar"
window_ms = -5.0
channels = [{ name = "rod_position", scale = 100.0 }]
"#;

#[test]
fn load_toml_layout_normalizes_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("layout.toml");
    std::fs::write(&path, LAYOUT_TOML).expect("write layout");

    let layout = Layout::load_from_file(&path).expect("load layout");
    assert_eq!(layout.display.refresh_hz, 1.0);
    assert!(layout.display.dark_theme);
    assert_eq!(layout.diagrams.len(), 2);
    assert_eq!(layout.diagrams[0].plot_name(), PlotName::new("LoopTemp", 1));
    assert_eq!(layout.diagrams[0].kind, DiagramKind::Line);
    assert_eq!(layout.diagrams[0].sample_period_ms, 10.0);
    assert_eq!(layout.diagrams[1].kind, DiagramKind::Bar);
    assert_eq!(layout.diagrams[1].window_ms, 1.0);
    assert_eq!(layout.diagrams[1].channels[0].scale, 100.0);
    assert_eq!(layout.signals[1].waveform, Waveform::Ramp);
    assert_eq!(layout.signals[1].loops, 1);

    let handler = ValueHandler::new();
    layout.register_channels(&handler);
    assert_eq!(handler.loop_count("coolant_temp"), Some(2));
    assert_eq!(handler.unit("coolant_temp").as_deref(), Some("degC"));
}

#[test]
fn load_json_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("layout.json");
    std::fs::write(
        &path,
        r#"{"diagram": [{"title": "Flow", "channels": [{"name": "coolant_flow"}]}]}"#,
    )
    .expect("write layout");
    let layout = Layout::load_from_file(&path).expect("load layout");
    assert_eq!(layout.diagrams[0].window_ms, 10_000.0);
    assert!(layout.signals.is_empty());
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("layout.yaml");
    std::fs::write(&path, "diagram: []").expect("write layout");
    assert!(matches!(
        Layout::load_from_file(&path),
        Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"
    ));
}

#[test]
fn diagram_without_channels_is_invalid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("layout.toml");
    std::fs::write(&path, "[[diagram]]\ntitle = \"Empty\"\nchannels = []\n").expect("write");
    assert!(matches!(
        Layout::load_from_file(&path),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn duplicate_names_are_reported_once() {
    let layout: Layout = toml::from_str(
        r#"
[[diagram]]
title = "LoopTemp"
loop_index = 1
channels = [{ name = "a" }]

[[diagram]]
title = "LoopTemp"
kind = "bar"
loop_index = 1
channels = [{ name = "b" }]

[[diagram]]
title = "LoopTemp"
loop_index = 1
channels = [{ name = "c" }]
"#,
    )
    .expect("parse");
    assert_eq!(layout.duplicate_names(), vec![PlotName::new("LoopTemp", 1)]);
}

#[test]
fn signal_channel_defined_twice_is_invalid() {
    let result = Layout::from_toml_str(
        r#"
[[signal]]
channel = "coolant_temp"
loops = 4

[[signal]]
channel = "coolant_temp"
unit = "K"
loops = 1
"#,
    );
    assert!(matches!(
        result,
        Err(ConfigError::Invalid(message)) if message.contains("coolant_temp")
    ));
}

#[test]
fn huge_generator_period_is_clamped() {
    let layout = Layout::from_toml_str("[generator]\nperiod_ms = 1e300\n").expect("parse");
    assert_eq!(layout.generator.period_ms, MAX_SAMPLE_PERIOD_MS);
    assert!(std::time::Duration::try_from_secs_f64(layout.generator.period_ms / 1000.0).is_ok());
}
