use diagrams_core::frame::{BarView, PlotContent};
use diagrams_core::PlotView;
use diagrams_gui::{export_view, GuiConfig, GuiError};

#[test]
fn gui_config_defaults() {
    let config = GuiConfig::default();
    assert_eq!(config.title, "Reactor Diagrams");
    assert_eq!(config.width, 1280.0);
    assert_eq!(config.height, 720.0);
}

#[test]
fn export_of_empty_view_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.png");
    let view = PlotView {
        title: "Power#0".to_string(),
        x_label: "channel".to_string(),
        y_label: "MW".to_string(),
        content: PlotContent::Bars(vec![BarView {
            name: "power".to_string(),
            color_index: 0,
            value: None,
        }]),
    };
    let err = export_view(&view, &path, 640, 480, true).expect_err("nothing to export");
    assert!(matches!(err, GuiError::Export(_)));
    assert!(!path.exists());
}
