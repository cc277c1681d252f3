use diagrams_core::frame::{BarPlotFrame, LinePlotFrame, PlotContent};
use diagrams_core::{
    ChannelSpec, DiagramConfig, DiagramFrame, DiagramKind, FrameError, FrameState, ValueHandler,
};
use std::sync::Arc;

fn handler() -> Arc<ValueHandler> {
    let handler = ValueHandler::new();
    handler.register_channel("coolant_temp", "degC", 2);
    handler.register_channel("coolant_flow", "kg/s", 2);
    Arc::new(handler)
}

fn loop_temp(loop_index: usize) -> DiagramConfig {
    DiagramConfig::new("LoopTemp", DiagramKind::Line, loop_index, &["coolant_temp"])
}

#[test]
fn plot_name_is_stable() {
    let mut frame = LinePlotFrame::new(loop_temp(1));
    let before = frame.plot_name().clone();
    assert_eq!(frame.plot_name(), frame.plot_name());
    frame.init_plots(handler(), 1).expect("init");
    frame.update_plots().expect("update");
    assert_eq!(frame.plot_name(), &before);
    assert_eq!(before.as_str(), "LoopTemp#1");
}

#[test]
fn same_logical_plot_gives_same_name() {
    let a = LinePlotFrame::new(loop_temp(1));
    let b = BarPlotFrame::new(loop_temp(1));
    let c = LinePlotFrame::new(loop_temp(0));
    let d = LinePlotFrame::new(DiagramConfig::new(
        "LoopFlow",
        DiagramKind::Line,
        1,
        &["coolant_flow"],
    ));
    assert_eq!(a.plot_name(), b.plot_name());
    assert_ne!(a.plot_name(), c.plot_name());
    assert_ne!(a.plot_name(), d.plot_name());
}

#[test]
fn update_before_init_reports_invalid_state() {
    let mut frame = LinePlotFrame::new(loop_temp(0));
    let err = frame.update_plots().expect_err("not initialized");
    assert!(matches!(
        err,
        FrameError::InvalidState {
            state: FrameState::Uninitialized,
            ..
        }
    ));
    assert_eq!(frame.state(), FrameState::Uninitialized);
}

#[test]
fn bar_update_before_init_reports_invalid_state() {
    let mut frame = BarPlotFrame::new(loop_temp(1));
    assert!(matches!(
        frame.update_plots(),
        Err(FrameError::InvalidState {
            state: FrameState::Uninitialized,
            ..
        })
    ));
    assert!(frame.values().is_empty());
    assert_eq!(frame.last_tick(), None);
}

#[test]
fn frames_only_see_committed_values() {
    let source = handler();
    source.set("coolant_temp", 1, 1.0);
    source.commit(1, 0.1);

    let mut line = LinePlotFrame::new(loop_temp(1));
    line.init_plots(Arc::clone(&source), 1).expect("init line");
    let mut bar = BarPlotFrame::new(loop_temp(1));
    bar.init_plots(Arc::clone(&source), 1).expect("init bar");

    source.set("coolant_temp", 1, 999.0);
    line.update_plots().expect("update line");
    bar.update_plots().expect("update bar");
    assert_eq!(bar.values(), &[Some(1.0)]);

    source.set("coolant_temp", 1, -5.0);
    bar.update_plots().expect("update bar again");
    assert_eq!(bar.values(), &[Some(1.0)]);
    assert_eq!(bar.last_tick(), Some(1));

    match line.view().content {
        PlotContent::Lines { series, .. } => assert_eq!(series[0].points, vec![[0.1, 1.0]]),
        PlotContent::Bars(_) => panic!("line frame produced bars"),
    }
}

#[test]
fn init_rejects_missing_channel_and_loop() {
    let source = handler();
    let mut missing = LinePlotFrame::new(DiagramConfig::new(
        "Pressure",
        DiagramKind::Line,
        0,
        &["pressure"],
    ));
    assert!(matches!(
        missing.init_plots(Arc::clone(&source), 0),
        Err(FrameError::InvalidArgument(_))
    ));
    assert_eq!(missing.state(), FrameState::Uninitialized);

    let mut out_of_range = LinePlotFrame::new(loop_temp(5));
    assert!(matches!(
        out_of_range.init_plots(Arc::clone(&source), 5),
        Err(FrameError::InvalidArgument(_))
    ));

    let mut mismatched = LinePlotFrame::new(loop_temp(1));
    assert!(matches!(
        mismatched.init_plots(source, 0),
        Err(FrameError::InvalidArgument(_))
    ));
}

#[test]
fn second_init_is_rejected_and_keeps_binding() {
    let source = handler();
    source.set("coolant_temp", 1, 281.0);
    source.commit(1, 0.02);
    let mut frame = BarPlotFrame::new(loop_temp(1));
    frame.init_plots(Arc::clone(&source), 1).expect("init");

    let other = Arc::new(ValueHandler::new());
    let err = frame.init_plots(other, 1).expect_err("second init");
    assert_eq!(err, FrameError::AlreadyInitialized(frame.plot_name().clone()));

    frame.update_plots().expect("update");
    assert_eq!(frame.values(), &[Some(281.0)]);
}

#[test]
fn line_frame_reflects_source_and_ignores_repeated_ticks() {
    let source = handler();
    let mut frame = LinePlotFrame::new(loop_temp(1));
    frame.init_plots(Arc::clone(&source), 1).expect("init");

    frame.update_plots().expect("update before any commit");
    assert_eq!(frame.point_count(), 0);

    source.set("coolant_temp", 1, 280.0);
    source.commit(1, 0.02);
    frame.update_plots().expect("update");
    frame.update_plots().expect("update again");
    assert_eq!(frame.point_count(), 1);
    assert_eq!(frame.last_tick(), Some(1));

    source.set("coolant_temp", 1, 284.0);
    source.commit(2, 0.04);
    frame.update_plots().expect("update");

    let view = frame.view();
    assert_eq!(view.title, "LoopTemp#1");
    assert_eq!(view.y_label, "degC");
    match view.content {
        PlotContent::Lines { series, bounds } => {
            assert_eq!(series.len(), 1);
            assert_eq!(series[0].points, vec![[0.02, 280.0], [0.04, 284.0]]);
            let bounds = bounds.expect("bounds");
            assert!(bounds.min[1] < 280.0 && bounds.max[1] > 284.0);
        }
        PlotContent::Bars(_) => panic!("line frame produced bars"),
    }
}

#[test]
fn bar_frame_applies_transform_and_labels() {
    let source = handler();
    let mut config = DiagramConfig::new("Loop", DiagramKind::Bar, 0, &[]);
    config.channels = vec![
        ChannelSpec {
            label: Some("T".to_string()),
            scale: 2.0,
            offset: 1.0,
            ..ChannelSpec::new("coolant_temp")
        },
        ChannelSpec {
            label: Some("T".to_string()),
            ..ChannelSpec::new("coolant_flow")
        },
    ];
    let mut frame = BarPlotFrame::new(config);
    frame.init_plots(Arc::clone(&source), 0).expect("init");
    source.set("coolant_temp", 0, 10.0);
    source.set("coolant_flow", 0, 3.5);
    source.commit(4, 0.1);
    frame.update_plots().expect("update");

    match frame.view().content {
        PlotContent::Bars(bars) => {
            let names: Vec<&str> = bars.iter().map(|b| b.name.as_str()).collect();
            assert_eq!(names, vec!["T", "T (2)"]);
            assert_eq!(bars[0].value, Some(21.0));
            assert_eq!(bars[1].value, Some(3.5));
        }
        PlotContent::Lines { .. } => panic!("bar frame produced lines"),
    }
}

#[test]
fn closed_frame_rejects_updates() {
    let mut frame = LinePlotFrame::new(loop_temp(0));
    frame.init_plots(handler(), 0).expect("init");
    frame.close();
    assert_eq!(frame.state(), FrameState::Closed);
    assert!(matches!(
        frame.update_plots(),
        Err(FrameError::InvalidState {
            state: FrameState::Closed,
            ..
        })
    ));
    assert!(matches!(
        frame.init_plots(handler(), 0),
        Err(FrameError::InvalidState { .. })
    ));
}
