use crate::commands::Commands;
use crate::generator::SignalGenerator;
use crate::output::*;
use diagrams_core::{
    feed, ConfigError, DiagramHost, FrameRegistry, Layout, OpenOutcome, PollOutcome, ValueHandler,
};
use diagrams_gui::{run_gui, GuiConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEMO_LAYOUT: &str = include_str!("../layouts/demo.toml");

fn load_layout(path: Option<&Path>) -> Result<Layout, ConfigError> {
    match path {
        Some(path) => Layout::load_from_file(path),
        None => Layout::from_toml_str(DEMO_LAYOUT),
    }
}

/// Handler with every layout channel registered, plus the host and the
/// producer side of the feed.
fn build_host(layout: &Layout) -> (DiagramHost, feed::FeedSender) {
    let handler = Arc::new(ValueHandler::new());
    layout.register_channels(&handler);
    let (sender, receiver) = feed::channel(Arc::clone(&handler));
    (DiagramHost::new(FrameRegistry::new(handler), receiver), sender)
}

pub fn handle_command(command: Option<Commands>) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        None => run(None, false, PathBuf::from("."))?,
        Some(Commands::Run {
            layout,
            open_all,
            export_dir,
        }) => run(layout.as_deref(), open_all, export_dir)?,
        Some(Commands::Headless { layout, ticks }) => headless(layout.as_deref(), ticks)?,
        Some(Commands::Check { layout }) => check(layout.as_deref())?,
    }
    Ok(())
}

fn run(
    layout_path: Option<&Path>,
    open_all: bool,
    export_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let layout = load_layout(layout_path)?;
    let (mut host, sender) = build_host(&layout);
    if open_all {
        for (config, outcome) in layout.diagrams.iter().zip(host.open_all(&layout.diagrams)) {
            if let Err(err) = outcome {
                print_error(&format!("cannot open {}: {err}", config.plot_name()));
            }
        }
    }
    // Detached: it stops on its own once the GUI drops the receiver.
    let _generator = SignalGenerator::new(&layout).spawn(sender);
    let config = GuiConfig {
        export_dir,
        ..GuiConfig::default()
    };
    run_gui(config, layout, host)?;
    Ok(())
}

fn headless(layout_path: Option<&Path>, ticks: u64) -> Result<(), Box<dyn std::error::Error>> {
    let layout = load_layout(layout_path)?;
    let (mut host, sender) = build_host(&layout);
    let outcomes = host.open_all(&layout.diagrams);
    for (config, outcome) in layout.diagrams.iter().zip(outcomes) {
        match outcome {
            Ok(OpenOutcome::Opened(_)) => {}
            Ok(OpenOutcome::Reused(name)) => print_info(&format!("{name} already open, reused")),
            Err(err) => print_error(&format!("cannot open {}: {err}", config.plot_name())),
        }
    }

    let generator = SignalGenerator::new(&layout);
    let mut failures = 0usize;
    for tick in 0..ticks {
        generator.step(&sender, tick)?;
        if let PollOutcome::Updated { report, .. } = host.poll() {
            failures += report.failed.len();
        }
    }
    if failures > 0 {
        print_error(&format!("{failures} frame updates failed"));
    }

    print_info(&format!("{} frames after {ticks} ticks", host.registry().len()));
    let registry = host.registry();
    for name in registry.names() {
        if let Some(frame) = registry.get(&name) {
            print_frame_summary(frame.kind(), &frame.view());
        }
    }
    Ok(())
}

fn check(layout_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let layout = load_layout(layout_path)?;
    let names: Vec<_> = layout
        .diagrams
        .iter()
        .map(|config| (config.plot_name(), config.kind))
        .collect();
    print_plot_names(&names, &layout.duplicate_names());

    let (mut host, _sender) = build_host(&layout);
    let mut unresolved = 0usize;
    for (config, outcome) in layout.diagrams.iter().zip(host.open_all(&layout.diagrams)) {
        if let Err(err) = outcome {
            unresolved += 1;
            print_error(&format!("{}: {err}", config.plot_name()));
        }
    }
    if unresolved == 0 {
        print_info("Layout OK");
    }
    Ok(())
}
