use crate::config::DiagramConfig;
use crate::error::FrameError;
use crate::frame::{DiagramFrame, FrameState, PlotName};
use crate::value_handler::ValueHandler;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened(PlotName),
    /// A frame with the same name was already open and was kept.
    Reused(PlotName),
}

impl OpenOutcome {
    pub fn name(&self) -> &PlotName {
        match self {
            OpenOutcome::Opened(name) | OpenOutcome::Reused(name) => name,
        }
    }
}

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub updated: usize,
    pub failed: Vec<(PlotName, FrameError)>,
}

impl UpdateReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns the open frames, at most one per [`PlotName`].
pub struct FrameRegistry {
    source: Arc<ValueHandler>,
    frames: HashMap<PlotName, Box<dyn DiagramFrame>>,
    focus_requests: Vec<PlotName>,
}

impl FrameRegistry {
    pub fn new(source: Arc<ValueHandler>) -> Self {
        Self {
            source,
            frames: HashMap::new(),
            focus_requests: Vec::new(),
        }
    }

    pub fn source(&self) -> &Arc<ValueHandler> {
        &self.source
    }

    /// Opens the frame described by `config`, or reuses the open frame with
    /// the same plot name. A frame that fails to initialize is not kept.
    pub fn open(&mut self, config: &DiagramConfig) -> Result<OpenOutcome, FrameError> {
        let name = config.plot_name();
        if self.is_live(&name) {
            log::debug!("reusing open frame {name}");
            self.focus_requests.push(name.clone());
            return Ok(OpenOutcome::Reused(name));
        }
        let mut frame = config.build();
        frame.init_plots(Arc::clone(&self.source), config.loop_index)?;
        if self.frames.contains_key(&name) {
            log::debug!("replacing closed frame {name}");
        }
        log::info!("opened frame {name}");
        self.frames.insert(name.clone(), frame);
        Ok(OpenOutcome::Opened(name))
    }

    /// Tracks a frame that was built and initialized by the caller. If its
    /// name is already taken the new frame is dropped and the old one kept.
    pub fn insert(&mut self, frame: Box<dyn DiagramFrame>) -> Result<OpenOutcome, FrameError> {
        let name = frame.plot_name().clone();
        if self.is_live(&name) {
            self.focus_requests.push(name.clone());
            return Ok(OpenOutcome::Reused(name));
        }
        if frame.state() != FrameState::Live {
            return Err(FrameError::InvalidState {
                name,
                state: frame.state(),
            });
        }
        log::info!("tracking frame {name}");
        self.frames.insert(name.clone(), frame);
        Ok(OpenOutcome::Opened(name))
    }

    /// A name only counts as taken while its frame is live; a frame closed
    /// through [`FrameRegistry::get_mut`] is replaced on the next open.
    fn is_live(&self, name: &PlotName) -> bool {
        self.frames
            .get(name)
            .is_some_and(|frame| frame.state() == FrameState::Live)
    }

    /// Refreshes every open frame. Failures are collected, not fatal.
    pub fn update_plots(&mut self) -> UpdateReport {
        let mut report = UpdateReport::default();
        for (name, frame) in &mut self.frames {
            match frame.update_plots() {
                Ok(()) => report.updated += 1,
                Err(err) => {
                    log::warn!("failed to update frame {name}: {err}");
                    report.failed.push((name.clone(), err));
                }
            }
        }
        report
    }

    /// Closes and forgets the frame. Returns false if it was not open.
    pub fn close(&mut self, name: &PlotName) -> bool {
        match self.frames.remove(name) {
            Some(mut frame) => {
                frame.close();
                self.focus_requests.retain(|n| n != name);
                log::info!("closed frame {name}");
                true
            }
            None => false,
        }
    }

    pub fn close_all(&mut self) {
        for name in self.names() {
            self.close(&name);
        }
    }

    pub fn contains(&self, name: &PlotName) -> bool {
        self.frames.contains_key(name)
    }

    pub fn get(&self, name: &PlotName) -> Option<&dyn DiagramFrame> {
        self.frames.get(name).map(|frame| frame.as_ref())
    }

    pub fn get_mut(&mut self, name: &PlotName) -> Option<&mut (dyn DiagramFrame + 'static)> {
        self.frames.get_mut(name).map(|frame| frame.as_mut())
    }

    pub fn names(&self) -> Vec<PlotName> {
        let mut names: Vec<PlotName> = self.frames.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Names of reused frames that should be brought to the front.
    pub fn take_focus_requests(&mut self) -> Vec<PlotName> {
        std::mem::take(&mut self.focus_requests)
    }
}
