// src/ui/mod.rs

//! Headless stand-in for the user surface.
//!
//! Background work never touches widgets directly. It posts [`UiCommand`]s
//! through a [`UiHandle`]; the [`UiSurface`] drains its queue on the thread that
//! created it and is the only thing that mutates labels. `UiSurface` is not
//! `Send`, so that thread is the only one that can ever drive it.

use crate::core::FinderError;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::thread::{self, ThreadId};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Id of the label that shows insights.
pub const INSIGHTS_LABEL: &str = "insights_label";

/// A change requested by background work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Replace the text of `element`.
    SetText { element: String, text: String },
    /// Show `message` in `element` and mark it as an error.
    ShowError { element: String, message: String },
}

impl UiCommand {
    pub fn element(&self) -> &str {
        match self {
            UiCommand::SetText { element, .. } | UiCommand::ShowError { element, .. } => element,
        }
    }
}

/// Text-bearing display element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub is_error: bool,
}

/// Cloneable, thread-safe sender onto a surface's queue.
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiCommand>,
}

impl UiHandle {
    /// Queues `command`. Returns `false` when the surface has been dropped.
    pub fn send(&self, command: UiCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn set_text(&self, element: &str, text: impl Into<String>) -> bool {
        self.send(UiCommand::SetText { element: element.to_string(), text: text.into() })
    }

    pub fn show_error(&self, element: &str, message: impl Into<String>) -> bool {
        self.send(UiCommand::ShowError { element: element.to_string(), message: message.into() })
    }
}

/// Owns the widgets and the receiving end of the command queue.
#[derive(Debug)]
pub struct UiSurface {
    widgets: BTreeMap<String, Label>,
    rx: mpsc::UnboundedReceiver<UiCommand>,
    owner: ThreadId,
    applied: usize,
    // Raw pointer marker keeps the surface pinned to its creating thread.
    _not_send: PhantomData<*const ()>,
}

impl UiSurface {
    /// Creates an empty surface owned by the current thread, plus the first handle onto it.
    pub fn new() -> (Self, UiHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let surface = Self {
            widgets: BTreeMap::new(),
            rx,
            owner: thread::current().id(),
            applied: 0,
            _not_send: PhantomData,
        };
        (surface, UiHandle { tx })
    }

    /// Surface with the single insights label.
    pub fn with_insights_label() -> (Self, UiHandle) {
        let (mut surface, handle) = Self::new();
        surface.add_label(INSIGHTS_LABEL);
        (surface, handle)
    }

    /// Registers an empty label under `element`. Existing labels are left as they are.
    pub fn add_label(&mut self, element: &str) {
        self.widgets.entry(element.to_string()).or_default();
    }

    pub fn label(&self, element: &str) -> Option<&Label> {
        self.widgets.get(element)
    }

    pub fn text(&self, element: &str) -> Option<&str> {
        self.widgets.get(element).map(|l| l.text.as_str())
    }

    /// Thread that created, and therefore drives, this surface.
    pub fn owner_thread(&self) -> ThreadId {
        self.owner
    }

    /// Number of commands applied so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Applies one command to the widgets.
    ///
    /// Fails with `FinderError::UiPrecondition` when the target element does not exist.
    pub fn apply(&mut self, command: UiCommand) -> Result<(), FinderError> {
        let label = self
            .widgets
            .get_mut(command.element())
            .ok_or_else(|| FinderError::UiPrecondition { element: command.element().to_string() })?;

        match command {
            UiCommand::SetText { element, text } => {
                debug!(element = %element, chars = text.len(), "label updated");
                label.text = text;
                label.is_error = false;
            }
            UiCommand::ShowError { element, message } => {
                debug!(element = %element, %message, "label shows error");
                label.text = message;
                label.is_error = true;
            }
        }
        self.applied += 1;
        Ok(())
    }

    /// Applies every queued command without blocking. Returns how many were applied.
    pub fn process_pending(&mut self) -> Result<usize, FinderError> {
        let mut count = 0;
        while let Ok(command) = self.rx.try_recv() {
            self.apply(command)?;
            count += 1;
        }
        trace!(count, "processed pending ui commands");
        Ok(count)
    }

    /// Blocks the current thread applying commands until every handle is dropped.
    ///
    /// Must not be called from inside an async runtime.
    pub fn run(&mut self) -> Result<usize, FinderError> {
        let mut count = 0;
        while let Some(command) = self.rx.blocking_recv() {
            self.apply(command)?;
            count += 1;
        }
        Ok(count)
    }
}
