//! Core engine orchestration.
//!
//! The engine owns the history and is its only writer. Clipboard polls and
//! commands from the presentation layer are handled one at a time on the
//! engine task, so every mutation is totally ordered. Readers get
//! point-in-time snapshots through a `watch` channel.

use std::sync::Arc;

use clipkeep_clipboard::ClipboardProvider;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::EngineError;
use crate::history::{HistorySnapshot, HistoryStore};
use crate::selection::{SelectionController, SelectionOutcome};
use crate::watcher::ClipboardWatcher;

/// Requests processed by the engine's main loop.
#[derive(Debug)]
pub enum EngineCommand {
    /// Restore the entry at this index to the clipboard.
    Select(usize),
    /// Drop every history entry.
    ClearHistory,
    /// The history surface was shown.
    Show,
    /// The history surface was hidden.
    Hide,
    /// Flip visibility (global hotkey).
    ToggleVisibility,
    /// Start dragging the entry at `index`; replies with the text to drag.
    BeginDrag {
        index: usize,
        reply: oneshot::Sender<Option<String>>,
    },
    /// Stop polling and exit the loop.
    Shutdown,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    HistoryChanged,
    SelectionCommitted { index: usize, label: String },
    SelectionFailed { index: usize, reason: String },
    VisibilityChanged { visible: bool },
}

/// Observable engine state.
#[derive(Debug, Clone, Default)]
pub struct EngineStatus {
    pub history: HistorySnapshot,
    pub visible: bool,
    pub running: bool,
}

/// The clipboard history engine.
pub struct Engine {
    config: Config,
    history: HistoryStore,
    watcher: ClipboardWatcher,
    selection: SelectionController,
    visible: bool,
    running: bool,
    command_tx: mpsc::Sender<EngineCommand>,
    command_rx: mpsc::Receiver<EngineCommand>,
    event_tx: broadcast::Sender<EngineEvent>,
    status_tx: watch::Sender<EngineStatus>,
}

impl Engine {
    /// Create a new engine reading and writing through `provider`.
    pub fn new(config: Config, provider: Arc<dyn ClipboardProvider>) -> Self {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (event_tx, _) = broadcast::channel(64);
        let (status_tx, _) = watch::channel(EngineStatus::default());

        Self {
            history: HistoryStore::new(config.history.capacity),
            watcher: ClipboardWatcher::new(Arc::clone(&provider)),
            selection: SelectionController::new(provider),
            config,
            visible: false,
            running: false,
            command_tx,
            command_rx,
            event_tx,
            status_tx,
        }
    }

    /// Get a clonable handle for driving and observing the engine.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            command_tx: self.command_tx.clone(),
            event_tx: self.event_tx.clone(),
            status_rx: self.status_tx.subscribe(),
        }
    }

    /// Run the engine until a shutdown command arrives.
    pub async fn run(&mut self) -> Result<(), EngineError> {
        self.config.validate()?;

        self.watcher.start(self.config.watcher.record_existing).await;
        self.running = true;
        self.publish_status();

        let mut ticker = tokio::time::interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            capacity = self.history.capacity(),
            poll_interval_ms = self.config.watcher.poll_interval_ms,
            "engine running"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.handle_poll().await;
                }
                command = self.command_rx.recv() => {
                    match command {
                        Some(EngineCommand::Shutdown) | None => {
                            info!("shutting down");
                            break;
                        }
                        Some(command) => self.handle_command(command).await,
                    }
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    async fn handle_poll(&mut self) {
        let outcome = self.watcher.poll(&mut self.history).await;
        if outcome.changed_history() {
            self.history_changed();
        }
    }

    async fn handle_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Select(index) => self.handle_select(index).await,
            EngineCommand::ClearHistory => {
                let cleared = self.history.len();
                self.history.clear();
                self.watcher.rearm();
                info!(cleared, "clipboard history cleared");
                self.history_changed();
            }
            EngineCommand::Show => self.set_visible(true),
            EngineCommand::Hide => self.set_visible(false),
            EngineCommand::ToggleVisibility => self.set_visible(!self.visible),
            EngineCommand::BeginDrag { index, reply } => {
                let payload = self.history.drag_payload(index).map(str::to_string);
                if payload.is_some() {
                    debug!(index, "drag started");
                    self.set_visible(false);
                } else {
                    debug!(index, "entry cannot be dragged");
                }
                let _ = reply.send(payload);
            }
            EngineCommand::Shutdown => {}
        }
    }

    async fn handle_select(&mut self, index: usize) {
        match self.selection.select(&self.history, index).await {
            SelectionOutcome::Committed { index, item } => {
                self.emit(EngineEvent::SelectionCommitted {
                    index,
                    label: item.display_label(),
                });
                if self.config.selection.hide_on_commit {
                    self.set_visible(false);
                }
            }
            SelectionOutcome::Failed { index, error } => {
                self.emit(EngineEvent::SelectionFailed {
                    index,
                    reason: error.to_string(),
                });
            }
            SelectionOutcome::OutOfRange { .. } => {}
        }
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        debug!(visible, "visibility changed");
        self.publish_status();
        self.emit(EngineEvent::VisibilityChanged { visible });
    }

    fn history_changed(&mut self) {
        self.publish_status();
        self.emit(EngineEvent::HistoryChanged);
    }

    fn publish_status(&self) {
        self.status_tx.send_replace(EngineStatus {
            history: self.history.snapshot(),
            visible: self.visible,
            running: self.running,
        });
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine; the status channel still carries the state.
        let _ = self.event_tx.send(event);
    }

    fn shutdown(&mut self) {
        self.watcher.stop();
        self.running = false;
        self.publish_status();
        info!("engine shut down complete");
    }
}

/// Clonable handle to a running [`Engine`].
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<EngineCommand>,
    event_tx: broadcast::Sender<EngineEvent>,
    status_rx: watch::Receiver<EngineStatus>,
}

impl EngineHandle {
    /// The history as of the most recent mutation.
    pub fn snapshot(&self) -> HistorySnapshot {
        self.status_rx.borrow().history.clone()
    }

    /// The full engine status as of the most recent change.
    pub fn status(&self) -> EngineStatus {
        self.status_rx.borrow().clone()
    }

    /// A receiver that wakes on every status change.
    pub fn status_receiver(&self) -> watch::Receiver<EngineStatus> {
        self.status_rx.clone()
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    pub async fn select(&self, index: usize) -> Result<(), EngineError> {
        self.send(EngineCommand::Select(index)).await
    }

    pub async fn clear_history(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::ClearHistory).await
    }

    pub async fn show(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::Show).await
    }

    pub async fn hide(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::Hide).await
    }

    pub async fn toggle_visibility(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::ToggleVisibility).await
    }

    /// Text to drag out for the entry at `index`, or `None` for entries
    /// that cannot be dragged.
    pub async fn begin_drag(&self, index: usize) -> Result<Option<String>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::BeginDrag { index, reply }).await?;
        rx.await.map_err(|_| EngineError::NotRunning)
    }

    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::Shutdown).await
    }

    async fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| EngineError::NotRunning)
    }
}
