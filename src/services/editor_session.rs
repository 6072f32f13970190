//! Interactive editing session
//!
//! A single task owns the [`ConfigStore`] and applies widget interactions in
//! arrival order. Accepted changes refresh the HTML preview and feed the
//! autosave worker, which only ever writes the most recent snapshot.

use crate::config::parser::ImportError;
use crate::config::persistence::{ExportDocument, PersistenceAdapter, PersistenceError};
use crate::models::{Configuration, FieldPath, FieldValue, Layout};
use crate::services::config_store::ConfigStore;
use crate::services::path_mutator::MutationError;
use crate::services::render_selector::{RenderSelector, Selection};
use crate::ui::presenters::html_page;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("editor session is closed")]
    Closed,
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("session task failed: {message}")]
    Task { message: String },
}

/// Configuration for an editor session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Write the rendered preview here after every accepted change
    pub preview_path: Option<PathBuf>,
    pub autosave: bool,
    pub command_buffer: usize,
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preview_path: None,
            autosave: true,
            command_buffer: 64,
            event_capacity: 128,
        }
    }
}

/// Notifications published to session observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ConfigChanged { version: u64 },
    PresenterChanged { from: Layout, to: Layout },
    PreviewWritten { path: PathBuf },
}

pub enum EditorCommand {
    Set {
        path: FieldPath,
        value: FieldValue,
        reply: oneshot::Sender<Result<Arc<Configuration>, MutationError>>,
    },
    Reset {
        reply: oneshot::Sender<Arc<Configuration>>,
    },
    Import {
        bytes: Vec<u8>,
        reply: oneshot::Sender<Result<Arc<Configuration>, ImportError>>,
    },
    Export {
        reply: oneshot::Sender<Result<ExportDocument, PersistenceError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Arc<Configuration>>,
    },
    Shutdown,
}

/// Cloneable front end for sending commands to a running session
#[derive(Clone)]
pub struct EditorHandle {
    commands: mpsc::Sender<EditorCommand>,
    events: broadcast::Sender<SessionEvent>,
}

impl EditorHandle {
    /// Apply one `(path, value)` widget interaction
    pub async fn set(
        &self,
        path: impl Into<FieldPath>,
        value: impl Into<FieldValue>,
    ) -> Result<Arc<Configuration>, SessionError> {
        let path = path.into();
        let value = value.into();
        Ok(self
            .request(|reply| EditorCommand::Set { path, value, reply })
            .await??)
    }

    pub async fn reset(&self) -> Result<Arc<Configuration>, SessionError> {
        self.request(|reply| EditorCommand::Reset { reply }).await
    }

    pub async fn import(&self, bytes: Vec<u8>) -> Result<Arc<Configuration>, SessionError> {
        Ok(self
            .request(|reply| EditorCommand::Import { bytes, reply })
            .await??)
    }

    pub async fn export(&self) -> Result<ExportDocument, SessionError> {
        Ok(self.request(|reply| EditorCommand::Export { reply }).await??)
    }

    pub async fn snapshot(&self) -> Result<Arc<Configuration>, SessionError> {
        self.request(|reply| EditorCommand::Snapshot { reply }).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> EditorCommand,
    ) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }
}

/// A running session; dropping it without [`EditorSession::shutdown`] may lose the last save
pub struct EditorSession {
    handle: EditorHandle,
    task: JoinHandle<()>,
}

impl EditorSession {
    /// Start the session task on the current tokio runtime
    pub fn spawn(
        initial: Configuration,
        adapter: Arc<PersistenceAdapter>,
        config: SessionConfig,
    ) -> Self {
        let (commands, receiver) = mpsc::channel(config.command_buffer.max(1));
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        let mut store = ConfigStore::new(initial);
        let autosave = if config.autosave {
            let (snapshots, latest) = watch::channel(None);
            store.subscribe(move |_event, snapshot| {
                snapshots.send_replace(Some(Arc::clone(snapshot)));
            });
            Some(tokio::spawn(autosave_worker(Arc::clone(&adapter), latest)))
        } else {
            None
        };

        let state = SessionState {
            selector: RenderSelector::new(&store.get()),
            store,
            adapter,
            preview_path: config.preview_path,
            events: events.clone(),
        };

        info!(autosave = config.autosave, "Starting editor session");
        let task = tokio::spawn(state.run(receiver, autosave));

        Self {
            handle: EditorHandle { commands, events },
            task,
        }
    }

    pub fn handle(&self) -> EditorHandle {
        self.handle.clone()
    }

    /// Stop accepting commands and wait until the last snapshot is saved
    pub async fn shutdown(self) -> Result<(), SessionError> {
        // A send error means the task already stopped; joining still reports how.
        let _ = self.handle.commands.send(EditorCommand::Shutdown).await;
        self.task.await.map_err(|e| SessionError::Task {
            message: e.to_string(),
        })
    }
}

struct SessionState {
    store: ConfigStore,
    selector: RenderSelector,
    adapter: Arc<PersistenceAdapter>,
    preview_path: Option<PathBuf>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionState {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<EditorCommand>,
        autosave: Option<JoinHandle<()>>,
    ) {
        self.write_preview().await;

        while let Some(command) = commands.recv().await {
            let version = self.store.version();

            match command {
                EditorCommand::Set { path, value, reply } => {
                    let result = self.store.apply(&path, &value);
                    if let Err(e) = &result {
                        debug!(path = %path, error = %e, "Rejected field mutation");
                    }
                    let _ = reply.send(result);
                }
                EditorCommand::Reset { reply } => {
                    let _ = reply.send(self.store.reset());
                }
                EditorCommand::Import { bytes, reply } => {
                    let result = self.adapter.import_document(&mut self.store, &bytes);
                    if let Err(e) = &result {
                        warn!(error = %e, "Import failed, configuration unchanged");
                    }
                    let _ = reply.send(result);
                }
                EditorCommand::Export { reply } => {
                    let _ = reply.send(self.adapter.export_document(&self.store.get()));
                }
                EditorCommand::Snapshot { reply } => {
                    let _ = reply.send(self.store.get());
                }
                EditorCommand::Shutdown => break,
            }

            if self.store.version() != version {
                self.after_change().await;
            }
        }

        info!(version = self.store.version(), "Editor session stopped");
        // Dropping the store drops the autosave sender, which lets the worker drain and exit.
        drop(self);
        if let Some(worker) = autosave {
            if let Err(e) = worker.await {
                warn!(error = %e, "Autosave worker failed");
            }
        }
    }

    async fn after_change(&mut self) {
        let snapshot = self.store.get();
        let _ = self.events.send(SessionEvent::ConfigChanged {
            version: self.store.version(),
        });

        if let Selection::Changed { from, to } = self.selector.observe(&snapshot) {
            let _ = self.events.send(SessionEvent::PresenterChanged { from, to });
        }
        self.write_preview().await;
    }

    async fn write_preview(&self) {
        let Some(path) = &self.preview_path else {
            return;
        };

        let html = html_page(self.selector.active(), &self.store.get());
        match tokio::fs::write(path, html).await {
            Ok(()) => {
                debug!(path = %path.display(), presenter = self.selector.active().id(), "Preview updated");
                let _ = self
                    .events
                    .send(SessionEvent::PreviewWritten { path: path.clone() });
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to write preview"),
        }
    }
}

/// Save the latest snapshot each time it changes; bursts collapse to one write
async fn autosave_worker(
    adapter: Arc<PersistenceAdapter>,
    mut latest: watch::Receiver<Option<Arc<Configuration>>>,
) {
    while latest.changed().await.is_ok() {
        let Some(snapshot) = latest.borrow_and_update().clone() else {
            continue;
        };

        let saver = Arc::clone(&adapter);
        match tokio::task::spawn_blocking(move || saver.save(&snapshot)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Autosave failed, continuing without saving"),
            Err(e) => warn!(error = %e, "Autosave task panicked"),
        }
    }
    debug!("Autosave worker finished");
}
