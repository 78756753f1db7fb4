//! Sync controller: the reactive loop between editor input and the preview surface.
//!
//! A single task owns the raw input, the visual config and the surface. Edits
//! and partial config updates arrive as commands; the task debounces them,
//! gates on surface readiness, and calls `projection::project`. Results are
//! published on watch channels so handlers never touch the surface.
//!
//! ```text
//!            surface loaded (sync now)
//!  NotReady ─────────────────────────▶ Idle ──edit/config──▶ Syncing
//!     ▲                                 ▲                       │
//!     └──────── template change ────────┴──── window elapsed ───┘
//! ```
//!
//! Within one debounce window only the latest input is projected; earlier
//! scheduled syncs are dropped, never run.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use crate::export::print_title;
use crate::models::{ResumeDocument, VisualConfig, VisualConfigError, VisualConfigPatch};
use crate::normalize::{classify, NormalizeOutcome};
use crate::projection::{ids, project, Display, PreviewSurface, Surface};
use crate::storage::{save_visual_config, KeyValueStore, Session, DATA_KEY};

pub mod handlers;
pub mod loader;

pub use loader::{DirTemplateSource, TemplateSource};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Message shown when the editor text is not valid JSON.
pub const PARSE_ERROR_MESSAGE: &str = "JSON syntax error. Check commas, quotes and braces.";

const COMMAND_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// No usable surface; input is recorded but not projected.
    NotReady,
    Idle,
    /// A debounce window is open.
    Syncing,
}

/// Published after every state change.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    /// Completed sync cycles.
    pub revision: u64,
    pub template_id: String,
    pub visual_config: VisualConfig,
    pub raw_input: String,
    /// Set when the last sync saw non-empty input that failed to parse.
    pub validation_error: Option<String>,
    /// Set when the current template failed to load.
    pub surface_error: Option<String>,
    /// Last successfully normalized document.
    #[serde(skip)]
    pub document: Option<Arc<ResumeDocument>>,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync controller has stopped")]
    Stopped,

    #[error(transparent)]
    InvalidVisualConfig(#[from] VisualConfigError),
}

type ConfigReply = oneshot::Sender<Result<VisualConfig, VisualConfigError>>;

enum SyncCommand {
    Edit(String),
    UpdateVisualConfig(VisualConfigPatch, ConfigReply),
    Print(oneshot::Sender<Option<String>>),
    Shutdown,
}

struct SurfaceLoaded {
    generation: u64,
    result: Result<PreviewSurface, String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handle
// ────────────────────────────────────────────────────────────────────────────

/// Cloneable front door to the controller task.
#[derive(Clone)]
pub struct SyncHandle {
    commands: mpsc::Sender<SyncCommand>,
    status: watch::Receiver<SyncStatus>,
    preview: watch::Receiver<Option<PreviewSurface>>,
}

impl SyncHandle {
    /// Replaces the raw editor text. Projection happens after the debounce window.
    pub async fn submit_edit(&self, raw: String) -> Result<(), SyncError> {
        self.send(SyncCommand::Edit(raw)).await
    }

    /// Applies a partial visual config against the controller's current one
    /// and returns the result. Concurrent updates never drop each other's fields.
    pub async fn update_visual_config(
        &self,
        patch: VisualConfigPatch,
    ) -> Result<VisualConfig, SyncError> {
        let (tx, rx) = oneshot::channel();
        self.send(SyncCommand::UpdateVisualConfig(patch, tx)).await?;
        Ok(rx.await.map_err(|_| SyncError::Stopped)??)
    }

    /// Raises a print request on the surface. Returns the print title, or
    /// `None` when no surface is ready.
    pub async fn request_print(&self) -> Result<Option<String>, SyncError> {
        let (tx, rx) = oneshot::channel();
        self.send(SyncCommand::Print(tx)).await?;
        rx.await.map_err(|_| SyncError::Stopped)
    }

    pub async fn shutdown(&self) -> Result<(), SyncError> {
        self.send(SyncCommand::Shutdown).await
    }

    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Snapshot of the surface as last projected.
    pub fn preview(&self) -> Option<PreviewSurface> {
        self.preview.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    async fn send(&self, command: SyncCommand) -> Result<(), SyncError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SyncError::Stopped)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Controller
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub debounce: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Starts the controller task and the load of the session's template.
pub fn spawn_controller(
    session: Session,
    store: Arc<dyn KeyValueStore>,
    templates: Arc<dyn TemplateSource>,
    settings: SyncSettings,
) -> (SyncHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (loaded_tx, loaded_rx) = mpsc::channel(COMMAND_BUFFER);

    let initial = SyncStatus {
        phase: SyncPhase::NotReady,
        revision: 0,
        template_id: session.visual_config.template_id.clone(),
        visual_config: session.visual_config.clone(),
        raw_input: session.raw_input.clone(),
        validation_error: None,
        surface_error: None,
        document: None,
    };
    let (status_tx, status_rx) = watch::channel(initial);
    let (preview_tx, preview_rx) = watch::channel(None);

    let mut controller = SyncController {
        store,
        templates,
        settings,
        raw_input: session.raw_input,
        config: session.visual_config,
        surface: None,
        generation: 0,
        deadline: None,
        revision: 0,
        document: None,
        validation_error: None,
        surface_error: None,
        status: status_tx,
        preview: preview_tx,
        loaded_tx,
    };

    let task = tokio::spawn(async move {
        controller.begin_load();
        controller.run(command_rx, loaded_rx).await;
    });

    let handle = SyncHandle {
        commands: command_tx,
        status: status_rx,
        preview: preview_rx,
    };
    (handle, task)
}

struct SyncController {
    store: Arc<dyn KeyValueStore>,
    templates: Arc<dyn TemplateSource>,
    settings: SyncSettings,
    raw_input: String,
    config: VisualConfig,
    surface: Option<PreviewSurface>,
    /// Bumped on every template load; results from older loads are discarded.
    generation: u64,
    deadline: Option<Instant>,
    revision: u64,
    document: Option<Arc<ResumeDocument>>,
    validation_error: Option<String>,
    surface_error: Option<String>,
    status: watch::Sender<SyncStatus>,
    preview: watch::Sender<Option<PreviewSurface>>,
    loaded_tx: mpsc::Sender<SurfaceLoaded>,
}

impl SyncController {
    async fn run(
        &mut self,
        mut commands: mpsc::Receiver<SyncCommand>,
        mut loaded: mpsc::Receiver<SurfaceLoaded>,
    ) {
        loop {
            let deadline = self.deadline;
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SyncCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                Some(event) = loaded.recv() => self.on_surface_loaded(event),
                _ = wait_for_deadline(deadline) => {
                    self.deadline = None;
                    self.sync();
                }
            }
        }
        info!("Sync controller stopped");
    }

    fn handle(&mut self, command: SyncCommand) {
        match command {
            SyncCommand::Edit(raw) => {
                self.raw_input = raw;
                self.schedule();
                self.publish_status();
            }
            SyncCommand::UpdateVisualConfig(patch, reply) => {
                let result = self.config.patched(&patch);
                match &result {
                    Ok(config) => self.on_visual_config(config.clone()),
                    Err(e) => debug!("Visual config update rejected: {e}"),
                }
                let _ = reply.send(result);
            }
            SyncCommand::Print(reply) => {
                let title = self.print();
                let _ = reply.send(title);
            }
            SyncCommand::Shutdown => {}
        }
    }

    fn is_ready(&self) -> bool {
        self.surface.as_ref().is_some_and(PreviewSurface::is_attached)
    }

    fn phase(&self) -> SyncPhase {
        if !self.is_ready() {
            SyncPhase::NotReady
        } else if self.deadline.is_some() {
            SyncPhase::Syncing
        } else {
            SyncPhase::Idle
        }
    }

    /// Opens or restarts the debounce window. Input arriving while the surface
    /// is not ready is picked up by the sync that follows the load.
    fn schedule(&mut self) {
        if self.is_ready() {
            self.deadline = Some(Instant::now() + self.settings.debounce);
        }
    }

    fn on_visual_config(&mut self, config: VisualConfig) {
        if config == self.config {
            return;
        }
        save_visual_config(self.store.as_ref(), &config);

        let reload = self.config.needs_reload(&config);
        self.config = config;
        if reload {
            self.begin_load();
        } else {
            self.schedule();
        }
        self.publish_status();
    }

    /// Tears down the current surface and starts loading the configured template.
    fn begin_load(&mut self) {
        self.generation += 1;
        self.deadline = None;
        self.surface_error = None;
        if let Some(surface) = self.surface.as_mut() {
            surface.detach();
        }
        self.preview.send_replace(None);

        let generation = self.generation;
        let template_id = self.config.template_id.clone();
        let templates = Arc::clone(&self.templates);
        let tx = self.loaded_tx.clone();
        info!("Loading template '{template_id}' (generation {generation})");

        tokio::spawn(async move {
            let result = templates
                .load(&template_id)
                .await
                .map(|source| PreviewSurface::from_template(&template_id, &source))
                .map_err(|e| format!("{e:#}"));
            let _ = tx.send(SurfaceLoaded { generation, result }).await;
        });

        self.publish_status();
    }

    fn on_surface_loaded(&mut self, event: SurfaceLoaded) {
        if event.generation != self.generation {
            debug!(
                "Discarding stale surface load (generation {}, current {})",
                event.generation, self.generation
            );
            return;
        }

        match event.result {
            Ok(surface) => {
                info!(
                    "Surface ready: template '{}' with {} elements",
                    surface.template_id,
                    surface.elements.len()
                );
                self.surface = Some(surface);
                self.surface_error = None;
                self.deadline = None;
                self.sync();
            }
            Err(message) => {
                error!("Template load failed: {message}");
                self.surface = None;
                self.surface_error = Some(message);
                self.publish_status();
            }
        }
    }

    /// Runs one sync cycle: normalize, persist accepted input, project.
    fn sync(&mut self) {
        let Some(surface) = self.surface.as_mut().filter(|s| s.is_attached()) else {
            debug!("Sync skipped: surface not ready");
            return;
        };

        let document = match classify(&self.raw_input) {
            NormalizeOutcome::Empty => {
                self.validation_error = None;
                self.document = None;
                self.store.set_logged(DATA_KEY, &self.raw_input);
                None
            }
            NormalizeOutcome::Invalid(reason) => {
                debug!("Editor input rejected: {reason}");
                self.validation_error = Some(PARSE_ERROR_MESSAGE.to_string());
                None
            }
            NormalizeOutcome::Valid(doc) => {
                let doc = Arc::new(doc);
                self.validation_error = None;
                self.document = Some(Arc::clone(&doc));
                self.store.set_logged(DATA_KEY, &self.raw_input);
                Some(doc)
            }
        };

        project(surface, document.as_deref(), &self.config);
        self.revision += 1;
        debug!("Sync #{} complete", self.revision);

        self.preview.send_replace(Some(surface.clone()));
        self.publish_status();
    }

    /// The title comes from the name as rendered, which survives blank input.
    fn print(&mut self) -> Option<String> {
        let surface = self.surface.as_mut().filter(|s| s.is_attached())?;
        let shown_name = surface
            .element(ids::NAME)
            .filter(|e| e.display != Some(Display::None))
            .and_then(|e| e.text.as_deref())
            .filter(|t| !t.trim().is_empty());
        let title = print_title(shown_name);

        if let Err(e) = surface.request_print(&title) {
            warn!("Print request failed: {e}");
            return None;
        }
        self.preview.send_replace(Some(surface.clone()));
        Some(title)
    }

    fn publish_status(&self) {
        let status = SyncStatus {
            phase: self.phase(),
            revision: self.revision,
            template_id: self.config.template_id.clone(),
            visual_config: self.config.clone(),
            raw_input: self.raw_input.clone(),
            validation_error: self.validation_error.clone(),
            surface_error: self.surface_error.clone(),
            document: self.document.clone(),
        };
        self.status.send_replace(status);
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use serde_json::json;

    use crate::projection::Display;
    use crate::storage::MemoryStore;

    pub(crate) const TEMPLATE: &str = r#"
        <h1 id="nome"></h1><h2 id="cargo"></h2>
        <section id="section-experiencia"><div id="experiencias"></div></section>
        <section id="section-cursos"><ul id="cursos-lista"></ul></section>
    "#;

    /// In-memory templates with an optional per-template load delay.
    pub(crate) struct StaticTemplates {
        templates: HashMap<String, (String, Duration)>,
    }

    impl StaticTemplates {
        pub(crate) fn new() -> Self {
            Self {
                templates: HashMap::new(),
            }
        }

        pub(crate) fn with(mut self, id: &str, markup: &str, delay: Duration) -> Self {
            self.templates
                .insert(id.to_string(), (markup.to_string(), delay));
            self
        }

        pub(crate) fn standard() -> Self {
            Self::new()
                .with("model1.html", TEMPLATE, Duration::ZERO)
                .with("model2.html", TEMPLATE, Duration::ZERO)
        }
    }

    #[async_trait]
    impl TemplateSource for StaticTemplates {
        async fn load(&self, template_id: &str) -> anyhow::Result<String> {
            let (markup, delay) = self
                .templates
                .get(template_id)
                .ok_or_else(|| anyhow!("unknown template '{template_id}'"))?;
            tokio::time::sleep(*delay).await;
            Ok(markup.clone())
        }
    }

    fn session(raw: &str) -> Session {
        Session {
            raw_input: raw.to_string(),
            visual_config: VisualConfig::default(),
        }
    }

    fn start(raw: &str, templates: StaticTemplates) -> (SyncHandle, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let (handle, _task) = spawn_controller(
            session(raw),
            store.clone(),
            Arc::new(templates),
            SyncSettings::default(),
        );
        (handle, store)
    }

    pub(crate) async fn wait_until(
        handle: &SyncHandle,
        pred: impl FnMut(&SyncStatus) -> bool,
    ) -> SyncStatus {
        let mut rx = handle.subscribe();
        let status = tokio::time::timeout(Duration::from_secs(30), rx.wait_for(pred))
            .await
            .expect("timed out waiting for controller")
            .expect("controller stopped");
        status.clone()
    }

    fn name_text(handle: &SyncHandle) -> Option<String> {
        handle
            .preview()
            .and_then(|s| s.element("nome").and_then(|e| e.text.clone()))
    }

    fn palette_patch(palette: &str) -> VisualConfigPatch {
        VisualConfigPatch {
            palette: Some(palette.to_string()),
            ..Default::default()
        }
    }

    fn ana() -> String {
        json!({"nome": "Ana", "experiencias": [{"titulo": "Dev", "periodo": "2021"}]}).to_string()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_surface_syncs_immediately() {
        let (handle, _) = start(&ana(), StaticTemplates::standard());
        assert_eq!(handle.status().phase, SyncPhase::NotReady);

        let status = wait_until(&handle, |s| s.revision == 1).await;
        assert_eq!(status.phase, SyncPhase::Idle);
        assert_eq!(name_text(&handle).as_deref(), Some("Ana"));
        assert_eq!(status.document.unwrap().name.as_deref(), Some("Ana"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_latest_edit_within_window_is_projected() {
        let (handle, _) = start(&ana(), StaticTemplates::standard());
        wait_until(&handle, |s| s.revision == 1).await;

        for name in ["A", "B", "C"] {
            handle
                .submit_edit(json!({ "nome": name }).to_string())
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(handle.status().phase, SyncPhase::Syncing);
        assert_eq!(handle.status().revision, 1, "window still open");

        let status = wait_until(&handle, |s| s.revision >= 2).await;
        assert_eq!(status.revision, 2);
        assert_eq!(name_text(&handle).as_deref(), Some("C"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.status().revision, 2, "superseded syncs never run");
        assert_eq!(handle.status().phase, SyncPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_input_keeps_previous_preview() {
        let (handle, _) = start(&ana(), StaticTemplates::standard());
        wait_until(&handle, |s| s.revision == 1).await;
        let before = handle.preview().unwrap();

        handle.submit_edit("{nome: }".to_string()).await.unwrap();
        let status = wait_until(&handle, |s| s.revision == 2).await;

        assert_eq!(status.validation_error.as_deref(), Some(PARSE_ERROR_MESSAGE));
        assert_eq!(handle.preview().unwrap().elements, before.elements);
        assert_eq!(status.document.unwrap().name.as_deref(), Some("Ana"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_is_not_an_error() {
        let (handle, _) = start(&ana(), StaticTemplates::standard());
        wait_until(&handle, |s| s.revision == 1).await;

        handle.submit_edit("  ".to_string()).await.unwrap();
        let status = wait_until(&handle, |s| s.revision == 2).await;
        assert!(status.validation_error.is_none());
        assert!(status.document.is_none());
        assert_eq!(name_text(&handle).as_deref(), Some("Ana"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_clears_after_valid_edit() {
        let (handle, _) = start("{broken", StaticTemplates::standard());
        let status = wait_until(&handle, |s| s.revision == 1).await;
        assert!(status.validation_error.is_some());

        handle.submit_edit(ana()).await.unwrap();
        let status = wait_until(&handle, |s| s.revision == 2).await;
        assert!(status.validation_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_input_is_persisted() {
        let (handle, store) = start(&ana(), StaticTemplates::standard());
        wait_until(&handle, |s| s.revision == 1).await;
        assert_eq!(store.get(DATA_KEY).unwrap(), Some(ana()));

        handle.submit_edit("{nome: }".to_string()).await.unwrap();
        wait_until(&handle, |s| s.revision == 2).await;
        assert_eq!(store.get(DATA_KEY).unwrap(), Some(ana()), "invalid text is not saved");
    }

    #[tokio::test(start_paused = true)]
    async fn test_palette_change_is_debounced_and_applied() {
        let (handle, store) = start(&ana(), StaticTemplates::standard());
        wait_until(&handle, |s| s.revision == 1).await;

        let config = handle
            .update_visual_config(palette_patch("verde"))
            .await
            .unwrap();
        assert_eq!(config.palette_key, "verde");
        wait_until(&handle, |s| s.revision == 2).await;

        let preview = handle.preview().unwrap();
        assert_eq!(preview.root_variables["--primary-dark"], "#22543d");
        assert_eq!(preview.template_id, "model1.html", "no reload for palette");
        assert!(store
            .get(crate::storage::VISUAL_CONFIG_KEY)
            .unwrap()
            .unwrap()
            .contains("verde"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_partial_updates_both_land() {
        let (handle, _) = start(&ana(), StaticTemplates::standard());
        wait_until(&handle, |s| s.revision == 1).await;

        let font = VisualConfigPatch {
            font: Some("roboto".to_string()),
            ..Default::default()
        };
        let (a, b) = tokio::join!(
            handle.update_visual_config(palette_patch("rosa")),
            handle.update_visual_config(font),
        );
        a.unwrap();
        b.unwrap();

        let config = handle.status().visual_config;
        assert_eq!(config.palette_key, "rosa");
        assert_eq!(config.font_family, "'Roboto', sans-serif");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_update_changes_nothing() {
        let (handle, store) = start(&ana(), StaticTemplates::standard());
        wait_until(&handle, |s| s.revision == 1).await;

        let err = handle
            .update_visual_config(VisualConfigPatch {
                palette: Some("azul".to_string()),
                font: Some("Comic Sans".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::InvalidVisualConfig(VisualConfigError::UnknownFont(_))
        ));
        assert_eq!(handle.status().visual_config, VisualConfig::default());
        assert_eq!(
            store.get(crate::storage::VISUAL_CONFIG_KEY).unwrap(),
            None
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_template_change_reloads_then_syncs() {
        let (handle, _) = start(&ana(), StaticTemplates::standard());
        wait_until(&handle, |s| s.revision == 1).await;

        handle
            .update_visual_config(VisualConfigPatch {
                model: Some("model2.html".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let status = wait_until(&handle, |s| s.revision == 2).await;
        assert_eq!(status.phase, SyncPhase::Idle);
        let preview = handle.preview().unwrap();
        assert_eq!(preview.template_id, "model2.html");
        assert_eq!(
            preview.element("nome").unwrap().display,
            Some(Display::InlineBlock)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_before_ready_are_applied_on_load() {
        let templates =
            StaticTemplates::new().with("model1.html", TEMPLATE, Duration::from_secs(2));
        let (handle, _) = start(&ana(), templates);

        handle
            .submit_edit(json!({"nome": "Bia"}).to_string())
            .await
            .unwrap();
        assert_eq!(handle.status().phase, SyncPhase::NotReady);

        let status = wait_until(&handle, |s| s.revision == 1).await;
        assert_eq!(name_text(&handle).as_deref(), Some("Bia"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.status().revision, status.revision);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_template_load_is_discarded() {
        let templates = StaticTemplates::new()
            .with("model1.html", TEMPLATE, Duration::from_millis(500))
            .with("model2.html", TEMPLATE, Duration::from_millis(10));
        let (handle, _) = start(&ana(), templates);

        handle
            .update_visual_config(VisualConfigPatch {
                model: Some("model2.html".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        wait_until(&handle, |s| s.revision == 1).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(handle.status().revision, 1);
        assert_eq!(handle.preview().unwrap().template_id, "model2.html");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_template_load_is_reported() {
        let (handle, _) = start(&ana(), StaticTemplates::new());
        let status = wait_until(&handle, |s| s.surface_error.is_some()).await;
        assert_eq!(status.phase, SyncPhase::NotReady);
        assert!(status.surface_error.unwrap().contains("unknown template"));
        assert!(handle.preview().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_print_uses_document_name() {
        let (handle, _) = start(
            &json!({"nome": "Ana Maria Silva"}).to_string(),
            StaticTemplates::standard(),
        );
        wait_until(&handle, |s| s.revision == 1).await;

        let title = handle.request_print().await.unwrap();
        assert_eq!(title.as_deref(), Some("CV_Ana_Maria_Silva"));
        assert_eq!(handle.preview().unwrap().print_requests, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_print_keeps_rendered_name_after_blank_input() {
        let (handle, _) = start(
            &json!({"nome": "Ana Maria"}).to_string(),
            StaticTemplates::standard(),
        );
        wait_until(&handle, |s| s.revision == 1).await;

        handle.submit_edit("  ".to_string()).await.unwrap();
        let status = wait_until(&handle, |s| s.revision == 2).await;
        assert!(status.document.is_none());

        let title = handle.request_print().await.unwrap();
        assert_eq!(title.as_deref(), Some("CV_Ana_Maria"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_print_falls_back_when_name_is_hidden() {
        let (handle, _) = start(
            &json!({"nome": "  ", "cargo": "Dev"}).to_string(),
            StaticTemplates::standard(),
        );
        wait_until(&handle, |s| s.revision == 1).await;

        let title = handle.request_print().await.unwrap().unwrap();
        assert_eq!(title, crate::export::print_title(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_print_without_surface_is_refused() {
        let templates =
            StaticTemplates::new().with("model1.html", TEMPLATE, Duration::from_secs(5));
        let (handle, _) = start(&ana(), templates);
        assert_eq!(handle.request_print().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_controller() {
        let store = Arc::new(MemoryStore::new());
        let (handle, task) = spawn_controller(
            session(&ana()),
            store,
            Arc::new(StaticTemplates::standard()),
            SyncSettings::default(),
        );
        handle.shutdown().await.unwrap();
        task.await.unwrap();
        assert!(matches!(
            handle.submit_edit(ana()).await,
            Err(SyncError::Stopped)
        ));
    }
}
