//! Debounced mesh regeneration and hot-swap of the displayed model.

use parking_lot::Mutex;
use polyview_base::{StatusChannel, StatusLevel, StatusLine};
use polyview_io::{MeshParams, MeshSource, save_mesh};
use polyview_paint::DrawList;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::camera::{ViewerCameraState, Viewport};
use crate::debounce::{DEBOUNCE_WINDOW, Debouncer};
use crate::math::Bounds3;
use crate::mesh::ViewerMesh;
use crate::render::render_frame;
use crate::scene::ViewerScene;
use crate::{Result, ViewerError};

const CHANNEL: &str = StatusChannel::Viewer.as_str();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerPhase {
    Uninitialized,
    Ready { has_model: bool },
}

#[derive(Debug, Default)]
struct View {
    viewport: Option<Viewport>,
    scene: ViewerScene,
    camera: ViewerCameraState,
}

impl View {
    fn phase(&self) -> ViewerPhase {
        match self.viewport {
            None => ViewerPhase::Uninitialized,
            Some(_) => ViewerPhase::Ready {
                has_model: self.scene.has_model(),
            },
        }
    }
}

struct Shared<S> {
    source: S,
    params: Mutex<MeshParams>,
    view: Mutex<View>,
    debouncer: Debouncer,
    in_flight: Mutex<Option<AbortHandle>>,
    latest: AtomicU64,
    active: AtomicUsize,
    status: watch::Sender<StatusLine>,
}

/// Owns the 3D scene and camera, and keeps the displayed model in sync with
/// the mesh parameters.
///
/// Parameter changes are coalesced by a trailing debounce; at most one
/// refresh is in flight, a newer one aborts the older. The first model
/// loaded frames the camera, later swaps keep whatever the user set up.
/// Export requests never touch the refresh machinery.
pub struct ViewerSyncController<S: MeshSource> {
    shared: Arc<Shared<S>>,
}

impl<S: MeshSource> Clone for ViewerSyncController<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: MeshSource> ViewerSyncController<S> {
    pub fn new(source: S, params: MeshParams) -> Self {
        Self::with_debounce(source, params, DEBOUNCE_WINDOW)
    }

    pub fn with_debounce(source: S, params: MeshParams, window: Duration) -> Self {
        let (status, _) = watch::channel(StatusLine::default());
        Self {
            shared: Arc::new(Shared {
                source,
                params: Mutex::new(params),
                view: Mutex::new(View::default()),
                debouncer: Debouncer::new(window),
                in_flight: Mutex::new(None),
                latest: AtomicU64::new(0),
                active: AtomicUsize::new(0),
                status,
            }),
        }
    }

    /// Sets up scene and camera once. Without a mount point, or when already
    /// initialised, nothing happens and `false` is returned.
    pub fn init(&self, viewport: Option<Viewport>) -> bool {
        let Some(viewport) = viewport else {
            debug!(channel = CHANNEL, "no viewer mount point, skipping init");
            return false;
        };
        {
            let mut view = self.shared.view.lock();
            if view.viewport.is_some() {
                return false;
            }
            *view = View {
                viewport: Some(viewport),
                ..View::default()
            };
        }
        info!(width = viewport.width, height = viewport.height, "viewer initialised");
        self.shared.report(StatusLine::info("3D viewer initialised"));
        true
    }

    pub fn phase(&self) -> ViewerPhase {
        self.shared.view.lock().phase()
    }

    pub fn is_refreshing(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst) > 0
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.shared.debouncer.is_pending()
    }

    pub fn params(&self) -> MeshParams {
        *self.shared.params.lock()
    }

    pub fn set_params(&self, params: MeshParams) -> Result<()> {
        params.validate()?;
        *self.shared.params.lock() = params;
        self.schedule_refresh();
        Ok(())
    }

    pub fn update_param(&self, name: &str, value: f64) -> Result<()> {
        self.shared.params.lock().set(name, value)?;
        self.schedule_refresh();
        Ok(())
    }

    /// Restarts the debounce window; the refresh runs once it elapses quietly.
    pub fn schedule_refresh(&self) {
        let shared = Arc::clone(&self.shared);
        self.shared.debouncer.schedule(move || {
            shared.start_refresh();
        });
    }

    pub fn cancel_pending(&self) {
        self.shared.debouncer.cancel();
    }

    /// Starts a refresh right away, superseding any in flight.
    ///
    /// The viewer is never set up lazily here: before `init` the refresh
    /// fails with `NotMounted` and the backend is not called.
    pub fn request_refresh(&self) -> JoinHandle<Result<()>> {
        self.shared.start_refresh()
    }

    pub async fn refresh_now(&self) -> Result<()> {
        match self.shared.start_refresh().await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(ViewerError::Superseded),
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }

    /// One-shot mesh request written to `path` (forced to `.stl`).
    pub async fn export(&self, params: MeshParams, path: impl AsRef<Path>) -> Result<PathBuf> {
        let shared = &self.shared;
        shared.report(StatusLine::info("Exporting mesh…"));
        let outcome = shared.export(&params, path.as_ref()).await;
        match &outcome {
            Ok(written) => {
                shared.report(StatusLine::success(format!("Mesh exported to {}", written.display())));
            }
            Err(err) => shared.report(StatusLine::error(err.to_string())),
        }
        outcome
    }

    pub fn camera(&self) -> ViewerCameraState {
        self.shared.view.lock().camera
    }

    pub fn orbit(&self, yaw: f64, pitch: f64) {
        self.shared.view.lock().camera.orbit(yaw, pitch);
    }

    pub fn zoom(&self, factor: f64) {
        self.shared.view.lock().camera.zoom(factor);
    }

    pub fn scene_bounds(&self) -> Option<Bounds3> {
        self.shared.view.lock().scene.bounds()
    }

    pub fn scene_revision(&self) -> u64 {
        self.shared.view.lock().scene.revision()
    }

    /// Current frame, or `None` before `init`. Only snapshots the scene
    /// under the lock.
    pub fn render_frame(&self) -> Option<DrawList> {
        let (scene, camera, viewport) = {
            let view = self.shared.view.lock();
            (view.scene.clone(), view.camera, view.viewport?)
        };
        Some(render_frame(&scene, &camera, viewport))
    }

    pub fn status(&self) -> StatusLine {
        self.shared.status.borrow().clone()
    }

    /// Posts a message on the viewer status line.
    pub fn report(&self, line: StatusLine) {
        self.shared.report(line);
    }
}

impl<S: MeshSource> Shared<S> {
    fn start_refresh(self: &Arc<Self>) -> JoinHandle<Result<()>> {
        let mut in_flight = self.in_flight.lock();
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }
        let shared = Arc::clone(self);
        let task = tokio::spawn(async move { shared.refresh(ticket).await });
        *in_flight = Some(task.abort_handle());
        debug!(ticket, "refresh started");
        task
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    async fn refresh(self: Arc<Self>, ticket: u64) -> Result<()> {
        if self.view.lock().viewport.is_none() {
            let err = ViewerError::NotMounted;
            self.report(StatusLine::error(err.to_string()));
            return Err(err);
        }

        let _active = ActiveGuard::enter(&self.active);
        self.report(StatusLine::info("Generating and loading mesh…"));
        let params = *self.params.lock();
        let mesh = match self.load(&params).await {
            Ok(mesh) => mesh,
            Err(err) => {
                if self.is_current(ticket) {
                    self.report(StatusLine::error(err.to_string()));
                }
                return Err(err);
            }
        };

        if !self.apply(ticket, mesh) {
            return Err(ViewerError::Superseded);
        }
        self.report(StatusLine::success("Mesh loaded in viewer"));
        Ok(())
    }

    async fn export(&self, params: &MeshParams, path: &Path) -> Result<PathBuf> {
        params.validate()?;
        let blob = self.source.build_mesh(params).await?;
        save_mesh(&blob, path).map_err(|err| ViewerError::Export(format!("{err:#}")))
    }

    async fn load(&self, params: &MeshParams) -> Result<ViewerMesh> {
        let blob = self.source.build_mesh(params).await?;
        ViewerMesh::from_blob(&blob).map_err(|err| ViewerError::Geometry(format!("{err:#}")))
    }

    fn apply(&self, ticket: u64, mesh: ViewerMesh) -> bool {
        let mut view = self.view.lock();
        if !self.is_current(ticket) {
            debug!(ticket, "discarding superseded mesh");
            return false;
        }
        let triangles = mesh.triangle_count();
        let first_load = !view.scene.has_model();
        let previous = view.camera;

        view.scene.replace_group(mesh);
        if first_load {
            if let Some(bounds) = view.scene.bounds() {
                view.camera.frame_bounds(bounds);
            }
        } else {
            view.camera = previous;
        }
        info!(ticket, triangles, first_load, "mesh swapped into viewer");
        true
    }

    fn report(&self, line: StatusLine) {
        match line.level {
            StatusLevel::Error => warn!(channel = CHANNEL, "{}", line.message),
            _ => info!(channel = CHANNEL, "{}", line.message),
        }
        self.status.send_replace(line);
    }
}

struct ActiveGuard<'a>(&'a AtomicUsize);

impl<'a> ActiveGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
