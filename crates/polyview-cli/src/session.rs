//! Interactive session: one puzzle state, its renderers and the 3D viewer.

use anyhow::{Context, Result, bail};
use polyview_base::{PuzzleViewState, StatusChannel, StatusLevel, StatusLine, ViewMode};
use polyview_board::{render_board, render_gallery};
use polyview_io::{EXPORT_FILE_NAME, GenerateParams, MeshParams, MeshSource, PuzzleBackend, SolveParams};
use polyview_paint::DrawList;
use polyview_viewer::{ViewerSyncController, Viewport};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::output::{self, BOARD_STEM, FRAME_FILE, GALLERY_STEM, PUZZLE_FILE};

const CHANNEL: &str = StatusChannel::Main.as_str();
const NO_PUZZLE: &str = "Generate a puzzle first";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub board: CanvasSize,
    pub gallery: CanvasSize,
    pub viewport: Option<Viewport>,
    pub out_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board: CanvasSize::new(800.0, 600.0),
            gallery: CanvasSize::new(400.0, 600.0),
            viewport: Some(Viewport::new(640, 480)),
            out_dir: None,
        }
    }
}

/// Owns the puzzle state and both status lines.
///
/// Board and gallery are redrawn synchronously after every state change.
/// Generation and solving report on the main channel; everything the 3D
/// viewer does reports on its own channel through the controller.
pub struct Session<B>
where
    B: PuzzleBackend + MeshSource + Clone,
{
    backend: B,
    config: SessionConfig,
    state: PuzzleViewState,
    gen_params: GenerateParams,
    main_status: StatusLine,
    viewer: ViewerSyncController<B>,
    board: Option<DrawList>,
    gallery: Option<DrawList>,
}

impl<B> Session<B>
where
    B: PuzzleBackend + MeshSource + Clone,
{
    pub fn new(
        backend: B,
        config: SessionConfig,
        view_mode: ViewMode,
        gen_params: GenerateParams,
        mesh_params: MeshParams,
    ) -> Self {
        let viewer = ViewerSyncController::new(backend.clone(), mesh_params);
        viewer.init(config.viewport);
        Self {
            backend,
            config,
            state: PuzzleViewState::new(view_mode),
            gen_params,
            main_status: StatusLine::default(),
            viewer,
            board: None,
            gallery: None,
        }
    }

    pub fn state(&self) -> &PuzzleViewState {
        &self.state
    }

    pub fn viewer(&self) -> &ViewerSyncController<B> {
        &self.viewer
    }

    pub fn main_status(&self) -> &StatusLine {
        &self.main_status
    }

    pub fn viewer_status(&self) -> StatusLine {
        self.viewer.status()
    }

    pub fn board(&self) -> Option<&DrawList> {
        self.board.as_ref()
    }

    pub fn gallery(&self) -> Option<&DrawList> {
        self.gallery.as_ref()
    }

    /// Requests a new puzzle. `Ok(false)` when the backend refuses or fails,
    /// keeping the previous puzzle and drawings. Once loaded, the puzzle
    /// stays even if writing the output files fails; that failure is
    /// reported on the main channel and returned as `Err`.
    pub async fn generate(&mut self) -> Result<bool> {
        self.report(StatusLine::info("Generating puzzle..."));
        if let Err(err) = self.gen_params.validate() {
            self.report(StatusLine::error(format!("Error: {err}")));
            return Ok(false);
        }
        let generated = match self.backend.generate(&self.gen_params).await {
            Ok(generated) => generated,
            Err(err) => {
                self.report(StatusLine::error(format!("Error: {err}")));
                return Ok(false);
            }
        };

        let pieces = generated.piece_count;
        self.state.load(generated.puzzle);
        self.redraw();
        self.viewer.schedule_refresh();
        if let Err(err) = self.save_drawings() {
            self.report(StatusLine::error(format!("Error: {err:#}")));
            return Err(err);
        }
        self.report(StatusLine::success(format!("{pieces} pieces generated")));
        Ok(true)
    }

    /// Searches solutions of the backend's current puzzle; refused locally
    /// while no puzzle is loaded.
    pub async fn solve(&mut self, max_solutions: usize) -> bool {
        if !self.state.has_puzzle() {
            self.report(StatusLine::error(NO_PUZZLE));
            return false;
        }
        self.report(StatusLine::info(format!("Searching {max_solutions} solutions...")));
        match self.backend.find_solutions(&SolveParams { max_solutions }).await {
            Ok(count) => {
                self.state.set_solution_count(count);
                self.redraw();
                self.report(StatusLine::success(format!("{count} solutions found")));
                true
            }
            Err(err) => {
                self.report(StatusLine::error(format!("Error: {err}")));
                false
            }
        }
    }

    pub fn next_solution(&mut self) -> String {
        self.state.next_solution();
        self.redraw();
        self.state.solution_label()
    }

    pub fn prev_solution(&mut self) -> String {
        self.state.prev_solution();
        self.redraw();
        self.state.solution_label()
    }

    pub fn show_original(&mut self) -> String {
        self.state.show_original();
        self.redraw();
        self.state.solution_label()
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        self.state.set_view_mode(mode);
        self.redraw();
        info!(view = %mode, "board view switched");
    }

    pub fn set_mesh_param(&mut self, name: &str, value: f64) -> Result<()> {
        self.viewer.update_param(name, value)?;
        Ok(())
    }

    /// Manual mesh export; reports on the viewer channel only.
    pub async fn export(&self, path: Option<PathBuf>) -> Result<PathBuf> {
        if !self.state.has_puzzle() {
            self.viewer.report(StatusLine::error(NO_PUZZLE));
            bail!(NO_PUZZLE);
        }
        let path = path.unwrap_or_else(|| self.out_path(EXPORT_FILE_NAME));
        let written = self.viewer.export(self.viewer.params(), &path).await?;
        Ok(written)
    }

    /// Writes the current viewer frame as PNG.
    pub fn frame(&self, path: Option<PathBuf>) -> Result<PathBuf> {
        let Some(list) = self.viewer.render_frame() else {
            bail!("3D viewer is not initialised");
        };
        let path = path.unwrap_or_else(|| self.out_path(FRAME_FILE));
        output::write_png(&list, &path)
    }

    pub fn orbit(&self, yaw_deg: f64, pitch_deg: f64) {
        self.viewer.orbit(yaw_deg.to_radians(), pitch_deg.to_radians());
    }

    pub fn zoom(&self, factor: f64) {
        self.viewer.zoom(factor);
    }

    pub fn status_report(&self) -> String {
        format!(
            "main:   {}\nviewer: {}\n{}",
            self.main_status,
            self.viewer.status(),
            self.state.solution_label()
        )
    }

    fn redraw(&mut self) {
        let CanvasSize { width, height } = self.config.board;
        self.board = render_board(&self.state, width, height);
        let CanvasSize { width, height } = self.config.gallery;
        self.gallery = render_gallery(&self.state, width, height);
    }

    /// Writes board, gallery and `puzzle.json` to the output directory, if any.
    pub fn save_drawings(&self) -> Result<()> {
        let Some(dir) = self.config.out_dir.as_deref() else {
            return Ok(());
        };
        if let Some(board) = &self.board {
            output::write_drawing(board, dir, BOARD_STEM)?;
        }
        if let Some(gallery) = &self.gallery {
            output::write_drawing(gallery, dir, GALLERY_STEM)?;
        }
        if let Some(puzzle) = self.state.puzzle() {
            output::write_puzzle(puzzle, &dir.join(PUZZLE_FILE))
                .context("save generated puzzle")?;
        }
        info!(dir = %dir.display(), "board and gallery written");
        Ok(())
    }

    fn out_path(&self, file_name: &str) -> PathBuf {
        match &self.config.out_dir {
            Some(dir) => dir.join(file_name),
            None => Path::new(file_name).to_path_buf(),
        }
    }

    fn report(&mut self, line: StatusLine) {
        match line.level {
            StatusLevel::Error => warn!(channel = CHANNEL, "{}", line.message),
            _ => info!(channel = CHANNEL, "{}", line.message),
        }
        self.main_status = line;
    }
}
