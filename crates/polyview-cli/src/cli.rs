use clap::{Args, Parser, Subcommand};
use polyview_base::ViewMode;
use polyview_io::{DEFAULT_BACKEND_URL, GenerateParams, MeshParams, PartitionMode};
use polyview_cli::{CanvasSize, SessionConfig};
use polyview_viewer::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "polyview")]
#[command(about = "Polyomino puzzle viewer: board, gallery and 3D mesh preview")]
pub struct CliArgs {
    /// Base URL of the puzzle backend.
    #[arg(long, global = true, env = "POLYVIEW_BACKEND", default_value = DEFAULT_BACKEND_URL)]
    pub backend: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a puzzle and write board, gallery and puzzle.json.
    Generate(GenerateArgs),
    /// Render a saved puzzle.json offline.
    Render(RenderArgs),
    /// Ask the backend for solutions of its current puzzle.
    Solve(SolveArgs),
    /// Save the mesh of the current puzzle as STL.
    Export(ExportArgs),
    /// Load the mesh into the 3D viewer and write one frame as PNG.
    Preview(PreviewArgs),
    /// Interactive session reading commands from stdin.
    Session(SessionArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub params: GenParamArgs,
    #[command(flatten)]
    pub canvas: CanvasArgs,
    #[arg(long)]
    pub out_dir: PathBuf,
    #[arg(long, default_value_t = ViewMode::Isometric)]
    pub view: ViewMode,
}

#[derive(Args)]
pub struct RenderArgs {
    #[arg(long)]
    pub puzzle: PathBuf,
    #[command(flatten)]
    pub canvas: CanvasArgs,
    #[arg(long)]
    pub out_dir: PathBuf,
    #[arg(long, default_value_t = ViewMode::Isometric)]
    pub view: ViewMode,
}

#[derive(Args)]
pub struct SolveArgs {
    #[arg(long, default_value_t = 10)]
    pub max_solutions: usize,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[command(flatten)]
    pub mesh: MeshArgs,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[arg(long)]
    pub out: PathBuf,
    #[command(flatten)]
    pub mesh: MeshArgs,
    #[command(flatten)]
    pub viewer: ViewerArgs,
    /// Camera yaw applied before rendering, in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub yaw: f64,
    /// Camera pitch applied before rendering, in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pitch: f64,
}

#[derive(Args)]
pub struct SessionArgs {
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    #[arg(long, default_value_t = ViewMode::Isometric)]
    pub view: ViewMode,
    #[command(flatten)]
    pub params: GenParamArgs,
    #[command(flatten)]
    pub mesh: MeshArgs,
    #[command(flatten)]
    pub canvas: CanvasArgs,
    #[command(flatten)]
    pub viewer: ViewerArgs,
}

#[derive(Args)]
pub struct CanvasArgs {
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,
    #[arg(long, default_value_t = 400.0)]
    pub gallery_width: f32,
    #[arg(long, default_value_t = 600.0)]
    pub gallery_height: f32,
}

impl CanvasArgs {
    pub fn board(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    pub fn gallery(&self) -> CanvasSize {
        CanvasSize::new(self.gallery_width, self.gallery_height)
    }
}

#[derive(Args)]
pub struct ViewerArgs {
    #[arg(long, default_value_t = 640)]
    pub viewer_width: u32,
    #[arg(long, default_value_t = 480)]
    pub viewer_height: u32,
}

impl ViewerArgs {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewer_width, self.viewer_height)
    }
}

#[derive(Args)]
pub struct GenParamArgs {
    /// Grid rows (M).
    #[arg(long, default_value_t = 6)]
    pub rows: usize,
    /// Grid columns (N).
    #[arg(long, default_value_t = 6)]
    pub cols: usize,
    #[arg(long, default_value_t = 2)]
    pub min_size: usize,
    #[arg(long, default_value_t = 4)]
    pub max_size: usize,
    /// Border cell probability, percent.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub border_prob: u8,
    /// Air cell probability, percent.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub air_prob: u8,
    #[arg(long, default_value_t = PartitionMode::Balanced)]
    pub mode: PartitionMode,
}

impl GenParamArgs {
    pub fn to_params(&self) -> GenerateParams {
        GenerateParams {
            rows: self.rows,
            cols: self.cols,
            min_size: self.min_size,
            max_size: self.max_size,
            border_prob: f64::from(self.border_prob) / 100.0,
            air_prob: f64::from(self.air_prob) / 100.0,
            mode: self.mode,
        }
    }
}

#[derive(Args)]
pub struct MeshArgs {
    #[arg(long, default_value_t = 10.0)]
    pub cube_size: f64,
    /// Piece height in mm.
    #[arg(long = "piece-height", default_value_t = 2.0)]
    pub piece_height: f64,
    #[arg(long, default_value_t = 5.0)]
    pub gap_mm: f64,
    #[arg(long, default_value_t = 0.3)]
    pub tolerance_mm: f64,
    #[arg(long, default_value_t = 5.0)]
    pub border: f64,
    #[arg(long, default_value_t = 1.0)]
    pub base_thickness: f64,
    #[arg(long, default_value_t = 2.0)]
    pub wall_height: f64,
}

impl MeshArgs {
    pub fn to_params(&self) -> MeshParams {
        MeshParams {
            cube_size: self.cube_size,
            height: self.piece_height,
            gap_mm: self.gap_mm,
            tolerance_mm: self.tolerance_mm,
            border: self.border,
            base_thickness: self.base_thickness,
            wall_height: self.wall_height,
        }
    }
}

pub fn session_config(
    canvas: &CanvasArgs,
    viewer: Option<&ViewerArgs>,
    out_dir: Option<PathBuf>,
) -> SessionConfig {
    SessionConfig {
        board: canvas.board(),
        gallery: canvas.gallery(),
        viewport: viewer.map(ViewerArgs::viewport),
        out_dir,
    }
}
