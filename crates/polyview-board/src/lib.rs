use polyview_base::{PuzzleViewState, ViewMode};
use polyview_paint::{BACKGROUND_END, BACKGROUND_START, Canvas, DrawList, Fill, Rect, pos2};

pub mod compositor;
pub mod flat;
pub mod gallery;
pub mod projector;

pub use compositor::{CellSource, DepthCompositor, DrawPrimitive, collect_primitives, paint_cube};
pub use flat::{FLAT_CELL_CAP, FlatLayout, FlatRenderer};
pub use gallery::{GalleryLayout, GalleryRenderer, GallerySlot, column_count};
pub use projector::{ISOMETRIC_CELL_CAP, IsometricProjector};

/// Board image for the loaded puzzle in the active view mode.
pub fn render_board(state: &PuzzleViewState, width: f32, height: f32) -> Option<DrawList> {
    let puzzle = state.puzzle()?;
    Some(match state.view_mode() {
        ViewMode::Isometric => DepthCompositor::default().render(puzzle, width, height),
        ViewMode::Flat => FlatRenderer::default().render(puzzle, width, height),
    })
}

pub fn render_gallery(state: &PuzzleViewState, width: f32, height: f32) -> Option<DrawList> {
    let puzzle = state.puzzle()?;
    Some(GalleryRenderer.render(puzzle.pieces(), width, height))
}

pub fn paint_background(canvas: &mut impl Canvas, width: f32, height: f32) {
    canvas.fill_rect(
        Rect::from_points(pos2(0.0, 0.0), pos2(width, height)),
        0.0,
        Fill::linear(
            pos2(0.0, 0.0),
            pos2(width, height),
            BACKGROUND_START,
            BACKGROUND_END,
        ),
    );
}
