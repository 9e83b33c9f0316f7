//! Adaptive gallery of individual pieces.
//!
//! Every piece gets its own square box and its own uniform scale, so large or
//! elongated pieces shrink to fit while small ones stay legible.

use polyview_base::{Cell, Piece, PieceBounds};
use polyview_paint::{
    Align2, Canvas, Color, DrawList, Fill, Point2, Rect, Stroke, piece_color, pos2, shade, vec2,
};

use crate::paint_background;

pub const GALLERY_PADDING: f32 = 10.0;
pub const NOMINAL_CELL_SCALE: f32 = 20.0;
pub const APPROX_BOX_WIDTH: f32 = NOMINAL_CELL_SCALE * 4.0 + 16.0;
pub const BOX_PADDING: f32 = 8.0;
pub const PIECE_PAD: f32 = 4.0;
pub const BADGE_RADIUS: f32 = 10.0;
pub const BADGE_INSET: f32 = 12.0;

pub fn column_count(piece_count: usize, usable_width: f32) -> usize {
    let mut cols = ((piece_count as f64).sqrt().floor() as usize).max(3);
    while cols > 1 && cols as f32 * APPROX_BOX_WIDTH > usable_width {
        cols -= 1;
    }
    cols
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GallerySlot {
    pub index: usize,
    pub frame: Rect,
    pub inner: Rect,
    pub cell_size: f32,
    pub origin: Point2,
    pub bounds: Option<PieceBounds>,
}

impl GallerySlot {
    /// Screen rectangle covered by the scaled piece.
    pub fn piece_rect(&self) -> Option<Rect> {
        let bounds = self.bounds?;
        Some(Rect::from_min_size(
            self.origin,
            vec2(
                bounds.width() as f32 * self.cell_size,
                bounds.height() as f32 * self.cell_size,
            ),
        ))
    }

    pub fn cell_rect(&self, cell: Cell) -> Option<Rect> {
        let bounds = self.bounds?;
        let min = pos2(
            self.origin.x + (cell.col - bounds.min_col) as f32 * self.cell_size,
            self.origin.y + (cell.row - bounds.min_row) as f32 * self.cell_size,
        );
        Some(Rect::from_min_size(min, vec2(self.cell_size, self.cell_size)))
    }

    pub fn badge_center(&self) -> Point2 {
        pos2(self.frame.right() - BADGE_INSET, self.frame.top() + BADGE_INSET)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryLayout {
    pub cols: usize,
    pub rows: usize,
    pub box_size: f32,
    pub slots: Vec<GallerySlot>,
}

impl GalleryLayout {
    pub fn compute(pieces: &[Piece], width: f32, height: f32) -> Self {
        let usable_width = (width - GALLERY_PADDING * 2.0).max(0.0);
        let usable_height = (height - GALLERY_PADDING * 2.0).max(0.0);
        let cols = column_count(pieces.len(), usable_width);
        let rows = pieces.len().div_ceil(cols);

        let mut box_size = usable_width / cols as f32;
        if rows > 0 && rows as f32 * box_size > usable_height {
            box_size = usable_height / rows as f32;
        }
        let inner_size = (box_size - BOX_PADDING * 2.0).max(0.0);

        let slots = pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| {
                let frame = Rect::from_min_size(
                    pos2(
                        GALLERY_PADDING + (index % cols) as f32 * box_size,
                        GALLERY_PADDING + (index / cols) as f32 * box_size,
                    ),
                    vec2(box_size, box_size),
                );
                let inner = Rect::from_min_size(
                    pos2(frame.min.x + BOX_PADDING, frame.min.y + BOX_PADDING),
                    vec2(inner_size, inner_size),
                );
                let bounds = piece.bounds();
                let (cell_size, origin) = match bounds {
                    Some(bounds) => fit_piece(bounds, inner),
                    None => (0.0, inner.center()),
                };
                GallerySlot {
                    index,
                    frame,
                    inner,
                    cell_size,
                    origin,
                    bounds,
                }
            })
            .collect();

        Self {
            cols,
            rows,
            box_size,
            slots,
        }
    }
}

// Uniform scale keeps the piece's aspect ratio.
fn fit_piece(bounds: PieceBounds, inner: Rect) -> (f32, Point2) {
    let size = inner.width();
    let piece_width = bounds.width() as f32;
    let piece_height = bounds.height() as f32;
    let scale = (size / (piece_width * NOMINAL_CELL_SCALE + PIECE_PAD))
        .min(size / (piece_height * NOMINAL_CELL_SCALE + PIECE_PAD));
    let cell_size = NOMINAL_CELL_SCALE * scale;
    let origin = pos2(
        inner.min.x + (size - piece_width * cell_size) / 2.0,
        inner.min.y + (size - piece_height * cell_size) / 2.0,
    );
    (cell_size, origin)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GalleryRenderer;

impl GalleryRenderer {
    pub fn render(&self, pieces: &[Piece], width: f32, height: f32) -> DrawList {
        let mut list = DrawList::new(width, height);
        paint_background(&mut list, width, height);

        let layout = GalleryLayout::compute(pieces, width, height);
        for (slot, piece) in layout.slots.iter().zip(pieces) {
            paint_slot(&mut list, slot, piece);
        }
        list
    }
}

fn paint_slot(canvas: &mut impl Canvas, slot: &GallerySlot, piece: &Piece) {
    let color = piece_color(slot.index);
    canvas.fill_rect(
        slot.frame.shrink(2.0),
        8.0,
        Fill::Solid(Color::WHITE.with_alpha(179)),
    );

    for &cell in piece.cells() {
        let Some(rect) = slot.cell_rect(cell) else {
            continue;
        };
        canvas.fill_rect(
            rect,
            2.0,
            Fill::linear(
                rect.min,
                pos2(rect.min.x, rect.max.y),
                color,
                shade(color, -20.0),
            ),
        );
        canvas.stroke_rect(rect, 2.0, Stroke::new(0.8, Color::BLACK.with_alpha(38)));
    }

    let badge = slot.badge_center();
    canvas.fill_circle(badge, BADGE_RADIUS, Fill::Solid(color));
    canvas.text(
        badge,
        Align2::CenterCenter,
        (slot.index + 1).to_string(),
        11.0,
        Color::WHITE,
    );
}
