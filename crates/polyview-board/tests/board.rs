use std::collections::HashSet;

use polyview_base::{Cell, Grid, Piece, Puzzle, PuzzleViewState, Result, ViewMode};
use polyview_board::{
    CellSource, DepthCompositor, GalleryLayout, collect_primitives, render_board, render_gallery,
};
use polyview_paint::{Color, SpecialPalette};

fn two_domino_puzzle() -> Result<Puzzle> {
    let grid = Grid::filled(4, 4, -1)?;
    Puzzle::new(
        grid,
        vec![
            Piece::from_coords(&[(0, 0), (0, 1)]),
            Piece::from_coords(&[(1, 0), (1, 1)]),
        ],
    )
}

#[test]
fn isometric_board_covers_every_cell_once() -> Result<()> {
    let puzzle = two_domino_puzzle()?;
    let compositor = DepthCompositor::default();
    let projector = compositor.projector(&puzzle, 800.0, 600.0);
    let primitives = collect_primitives(&puzzle, &projector, &compositor.palette);

    assert_eq!(primitives.len(), 16);
    let cells: HashSet<Cell> = primitives.iter().map(|p| p.cell).collect();
    assert_eq!(cells.len(), 16);

    let piece_colors: HashSet<Color> = primitives
        .iter()
        .filter(|p| matches!(p.source, CellSource::Piece(_)))
        .map(|p| p.color)
        .collect();
    assert_eq!(piece_colors.len(), 2);

    let air = primitives
        .iter()
        .filter(|p| p.color == SpecialPalette::ISOMETRIC.air)
        .count();
    assert_eq!(air, 12);
    assert!(primitives.windows(2).all(|w| w[0].depth_key <= w[1].depth_key));
    Ok(())
}

#[test]
fn board_and_gallery_need_a_puzzle() -> Result<()> {
    let mut state = PuzzleViewState::new(ViewMode::Isometric);
    assert!(render_board(&state, 800.0, 600.0).is_none());
    assert!(render_gallery(&state, 400.0, 600.0).is_none());

    state.load(two_domino_puzzle()?);
    let iso = render_board(&state, 800.0, 600.0).unwrap();
    // background + three faces per cell
    assert_eq!(iso.len(), 1 + 16 * 3);

    state.set_view_mode(ViewMode::Flat);
    let flat = render_board(&state, 800.0, 600.0).unwrap();
    assert_eq!(flat.len(), 1 + 16);

    let gallery = render_gallery(&state, 400.0, 600.0).unwrap();
    assert_eq!(gallery.texts().collect::<Vec<_>>(), vec!["1", "2"]);
    Ok(())
}

#[test]
fn gallery_pieces_fit_their_boxes() {
    let pieces = vec![
        Piece::from_coords(&[(0, 0)]),
        Piece::from_coords(&[(2, 0), (2, 1), (2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7)]),
        Piece::from_coords(&[(0, 5), (1, 5), (2, 5), (3, 5), (4, 5)]),
        Piece::from_coords(&[(4, 4), (4, 5), (5, 5), (6, 5), (6, 6)]),
        Piece::from_coords(&[(7, 7), (8, 8)]),
    ];
    for (width, height) in [(400.0, 600.0), (250.0, 900.0), (900.0, 150.0), (120.0, 120.0)] {
        let layout = GalleryLayout::compute(&pieces, width, height);
        assert_eq!(layout.slots.len(), pieces.len());

        for (slot, piece) in layout.slots.iter().zip(&pieces) {
            let rect = slot.piece_rect().unwrap();
            assert!(slot.inner.contains_rect(rect, 1e-3));

            let bounds = piece.bounds().unwrap();
            let expected = bounds.width() as f32 / bounds.height() as f32;
            assert!((rect.width() / rect.height() - expected).abs() < 1e-3);
        }

        for (i, a) in layout.slots.iter().enumerate() {
            for b in &layout.slots[i + 1..] {
                assert!(!a.frame.shrink(1e-3).intersects(b.frame));
            }
        }
    }
}
