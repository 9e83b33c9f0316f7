use polyview_base::{Cell, Puzzle, PuzzleViewState, ViewMode};

#[test]
fn puzzle_loads_from_backend_json() -> Result<(), Box<dyn std::error::Error>> {
    let text = r#"{
        "grid": [[1, 1, 0], [2, 2, -1]],
        "pieces": [[[0, 0], [0, 1]], [[1, 0], [1, 1]]]
    }"#;
    let puzzle: Puzzle = serde_json::from_str(text)?;
    assert_eq!(puzzle.grid().rows(), 2);
    assert_eq!(puzzle.grid().cols(), 3);
    assert_eq!(puzzle.piece_count(), 2);
    assert_eq!(puzzle.owner(Cell::new(1, 1)), Some(1));

    let round = serde_json::to_value(&puzzle)?;
    assert_eq!(round["pieces"][1][0], serde_json::json!([1, 0]));
    Ok(())
}

#[test]
fn invalid_partition_fails_to_deserialize() {
    let text = r#"{"grid": [[1]], "pieces": [[[0, 0]], [[0, 0]]]}"#;
    assert!(serde_json::from_str::<Puzzle>(text).is_err());
}

#[test]
fn loading_resets_solution_cursor() -> Result<(), Box<dyn std::error::Error>> {
    let puzzle: Puzzle = serde_json::from_str(r#"{"grid": [[1, 1]], "pieces": [[[0, 0], [0, 1]]]}"#)?;
    let mut state = PuzzleViewState::new(ViewMode::Flat);
    state.load(puzzle.clone());
    state.set_solution_count(2);
    state.next_solution();
    assert_eq!(state.current_solution(), Some(0));

    state.load(puzzle);
    assert_eq!(state.solution_count(), 0);
    assert_eq!(state.current_solution(), None);
    assert_eq!(state.view_mode(), ViewMode::Flat);
    Ok(())
}
