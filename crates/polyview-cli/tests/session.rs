use anyhow::Result;
use parking_lot::Mutex;
use polyview_base::{Grid, Piece, Puzzle, StatusLevel, ViewMode};
use polyview_cli::{Session, SessionConfig};
use polyview_io::{
    BackendError, GenerateParams, GeneratedPuzzle, MeshBlob, MeshParams, MeshSource, PuzzleBackend,
    SolveParams,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Default)]
struct Calls {
    generate: AtomicUsize,
    solve: AtomicUsize,
    mesh: Mutex<Vec<MeshParams>>,
}

#[derive(Clone, Default)]
struct FakeBackend {
    calls: Arc<Calls>,
    fail: Arc<AtomicBool>,
    solutions: Arc<AtomicUsize>,
}

impl FakeBackend {
    fn mesh_calls(&self) -> Vec<MeshParams> {
        self.calls.mesh.lock().clone()
    }

    fn rejected(&self) -> polyview_io::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(BackendError::Rejected("max_size must be >= min_size".to_string()));
        }
        Ok(())
    }
}

impl PuzzleBackend for FakeBackend {
    async fn generate(&self, _params: &GenerateParams) -> polyview_io::Result<GeneratedPuzzle> {
        self.calls.generate.fetch_add(1, Ordering::SeqCst);
        self.rejected()?;
        let puzzle = two_domino_puzzle()?;
        Ok(GeneratedPuzzle {
            piece_count: puzzle.piece_count(),
            puzzle,
        })
    }

    async fn find_solutions(&self, _params: &SolveParams) -> polyview_io::Result<usize> {
        self.calls.solve.fetch_add(1, Ordering::SeqCst);
        self.rejected()?;
        Ok(self.solutions.load(Ordering::SeqCst))
    }
}

impl MeshSource for FakeBackend {
    async fn build_mesh(&self, params: &MeshParams) -> polyview_io::Result<MeshBlob> {
        self.calls.mesh.lock().push(*params);
        Ok(MeshBlob::new(tetrahedron_stl(params.cube_size as f32)))
    }
}

fn two_domino_puzzle() -> polyview_base::Result<Puzzle> {
    let grid = Grid::filled(4, 4, -1)?;
    Puzzle::new(
        grid,
        vec![
            Piece::from_coords(&[(0, 0), (0, 1)]),
            Piece::from_coords(&[(1, 0), (1, 1)]),
        ],
    )
}

fn tetrahedron_stl(size: f32) -> Vec<u8> {
    let p = [
        [0.0, 0.0, 0.0],
        [size, 0.0, 0.0],
        [0.0, size, 0.0],
        [0.0, 0.0, size],
    ];
    let faces = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&(faces.len() as u32).to_le_bytes());
    for face in faces {
        bytes.extend_from_slice(&[0u8; 12]);
        for idx in face {
            for coord in p[idx] {
                bytes.extend_from_slice(&f32::to_le_bytes(coord));
            }
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
    }
    bytes
}

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_nanos(),
        Err(_) => 0,
    };
    path.push(format!("polyview_{stamp}_{name}"));
    path
}

fn session(backend: &FakeBackend, out_dir: Option<PathBuf>) -> Session<FakeBackend> {
    let config = SessionConfig {
        out_dir,
        ..SessionConfig::default()
    };
    Session::new(
        backend.clone(),
        config,
        ViewMode::Isometric,
        GenerateParams::default(),
        MeshParams::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn generate_redraws_and_keeps_channels_apart() -> Result<()> {
    let backend = FakeBackend::default();
    let out_dir = temp_path("generate");
    let mut session = session(&backend, Some(out_dir.clone()));
    assert_eq!(session.viewer_status().message, "3D viewer initialised");

    assert!(session.generate().await?);
    assert_eq!(session.main_status().message, "2 pieces generated");
    assert_eq!(session.main_status().level, StatusLevel::Success);
    assert_eq!(session.board().map(|list| list.len()), Some(1 + 48));
    let badges: Vec<&str> = session.gallery().map(|list| list.texts().collect()).unwrap_or_default();
    assert_eq!(badges, ["1", "2"]);
    for file in ["board.svg", "board.png", "gallery.svg", "gallery.png", "puzzle.json"] {
        assert!(out_dir.join(file).exists(), "{file} missing");
    }
    let saved = polyview_cli::output::read_puzzle(&out_dir.join("puzzle.json"))?;
    assert_eq!(saved.piece_count(), 2);

    assert!(backend.mesh_calls().is_empty());
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(backend.mesh_calls().len(), 1);
    assert_eq!(session.viewer_status().message, "Mesh loaded in viewer");
    assert_eq!(session.main_status().message, "2 pieces generated");

    let _ = std::fs::remove_dir_all(&out_dir);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn unwritable_output_fails_generate() -> Result<()> {
    let backend = FakeBackend::default();
    let blocker = temp_path("blocker");
    std::fs::write(&blocker, b"not a directory")?;
    let mut session = session(&backend, Some(blocker.join("out")));

    assert!(session.generate().await.is_err());
    let status = session.main_status();
    assert!(status.is_error());
    assert!(status.message.starts_with("Error: "));
    assert!(!blocker.join("out").join("board.svg").exists());
    assert_eq!(session.state().puzzle().map(Puzzle::piece_count), Some(2));
    assert_eq!(session.viewer_status().message, "3D viewer initialised");

    let _ = std::fs::remove_file(&blocker);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_generate_keeps_previous_puzzle() -> Result<()> {
    let backend = FakeBackend::default();
    let mut session = session(&backend, None);
    assert!(session.generate().await?);
    let board = session.board().cloned();

    backend.fail.store(true, Ordering::SeqCst);
    assert!(!session.generate().await?);

    let status = session.main_status();
    assert!(status.is_error());
    assert_eq!(status.message, "Error: max_size must be >= min_size");
    assert_eq!(session.state().puzzle().map(Puzzle::piece_count), Some(2));
    assert_eq!(session.board().cloned(), board);
    assert_eq!(backend.calls.generate.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn solve_without_puzzle_is_refused_locally() {
    let backend = FakeBackend::default();
    let mut session = session(&backend, None);

    assert!(!session.solve(5).await);
    assert!(session.main_status().is_error());
    assert_eq!(session.main_status().message, "Generate a puzzle first");
    assert_eq!(backend.calls.solve.load(Ordering::SeqCst), 0);
    assert_eq!(session.viewer_status().message, "3D viewer initialised");
}

#[tokio::test(start_paused = true)]
async fn solve_resets_cursor_and_navigation_wraps() -> Result<()> {
    let backend = FakeBackend::default();
    backend.solutions.store(3, Ordering::SeqCst);
    let mut session = session(&backend, None);
    assert!(session.generate().await?);

    assert!(session.solve(10).await);
    assert_eq!(session.main_status().message, "3 solutions found");
    assert_eq!(session.state().solution_label(), "Solution: 0 (Original) | Found: 3");

    assert_eq!(session.next_solution(), "Solution: 1 | Found: 3");
    assert_eq!(session.next_solution(), "Solution: 2 | Found: 3");
    assert_eq!(session.show_original(), "Solution: 0 (Original) | Found: 3");
    assert_eq!(session.prev_solution(), "Solution: 3 | Found: 3");
    assert_eq!(session.next_solution(), "Solution: 1 | Found: 3");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn view_toggle_redraws_board() -> Result<()> {
    let backend = FakeBackend::default();
    let mut session = session(&backend, None);
    session.set_view(ViewMode::Flat);
    assert!(session.board().is_none());

    assert!(session.generate().await?);
    assert_eq!(session.board().map(|list| list.len()), Some(1 + 16));
    session.set_view(ViewMode::Isometric);
    assert_eq!(session.board().map(|list| list.len()), Some(1 + 48));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn mesh_param_burst_refreshes_viewer_once() -> Result<()> {
    let backend = FakeBackend::default();
    let mut session = session(&backend, None);

    for (step, value) in [12.0, 14.0, 16.0].into_iter().enumerate() {
        if step > 0 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        session.set_mesh_param("cube_size", value)?;
    }
    assert!(session.set_mesh_param("volume", 1.0).is_err());
    assert!(session.set_mesh_param("gap_mm", -1.0).is_err());

    tokio::time::sleep(Duration::from_secs(1)).await;
    let calls = backend.mesh_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].cube_size, 16.0);
    assert_eq!(calls[0].gap_mm, 5.0);
    assert_eq!(session.viewer_status().message, "Mesh loaded in viewer");
    assert_eq!(session.main_status().message, "");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn export_reports_on_viewer_channel() -> Result<()> {
    let backend = FakeBackend::default();
    let out_dir = temp_path("export");
    let mut session = session(&backend, Some(out_dir.clone()));

    assert!(session.export(None).await.is_err());
    assert_eq!(session.viewer_status().message, "Generate a puzzle first");
    assert!(backend.mesh_calls().is_empty());

    assert!(session.generate().await?);
    let written = session.export(None).await?;
    assert_eq!(written, out_dir.join("puzzle_project.stl"));
    assert!(written.exists());
    assert!(session.viewer_status().message.starts_with("Mesh exported to"));
    assert_eq!(session.main_status().message, "2 pieces generated");

    let _ = std::fs::remove_dir_all(&out_dir);
    Ok(())
}
