use anyhow::{Context, Result, bail};
use polyview_base::PuzzleViewState;
use polyview_board::{render_board, render_gallery};
use polyview_cli::output::{self, BOARD_STEM, GALLERY_STEM};
use polyview_cli::{HELP, Session, SessionCommand, parse_line};
use polyview_io::{HttpBackend, MeshParams, MeshSource, PuzzleBackend, SolveParams, save_mesh};
use polyview_viewer::ViewerSyncController;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::cli::{
    CliArgs, Command, ExportArgs, GenerateArgs, PreviewArgs, RenderArgs, SessionArgs, SolveArgs,
    session_config,
};

pub async fn run(args: CliArgs) -> Result<()> {
    let backend = Arc::new(HttpBackend::new(args.backend));
    match args.command {
        Command::Generate(args) => generate(backend, args).await,
        Command::Render(args) => render(args),
        Command::Solve(args) => solve(backend, args).await,
        Command::Export(args) => export(backend, args).await,
        Command::Preview(args) => preview(backend, args).await,
        Command::Session(args) => session(backend, args).await,
    }
}

async fn generate(backend: Arc<HttpBackend>, args: GenerateArgs) -> Result<()> {
    let config = session_config(&args.canvas, None, Some(args.out_dir.clone()));
    let mut session = Session::new(
        backend,
        config,
        args.view,
        args.params.to_params(),
        MeshParams::default(),
    );
    let generated = session.generate().await;
    session.viewer().cancel_pending();
    if !generated? {
        bail!("{}", session.main_status().message);
    }
    println!("{}", session.main_status().message);
    println!("Board and gallery written to {}", args.out_dir.display());
    Ok(())
}

fn render(args: RenderArgs) -> Result<()> {
    let puzzle = output::read_puzzle(&args.puzzle)?;
    let mut state = PuzzleViewState::new(args.view);
    state.load(puzzle);
    let board = render_board(&state, args.canvas.width, args.canvas.height)
        .context("no puzzle to render")?;
    let gallery = render_gallery(&state, args.canvas.gallery_width, args.canvas.gallery_height)
        .context("no puzzle to render")?;
    output::write_drawing(&board, &args.out_dir, BOARD_STEM)?;
    output::write_drawing(&gallery, &args.out_dir, GALLERY_STEM)?;
    info!(view = %args.view, out_dir = %args.out_dir.display(), "puzzle rendered");
    println!("Board and gallery written to {}", args.out_dir.display());
    Ok(())
}

async fn solve(backend: Arc<HttpBackend>, args: SolveArgs) -> Result<()> {
    let params = SolveParams {
        max_solutions: args.max_solutions,
    };
    let count = backend.find_solutions(&params).await?;
    println!("{count} solutions found");
    Ok(())
}

async fn export(backend: Arc<HttpBackend>, args: ExportArgs) -> Result<()> {
    let params = args.mesh.to_params();
    params.validate()?;
    let blob = backend.build_mesh(&params).await?;
    let written = save_mesh(&blob, args.out.unwrap_or_default())?;
    info!(path = %written.display(), bytes = blob.len(), "mesh exported");
    println!("Mesh exported to {}", written.display());
    Ok(())
}

async fn preview(backend: Arc<HttpBackend>, args: PreviewArgs) -> Result<()> {
    let viewer = ViewerSyncController::new(backend, args.mesh.to_params());
    viewer.init(Some(args.viewer.viewport()));
    viewer.refresh_now().await?;
    viewer.orbit(args.yaw.to_radians(), args.pitch.to_radians());
    let frame = viewer.render_frame().context("3D viewer is not initialised")?;
    let written = output::write_png(&frame, &args.out)?;
    println!("Viewer frame written to {}", written.display());
    Ok(())
}

async fn session(backend: Arc<HttpBackend>, args: SessionArgs) -> Result<()> {
    let config = session_config(&args.canvas, Some(&args.viewer), args.out_dir.clone());
    let mut session = Session::new(
        backend,
        config,
        args.view,
        args.params.to_params(),
        args.mesh.to_params(),
    );
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read command")? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        if let Err(err) = dispatch(&mut session, command).await {
            eprintln!("{err:#}");
        }
    }

    session.viewer().cancel_pending();
    Ok(())
}

async fn dispatch(session: &mut Session<Arc<HttpBackend>>, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Generate => {
            let outcome = session.generate().await;
            println!("{}", session.main_status());
            outcome?;
        }
        SessionCommand::Solve(max) => {
            if session.solve(max).await {
                session.save_drawings()?;
            }
            println!("{}", session.main_status());
            println!("{}", session.state().solution_label());
        }
        SessionCommand::Next => navigated(session, Session::next_solution)?,
        SessionCommand::Prev => navigated(session, Session::prev_solution)?,
        SessionCommand::Original => navigated(session, Session::show_original)?,
        SessionCommand::View(mode) => {
            session.set_view(mode);
            session.save_drawings()?;
            println!("View: {mode}");
        }
        SessionCommand::Set { name, value } => {
            session.set_mesh_param(&name, value)?;
            println!("{name} = {value}");
        }
        SessionCommand::Export(path) => {
            let written = session.export(path).await?;
            println!("Mesh exported to {}", written.display());
        }
        SessionCommand::Frame(path) => {
            let written = session.frame(path)?;
            println!("Viewer frame written to {}", written.display());
        }
        SessionCommand::Orbit { yaw_deg, pitch_deg } => session.orbit(yaw_deg, pitch_deg),
        SessionCommand::Zoom(factor) => session.zoom(factor),
        SessionCommand::Status => println!("{}", session.status_report()),
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => {}
    }
    Ok(())
}

fn navigated<B, F>(session: &mut Session<B>, step: F) -> Result<()>
where
    B: PuzzleBackend + MeshSource + Clone,
    F: FnOnce(&mut Session<B>) -> String,
{
    let label = step(session);
    session.save_drawings()?;
    println!("{label}");
    Ok(())
}
