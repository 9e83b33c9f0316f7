//! Line commands of the interactive session.

use anyhow::{Context, Result, anyhow, bail};
use polyview_base::ViewMode;
use std::path::PathBuf;

pub const HELP: &str = "\
commands:
  generate                 generate a new puzzle
  solve <max>              search up to <max> solutions
  next | prev | original   move the solution cursor
  view <isometric|flat>    switch the board view
  set <param> <value>      change a mesh parameter
  export [file]            save the mesh (.stl)
  frame [file]             render the 3D viewer to PNG
  orbit <yaw> <pitch>      rotate the viewer camera (degrees)
  zoom <factor>            scale the viewer distance
  status                   show both status lines
  help | quit";

#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    Generate,
    Solve(usize),
    Next,
    Prev,
    Original,
    View(ViewMode),
    Set { name: String, value: f64 },
    Export(Option<PathBuf>),
    Frame(Option<PathBuf>),
    Orbit { yaw_deg: f64, pitch_deg: f64 },
    Zoom(f64),
    Status,
    Help,
    Quit,
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("generate" | "gen", []) => SessionCommand::Generate,
        ("solve", [max]) => SessionCommand::Solve(number(max, "max solutions")?),
        ("solve", []) => SessionCommand::Solve(10),
        ("next", []) => SessionCommand::Next,
        ("prev", []) => SessionCommand::Prev,
        ("original", []) => SessionCommand::Original,
        ("view", [mode]) => SessionCommand::View(mode.parse()?),
        ("set", [name, value]) => SessionCommand::Set {
            name: (*name).to_string(),
            value: number(value, name)?,
        },
        ("export", []) => SessionCommand::Export(None),
        ("export", [path]) => SessionCommand::Export(Some(PathBuf::from(path))),
        ("frame", []) => SessionCommand::Frame(None),
        ("frame", [path]) => SessionCommand::Frame(Some(PathBuf::from(path))),
        ("orbit", [yaw, pitch]) => SessionCommand::Orbit {
            yaw_deg: number(yaw, "yaw")?,
            pitch_deg: number(pitch, "pitch")?,
        },
        ("zoom", [factor]) => SessionCommand::Zoom(number(factor, "zoom factor")?),
        ("status", []) => SessionCommand::Status,
        ("help" | "?", []) => SessionCommand::Help,
        ("quit" | "exit", []) => SessionCommand::Quit,
        (
            "generate" | "gen" | "solve" | "next" | "prev" | "original" | "view" | "set" | "export"
            | "frame" | "orbit" | "zoom" | "status" | "help" | "quit" | "exit",
            _,
        ) => bail!("wrong arguments for '{head}', type 'help'"),
        _ => return Err(anyhow!("unknown command '{head}', type 'help'")),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(text: &str, what: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse().with_context(|| format!("invalid {what} '{text}'"))
}
