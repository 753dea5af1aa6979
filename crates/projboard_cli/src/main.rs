//! Terminal host for the project board.
//!
//! # Responsibility
//! - Mount the board on an in-memory document and drive it with line
//!   commands read from stdin.
//! - Route every user action through the same DOM events a browser would fire.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use projboard_core::view::project_list::section_element_id;
use projboard_core::{
    init_logging, AppConfig, DomEvent, EventKind, MemoryDocument, ProjectBoard, ProjectState,
    ProjectStatus, RenderSurface,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

const HELP: &str = "commands:
  add <title> | <description> | <people>
  drag <project-id> <active|finished>
  move <project-id> <active|finished>
  show
  json
  help
  quit";

#[derive(Parser, Debug)]
#[command(name = "projboard", version, about = "Drag-and-drop project board")]
struct Cli {
    /// JSON config file; defaults apply for missing keys.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; stderr when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.log).context("failed to initialize logging")?;

    let document = Rc::new(MemoryDocument::with_app_templates(&config.host_element_id));
    let surface: Rc<dyn RenderSurface> = document.clone();
    let board = ProjectBoard::mount(surface, ProjectState::shared(), &config)
        .context("failed to mount project board")?;
    info!("event=cli_ready module=cli status=ok");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{HELP}")?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        if let Err(err) = run_command(&document, &board, line, &mut stdout) {
            writeln!(stdout, "error: {err:#}")?;
        }
        for alert in document.take_alerts() {
            writeln!(stdout, "alert: {alert}")?;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config `{}`", path.display()))?;
            serde_json::from_str::<AppConfig>(&raw)
                .with_context(|| format!("failed to parse config `{}`", path.display()))?
        }
        None => AppConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log.dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

fn run_command(
    document: &MemoryDocument,
    board: &ProjectBoard,
    line: &str,
    out: &mut impl Write,
) -> Result<()> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "add" => {
            let fields = rest.split('|').map(str::trim).collect::<Vec<_>>();
            let [title, description, people] = fields.as_slice() else {
                bail!("usage: add <title> | <description> | <people>");
            };
            for (id, value) in [
                ("title", title),
                ("description", description),
                ("people", people),
            ] {
                let field = document.element_by_id_required(id)?;
                document.set_input_value(field, value)?;
            }
            document.dispatch_to("user-input", &mut DomEvent::new(EventKind::Submit))?;
        }
        "drag" => {
            let (project_id, bucket) = parse_target(rest)?;
            let mut start = DomEvent::new(EventKind::DragStart);
            document.dispatch_to(project_id, &mut start)?;
            let transfer = start.into_data_transfer().unwrap_or_default();

            let section = section_element_id(bucket);
            let mut over = DomEvent::drag(EventKind::DragOver, transfer.clone());
            document.dispatch_to(&section, &mut over)?;
            if !over.default_prevented() {
                bail!("{section} refused the drag payload");
            }
            document.dispatch_to(&section, &mut DomEvent::drag(EventKind::Drop, transfer))?;
            document.dispatch_to(project_id, &mut DomEvent::new(EventKind::DragEnd))?;
        }
        "move" => {
            let (project_id, bucket) = parse_target(rest)?;
            let outcome = board.store().move_project(project_id, bucket);
            writeln!(out, "{outcome:?}")?;
        }
        "show" => write!(out, "{}", document.outline(MemoryDocument::BODY))?,
        "json" => {
            let snapshot = board.store().snapshot();
            writeln!(out, "{}", serde_json::to_string_pretty(snapshot.as_slice())?)?;
        }
        "help" => writeln!(out, "{HELP}")?,
        other => bail!("unknown command `{other}`; try `help`"),
    }
    Ok(())
}

fn parse_target(rest: &str) -> Result<(&str, ProjectStatus)> {
    let mut parts = rest.split_whitespace();
    let (Some(project_id), Some(bucket), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("usage: <command> <project-id> <active|finished>");
    };
    Ok((project_id, bucket.parse::<ProjectStatus>()?))
}
