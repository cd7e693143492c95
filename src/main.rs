use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;

use gridview::config::config::Config;
use gridview::data::loader;
use gridview::data::table::TableBuffer;
use gridview::ui::viewer::{Exit, ReloadState, Viewer};

const USAGE: &str = "gridview - terminal viewer for delimited tabular data

Usage:
  gridview [OPTIONS] FILE

Options:
  --delimiter <char>   Force the field delimiter ('\\t' for tab)
  --tab                Shorthand for --delimiter '\\t'
  --width <n|max|mode> Startup column width policy: a fixed width in
                       cells, the longest cell, or the most common
                       cell length per column
  --help               Show this help
  --version            Show the version

Press ? inside the viewer for the key bindings.
";

fn main() -> Result<()> {
    gridview::utils::logging::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") || args.is_empty() {
        print!("{}", USAGE);
        return Ok(());
    }
    if args.iter().any(|a| a == "--version") {
        println!("gridview {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let delimiter = parse_delimiter(&args)?;
    let path = input_path(&args)?;

    let mut config = Config::load().unwrap_or_default();
    if let Some(width) = option_value(&args, "--width") {
        apply_width_override(&mut config, &width)?;
    }

    let mut records = loader::load_path(&path, delimiter)?;
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    // The terminal session spans reloads; only quit or an error tears it
    // down, and teardown runs even on the error path.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_session(&mut terminal, &path, &name, &mut records, &config, delimiter);

    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
    res
}

fn run_session(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    path: &Path,
    name: &str,
    records: &mut Vec<Vec<String>>,
    config: &Config,
    delimiter: Option<u8>,
) -> Result<()> {
    let mut pending: Option<ReloadState> = None;
    loop {
        let size = terminal.size()?;
        let table = TableBuffer::from_records(name.to_string(), records.clone())?;
        let mut viewer = match pending.take() {
            Some(state) => Viewer::restore(table, config, state, (size.width, size.height)),
            None => Viewer::new(table, config, (size.width, size.height)),
        };
        match viewer.run(terminal)? {
            Exit::Quit => return Ok(()),
            Exit::Reload(state) => {
                // A reload that fails keeps showing the data we have.
                match loader::load_path(path, delimiter) {
                    Ok(fresh) => *records = fresh,
                    Err(e) => warn!(target: "loader", "reload failed: {}", e),
                }
                pending = Some(state);
            }
        }
    }
}

fn parse_delimiter(args: &[String]) -> Result<Option<u8>> {
    if args.iter().any(|a| a == "--tab") {
        return Ok(Some(b'\t'));
    }
    let Some(value) = option_value(args, "--delimiter") else {
        return Ok(None);
    };
    let value = if value == "\\t" {
        "\t".to_string()
    } else {
        value
    };
    match value.as_bytes().first() {
        Some(&b) => Ok(Some(b)),
        None => anyhow::bail!("--delimiter needs a character"),
    }
}

fn option_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

fn apply_width_override(config: &mut Config, width: &str) -> Result<()> {
    if let Ok(fixed) = width.parse::<u16>() {
        config.display.width_mode = "fixed".to_string();
        config.display.fixed_width = fixed.max(1);
        return Ok(());
    }
    match width {
        "max" | "mode" | "fixed" => {
            config.display.width_mode = width.to_string();
            Ok(())
        }
        other => anyhow::bail!("unknown width policy '{}' (want a number, max or mode)", other),
    }
}

fn input_path(args: &[String]) -> Result<PathBuf> {
    let value_slots: Vec<usize> = args
        .iter()
        .enumerate()
        .filter(|(_, a)| *a == "--delimiter" || *a == "--width")
        .map(|(i, _)| i + 1)
        .collect();
    args.iter()
        .enumerate()
        .filter(|(i, a)| !a.starts_with('-') && !value_slots.contains(i))
        .map(|(_, a)| PathBuf::from(a))
        .next()
        .ok_or_else(|| anyhow::anyhow!("no input file given\n\n{}", USAGE))
}
