use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;

mod editor;
mod notes;
mod sort;

use notes::Period;

#[derive(Parser)]
#[command(
	name = "weekly-notes",
	version,
	about = "Weekly and yearly Markdown notes",
	long_about = "Open (or create from a template) the note for the current week or year in a\nMarkdown vault, and sort bullet lists so struck-through items sink to the bottom.",
	after_help = "Examples:\n  weekly-notes week\n  weekly-notes --vault ~/notes year -d 2025-06-01\n  weekly-notes sort \"2025 Week 3.md\" --lines 8:20\n  pbpaste | weekly-notes sort | pbcopy"
)]
struct Cli {
	/// Vault directory holding the notes (default: platform data dir)
	#[arg(long = "vault", env = "WEEKLY_NOTES_VAULT", global = true)]
	vault: Option<PathBuf>,
	#[command(subcommand)]
	action: Action,
}

#[derive(Subcommand)]
enum Action {
	/// Open or create the note for the week containing a date (default today)
	Week {
		/// Date YYYY-MM-DD (default: today)
		#[arg(short = 'd', long = "date")]
		date: Option<String>,
		#[command(flatten)]
		open: OpenArgs,
	},
	/// Open or create the note for the year containing a date (default today)
	Year {
		/// Date YYYY-MM-DD (default: today)
		#[arg(short = 'd', long = "date")]
		date: Option<String>,
		#[command(flatten)]
		open: OpenArgs,
	},
	/// Sort a bullet list: open items first, ~~struck~~ items last
	Sort {
		/// Note to sort in place (default: read stdin, write stdout)
		file: Option<PathBuf>,
		/// Only sort lines START:END of the file (1-based, inclusive)
		#[arg(short = 'l', long = "lines", requires = "file")]
		lines: Option<String>,
	},
}

#[derive(clap::Args)]
struct OpenArgs {
	/// Only create/locate the note, do not launch an editor
	#[arg(long = "no-open")]
	no_open: bool,
	/// Editor command (default: $VISUAL, $EDITOR, then nvim/vim/nano/vi)
	#[arg(short = 'e', long = "editor", env = "WEEKLY_NOTES_EDITOR")]
	editor: Option<String>,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
	let cli = Cli::parse();
	match cli.action {
		Action::Week { date, open } => {
			let date = parse_or_today(date.as_deref())?;
			let vault = resolve_vault(cli.vault)?;
			open_period(&vault, Period::week_of(date), &open)?
		}
		Action::Year { date, open } => {
			let date = parse_or_today(date.as_deref())?;
			let vault = resolve_vault(cli.vault)?;
			open_period(&vault, Period::year_of(date), &open)?
		}
		Action::Sort { file, lines } => match file {
			Some(path) => {
				let range = lines.as_deref().map(parse_line_range).transpose()?;
				sort_file(&path, range)?
			}
			None => sort_stdin()?,
		},
	}
	Ok(())
}

fn parse_or_today(s: Option<&str>) -> Result<NaiveDate> {
	match s {
		Some(v) => parse_date(v),
		None => Ok(Local::now().date_naive()),
	}
}

fn parse_date(s: &str) -> Result<NaiveDate> {
	NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date: {}", s))
}

fn resolve_vault(flag: Option<PathBuf>) -> Result<PathBuf> {
	let dir = match flag {
		Some(dir) => dir,
		None => notes::default_vault()?,
	};
	log::debug!("vault: {}", dir.display());
	Ok(dir)
}

fn open_period(vault: &Path, period: Period, open: &OpenArgs) -> Result<()> {
	let note = notes::open_or_create(vault, period)?;
	println!("{} {}", if note.created { "Created" } else { "Opened" }, note.path.display());
	if open.no_open {
		return Ok(());
	}
	let Some(editor) = editor::resolve(open.editor.as_deref()) else {
		log::info!("no editor found, not opening {}", note.path.display());
		return Ok(());
	};
	let pos = notes::end_position_of(&note.path)?;
	editor.open(&note.path, pos)
}

fn notice_no_selection() {
	eprintln!("{}", "No text selected".yellow());
}

fn sort_stdin() -> Result<()> {
	let mut input = String::new();
	io::stdin().read_to_string(&mut input).context("read stdin")?;
	if input.is_empty() {
		notice_no_selection();
		return Ok(());
	}
	let sorted = sort::sort_bullets(&input);
	let mut out = io::stdout().lock();
	out.write_all(sorted.as_bytes()).context("write stdout")?;
	out.flush().context("write stdout")?;
	Ok(())
}

/// Parses `START:END` (or a single `N`) into a 1-based inclusive range.
fn parse_line_range(s: &str) -> Result<(usize, usize)> {
	let (a, b) = s.split_once(':').unwrap_or((s, s));
	let start: usize = a.trim().parse().with_context(|| format!("invalid line range: {}", s))?;
	let end: usize = b.trim().parse().with_context(|| format!("invalid line range: {}", s))?;
	if start == 0 || end < start {
		bail!("invalid line range: {}", s);
	}
	Ok((start, end))
}

fn read_file(path: &Path) -> Result<String> {
	let mut f = OpenOptions::new().read(true).open(path).with_context(|| format!("open {}", path.display()))?;
	let mut s = String::new();
	f.read_to_string(&mut s).with_context(|| format!("read {}", path.display()))?;
	Ok(s)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
	fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

fn sort_file(path: &Path, range: Option<(usize, usize)>) -> Result<()> {
	let content = read_file(path)?;
	let Some((start, end)) = range else {
		if content.is_empty() {
			notice_no_selection();
			return Ok(());
		}
		let report = sort::sort_report(&content);
		if report.moved > 0 {
			write_file(path, &report.text)?;
		}
		println!("Sorted {} items in {}", report.bullets, path.display());
		return Ok(());
	};

	let body = content.strip_suffix('\n').unwrap_or(&content);
	let lines: Vec<&str> = if body.is_empty() { Vec::new() } else { body.split('\n').collect() };
	if end > lines.len() {
		bail!("line range {}:{} out of bounds ({} has {} lines)", start, end, path.display(), lines.len());
	}
	let selection = lines[start - 1..end].join("\n");
	if selection.is_empty() {
		notice_no_selection();
		return Ok(());
	}
	let report = sort::sort_report(&selection);
	if report.moved > 0 {
		let mut merged: Vec<&str> = lines[..start - 1].to_vec();
		merged.extend(report.text.split('\n'));
		merged.extend_from_slice(&lines[end..]);
		let mut out = merged.join("\n");
		if body.len() != content.len() {
			out.push('\n');
		}
		write_file(path, &out)?;
	}
	println!("Sorted {} items in {}", report.bullets, path.display());
	Ok(())
}
