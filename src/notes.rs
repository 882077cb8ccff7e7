use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use directories::ProjectDirs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
	Week { year: i32, week: u32 },
	Year { year: i32 },
}

impl Period {
	pub fn week_of(date: NaiveDate) -> Self {
		Period::Week { year: date.year(), week: week_number(date) }
	}

	pub fn year_of(date: NaiveDate) -> Self {
		Period::Year { year: date.year() }
	}

	pub fn file_name(&self) -> String {
		match self {
			Period::Week { year, week } => format!("{} Week {}.md", year, week),
			Period::Year { year } => format!("{}.md", year),
		}
	}

	pub fn template(&self) -> String {
		let (up, tag) = match self {
			Period::Week { .. } => ("Weekly Todos", "weekly"),
			Period::Year { .. } => ("Yearly Todos", "yearly"),
		};
		format!("---\nup: \"[[{}]]\"\ntags:\n  - todo\n  - {}\n---\n", up, tag)
	}
}

/// Week of the year counted in Sunday-started rows, with January 1 always in
/// week 1: `ceil((days_since_jan1 + weekday_of_jan1 + 1) / 7)`, Sunday = 0.
/// Not ISO-8601; the week number restarts with each calendar year.
pub fn week_number(date: NaiveDate) -> u32 {
	let days = date.ordinal0();
	let jan1_dow = (date.weekday().num_days_from_sunday() + 7 - days % 7) % 7;
	(days + jan1_dow + 1 + 6) / 7
}

pub fn default_vault() -> Result<PathBuf> {
	let proj = ProjectDirs::from("dev", "local", "weekly_notes").context("cannot resolve project dirs")?;
	Ok(proj.data_dir().to_path_buf())
}

pub fn ensure_vault(dir: &Path) -> Result<()> {
	fs::create_dir_all(dir).with_context(|| format!("create vault dir {}", dir.display()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
	pub path: PathBuf,
	pub created: bool,
}

pub fn open_or_create(vault: &Path, period: Period) -> Result<NoteFile> {
	ensure_vault(vault)?;
	let path = vault.join(period.file_name());
	if path.is_file() {
		log::debug!("note exists: {}", path.display());
		return Ok(NoteFile { path, created: false });
	}
	if path.exists() {
		bail!("{} exists but is not a file", path.display());
	}
	create_note(&path, |f| f.write_all(period.template().as_bytes()))?;
	log::info!("created note {}", path.display());
	Ok(NoteFile { path, created: true })
}

/// Creates `path` exclusively and fills it with `write`. A failed write
/// removes the file again so the next run does not mistake it for a note.
fn create_note<F>(path: &Path, write: F) -> Result<()>
where
	F: FnOnce(&mut File) -> io::Result<()>,
{
	let mut f = match OpenOptions::new().write(true).create_new(true).open(path) {
		Ok(f) => f,
		Err(e) if e.kind() == ErrorKind::AlreadyExists => bail!("{} already exists", path.display()),
		Err(e) => return Err(e).with_context(|| format!("create {}", path.display())),
	};
	if let Err(e) = write(&mut f) {
		drop(f);
		if let Err(rm) = fs::remove_file(path) {
			log::warn!("could not remove partial note {}: {}", path.display(), rm);
		}
		return Err(e).with_context(|| format!("write {}", path.display()));
	}
	Ok(())
}

/// 0-based position, column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
	pub line: usize,
	pub column: usize,
}

pub fn end_position(text: &str) -> CursorPosition {
	let line = text.matches('\n').count();
	let last = text.rsplit('\n').next().unwrap_or("");
	CursorPosition { line, column: last.chars().count() }
}

pub fn end_position_of(path: &Path) -> Result<CursorPosition> {
	let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
	Ok(end_position(&s))
}
