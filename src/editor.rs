use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::notes::CursorPosition;

const FALLBACK_EDITORS: &[&str] = &["nvim", "vim", "nano", "vi"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
	pub program: PathBuf,
	pub args: Vec<String>,
}

impl Editor {
	/// Splits an editor command line such as `code -w` into program and args.
	pub fn parse(cmd: &str) -> Option<Self> {
		let mut words = cmd.split_whitespace();
		let program = PathBuf::from(words.next()?);
		Some(Editor { program, args: words.map(str::to_string).collect() })
	}

	fn name(&self) -> String {
		self.program.file_stem().map(|s| s.to_string_lossy().to_lowercase()).unwrap_or_default()
	}

	/// Arguments that open `path` with the cursor at `pos`, as far as the
	/// editor is known to support it.
	pub fn open_args(&self, path: &Path, pos: CursorPosition) -> Vec<OsString> {
		let line = pos.line + 1;
		let col = pos.column + 1;
		let mut out: Vec<OsString> = self.args.iter().map(OsString::from).collect();
		let at = |sep: &str| {
			let mut s = path.as_os_str().to_os_string();
			s.push(format!("{sep}{line}{sep}{col}"));
			s
		};
		match self.name().as_str() {
			"vi" | "vim" | "nvim" => {
				out.push(format!("+{}", line).into());
				out.push(path.into());
			}
			"nano" => {
				out.push(format!("+{},{}", line, col).into());
				out.push(path.into());
			}
			"micro" | "kak" | "emacs" => {
				out.push(format!("+{}:{}", line, col).into());
				out.push(path.into());
			}
			"hx" | "helix" => out.push(at(":")),
			"code" | "codium" => {
				out.push("-g".into());
				out.push(at(":"));
			}
			_ => out.push(path.into()),
		}
		out
	}

	pub fn open(&self, path: &Path, pos: CursorPosition) -> Result<()> {
		let args = self.open_args(path, pos);
		log::debug!("launching {} {:?}", self.program.display(), args);
		let status = Command::new(&self.program)
			.args(&args)
			.status()
			.with_context(|| format!("launch editor {}", self.program.display()))?;
		if !status.success() {
			bail!("editor {} exited with {}", self.program.display(), status);
		}
		Ok(())
	}
}

/// Picks the editor: explicit choice, then `$VISUAL`, `$EDITOR`, then the
/// first common editor on `PATH`. `None` means nothing usable was found.
pub fn resolve(explicit: Option<&str>) -> Option<Editor> {
	let from_env = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
	let chosen = explicit
		.map(str::to_string)
		.filter(|v| !v.trim().is_empty())
		.or_else(|| from_env("VISUAL"))
		.or_else(|| from_env("EDITOR"));
	if let Some(cmd) = chosen {
		return Editor::parse(&cmd);
	}
	FALLBACK_EDITORS
		.iter()
		.find_map(|name| which::which(name).ok())
		.map(|program| Editor { program, args: Vec::new() })
}
