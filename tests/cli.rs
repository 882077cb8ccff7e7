use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cmd() -> Command {
	let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("weekly-notes"));
	cmd.env_remove("WEEKLY_NOTES_VAULT").env_remove("WEEKLY_NOTES_EDITOR").env_remove("RUST_LOG");
	cmd
}

#[test]
fn week_creates_note_from_template_then_reopens() {
	let temp = tempdir().unwrap();

	cmd()
		.arg("--vault")
		.arg(temp.path())
		.args(["week", "--date", "2023-01-08", "--no-open"])
		.assert()
		.success()
		.stdout(predicate::str::starts_with("Created").and(predicate::str::contains("2023 Week 2.md")));

	let path = temp.path().join("2023 Week 2.md");
	let content = fs::read_to_string(&path).unwrap();
	assert_eq!(content, "---\nup: \"[[Weekly Todos]]\"\ntags:\n  - todo\n  - weekly\n---\n");

	fs::write(&path, format!("{content}- carried over\n")).unwrap();
	cmd()
		.arg("--vault")
		.arg(temp.path())
		.args(["week", "-d", "2023-01-14", "--no-open"])
		.assert()
		.success()
		.stdout(predicate::str::starts_with("Opened"));
	assert!(fs::read_to_string(&path).unwrap().ends_with("- carried over\n"));
}

#[test]
fn year_note_uses_vault_from_env() {
	let temp = tempdir().unwrap();

	cmd()
		.env("WEEKLY_NOTES_VAULT", temp.path())
		.args(["year", "-d", "2025-06-01", "--no-open"])
		.assert()
		.success();

	let content = fs::read_to_string(temp.path().join("2025.md")).unwrap();
	assert!(content.contains("up: \"[[Yearly Todos]]\""));
	assert!(content.contains("  - yearly"));
}

#[test]
fn week_launches_editor_with_note_path() {
	let temp = tempdir().unwrap();

	// `true` accepts any arguments and exits 0
	cmd()
		.arg("--vault")
		.arg(temp.path())
		.args(["week", "-d", "2024-03-01", "--editor", "true"])
		.assert()
		.success();
	assert!(temp.path().join("2024 Week 9.md").is_file());
}

#[test]
fn failing_editor_is_reported() {
	let temp = tempdir().unwrap();

	cmd()
		.arg("--vault")
		.arg(temp.path())
		.args(["year", "--editor", "false"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("exited with"));
}

#[test]
fn invalid_date_fails() {
	let temp = tempdir().unwrap();

	cmd()
		.arg("--vault")
		.arg(temp.path())
		.args(["week", "-d", "2025-13-01", "--no-open"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("invalid date"));
}

#[test]
fn sort_filters_stdin_to_stdout() {
	cmd()
		.arg("sort")
		.write_stdin("- a\n- ~~b~~\n- c")
		.assert()
		.success()
		.stdout("- a\n- c\n- ~~b~~");
}

#[test]
fn sort_keeps_plain_lines_in_place() {
	cmd()
		.arg("sort")
		.write_stdin("intro line\n- ~~b~~\n- a\n")
		.assert()
		.success()
		.stdout("intro line\n- a\n- ~~b~~\n");
}

#[test]
fn sort_without_bullets_echoes_input() {
	cmd().arg("sort").write_stdin("plain text only").assert().success().stdout("plain text only");
}

#[test]
fn empty_selection_shows_notice() {
	cmd()
		.arg("sort")
		.write_stdin("")
		.assert()
		.success()
		.stdout("")
		.stderr(predicate::str::contains("No text selected"));
}

#[test]
fn sort_file_range_in_place() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("list.md");
	fs::write(&path, "# Tasks\n- ~~ship~~\n- review\n\n- ~~untouched~~\n- tail\n").unwrap();

	cmd()
		.arg("sort")
		.arg(&path)
		.args(["--lines", "2:3"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Sorted 2 items"));

	assert_eq!(fs::read_to_string(&path).unwrap(), "# Tasks\n- review\n- ~~ship~~\n\n- ~~untouched~~\n- tail\n");
}

#[test]
fn lines_without_file_is_a_usage_error() {
	cmd().args(["sort", "--lines", "1:2"]).write_stdin("- a").assert().failure();
}

#[test]
fn no_editor_available_still_creates_note() {
	let temp = tempdir().unwrap();

	cmd()
		.env_remove("VISUAL")
		.env_remove("EDITOR")
		.env("PATH", "")
		.arg("--vault")
		.arg(temp.path())
		.args(["week", "-d", "2024-03-01"])
		.assert()
		.success()
		.stdout(predicate::str::starts_with("Created").and(predicate::str::contains("2024 Week 9.md")));
	assert!(temp.path().join("2024 Week 9.md").is_file());
}

#[test]
fn empty_file_shows_notice_and_stays_empty() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("empty.md");
	fs::write(&path, "").unwrap();

	cmd()
		.arg("sort")
		.arg(&path)
		.assert()
		.success()
		.stderr(predicate::str::contains("No text selected"));
	assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn blank_line_range_shows_notice() {
	let temp = tempdir().unwrap();
	let path = temp.path().join("list.md");
	fs::write(&path, "- ~~a~~\n\n- b\n").unwrap();

	cmd()
		.arg("sort")
		.arg(&path)
		.args(["--lines", "2:2"])
		.assert()
		.success()
		.stderr(predicate::str::contains("No text selected"));
	assert_eq!(fs::read_to_string(&path).unwrap(), "- ~~a~~\n\n- b\n");
}

#[test]
fn dangling_symlink_blocks_note_creation() {
	#[cfg(unix)]
	{
		let temp = tempdir().unwrap();
		std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("2024.md")).unwrap();

		cmd()
			.arg("--vault")
			.arg(temp.path())
			.args(["year", "-d", "2024-03-01", "--no-open"])
			.assert()
			.failure()
			.stderr(predicate::str::contains("2024.md already exists"));
	}
}

#[test]
fn debug_logging_reports_sort_statistics_for_stdin() {
	cmd()
		.env("RUST_LOG", "debug")
		.arg("sort")
		.write_stdin("- ~~a~~\n- b\n- c")
		.assert()
		.success()
		.stdout("- b\n- c\n- ~~a~~")
		.stderr(predicate::str::contains("sorted 3 bullets (1 struck, 3 moved)"));
}

#[test]
fn default_log_level_hides_debug_output() {
	cmd()
		.arg("sort")
		.write_stdin("- ~~a~~\n- b")
		.assert()
		.success()
		.stderr("");
}
