#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

pub const ACTOR_PATH: &str = "subprojects/engine/src/main/java/pi/actor/Actor.java";
pub const COUNTING_PATH: &str = "subprojects/demos/src/main/java/demos/basics/Counting.java";

pub fn docsnip_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("docsnip"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("DOCSNIP_LOG");
	cmd
}

pub fn write(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

/// A repository with one class, one demo of 30 numbered lines and a single
/// docs page referencing both.
pub fn sample_repo() -> std::io::Result<TempDir> {
	let tmp = tempfile::tempdir()?;
	let root = tmp.path();

	write(
		root,
		ACTOR_PATH,
		"package pi.actor;\n\npublic class Actor {\n}\n",
	)?;
	let counting: String = (1..=30).map(|n| format!("line {n}\n")).collect();
	write(root, COUNTING_PATH, &counting)?;
	write(
		root,
		"docs/index.md",
		"# Actors\n\n{{ class('pi.actor.Actor') }}\n\n{{ code('basics/Counting', line=2, link=false) }}\n",
	)?;

	Ok(tmp)
}
