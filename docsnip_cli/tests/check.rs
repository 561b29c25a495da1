mod common;

use docsnip_core::AnyEmptyResult;
use serde_json::Value;

fn render(tmp: &tempfile::TempDir) {
	common::docsnip_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();
}

#[test]
fn check_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = common::sample_repo()?;
	render(&tmp);

	common::docsnip_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed: all 1 page(s) are up to date."));

	Ok(())
}

#[test]
fn check_fails_when_output_is_missing() -> AnyEmptyResult {
	let tmp = common::sample_repo()?;

	common::docsnip_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("Stale pages:"))
		.stderr(predicates::str::contains("index.md -> site/index.md [missing]"))
		.stderr(predicates::str::contains("1 of 1 page(s) are out of date"));

	Ok(())
}

#[test]
fn check_shows_diff_for_outdated_pages() -> AnyEmptyResult {
	let tmp = common::sample_repo()?;
	render(&tmp);
	common::write(tmp.path(), "site/index.md", "# Actors\n\noutdated\n")?;

	common::docsnip_cmd()
		.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("[outdated]"))
		.stderr(predicates::str::contains("-outdated"))
		.stderr(predicates::str::contains("+``` java linenums=\"2\""));

	Ok(())
}

#[test]
fn check_json_format() -> AnyEmptyResult {
	let tmp = common::sample_repo()?;

	let output = common::docsnip_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.get_output()
		.stdout
		.clone();

	let json: Value = serde_json::from_slice(&output)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["checked"], 1);
	assert_eq!(json["stale"][0]["page"], "index.md");
	assert_eq!(json["stale"][0]["source"], "docs/index.md");
	assert_eq!(json["stale"][0]["output"], "site/index.md");
	assert_eq!(json["stale"][0]["missing"], Value::Bool(true));

	Ok(())
}

#[test]
fn check_github_format() -> AnyEmptyResult {
	let tmp = common::sample_repo()?;

	common::docsnip_cmd()
		.arg("check")
		.arg("--format")
		.arg("github")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains(
			"::warning file=docs/index.md,line=1::Rendered page `site/index.md` is out of date",
		));

	Ok(())
}

#[test]
fn check_reports_broken_reference_as_error() -> AnyEmptyResult {
	let tmp = common::sample_repo()?;
	common::write(
		tmp.path(),
		"docs/code.md",
		"{{ code('basics/Counting', start_line=20, end_line=10) }}\n",
	)?;

	common::docsnip_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("start line 20 is after end line 10"));

	Ok(())
}
