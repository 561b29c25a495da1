mod common;

use docsnip_core::AnyEmptyResult;
use docsnip_core::DocsnipConfig;

#[test]
fn init_creates_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::docsnip_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"))
		.stdout(predicates::str::contains("docsnip render"));

	let config = DocsnipConfig::load(tmp.path())?;
	let Some(config) = config else {
		panic!("expected docsnip.toml to be created");
	};
	assert!(config.projects.contains_key("pi"));
	assert_eq!(config.source.revision, "main");

	Ok(())
}

#[test]
fn init_keeps_existing_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), ".docsnip.toml", "[projects]\ncore = \"core\"\n")?;

	common::docsnip_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert!(!tmp.path().join("docsnip.toml").exists());
	assert_eq!(
		std::fs::read_to_string(tmp.path().join(".docsnip.toml"))?,
		"[projects]\ncore = \"core\"\n"
	);

	Ok(())
}
