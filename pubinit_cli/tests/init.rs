mod common;

use pubinit_core::AnyEmptyResult;
use pubinit_core::PubInitConfig;
use pubinit_core::UnresolvedPolicy;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::pubinit_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"))
		.stdout(predicates::str::contains("Next steps:"));

	let config_path = tmp.path().join("pubinit.toml");
	assert!(config_path.exists());

	let content = std::fs::read_to_string(&config_path)?;
	let config = PubInitConfig::from_toml(&content)?;
	assert_eq!(config.resolution.unresolved, UnresolvedPolicy::Error);
	assert_eq!(config.expansion_options().indent, "    ");

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join(".pubinit.toml");
	std::fs::write(&config_path, "# existing config\n")?;

	common::pubinit_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "# existing config\n");
	assert!(!tmp.path().join("pubinit.toml").exists());

	Ok(())
}
