mod common;

use common::write_file;
use notemix_core::AnyEmptyResult;
use notemix_core::Settings;
use notemix_core::SettingsStore;
use notemix_core::TomlSettingsStore;
use similar_asserts::assert_eq;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::notemix_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created settings file"));

	let config_path = tmp.path().join("notemix.toml");
	assert!(config_path.exists());

	let content = std::fs::read_to_string(&config_path)?;
	assert!(content.contains("# File Name Template: "));
	assert!(content.contains("date_format = "));

	let settings = TomlSettingsStore::discover(tmp.path()).load()?;
	assert_eq!(settings, Settings::default());

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), ".notemix.toml", "existing config")?;

	common::notemix_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	let content = std::fs::read_to_string(tmp.path().join(".notemix.toml"))?;
	assert_eq!(content, "existing config");
	assert!(!tmp.path().join("notemix.toml").exists());

	Ok(())
}
