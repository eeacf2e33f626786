mod common;

use common::write_file;
use notemix_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;
use similar_asserts::assert_eq;

const MIXED_NOTES: &str = concat!(
	"<!-- Start: note1 -->\n# Note 1\nContent 1\n<!-- End: note1 -->\n\n",
	"<!-- Start: note2 -->\n# Note 2\nContent 2\n<!-- End: note2 -->\n\n",
);

fn sample_vault() -> std::io::Result<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "folder/note1.md", "# Note 1\nContent 1")?;
	write_file(tmp.path(), "folder/sub/note2.md", "# Note 2\nContent 2")?;
	write_file(tmp.path(), "folder/secret.md", "# Secret")?;
	write_file(tmp.path(), "folder/image.png", "png")?;
	Ok(tmp)
}

#[test]
fn mix_creates_document_next_to_folder() -> AnyEmptyResult {
	let tmp = sample_vault()?;

	common::notemix_cmd()
		.arg("mix")
		.arg("folder")
		.arg("--template")
		.arg("combined")
		.arg("--exclude")
		.arg("secret.md")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Mixing notes from folder..."))
		.stdout(predicates::str::contains("Created: folder/combined.md"))
		.stdout(predicates::str::contains("Mixed 2 note(s)"));

	let content = std::fs::read_to_string(tmp.path().join("folder/combined.md"))?;
	assert_eq!(content, MIXED_NOTES);

	Ok(())
}

#[test]
fn mix_uses_settings_file() -> AnyEmptyResult {
	let tmp = sample_vault()?;
	std::fs::create_dir(tmp.path().join("Exports"))?;
	write_file(
		tmp.path(),
		"notemix.toml",
		"exclude_glob = \"**/secret.md\"\ndefault_export_path = \"Exports\"\nfile_name_template \
		 = \"all\"\n",
	)?;

	common::notemix_cmd()
		.arg("mix")
		.arg("folder")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created: Exports/all.md"));

	let content = std::fs::read_to_string(tmp.path().join("Exports/all.md"))?;
	assert_eq!(content, MIXED_NOTES);

	Ok(())
}

#[test]
fn mix_updates_existing_document() -> AnyEmptyResult {
	let tmp = sample_vault()?;
	write_file(tmp.path(), "out.md", "stale")?;

	common::notemix_cmd()
		.arg("mix")
		.arg("folder")
		.arg("--dest")
		.arg("out")
		.arg("--exclude")
		.arg("**/secret.md")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated: out.md"));

	let content = std::fs::read_to_string(tmp.path().join("out.md"))?;
	assert_eq!(content, MIXED_NOTES);

	Ok(())
}

#[test]
fn mix_exports_to_absolute_path() -> AnyEmptyResult {
	let tmp = sample_vault()?;
	let outside = tempfile::tempdir()?;
	let destination = outside.path().join("mixed.md");

	common::notemix_cmd()
		.arg("mix")
		.arg("folder")
		.arg("--dest")
		.arg(&destination)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created: "));

	let content = std::fs::read_to_string(&destination)?;
	assert!(content.starts_with("<!-- Start: note1 -->"));
	assert!(content.contains("<!-- Start: secret -->"));

	Ok(())
}

#[test]
fn mix_vault_root() -> AnyEmptyResult {
	let tmp = sample_vault()?;
	write_file(tmp.path(), "top.md", "top")?;

	common::notemix_cmd()
		.arg("mix")
		.arg(".")
		.arg("--template")
		.arg("everything")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Mixing notes from /..."))
		.stdout(predicates::str::contains("Created: everything.md"))
		.stdout(predicates::str::contains("Mixed 4 note(s)"));

	Ok(())
}

#[test]
fn mix_missing_parent_folder_fails() -> AnyEmptyResult {
	let tmp = sample_vault()?;

	common::notemix_cmd()
		.arg("mix")
		.arg("folder")
		.arg("--dest")
		.arg("Missing/out.md")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stdout(predicates::str::contains("Error creating file"))
		.stderr(predicates::str::contains("failed to write `Missing/out.md`"));

	assert!(!tmp.path().join("Missing").exists());

	Ok(())
}

#[test]
fn mix_missing_folder_fails() -> AnyEmptyResult {
	let tmp = sample_vault()?;

	common::notemix_cmd()
		.arg("mix")
		.arg("nope")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stdout(predicates::str::contains("Mixing notes").not())
		.stderr(predicates::str::contains("no folder found at `nope`"));

	Ok(())
}

#[test]
fn mix_invalid_exclude_pattern_fails() -> AnyEmptyResult {
	let tmp = sample_vault()?;

	common::notemix_cmd()
		.arg("mix")
		.arg("folder")
		.arg("--exclude")
		.arg("[")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid exclude pattern"));

	Ok(())
}

#[test]
fn mix_dry_run_json_writes_nothing() -> AnyEmptyResult {
	let tmp = sample_vault()?;

	let output = common::notemix_cmd()
		.arg("mix")
		.arg("folder")
		.arg("--template")
		.arg("combined")
		.arg("--dry-run")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let value: Value = serde_json::from_slice(&output)?;
	assert_eq!(value["dry_run"], Value::Bool(true));
	assert_eq!(value["destination"], "folder/combined.md");
	assert_eq!(
		value["documents"],
		serde_json::json!(["folder/note1.md", "folder/sub/note2.md", "folder/secret.md"])
	);
	assert!(!tmp.path().join("folder/combined.md").exists());

	Ok(())
}

#[test]
fn mix_dry_run_text_lists_notes() -> AnyEmptyResult {
	let tmp = sample_vault()?;

	common::notemix_cmd()
		.arg("mix")
		.arg("folder")
		.arg("--dest")
		.arg("out.md")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Would mix 3 note(s) from folder into out.md"))
		.stdout(predicates::str::contains("  folder/sub/note2.md"));

	assert!(!tmp.path().join("out.md").exists());

	Ok(())
}

#[test]
fn mix_json_report() -> AnyEmptyResult {
	let tmp = sample_vault()?;

	let output = common::notemix_cmd()
		.arg("mix")
		.arg("folder")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let value: Value = serde_json::from_slice(&output)?;
	let destination = value["destination"].as_str().unwrap_or_default();
	assert_eq!(value["outcome"], "created");
	assert_eq!(value["folder"], "folder");
	assert!(destination.starts_with("folder/folder_"));
	assert!(destination.ends_with(".md"));
	assert!(tmp.path().join(destination).is_file());

	Ok(())
}
