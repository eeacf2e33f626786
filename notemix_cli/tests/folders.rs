mod common;

use common::write_file;
use notemix_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use rstest::rstest;

fn vault() -> std::io::Result<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "Projects/Alpha/a.md", "a")?;
	write_file(tmp.path(), "Projects/Beta/b.md", "b")?;
	write_file(tmp.path(), "Projects/Beta/c.txt", "c")?;
	write_file(tmp.path(), "Archive/old.md", "old")?;
	write_file(tmp.path(), ".obsidian/app.json", "{}")?;
	Ok(tmp)
}

#[test]
fn folders_lists_every_folder() -> AnyEmptyResult {
	let tmp = vault()?;

	common::notemix_cmd()
		.arg("folders")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Projects/Alpha"))
		.stdout(predicates::str::contains("Projects/Beta"))
		.stdout(predicates::str::contains("Archive"))
		.stdout(predicates::str::contains("3 note(s)"))
		.stdout(predicates::str::contains(".obsidian").not());

	Ok(())
}

#[rstest]
#[case::case_insensitive("ALPHA", "Projects/Alpha", "Projects/Beta")]
#[case::top_level("archive", "Archive", "Projects")]
fn folders_filters_by_query(
	#[case] query: &str,
	#[case] shown: &str,
	#[case] hidden: &str,
) -> AnyEmptyResult {
	let tmp = vault()?;

	common::notemix_cmd()
		.arg("folders")
		.arg(query)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(shown))
		.stdout(predicates::str::contains("1 note(s)"))
		.stdout(predicates::str::contains(hidden).not());

	Ok(())
}
