use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn notemix_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("notemix"));
	cmd.env("NO_COLOR", "1").env_remove("NOTEMIX_LOG");
	cmd
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}
