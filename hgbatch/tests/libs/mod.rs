use {
    assert_cmd::Command,
    assert_fs::{TempDir, prelude::*},
    cmd_lib::run_cmd as rc___,
    std::path::{Path, PathBuf},
    test_context::TestContext,
};

pub const BASE: &str = "0123456789abcdef0123456789abcdef01234567";
pub const NODE_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const NODE_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

// Records its arguments, one invocation per line, and exits with the code found in
// `<subcommand>.exit` (or 0). Updating to "@" always works.
const FAKE_HG: &str = r#"#!/bin/sh
echo "$*" >> "@DIR@/calls"
echo "fake hg $1"
if [ "$1" = update ] && [ "$3" = @ ]; then
    exit 0
fi
if [ -f "@DIR@/$1.exit" ]; then
    exit "$(cat "@DIR@/$1.exit")"
fi
exit 0
"#;

#[allow(dead_code, reason = "The tests might not use all fields")]
pub struct HgContext {
    pub hgbatch: String,
    pub temp_dir: TempDir,
    /// The working copy that patches are "imported" into.
    pub dest: PathBuf,
    /// A directory of patches, outside the working copy.
    pub patches: PathBuf,
    pub hg: PathBuf,
    pub log: PathBuf,
    pub manifest: PathBuf,
}

impl TestContext for HgContext {
    fn setup() -> Self {
        let hgbatch = Command::cargo_bin("hgbatch")
            .unwrap()
            .get_program()
            .to_string_lossy()
            .to_string();

        let temp_dir = TempDir::new().unwrap();
        temp_dir.child("repo").create_dir_all().unwrap();
        temp_dir.child("patches").create_dir_all().unwrap();

        let hg = temp_dir.child("fake-hg");
        let dir = temp_dir.path().display().to_string();
        hg.write_str(&FAKE_HG.replace("@DIR@", &dir)).unwrap();
        let hg_path = hg.path().display().to_string();
        rc___!(chmod +x $hg_path).unwrap();

        Self {
            hgbatch,
            dest: temp_dir.path().join("repo"),
            patches: temp_dir.path().join("patches"),
            hg: hg.path().to_owned(),
            log: temp_dir.path().join("patchlog.log"),
            manifest: temp_dir.path().join("plist"),
            temp_dir, // Will drop temp dir automatically.
        }
    }
}

impl HgContext {
    /// A command for running hgbatch against the fake hg, without desktop notifications.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("hgbatch").unwrap();
        cmd.env_remove("PATCH_DEST")
            .arg("--dest")
            .arg(&self.dest)
            .arg("--hg")
            .arg(&self.hg)
            .arg("--log-file")
            .arg(&self.log)
            .arg("--manifest")
            .arg(&self.manifest)
            .arg("--no-notify");
        cmd
    }

    /// Writes an exported patch into the patch directory.
    pub fn patch(
        &self,
        name: &str,
        node: Option<&str>,
        parent: Option<&str>,
        title: &str,
    ) -> PathBuf {
        let mut text = String::from("# HG changeset patch\n# User Someone <someone@example.com>\n");
        if let Some(node) = node {
            text.push_str(&format!("# Node ID {node}\n"));
        }
        if let Some(parent) = parent {
            text.push_str(&format!("# Parent  {parent}\n"));
        }
        text.push_str(&format!("{title}\n\ndiff --git a/f b/f\n--- a/f\n+++ b/f\n"));

        let path = self.patches.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    /// Makes the fake `hg <subcommand>` exit with `code`.
    pub fn set_exit(&self, subcommand: &str, code: i32) {
        std::fs::write(
            self.temp_dir.path().join(format!("{subcommand}.exit")),
            code.to_string(),
        )
        .unwrap();
    }

    /// Every invocation of the fake hg so far.
    pub fn calls(&self) -> Vec<String> {
        read_lines(&self.temp_dir.path().join("calls"))
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_owned).collect())
        .unwrap_or_default()
}
