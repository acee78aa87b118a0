use assert_cmd::Command;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tempfile::TempDir;

/// A scratch directory with an isolated environment for running `eqt`.
pub struct EqtWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl EqtWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().join("shop");
        std::fs::create_dir_all(&root).expect("create workspace root");
        Self { temp_dir, root }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".equipment")
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join("equipment.db")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

pub struct EqtRun {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl EqtRun {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("invalid JSON ({e}): {}", self.stdout))
    }
}

/// An `eqt` command in `dir` with the workspace's isolated environment.
pub fn eqt_cmd(workspace: &EqtWorkspace, dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("eqt").expect("eqt binary");
    cmd.current_dir(dir)
        .env("HOME", workspace.temp_dir.path())
        .env("XDG_CONFIG_HOME", workspace.temp_dir.path().join("xdg"))
        .env_remove("EQT_DB")
        .env_remove("EQT_PAGE_SIZE")
        .env_remove("EQT_LOG_DIR")
        .env_remove("EQT_LOG");
    cmd
}

/// Run `eqt` in the workspace root.
pub fn run_eqt<I, S>(workspace: &EqtWorkspace, args: I, label: &str) -> EqtRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_eqt_in(workspace, &workspace.root, args, label)
}

/// Run `eqt` from an arbitrary directory with the workspace's environment.
pub fn run_eqt_in<I, S>(workspace: &EqtWorkspace, dir: &Path, args: I, label: &str) -> EqtRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = eqt_cmd(workspace, dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("{label}: failed to spawn eqt: {e}"));
    EqtRun {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Run `eqt` and fail the test unless it exits successfully.
pub fn run_ok<I, S>(workspace: &EqtWorkspace, args: I, label: &str) -> EqtRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let run = run_eqt(workspace, args, label);
    assert!(
        run.status.success(),
        "{label} failed\nstdout: {}\nstderr: {}",
        run.stdout,
        run.stderr
    );
    run
}

/// `eqt --json add ...`, returning the new item's id.
pub fn add_item(workspace: &EqtWorkspace, name: &str, quantity: i64, extra: &[&str]) -> String {
    let qty = quantity.to_string();
    let mut args = vec!["--json", "add", name, "-n", qty.as_str()];
    args.extend_from_slice(extra);
    let run = run_ok(workspace, args, "add");
    run.json()["id"]
        .as_str()
        .expect("id in add output")
        .to_string()
}
