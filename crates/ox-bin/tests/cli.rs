use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const NEW_COMMIT: &str = "\n# Please enter the commit message for your changes. Lines starting\n# with '#' will be ignored, and an empty message aborts the commit.\n#\n# On branch main\n";
const AMENDED_COMMIT: &str = "Fix frobnicator\n\n# Please enter the commit message for your changes.\n#\n";

struct Repo {
    dir: tempfile::TempDir,
    path: PathBuf,
}

impl Repo {
    fn new(content: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join(".git");
        std::fs::create_dir(&git).unwrap();
        let path = git.join("COMMIT_EDITMSG");
        std::fs::write(&path, content).unwrap();
        Self { dir, path }
    }

    fn crumbs(&self) -> PathBuf {
        self.dir.path().join("crumbs.json")
    }

    /// The binary with a sandboxed data directory, no config file and no
    /// incomplete-session store.
    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_oxcommit"));
        cmd.current_dir(self.dir.path())
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("OXCOMMIT_RESUME_INCOMPLETE", "0")
            .env("OXCOMMIT_BREADCRUMBS", self.crumbs())
            .env_remove("OXCOMMIT_VCS")
            .arg(&self.path)
            .arg("--config")
            .arg(self.dir.path().join("absent.toml"));
        cmd
    }

    fn content(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap()
    }
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn exit_status_in(crumbs: &Path) -> i64 {
    let raw = std::fs::read_to_string(crumbs).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["exitStatus"].as_i64().unwrap()
}

#[test]
fn message_flag_commits() {
    let repo = Repo::new(NEW_COMMIT);
    let output = repo
        .command()
        .args(["--message", "Hello there\nThat is okay."])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        repo.content(),
        format!("Hello there\n\nThat is okay.{NEW_COMMIT}")
    );
    assert_eq!(exit_status_in(&repo.crumbs()), 0);
}

#[test]
fn cancel_of_amended_message_fails() {
    let repo = Repo::new(AMENDED_COMMIT);
    let output = repo.command().arg("--cancel").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(repo.content(), AMENDED_COMMIT);
    assert_eq!(exit_status_in(&repo.crumbs()), 1);
}

#[test]
fn cancel_of_new_message_succeeds() {
    let repo = Repo::new(NEW_COMMIT);
    let output = repo.command().arg("--cancel").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(repo.content(), NEW_COMMIT);
}

#[test]
fn annotations_are_printed_as_json() {
    let subject = "Hello there what is going on now and what will happen when I overflows";
    let repo = Repo::new(NEW_COMMIT);
    let output = repo
        .command()
        .args(["--message", subject, "--annotations"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["textOverflowRanges"],
        serde_json::json!([{ "location": 69, "length": 1 }])
    );
}

#[test]
fn stdin_message_replaces_commit_text() {
    let repo = Repo::new(AMENDED_COMMIT);
    let output = run_with_stdin(repo.command(), "Reworded subject\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        repo.content(),
        AMENDED_COMMIT.replacen("Fix frobnicator", "Reworded subject", 1)
    );
    // The template is shown on stderr, stdout stays clean.
    assert!(String::from_utf8_lossy(&output.stderr).contains("# Please enter"));
    assert!(output.stdout.is_empty());
}

#[test]
fn stdin_body_keeps_every_line() {
    let repo = Repo::new(AMENDED_COMMIT);
    let output = run_with_stdin(repo.command(), "Reworded\n\nBody one\nBody two\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        repo.content(),
        "Reworded\n\nBody one\nBody two\n\n# Please enter the commit message for your changes.\n#\n"
    );
}

#[test]
fn message_flag_body_keeps_every_line() {
    let repo = Repo::new(NEW_COMMIT);
    let output = repo
        .command()
        .args(["--message", "Subject\nLine one\nLine two"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        repo.content(),
        format!("Subject\n\nLine one\nLine two{NEW_COMMIT}")
    );
}

#[test]
fn message_flag_replaces_amended_subject() {
    let repo = Repo::new(AMENDED_COMMIT);
    let output = repo
        .command()
        .args(["--message", "Reworded subject"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        repo.content(),
        AMENDED_COMMIT.replacen("Fix frobnicator", "Reworded subject", 1)
    );
}

#[test]
fn empty_stdin_cancels() {
    let repo = Repo::new(NEW_COMMIT);
    let output = run_with_stdin(repo.command(), "\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(repo.content(), NEW_COMMIT);
}

#[test]
fn missing_commit_file_is_fatal() {
    let repo = Repo::new(NEW_COMMIT);
    std::fs::remove_file(&repo.path).unwrap();
    let output = repo.command().arg("--cancel").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("COMMIT_EDITMSG"));
}
