//! Runs the binary against stub `docker` and `s3cmd` scripts that log their
//! arguments, so the orchestration can be checked without a Docker daemon.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

const DOCKER_STUB: &str = r#"#!/bin/sh
echo "docker $*" >> "$STUB_LOG"
if [ "$1" = "volume" ] && [ "$2" = "ls" ]; then
    if [ -n "$STUB_LS_EXIT" ]; then
        echo "Cannot connect to the Docker daemon at unix:///var/run/docker.sock" >&2
        exit "$STUB_LS_EXIT"
    fi
    for volume in $STUB_VOLUMES; do
        echo "$volume"
    done
fi
if [ "$1" = "run" ] && [ -n "$STUB_RUN_EXIT" ]; then
    echo "tar: simulated failure" >&2
    exit "$STUB_RUN_EXIT"
fi
exit 0
"#;

const S3CMD_STUB: &str = r#"#!/bin/sh
echo "s3cmd $*" >> "$STUB_LOG"
if [ "$1" = "get" ]; then
    printf 'archive' > "$3"
fi
exit 0
"#;

struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let bin = temp.child("bin");
        bin.create_dir_all().unwrap();
        install_stub(&bin.path().join("docker"), DOCKER_STUB);
        install_stub(&bin.path().join("s3cmd"), S3CMD_STUB);
        temp.child("stub.log").touch().unwrap();
        Self { temp }
    }

    fn command(&self, volumes: &str) -> Command {
        let original = std::env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![self.temp.child("bin").path().to_path_buf()];
        paths.extend(std::env::split_paths(&original));
        let path = std::env::join_paths(paths).unwrap();

        let mut cmd = Command::cargo_bin("docker-volume-sync").expect("binary exists");
        cmd.env("PATH", path)
            .env("HOME", self.temp.path())
            .env("XDG_CONFIG_HOME", self.temp.child("xdg").path())
            .env("STUB_LOG", self.temp.child("stub.log").path())
            .env("STUB_VOLUMES", volumes)
            .env_remove("STUB_RUN_EXIT")
            .env_remove("STUB_LS_EXIT");
        cmd
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.temp.child("stub.log").path())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn path(&self) -> &Path {
        self.temp.path()
    }
}

fn install_stub(path: &Path, script: &str) {
    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn volume_to_file_archives_volume_through_helper_image() {
    let sandbox = Sandbox::new();
    let out = sandbox.path().join("out");

    sandbox
        .command("myvol")
        .arg("volume-to-file")
        .arg("myvol")
        .arg(out.join("myvol.tar"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Saving volume myvol to path ~/out/myvol.tar"));

    assert_eq!(
        sandbox.calls(),
        vec![
            "docker volume ls -q".to_string(),
            "docker build -t jt-docker-volume-backup .".to_string(),
            format!(
                "docker run --rm -v myvol:/data -v {}:/tmp jt-docker-volume-backup tar -caf /tmp/myvol.tar -C /data .",
                out.display()
            ),
        ]
    );
}

#[test]
fn volume_to_file_resolves_relative_paths() {
    let sandbox = Sandbox::new();
    let work = sandbox.temp.child("work");
    work.create_dir_all().unwrap();

    sandbox
        .command("myvol")
        .current_dir(work.path())
        .args(["volume-to-file", "myvol", "../backups/./myvol.tar.gz"])
        .assert()
        .success();

    let run = sandbox.calls().pop().unwrap();
    let expected_dir = fs::canonicalize(sandbox.path()).unwrap().join("backups");
    assert!(run.contains(&format!("-v {}:/tmp ", expected_dir.display())), "{run}");
    assert!(run.contains("tar -caf /tmp/myvol.tar.gz -C /data ."), "{run}");
}

#[test]
fn volume_to_file_skips_missing_volume() {
    let sandbox = Sandbox::new();

    sandbox
        .command("other")
        .args(["volume-to-file", "myvol"])
        .arg(sandbox.path().join("out/myvol.tar"))
        .assert()
        .success()
        .stderr(predicate::str::contains("does not exist, not saving."));

    assert_eq!(sandbox.calls(), vec!["docker volume ls -q"]);
    sandbox.temp.child("out").assert(predicate::path::missing());
}

#[test]
fn piped_logs_carry_no_colour_codes() {
    let sandbox = Sandbox::new();

    sandbox
        .command("other")
        .args(["volume-to-file", "myvol"])
        .arg(sandbox.path().join("myvol.tar"))
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn file_to_volume_extracts_without_clearing_volume() {
    let sandbox = Sandbox::new();
    let archive = sandbox.temp.child("myvol.tar");
    archive.write_str("archive").unwrap();

    sandbox
        .command("")
        .args(["--compression", "none", "file-to-volume"])
        .arg(archive.path())
        .arg("myvol2")
        .assert()
        .success();

    assert_eq!(
        sandbox.calls(),
        vec![
            "docker build -t jt-docker-volume-backup .".to_string(),
            format!(
                "docker run --rm -v myvol2:/data -v {}:/tmp:ro jt-docker-volume-backup tar -xf /tmp/myvol.tar -C /data",
                sandbox.path().display()
            ),
        ]
    );
}

#[test]
fn file_to_volume_requires_existing_archive() {
    let sandbox = Sandbox::new();

    sandbox
        .command("")
        .arg("file-to-volume")
        .arg(sandbox.path().join("absent.tar"))
        .arg("myvol")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Archive not found"));

    assert!(sandbox.calls().is_empty());
}

#[test]
fn volume_to_s3_uploads_staged_archive() {
    let sandbox = Sandbox::new();

    sandbox
        .command("myvol")
        .args(["volume-to-s3", "myvol", "s3://bucket/backups/myvol.tar.gz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uploaded volume myvol to s3://bucket/backups/myvol.tar.gz"));

    let calls = sandbox.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls[2].contains("tar -caf /tmp/myvol.tar.gz -C /data ."));
    assert!(calls[3].starts_with("s3cmd put "));
    assert!(calls[3].ends_with("/myvol.tar.gz s3://bucket/backups/myvol.tar.gz"));
}

#[test]
fn volume_to_s3_stops_when_archiving_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .command("myvol")
        .env("STUB_RUN_EXIT", "2")
        .args(["volume-to-s3", "myvol", "s3://bucket/myvol.tar.gz"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("exited with status 2"));

    assert!(sandbox.calls().iter().all(|call| !call.starts_with("s3cmd")));
}

#[test]
fn volume_to_s3_fails_when_daemon_is_unreachable() {
    let sandbox = Sandbox::new();

    sandbox
        .command("myvol")
        .env("STUB_LS_EXIT", "1")
        .args(["volume-to-s3", "myvol", "s3://bucket/myvol.tar.gz"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot connect to the Docker daemon"))
        .stdout(predicate::str::contains("Nothing to upload").not());

    assert_eq!(sandbox.calls(), vec!["docker volume ls -q"]);
}

#[test]
fn s3_to_volume_leaves_existing_volume_alone() {
    let sandbox = Sandbox::new();

    for _ in 0..2 {
        sandbox
            .command("myvol")
            .args(["s3-to-volume", "s3://bucket/myvol.tar.gz", "myvol"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Volume myvol already exists, not restoring."));
    }

    assert_eq!(sandbox.calls(), vec!["docker volume ls -q", "docker volume ls -q"]);
}

#[test]
fn s3_to_volume_restores_missing_volume() {
    let sandbox = Sandbox::new();

    sandbox
        .command("other")
        .args(["s3-to-volume", "s3://bucket/myvol.tar.gz", "myvol"])
        .assert()
        .success();

    let calls = sandbox.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], "docker volume ls -q");
    assert!(calls[1].starts_with("s3cmd get s3://bucket/myvol.tar.gz "));
    assert_eq!(calls[2], "docker build -t jt-docker-volume-backup .");
    assert!(calls[3].contains(":/tmp:ro jt-docker-volume-backup tar -xaf /tmp/myvol.tar.gz -C /data"));
}

#[test]
fn s3_to_volume_force_restores_existing_volume() {
    let sandbox = Sandbox::new();

    sandbox
        .command("myvol")
        .args(["s3-to-volume", "--force", "s3://bucket/myvol.tar.gz", "myvol"])
        .assert()
        .success();

    let calls = sandbox.calls();
    assert!(calls[0].starts_with("s3cmd get "));
    assert!(calls.last().unwrap().starts_with("docker run --rm -v myvol:/data"));
}

#[test]
fn prebuilt_image_from_config_skips_build() {
    let sandbox = Sandbox::new();
    sandbox
        .temp
        .child("xdg/docker-volume-sync/config.toml")
        .write_str("[image]\nsource = \"prebuilt\"\nimage = \"alpine:edge\"\n")
        .unwrap();

    sandbox
        .command("myvol")
        .arg("volume-to-file")
        .arg("myvol")
        .arg(sandbox.path().join("myvol.tar"))
        .assert()
        .success();

    let calls = sandbox.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].contains(" alpine:edge tar -caf /tmp/myvol.tar "));
}
