//! Scenario: the local host workload against a real directory and real
//! processes — path mapping, atomic replace, stream capture, exit-status
//! and timeout handling.

use gso_host::LocalProcessWorkload;
use gso_workload::{Workload, WorkloadError};
use std::collections::BTreeMap;
use std::time::Duration;

// Bare names resolve via PATH; absolute paths would be mapped under the
// workload root.
fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

const T: Duration = Duration::from_secs(10);

#[test]
fn can_connect_tracks_root_directory() {
    let dir = tempfile::tempdir().unwrap();
    let host = LocalProcessWorkload::new(dir.path()).unwrap();
    assert!(host.can_connect());

    let gone = LocalProcessWorkload::new(dir.path().join("missing")).unwrap();
    assert!(!gone.can_connect());
}

#[test]
fn push_maps_absolute_paths_under_root_and_replaces_atomically() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("etc/gnbsim")).unwrap();
    let host = LocalProcessWorkload::new(dir.path()).unwrap();

    host.push("/etc/gnbsim/gnb.conf", "first\n").unwrap();
    assert!(host.exists("/etc/gnbsim/gnb.conf"));
    host.push("/etc/gnbsim/gnb.conf", "second\n").unwrap();

    let on_disk = std::fs::read_to_string(dir.path().join("etc/gnbsim/gnb.conf")).unwrap();
    assert_eq!(on_disk, "second\n");
}

#[test]
fn push_without_parent_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let host = LocalProcessWorkload::new(dir.path()).unwrap();

    let err = host.push("/etc/gnbsim/gnb.conf", "content").unwrap_err();
    assert!(matches!(err, WorkloadError::Io { .. }), "{err:?}");
}

#[test]
fn exec_captures_both_streams_separately() {
    let dir = tempfile::tempdir().unwrap();
    let host = LocalProcessWorkload::new(dir.path()).unwrap();

    let out = host
        .exec(&sh("echo primary; echo diagnostic 1>&2"), T, None)
        .unwrap();
    assert_eq!(out.stdout, "primary\n");
    assert_eq!(out.stderr, "diagnostic\n");
}

#[test]
fn exec_passes_extra_environment() {
    let dir = tempfile::tempdir().unwrap();
    let host = LocalProcessWorkload::new(dir.path()).unwrap();

    let env = BTreeMap::from([("POD_IP".to_string(), "10.1.100.4".to_string())]);
    let out = host
        .exec(&sh("printf '%s' \"$POD_IP\""), T, Some(&env))
        .unwrap();
    assert_eq!(out.stdout, "10.1.100.4");
}

#[test]
fn nonzero_exit_is_an_exec_error_carrying_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let host = LocalProcessWorkload::new(dir.path()).unwrap();

    let err = host
        .exec(&sh("echo boom 1>&2; exit 3"), T, None)
        .unwrap_err();
    match &err {
        WorkloadError::Exec { stderr, .. } => {
            assert_eq!(stderr.as_deref(), Some("boom\n"));
        }
        other => panic!("expected Exec, got {other:?}"),
    }
    assert_eq!(err.detail(), "boom\n");
}

#[test]
fn timeout_expiry_is_an_exec_error() {
    let dir = tempfile::tempdir().unwrap();
    let host = LocalProcessWorkload::new(dir.path()).unwrap();

    let err = host
        .exec(
            &["sleep".to_string(), "5".to_string()],
            Duration::from_millis(100),
            None,
        )
        .unwrap_err();
    match err {
        WorkloadError::Exec { message, .. } => assert!(message.contains("timed out"), "{message}"),
        other => panic!("expected Exec, got {other:?}"),
    }
}

#[test]
fn unstartable_command_is_a_change_error() {
    let dir = tempfile::tempdir().unwrap();
    let host = LocalProcessWorkload::new(dir.path()).unwrap();

    let err = host
        .exec(&["/no/such/binary".to_string()], T, None)
        .unwrap_err();
    assert!(matches!(err, WorkloadError::Change { .. }), "{err:?}");
}

#[cfg(unix)]
#[test]
fn absolute_programs_are_mapped_under_the_root() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let bin_dir = dir.path().join("gnbsim/bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    let bin = bin_dir.join("gnbsim");
    std::fs::write(&bin, "#!/bin/sh\necho from-workload-image\n").unwrap();
    let mut perms = std::fs::metadata(&bin).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&bin, perms).unwrap();

    let host = LocalProcessWorkload::new(dir.path()).unwrap();
    let out = host
        .exec(&["/gnbsim/bin/gnbsim".to_string()], T, None)
        .unwrap();
    assert_eq!(out.stdout, "from-workload-image\n");
}
