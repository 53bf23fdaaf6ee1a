//! Tests for ToolLauncher single-instance behaviour
#![cfg(unix)]

use std::path::PathBuf;

use kvtree::application::services::LaunchRequest;
use kvtree::infrastructure::launcher::{LaunchOutcome, ToolLauncher};
use kvtree::infrastructure::InfraError;

fn request(program: &str, args: &[&str]) -> LaunchRequest {
    LaunchRequest {
        name: program.to_string(),
        program: PathBuf::from(program),
        args: args.iter().map(|s| s.to_string()).collect(),
        vproject: None,
    }
}

#[test]
fn given_running_instance_when_launching_again_then_already_running() {
    let mut launcher = ToolLauncher::new();
    let sleep = request("sleep", &["5"]);

    let first = launcher.launch(&sleep).unwrap();
    let LaunchOutcome::Started { pid } = first else {
        panic!("expected Started, got {first:?}");
    };

    assert_eq!(
        launcher.launch(&sleep).unwrap(),
        LaunchOutcome::AlreadyRunning { pid }
    );
    assert_eq!(launcher.running_pid().unwrap(), Some(pid));

    launcher.kill().unwrap();
    assert_eq!(launcher.running_pid().unwrap(), None);
}

#[test]
fn given_finished_instance_when_launching_again_then_starts_new_one() {
    let mut launcher = ToolLauncher::new();
    let quick = request("true", &[]);

    assert!(matches!(
        launcher.launch(&quick).unwrap(),
        LaunchOutcome::Started { .. }
    ));
    let status = launcher.wait().unwrap().expect("child was tracked");
    assert!(status.success());

    assert!(matches!(
        launcher.launch(&quick).unwrap(),
        LaunchOutcome::Started { .. }
    ));
    launcher.wait().unwrap();
}

#[test]
fn given_vproject_when_launching_then_exported_to_child() {
    let mut launcher = ToolLauncher::new();
    let mut check = request("sh", &["-c", "test \"$VPROJECT\" = /games/hl2"]);
    check.vproject = Some(PathBuf::from("/games/hl2"));

    launcher.launch(&check).unwrap();
    let status = launcher.wait().unwrap().unwrap();
    assert!(status.success());
}

#[test]
fn given_missing_program_when_launching_then_launch_error() {
    let mut launcher = ToolLauncher::new();
    let err = launcher
        .launch(&request("/nonexistent/kvtree-tool", &[]))
        .unwrap_err();
    assert!(matches!(err, InfraError::Launch { .. }));
    assert_eq!(launcher.running_pid().unwrap(), None);
}

#[test]
fn given_two_launchers_when_each_launches_then_both_start() {
    let mut first = ToolLauncher::new();
    let mut second = ToolLauncher::new();
    let sleep = request("sleep", &["5"]);

    assert!(matches!(first.launch(&sleep).unwrap(), LaunchOutcome::Started { .. }));
    assert!(matches!(second.launch(&sleep).unwrap(), LaunchOutcome::Started { .. }));

    first.kill().unwrap();
    second.kill().unwrap();
}
