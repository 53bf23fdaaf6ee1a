//! Tests for ToolsetService: loading definitions and resolving installs

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use kvtree::application::services::ToolsetService;
use kvtree::application::ApplicationError;
use kvtree::domain::Toolset;
use kvtree::infrastructure::traits::RealFileSystem;

fn service() -> ToolsetService {
    ToolsetService::new(Arc::new(RealFileSystem))
}

fn install(apps_dir: &Path, relative: &str) {
    let path = apps_dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

#[test]
fn given_fixture_when_loading_then_decodes_all_toolsets() {
    let toolsets = service()
        .load(Path::new("tests/resources/toolsets.txt"))
        .unwrap();

    assert_eq!(toolsets.len(), 2);
    assert_eq!(toolsets[0].name, "Hammer (Half-Life 2)");
    assert_eq!(toolsets[0].args, vec!["-nop4".to_string()]);
    assert_eq!(toolsets[0].vproject.as_deref(), Some("Half-Life 2/hl2"));
    assert_eq!(toolsets[1].platform, "Linux");
    assert!(toolsets[1].args.is_empty());
}

#[test]
fn given_installed_executable_when_discovering_then_returns_request() {
    let apps = TempDir::new().unwrap();
    install(apps.path(), "Half-Life 2/bin/hammer.exe");
    let svc = service();
    let toolsets = svc.load(Path::new("tests/resources/toolsets.txt")).unwrap();

    let found = svc.discover(&toolsets, "Windows", Some(apps.path()));

    assert_eq!(found.len(), 1);
    let request = &found[0];
    assert_eq!(request.name, "Hammer (Half-Life 2)");
    assert_eq!(
        request.program,
        apps.path().join("Half-Life 2").join("bin").join("hammer.exe")
    );
    assert_eq!(request.args, vec!["-nop4".to_string()]);
    assert_eq!(
        request.vproject,
        Some(apps.path().join("Half-Life 2").join("hl2"))
    );
}

#[test]
fn given_other_platform_when_discovering_then_filtered_out() {
    let apps = TempDir::new().unwrap();
    install(apps.path(), "Half-Life 2/bin/hammer.exe");
    let svc = service();
    let toolsets = svc.load(Path::new("tests/resources/toolsets.txt")).unwrap();

    assert!(svc.discover(&toolsets, "Linux", Some(apps.path())).is_empty());
}

#[test]
fn given_missing_executable_when_discovering_then_skipped() {
    let apps = TempDir::new().unwrap();
    let svc = service();
    let toolsets = svc.load(Path::new("tests/resources/toolsets.txt")).unwrap();

    assert!(svc.discover(&toolsets, "Windows", Some(apps.path())).is_empty());
    assert!(svc.discover(&toolsets, "Windows", None).is_empty());
}

#[test]
fn given_unknown_name_when_finding_then_toolset_not_found() {
    let svc = service();
    let toolsets = svc.load(Path::new("tests/resources/toolsets.txt")).unwrap();

    let err = svc
        .find(&toolsets, "Nope", "Windows", None)
        .unwrap_err();
    assert!(matches!(err, ApplicationError::ToolsetNotFound(name) if name == "Nope"));
}

#[test]
fn given_toolsets_when_saved_then_load_returns_same() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("toolsets.txt");
    let toolsets = vec![Toolset {
        name: "Model Viewer".into(),
        platform: "Linux".into(),
        path: "/opt/sdk/hlmv".into(),
        args: vec!["-game".into(), "hl2".into(), "-mod".into(), "hl2".into()],
        vproject: None,
    }];

    let svc = service();
    svc.save(&path, &toolsets).unwrap();

    assert_eq!(svc.load(&path).unwrap(), toolsets);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("\"Toolsets\"\n{\n\t\"Toolset\"\n\t{\n"));
}

#[test]
fn given_document_without_toolsets_when_loading_then_domain_error() {
    let err = service()
        .load(Path::new("tests/resources/gameinfo.txt"))
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Domain(_)));
}
