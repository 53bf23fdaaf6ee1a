//! Tests for ServiceContainer wiring with a substituted filesystem

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use kvtree::config::Settings;
use kvtree::domain::Toolset;
use kvtree::infrastructure::traits::FileSystem;
use kvtree::infrastructure::ServiceContainer;

/// In-memory filesystem shared by all services of one container.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

fn settings() -> Settings {
    Settings {
        tools_file: PathBuf::from("/cfg/toolsets.txt"),
        steam_apps_dir: Some(PathBuf::from("/steam")),
        platform: "Linux".into(),
    }
}

#[test]
fn given_memory_fs_when_toolsets_saved_then_visible_through_container_fs() {
    // Arrange
    let container = ServiceContainer::with_deps(settings(), Arc::new(MemoryFileSystem::default()));
    let toolsets = vec![Toolset {
        name: "Hammer".into(),
        platform: "Linux".into(),
        path: "Half-Life 2/bin/hammer".into(),
        args: vec!["-game".into(), "hl2".into(), "-mod".into(), "hl2".into()],
        vproject: None,
    }];

    // Act
    container
        .toolsets
        .save(&container.settings.tools_file, &toolsets)
        .unwrap();

    // Assert
    let text = container
        .fs
        .read_to_string(&container.settings.tools_file)
        .unwrap();
    assert!(text.contains("\"arg3\"\t\"hl2\""));
    assert_eq!(
        container.toolsets.load(&container.settings.tools_file).unwrap(),
        toolsets
    );
}

#[test]
fn given_installed_executable_in_memory_fs_when_discovering_then_resolved() {
    let fs = Arc::new(MemoryFileSystem::default());
    fs.write(Path::new("/steam/Half-Life 2/bin/hammer"), "").unwrap();
    let container = ServiceContainer::with_deps(settings(), fs);
    let toolset = Toolset {
        name: "Hammer".into(),
        platform: "Linux".into(),
        path: "Half-Life 2/bin/hammer".into(),
        args: vec![],
        vproject: None,
    };

    let found = container.toolsets.discover(
        &[toolset],
        &container.settings.platform,
        container.settings.steam_apps_dir.as_deref(),
    );

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].program, PathBuf::from("/steam/Half-Life 2/bin/hammer"));
}
