//! In-memory filesystem adapter.
//!
//! Used by tests and dry runs. A [`MemoryProject`] view exposes one root of
//! the in-memory tree through the `ArtifactInspector` port, so the same
//! contract checks run against memory and disk.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use pyscaff_core::{
    application::{
        ApplicationError,
        ports::{ArtifactInspector, Filesystem},
    },
    error::PyscaffResult,
};

use crate::inspect::{check_toml, check_yaml, invalid, toml_string_at};

/// In-memory filesystem. Clones share the same tree.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Read a file's content.
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.executables.contains(path))
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.directories.contains(path))
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) -> PyscaffResult<()> {
        let mut inner = self.write()?;
        inner.files.clear();
        inner.directories.clear();
        inner.executables.clear();
        Ok(())
    }

    /// Inspect the tree below `root` with paths relative to it.
    pub fn project(&self, root: impl Into<PathBuf>) -> MemoryProject {
        MemoryProject {
            fs: self.clone(),
            root: root.into(),
        }
    }

    fn write(&self) -> PyscaffResult<std::sync::RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> PyscaffResult<()> {
        let mut inner = self.write()?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> PyscaffResult<()> {
        let mut inner = self.write()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> PyscaffResult<()> {
        let mut inner = self.write()?;

        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.read().is_ok_and(|inner| {
            inner.files.contains_key(path) || inner.directories.contains(path)
        })
    }

    fn remove_dir_all(&self, path: &Path) -> PyscaffResult<()> {
        let mut inner = self.write()?;

        if !inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such directory".into(),
            }
            .into());
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));

        Ok(())
    }
}

/// One project root inside a [`MemoryFilesystem`].
#[derive(Debug, Clone)]
pub struct MemoryProject {
    fs: MemoryFilesystem,
    root: PathBuf,
}

impl MemoryProject {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files below the root, relative to it and sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.fs
            .list_files()
            .into_iter()
            .filter_map(|p| p.strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .collect()
    }
}

impl ArtifactInspector for MemoryProject {
    fn exists(&self, path: &Path) -> bool {
        self.fs.exists(&self.root.join(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.fs.is_dir(&self.root.join(path))
    }

    fn read_to_string(&self, path: &Path) -> PyscaffResult<String> {
        self.fs
            .read_file(&self.root.join(path))
            .ok_or_else(|| invalid(path, "No such file"))
    }

    fn parses_as_yaml(&self, path: &Path) -> PyscaffResult<()> {
        check_yaml(path, &self.read_to_string(path)?)
    }

    fn parses_as_toml(&self, path: &Path) -> PyscaffResult<()> {
        check_toml(path, &self.read_to_string(path)?)
    }

    fn toml_string(&self, path: &Path, dotted_key: &str) -> PyscaffResult<Option<String>> {
        toml_string_at(path, &self.read_to_string(path)?, dotted_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("out/a.txt"), "x").is_err());

        fs.create_dir_all(Path::new("out")).unwrap();
        fs.write_file(Path::new("out/a.txt"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("out/a.txt")).as_deref(), Some("x"));
    }

    #[test]
    fn remove_dir_all_drops_the_whole_subtree() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("out/demo/src/pkg")).unwrap();
        fs.write_file(Path::new("out/demo/src/pkg/__init__.py"), "")
            .unwrap();
        fs.create_dir_all(Path::new("out/other")).unwrap();

        fs.remove_dir_all(Path::new("out/demo")).unwrap();

        assert!(!fs.exists(Path::new("out/demo")));
        assert!(!fs.exists(Path::new("out/demo/src")));
        assert!(fs.list_files().is_empty());
        assert!(fs.exists(Path::new("out/other")));
    }

    #[test]
    fn remove_missing_directory_fails() {
        let fs = MemoryFilesystem::new();
        assert!(fs.remove_dir_all(Path::new("ghost")).is_err());
    }

    #[test]
    fn project_view_resolves_relative_paths() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("out/demo/tests")).unwrap();
        fs.write_file(
            Path::new("out/demo/pyproject.toml"),
            "[project]\nname = \"demo\"\n",
        )
        .unwrap();

        let project = fs.project("out/demo");
        assert!(project.is_dir(Path::new("tests")));
        assert!(project.exists(Path::new("pyproject.toml")));
        assert!(!project.is_dir(Path::new("pyproject.toml")));
        assert_eq!(
            project
                .toml_string(Path::new("pyproject.toml"), "project.name")
                .unwrap()
                .as_deref(),
            Some("demo")
        );
        assert_eq!(project.files(), vec![PathBuf::from("pyproject.toml")]);
        assert!(project.read_to_string(Path::new("README.md")).is_err());
    }

    #[test]
    fn executable_flag_round_trips() {
        let fs = MemoryFilesystem::new();
        let path = Path::new("run.sh");
        fs.write_file(path, "#!/bin/sh").unwrap();
        fs.set_permissions(path, true).unwrap();
        assert!(fs.is_executable(path));
        fs.set_permissions(path, false).unwrap();
        assert!(!fs.is_executable(path));
    }
}
