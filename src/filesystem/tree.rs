use snafu::{OptionExt, Snafu, ensure};
use tracing::debug;

use super::node::{EntryKind, Node, NodeArena, NodeId, ROOT_NAME};

const CURRENT_DIR: &str = ".";
const PARENT_DIR: &str = "..";
const HOME_DIR: &str = "~";

/// One listing entry returned by [`FileSystem::ls`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// The whole in-memory tree plus the current working directory.
///
/// Relative paths and the single-name file operations (`touch`, `cat`, `echo`) are evaluated
/// against the current directory. Every operation either applies completely or leaves the
/// tree untouched.
#[derive(Debug)]
pub struct FileSystem {
    nodes: NodeArena,
    root: NodeId,
    current_directory: NodeId,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem {
    pub fn new() -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.alloc(Node::directory(ROOT_NAME));
        Self {
            nodes,
            root,
            current_directory: root,
        }
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Looks up the node at `path`, returning `None` as soon as a segment is missing.
    ///
    /// `/` and `~` name the root. `.` is skipped and `..` climbs one level, staying put at
    /// the root. Empty segments from repeated or trailing slashes are ignored.
    pub fn resolve_path(&self, path: &str) -> Option<NodeId> {
        if path == ROOT_NAME || path == HOME_DIR {
            return Some(self.root);
        }

        let mut current = self.start_of(path);
        for segment in segments(path) {
            match segment {
                CURRENT_DIR => continue,
                PARENT_DIR => current = self.nodes[current].parent().unwrap_or(current),
                name => current = self.nodes[current].child(name)?,
            }
        }
        Some(current)
    }

    /// Creates every missing directory along `path`, like `mkdir -p`.
    pub fn mkdir(&mut self, path: &str) -> Result<(), FileSystemError> {
        let segments: Vec<&str> = segments(path).collect();
        if let Some(reserved) = segments
            .iter()
            .find(|segment| **segment == CURRENT_DIR || **segment == PARENT_DIR)
        {
            return InvalidNameSnafu { name: *reserved }.fail();
        }

        // Walk the existing prefix first so a file in the way fails before anything is created.
        let mut current = self.start_of(path);
        let mut remaining = segments.as_slice();
        while let Some((segment, rest)) = remaining.split_first() {
            let Some(existing) = self.nodes[current].child(segment) else {
                break;
            };
            ensure!(
                self.nodes[existing].is_directory(),
                NotADirectorySnafu {
                    path: self.nodes.full_path(existing),
                    expected: EntryKind::Directory,
                }
            );
            current = existing;
            remaining = rest;
        }

        for segment in remaining {
            let directory = self.nodes.alloc(Node::directory(*segment));
            self.nodes.attach(current, directory);
            debug!("Created directory {}", self.nodes.full_path(directory));
            current = directory;
        }

        Ok(())
    }

    pub fn cd(&mut self, path: &str) -> Result<(), FileSystemError> {
        let target = self.resolve_path(path).context(NotFoundSnafu { path })?;
        ensure!(
            self.nodes[target].is_directory(),
            NotADirectorySnafu {
                path,
                expected: EntryKind::Directory,
            }
        );
        self.current_directory = target;
        debug!("Changed directory to {}", self.pwd());
        Ok(())
    }

    /// Lists the entries of `path`, or of the current directory when `path` is `None`, in
    /// insertion order.
    pub fn ls(&self, path: Option<&str>) -> Result<Vec<DirEntry>, FileSystemError> {
        let target = match path {
            Some(path) => {
                let target = self.resolve_path(path).context(NotFoundSnafu { path })?;
                ensure!(
                    self.nodes[target].is_directory(),
                    NotADirectorySnafu {
                        path,
                        expected: EntryKind::Directory,
                    }
                );
                target
            }
            None => self.current_directory,
        };

        Ok(self.nodes[target]
            .children()
            .into_iter()
            .flat_map(|children| children.iter())
            .map(|(name, id)| DirEntry {
                name: name.clone(),
                kind: self.nodes[*id].entry_kind(),
            })
            .collect())
    }

    /// Creates an empty file called `name` in the current directory. Never overwrites.
    pub fn touch(&mut self, name: &str) -> Result<(), FileSystemError> {
        ensure!(is_valid_name(name), InvalidNameSnafu { name });
        ensure!(
            self.nodes[self.current_directory].child(name).is_none(),
            AlreadyExistsSnafu { name }
        );

        let file = self.nodes.alloc(Node::file(name));
        self.nodes.attach(self.current_directory, file);
        debug!("Created file {}", self.nodes.full_path(file));
        Ok(())
    }

    pub fn cat(&self, name: &str) -> Result<&str, FileSystemError> {
        let file = self.child_of_current(name)?;
        self.nodes[file]
            .content()
            .context(NotADirectorySnafu {
                path: name,
                expected: EntryKind::File,
            })
    }

    /// Replaces the content of `name` in the current directory, creating the file first if
    /// it does not exist yet.
    pub fn echo(&mut self, content: &str, name: &str) -> Result<(), FileSystemError> {
        let file = match self.nodes[self.current_directory].child(name) {
            Some(existing) => existing,
            None => {
                self.touch(name)?;
                self.child_of_current(name)?
            }
        };

        ensure!(
            self.nodes[file].write_content(content.to_owned()),
            NotADirectorySnafu {
                path: name,
                expected: EntryKind::File,
            }
        );
        let written = &self.nodes[file];
        debug!(
            "Wrote {} bytes to {}, {:?} after its creation",
            content.len(),
            self.nodes.full_path(file),
            written
                .modified_at()
                .duration_since(written.created_at())
                .unwrap_or_default()
        );
        Ok(())
    }

    /// Copies `source` (recursively, for directories) into the directory `destination`.
    /// A child with the same name in the destination is replaced.
    pub fn cp(&mut self, source: &str, destination: &str) -> Result<(), FileSystemError> {
        let (source_id, destination_id) = self.resolve_transfer(source, destination, "copy")?;

        let name = self.nodes[source_id].name().to_owned();
        if self.nodes[destination_id].child(&name) == Some(source_id) {
            debug!("Copy of {} onto itself, nothing to do", source);
            return Ok(());
        }

        let copy = self.clone_subtree(source_id);
        if let Some(replaced) = self.nodes.attach(destination_id, copy) {
            self.discard(replaced, destination_id);
        }
        debug!("Copied {} to {}", source, self.nodes.full_path(copy));
        Ok(())
    }

    /// Moves `source` into the directory `destination`, keeping its name, identity and
    /// subtree. A child with the same name in the destination is replaced.
    pub fn mv(&mut self, source: &str, destination: &str) -> Result<(), FileSystemError> {
        let (source_id, destination_id) = self.resolve_transfer(source, destination, "move")?;

        ensure!(
            !self.nodes.is_within(destination_id, source_id),
            IllegalOperationSnafu {
                reason: format!("Cannot move {} into itself", source)
            }
        );
        if self.nodes[source_id].parent() == Some(destination_id) {
            debug!("{} already lives in {}, nothing to do", source, destination);
            return Ok(());
        }

        self.nodes.detach(source_id);
        if let Some(replaced) = self.nodes.attach(destination_id, source_id) {
            self.discard(replaced, destination_id);
        }
        debug!("Moved {} to {}", source, self.nodes.full_path(source_id));
        Ok(())
    }

    /// Removes the node at `path` together with its subtree. The root can never be removed.
    pub fn rm(&mut self, path: &str) -> Result<(), FileSystemError> {
        let target = self.resolve_path(path).context(NotFoundSnafu { path })?;
        let parent = self.nodes[target]
            .parent()
            .context(IllegalOperationSnafu {
                reason: "Cannot remove root directory",
            })?;

        let full_path = self.nodes.full_path(target);
        self.nodes.detach(target);
        self.discard(target, parent);
        debug!("Removed {}", full_path);
        Ok(())
    }

    pub fn pwd(&self) -> String {
        self.nodes.full_path(self.current_directory)
    }

    fn start_of(&self, path: &str) -> NodeId {
        if path.starts_with('/') {
            self.root
        } else {
            self.current_directory
        }
    }

    fn child_of_current(&self, name: &str) -> Result<NodeId, FileSystemError> {
        self.nodes[self.current_directory]
            .child(name)
            .context(NotFoundSnafu { path: name })
    }

    /// Shared resolution for `cp` and `mv`: an existing non-root source and an existing
    /// destination directory.
    fn resolve_transfer(
        &self,
        source: &str,
        destination: &str,
        verb: &str,
    ) -> Result<(NodeId, NodeId), FileSystemError> {
        let source_id = self
            .resolve_path(source)
            .context(NotFoundSnafu { path: source })?;
        let destination_id = self
            .resolve_path(destination)
            .context(NotFoundSnafu { path: destination })?;
        ensure!(
            self.nodes[destination_id].is_directory(),
            NotADirectorySnafu {
                path: destination,
                expected: EntryKind::Directory,
            }
        );
        ensure!(
            source_id != self.root,
            IllegalOperationSnafu {
                reason: format!("Cannot {} root directory", verb)
            }
        );
        Ok((source_id, destination_id))
    }

    /// Builds an unattached deep copy of `source`. The copy shares no nodes with the original
    /// and gets fresh timestamps.
    fn clone_subtree(&mut self, source: NodeId) -> NodeId {
        let original = &self.nodes[source];
        let mut copy = if original.is_directory() {
            Node::directory(original.name())
        } else {
            Node::file(original.name())
        };
        if let Some(content) = original.content() {
            copy.write_content(content.to_owned());
        }
        let children: Vec<NodeId> = original
            .children()
            .map(|children| children.values().copied().collect())
            .unwrap_or_default();

        let copy_id = self.nodes.alloc(copy);
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.nodes.attach(copy_id, child_copy);
        }
        copy_id
    }

    /// Frees a detached subtree. If the current directory was inside it, falls back to
    /// `fallback`, the directory the subtree was removed from.
    fn discard(&mut self, subtree: NodeId, fallback: NodeId) {
        if self.nodes.is_within(self.current_directory, subtree) {
            debug!(
                "Current directory removed, falling back to {}",
                self.nodes.full_path(fallback)
            );
            self.current_directory = fallback;
        }
        let freed = self.nodes.free_subtree(subtree);
        debug!("Freed {} nodes", freed);
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != CURRENT_DIR && name != PARENT_DIR && !name.contains('/')
}

#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
pub enum FileSystemError {
    #[snafu(display("No such file or directory: {}", path))]
    NotFound { path: String },
    /// The node at `path` has the wrong kind: a directory where a file was needed, or the
    /// other way round.
    #[snafu(display("{} is not a {}", path, expected))]
    NotADirectory { path: String, expected: EntryKind },
    #[snafu(display("File already exists: {}", name))]
    AlreadyExists { name: String },
    #[snafu(display("Invalid name: '{}'", name))]
    InvalidName { name: String },
    #[snafu(display("{}", reason))]
    IllegalOperation { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn names(fs: &FileSystem, path: Option<&str>) -> Vec<String> {
        fs.ls(path)
            .expect("listing should succeed")
            .into_iter()
            .map(|entry| entry.name)
            .collect()
    }

    /// `/a/b/c`, `/a/notes.txt` ("alpha") and `/x`, with the current directory at the root.
    #[fixture]
    fn populated() -> FileSystem {
        let mut fs = FileSystem::new();
        fs.mkdir("a/b/c").unwrap();
        fs.mkdir("x").unwrap();
        fs.cd("a").unwrap();
        fs.echo("alpha", "notes.txt").unwrap();
        fs.cd("/").unwrap();
        fs
    }

    #[test]
    fn new_filesystem_starts_empty_at_root() {
        let fs = FileSystem::new();
        assert_eq!(fs.pwd(), "/");
        assert!(names(&fs, None).is_empty());
        assert_eq!(fs.node_count(), 1);
    }

    #[rstest]
    #[case("/a/b", "/a/b")]
    #[case("/a/b/", "/a/b")]
    #[case("//a///b", "/a/b")]
    #[case("a/./b", "/a/b")]
    #[case("a/b/c/../..", "/a")]
    #[case("/a/b/../../../..", "/")]
    #[case("~", "/")]
    #[case("/", "/")]
    #[case(".", "/")]
    #[case("a/notes.txt/..", "/a")]
    fn cd_then_pwd_yields_normalized_path(
        mut populated: FileSystem,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        populated.cd(path).unwrap();
        assert_eq!(populated.pwd(), expected);
    }

    #[rstest]
    #[case("missing")]
    #[case("/a/missing")]
    #[case("a/notes.txt/deeper")]
    fn resolve_path_fails_without_partial_result(populated: FileSystem, #[case] path: &str) {
        assert_eq!(populated.resolve_path(path), None);
    }

    #[rstest]
    fn tilde_resolves_to_root_from_anywhere(mut populated: FileSystem) {
        populated.cd("/a/b/c").unwrap();
        let root = populated.resolve_path("/").unwrap();
        assert_eq!(populated.resolve_path("~"), Some(root));
    }

    #[test]
    fn cd_parent_at_root_stays_at_root() {
        let mut fs = FileSystem::new();
        fs.cd("..").unwrap();
        assert_eq!(fs.pwd(), "/");
    }

    #[rstest]
    fn cd_into_file_is_not_a_directory(mut populated: FileSystem) {
        assert_eq!(
            populated.cd("a/notes.txt"),
            Err(FileSystemError::NotADirectory {
                path: "a/notes.txt".into(),
                expected: EntryKind::Directory,
            })
        );
        assert_eq!(populated.pwd(), "/");
    }

    #[rstest]
    fn cd_to_missing_path_is_not_found(mut populated: FileSystem) {
        assert_eq!(
            populated.cd("nowhere"),
            Err(FileSystemError::NotFound {
                path: "nowhere".into()
            })
        );
    }

    #[test]
    fn mkdir_creates_nested_directories() {
        let mut fs = FileSystem::new();
        fs.mkdir("a/b/c").unwrap();
        fs.cd("a").unwrap();
        assert_eq!(names(&fs, None), vec!["b"]);
        fs.cd("b/c").unwrap();
        assert_eq!(fs.pwd(), "/a/b/c");
    }

    #[test]
    fn mkdir_is_idempotent() {
        let mut fs = FileSystem::new();
        fs.mkdir("a/b").unwrap();
        let count = fs.node_count();
        fs.mkdir("a/b").unwrap();
        fs.mkdir("/a/b/").unwrap();
        assert_eq!(fs.node_count(), count);
        assert_eq!(names(&fs, None), vec!["a"]);
    }

    #[test]
    fn mkdir_does_not_change_current_directory() {
        let mut fs = FileSystem::new();
        fs.mkdir("/x/y").unwrap();
        assert_eq!(fs.pwd(), "/");
    }

    #[test]
    fn mkdir_relative_to_current_directory() {
        let mut fs = FileSystem::new();
        fs.mkdir("a").unwrap();
        fs.cd("a").unwrap();
        fs.mkdir("b").unwrap();
        fs.mkdir("/c").unwrap();
        assert_eq!(names(&fs, None), vec!["b"]);
        assert_eq!(names(&fs, Some("/")), vec!["a", "c"]);
    }

    #[rstest]
    #[case("..", "..")]
    #[case(".", ".")]
    #[case("a/../b", "..")]
    #[case("new/./b", ".")]
    fn mkdir_rejects_reserved_segments_without_side_effects(
        #[case] path: &str,
        #[case] reserved: &str,
    ) {
        let mut fs = FileSystem::new();
        assert_eq!(
            fs.mkdir(path),
            Err(FileSystemError::InvalidName {
                name: reserved.into()
            })
        );
        assert_eq!(fs.node_count(), 1);
    }

    #[rstest]
    fn mkdir_through_file_fails_without_side_effects(mut populated: FileSystem) {
        let count = populated.node_count();
        assert_eq!(
            populated.mkdir("a/notes.txt/sub"),
            Err(FileSystemError::NotADirectory {
                path: "/a/notes.txt".into(),
                expected: EntryKind::Directory,
            })
        );
        assert_eq!(populated.node_count(), count);
    }

    #[test]
    fn mkdir_on_existing_file_name_fails() {
        let mut fs = FileSystem::new();
        fs.touch("f").unwrap();
        assert!(matches!(
            fs.mkdir("f"),
            Err(FileSystemError::NotADirectory { .. })
        ));
    }

    #[test]
    fn ls_preserves_insertion_order() {
        let mut fs = FileSystem::new();
        fs.mkdir("zeta").unwrap();
        fs.touch("alpha").unwrap();
        fs.mkdir("mid").unwrap();
        assert_eq!(names(&fs, None), vec!["zeta", "alpha", "mid"]);
    }

    #[rstest]
    fn ls_reports_entry_kinds(populated: FileSystem) {
        let entries = populated.ls(Some("/a")).unwrap();
        assert_eq!(
            entries,
            vec![
                DirEntry {
                    name: "b".into(),
                    kind: EntryKind::Directory
                },
                DirEntry {
                    name: "notes.txt".into(),
                    kind: EntryKind::File
                },
            ]
        );
    }

    #[rstest]
    fn ls_errors(populated: FileSystem) {
        assert!(matches!(
            populated.ls(Some("ghost")),
            Err(FileSystemError::NotFound { .. })
        ));
        assert!(matches!(
            populated.ls(Some("a/notes.txt")),
            Err(FileSystemError::NotADirectory { .. })
        ));
    }

    #[test]
    fn touch_echo_cat_round_trip() {
        let mut fs = FileSystem::new();
        fs.touch("test.txt").unwrap();
        assert_eq!(fs.cat("test.txt").unwrap(), "");
        fs.echo("Hello World", "test.txt").unwrap();
        assert_eq!(fs.cat("test.txt").unwrap(), "Hello World");
    }

    #[test]
    fn touch_never_overwrites() {
        let mut fs = FileSystem::new();
        fs.echo("keep", "f.txt").unwrap();
        fs.mkdir("d").unwrap();
        assert_eq!(
            fs.touch("f.txt"),
            Err(FileSystemError::AlreadyExists {
                name: "f.txt".into()
            })
        );
        assert!(matches!(
            fs.touch("d"),
            Err(FileSystemError::AlreadyExists { .. })
        ));
        assert_eq!(fs.cat("f.txt").unwrap(), "keep");
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    fn touch_rejects_unusable_names(#[case] name: &str) {
        let mut fs = FileSystem::new();
        assert!(matches!(
            fs.touch(name),
            Err(FileSystemError::InvalidName { .. })
        ));
        assert_eq!(fs.node_count(), 1);
    }

    #[rstest]
    fn cat_looks_only_in_current_directory(populated: FileSystem) {
        assert_eq!(
            populated.cat("a/notes.txt"),
            Err(FileSystemError::NotFound {
                path: "a/notes.txt".into()
            })
        );
    }

    #[rstest]
    fn cat_on_directory_fails(populated: FileSystem) {
        assert_eq!(
            populated.cat("a"),
            Err(FileSystemError::NotADirectory {
                path: "a".into(),
                expected: EntryKind::File,
            })
        );
    }

    #[test]
    fn echo_creates_missing_file() {
        let mut fs = FileSystem::new();
        fs.echo("fresh", "new.txt").unwrap();
        assert_eq!(fs.cat("new.txt").unwrap(), "fresh");
    }

    #[test]
    fn echo_overwrites_and_bumps_modified_time() {
        let mut fs = FileSystem::new();
        fs.echo("first", "f").unwrap();
        let id = fs.resolve_path("f").unwrap();
        let created = fs.nodes[id].created_at();

        fs.echo("second", "f").unwrap();

        let node = &fs.nodes[id];
        assert_eq!(node.content(), Some("second"));
        assert_eq!(node.created_at(), created);
        assert!(node.modified_at() >= created);
    }

    #[rstest]
    fn echo_into_directory_fails(mut populated: FileSystem) {
        assert_eq!(
            populated.echo("oops", "a"),
            Err(FileSystemError::NotADirectory {
                path: "a".into(),
                expected: EntryKind::File,
            })
        );
        assert_eq!(names(&populated, Some("a")), vec!["b", "notes.txt"]);
    }

    #[test]
    fn cp_file_keeps_original() {
        let mut fs = FileSystem::new();
        fs.mkdir("dir1").unwrap();
        fs.touch("t.txt").unwrap();
        fs.echo("X", "t.txt").unwrap();

        fs.cp("t.txt", "dir1").unwrap();

        assert_eq!(fs.cat("t.txt").unwrap(), "X");
        fs.cd("dir1").unwrap();
        assert_eq!(fs.cat("t.txt").unwrap(), "X");
    }

    #[rstest]
    fn cp_directory_is_deep_and_independent(mut populated: FileSystem) {
        populated.cp("a", "x").unwrap();

        let original = populated.resolve_path("/a").unwrap();
        let copy = populated.resolve_path("/x/a").unwrap();
        assert_ne!(original, copy);
        assert_ne!(
            populated.resolve_path("/a/b/c"),
            populated.resolve_path("/x/a/b/c")
        );
        assert!(populated.resolve_path("/x/a/b/c").is_some());

        populated.cd("/x/a").unwrap();
        assert_eq!(populated.cat("notes.txt").unwrap(), "alpha");
        populated.echo("changed", "notes.txt").unwrap();

        populated.cd("/a").unwrap();
        assert_eq!(populated.cat("notes.txt").unwrap(), "alpha");
    }

    #[rstest]
    fn cp_overwrites_existing_child(mut populated: FileSystem) {
        populated.cd("x").unwrap();
        populated.mkdir("a/stale").unwrap();
        populated.cd("/").unwrap();

        populated.cp("/a", "/x").unwrap();

        assert_eq!(names(&populated, Some("/x/a")), vec!["b", "notes.txt"]);
    }

    #[rstest]
    fn cp_directory_into_itself_terminates(mut populated: FileSystem) {
        populated.cp("/a", "/a").unwrap();
        assert!(populated.resolve_path("/a/a/b/c").is_some());
        assert!(populated.resolve_path("/a/a/a").is_none());
    }

    #[rstest]
    fn cp_onto_own_parent_is_noop(mut populated: FileSystem) {
        let before = populated.resolve_path("/a").unwrap();
        let count = populated.node_count();
        populated.cp("/a", "/").unwrap();
        assert_eq!(populated.resolve_path("/a"), Some(before));
        assert_eq!(populated.node_count(), count);
    }

    #[rstest]
    #[case("ghost", "x", FileSystemError::NotFound { path: "ghost".into() })]
    #[case("a", "ghost", FileSystemError::NotFound { path: "ghost".into() })]
    #[case(
        "x",
        "a/notes.txt",
        FileSystemError::NotADirectory { path: "a/notes.txt".into(), expected: EntryKind::Directory }
    )]
    fn cp_and_mv_resolution_errors(
        mut populated: FileSystem,
        #[case] source: &str,
        #[case] destination: &str,
        #[case] expected: FileSystemError,
    ) {
        let count = populated.node_count();
        assert_eq!(populated.cp(source, destination), Err(expected.clone()));
        assert_eq!(populated.mv(source, destination), Err(expected));
        assert_eq!(populated.node_count(), count);
    }

    #[rstest]
    fn cp_and_mv_of_root_are_illegal(mut populated: FileSystem) {
        assert!(matches!(
            populated.cp("/", "x"),
            Err(FileSystemError::IllegalOperation { .. })
        ));
        assert!(matches!(
            populated.mv("/", "x"),
            Err(FileSystemError::IllegalOperation { .. })
        ));
    }

    #[test]
    fn mv_file_moves_it() {
        let mut fs = FileSystem::new();
        fs.mkdir("dir1").unwrap();
        fs.touch("t.txt").unwrap();
        fs.echo("Hello World", "t.txt").unwrap();

        fs.mv("t.txt", "dir1").unwrap();

        assert!(!names(&fs, None).contains(&"t.txt".to_string()));
        fs.cd("dir1").unwrap();
        assert_eq!(fs.cat("t.txt").unwrap(), "Hello World");
    }

    #[rstest]
    fn mv_directory_carries_subtree_and_identity(mut populated: FileSystem) {
        let moved = populated.resolve_path("/a").unwrap();
        let deep = populated.resolve_path("/a/b/c").unwrap();
        let count = populated.node_count();

        populated.mv("a", "x").unwrap();

        assert_eq!(populated.resolve_path("/x/a"), Some(moved));
        assert_eq!(populated.resolve_path("/x/a/b/c"), Some(deep));
        assert_eq!(populated.resolve_path("/a"), None);
        assert_eq!(populated.node_count(), count);
    }

    #[rstest]
    fn mv_keeps_current_directory_inside_moved_subtree(mut populated: FileSystem) {
        populated.cd("/a/b").unwrap();
        populated.mv("/a", "/x").unwrap();
        assert_eq!(populated.pwd(), "/x/a/b");
    }

    #[rstest]
    #[case("/a", "/a")]
    #[case("/a", "/a/b/c")]
    fn mv_into_own_subtree_is_illegal(
        mut populated: FileSystem,
        #[case] source: &str,
        #[case] destination: &str,
    ) {
        assert!(matches!(
            populated.mv(source, destination),
            Err(FileSystemError::IllegalOperation { .. })
        ));
        assert!(populated.resolve_path("/a/b/c").is_some());
    }

    #[rstest]
    fn mv_overwrites_existing_child(mut populated: FileSystem) {
        populated.mkdir("/x/b/old").unwrap();
        let moved = populated.resolve_path("/a/b").unwrap();

        populated.mv("/a/b", "/x").unwrap();

        assert_eq!(populated.resolve_path("/x/b"), Some(moved));
        assert_eq!(populated.resolve_path("/x/b/old"), None);
        assert!(populated.resolve_path("/x/b/c").is_some());
    }

    #[rstest]
    fn mv_out_of_the_node_it_overwrites(mut populated: FileSystem) {
        populated.mkdir("/a/b/a").unwrap();
        let moved = populated.resolve_path("/a/b/a").unwrap();

        populated.mv("/a/b/a", "/").unwrap();

        assert_eq!(populated.resolve_path("/a"), Some(moved));
        assert!(names(&populated, Some("/a")).is_empty());
    }

    #[rstest]
    fn mv_into_current_parent_is_noop(mut populated: FileSystem) {
        let before = names(&populated, Some("/"));
        populated.mv("a", "/").unwrap();
        assert_eq!(names(&populated, Some("/")), before);
    }

    #[test]
    fn rm_removes_files_and_directories() {
        let mut fs = FileSystem::new();
        fs.mkdir("dir1/nested").unwrap();
        fs.touch("test.txt").unwrap();

        fs.rm("test.txt").unwrap();
        fs.rm("dir1").unwrap();

        assert!(names(&fs, None).is_empty());
        assert_eq!(fs.node_count(), 1);
    }

    #[rstest]
    #[case("/")]
    #[case("~")]
    #[case("a/..")]
    fn rm_root_is_illegal_and_harmless(mut populated: FileSystem, #[case] path: &str) {
        let count = populated.node_count();
        assert_eq!(
            populated.rm(path),
            Err(FileSystemError::IllegalOperation {
                reason: "Cannot remove root directory".into()
            })
        );
        assert_eq!(populated.node_count(), count);
    }

    #[rstest]
    fn rm_missing_is_not_found(mut populated: FileSystem) {
        assert!(matches!(
            populated.rm("ghost"),
            Err(FileSystemError::NotFound { .. })
        ));
    }

    #[rstest]
    fn rm_of_current_directory_ancestor_falls_back_to_parent(mut populated: FileSystem) {
        populated.cd("/a/b/c").unwrap();
        populated.rm("/a/b").unwrap();
        assert_eq!(populated.pwd(), "/a");
        assert_eq!(names(&populated, None), vec!["notes.txt"]);
    }

    #[rstest]
    fn overwrite_of_current_directory_falls_back_to_destination(mut populated: FileSystem) {
        populated.mkdir("/x/b").unwrap();
        populated.cd("/x/b").unwrap();
        populated.cp("/a/b", "/x").unwrap();
        assert_eq!(populated.pwd(), "/x");
    }

    #[test]
    fn instances_are_independent() {
        let mut first = FileSystem::new();
        let second = FileSystem::new();
        first.mkdir("only-here").unwrap();
        assert!(second.resolve_path("only-here").is_none());
    }

    #[test]
    fn error_messages_are_readable() {
        let cases = [
            (
                FileSystemError::NotFound {
                    path: "a/b".into(),
                },
                "No such file or directory: a/b",
            ),
            (
                FileSystemError::NotADirectory {
                    path: "f".into(),
                    expected: EntryKind::Directory,
                },
                "f is not a directory",
            ),
            (
                FileSystemError::NotADirectory {
                    path: "d".into(),
                    expected: EntryKind::File,
                },
                "d is not a file",
            ),
            (
                FileSystemError::AlreadyExists { name: "f".into() },
                "File already exists: f",
            ),
            (
                FileSystemError::InvalidName { name: "..".into() },
                "Invalid name: '..'",
            ),
        ];
        for (error, message) in cases {
            assert_eq!(error.to_string(), message);
        }
    }
}
