use crate::domain::Author;
use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Annotated tag recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct MockTag {
    pub target: Oid,
    pub tagger: Author,
    pub message: String,
}

/// Mock repository for testing without actual git operations
///
/// Files live in a real directory so the changelog can be read and written;
/// everything else is held in memory.
pub struct MockRepository {
    workdir: PathBuf,
    clean: bool,
    fail_commit: bool,
    fail_tag: bool,
    tags: RefCell<HashMap<String, MockTag>>,
    commits: RefCell<HashMap<Oid, CommitInfo>>,
    staged: RefCell<Vec<PathBuf>>,
    next_oid: Cell<u8>,
}

impl MockRepository {
    /// Create a clean mock repository rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            clean: true,
            fail_commit: false,
            fail_tag: false,
            tags: RefCell::new(HashMap::new()),
            commits: RefCell::new(HashMap::new()),
            staged: RefCell::new(Vec::new()),
            next_oid: Cell::new(1),
        }
    }

    /// Mark the working tree as having uncommitted changes
    pub fn set_dirty(&mut self) {
        self.clean = false;
    }

    /// Make every commit attempt fail
    pub fn fail_commits(&mut self) {
        self.fail_commit = true;
    }

    /// Make every tag attempt fail
    pub fn fail_tags(&mut self) {
        self.fail_tag = true;
    }

    /// Add an existing tag
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid) {
        self.tags.get_mut().insert(
            name.into(),
            MockTag {
                target,
                tagger: Author::new("existing", "existing@example.com"),
                message: String::new(),
            },
        );
    }

    /// Look up a recorded tag
    pub fn tag(&self, name: &str) -> Option<MockTag> {
        self.tags.borrow().get(name).cloned()
    }

    /// Paths staged so far, in order
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.staged.borrow().clone()
    }

    /// Number of commits created
    pub fn commit_count(&self) -> usize {
        self.commits.borrow().len()
    }

    fn allocate_oid(&self) -> Oid {
        let n = self.next_oid.get();
        self.next_oid.set(n.wrapping_add(1));
        Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero())
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn is_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }

    fn tag_exists(&self, tag_name: &str) -> Result<bool> {
        Ok(self.tags.borrow().contains_key(tag_name))
    }

    fn stage_path(&self, path: &Path) -> Result<()> {
        self.staged.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn commit(&self, author: &Author, message: &str, _all: bool) -> Result<Oid> {
        if self.fail_commit {
            return Err(ReleaseError::commit("mock commit failure"));
        }

        let oid = self.allocate_oid();
        self.commits.borrow_mut().insert(
            oid,
            CommitInfo {
                hash: oid.to_string(),
                message: message.to_string(),
                author: author.name.clone(),
            },
        );
        Ok(oid)
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        self.commits
            .borrow()
            .get(&oid)
            .cloned()
            .ok_or_else(|| ReleaseError::commit(format!("Cannot find commit {}", oid)))
    }

    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        tagger: &Author,
        message: &str,
    ) -> Result<Oid> {
        if self.fail_tag {
            return Err(ReleaseError::tag("mock tag failure"));
        }
        if !self.commits.borrow().contains_key(&target) {
            return Err(ReleaseError::tag(format!("Cannot find commit {}", target)));
        }

        let mut tags = self.tags.borrow_mut();
        if tags.contains_key(name) {
            return Err(ReleaseError::tag(format!("tag '{}' exists", name)));
        }
        tags.insert(
            name.to_string(),
            MockTag {
                target,
                tagger: tagger.clone(),
                message: message.to_string(),
            },
        );
        Ok(self.allocate_oid())
    }
}
