use crate::domain::Author;
use crate::error::{ReleaseError, Result};
use crate::git::CommitInfo;
use git2::{ErrorCode, ObjectType, Oid, Repository as Git2Repo, Signature, StatusOptions};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the git repository rooted at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::open(path)
            .map_err(|e| ReleaseError::repository(format!("{}: {}", path.display(), e)))?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn signature(author: &Author) -> Result<Signature<'static>> {
        Ok(Signature::now(&author.name, &author.email)?)
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::repository("repository has no working directory"))
    }

    fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn tag_exists(&self, tag_name: &str) -> Result<bool> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot look up tag '{}': {}",
                tag_name, e
            ))),
        }
    }

    fn stage_path(&self, path: &Path) -> Result<()> {
        let mut index = self
            .repo
            .index()
            .map_err(|e| ReleaseError::stage(format!("Cannot open index: {}", e)))?;

        index
            .add_path(path)
            .map_err(|e| ReleaseError::stage(format!("{}: {}", path.display(), e)))?;
        index
            .write()
            .map_err(|e| ReleaseError::stage(format!("Cannot write index: {}", e)))?;

        Ok(())
    }

    fn commit(&self, author: &Author, message: &str, all: bool) -> Result<Oid> {
        let mut index = self
            .repo
            .index()
            .map_err(|e| ReleaseError::commit(format!("Cannot open index: {}", e)))?;

        if all {
            index
                .update_all(["*"].iter(), None)
                .map_err(|e| ReleaseError::commit(format!("Cannot stage changes: {}", e)))?;
            index
                .write()
                .map_err(|e| ReleaseError::commit(format!("Cannot write index: {}", e)))?;
        }

        let tree_id = index
            .write_tree()
            .map_err(|e| ReleaseError::commit(format!("Cannot write tree: {}", e)))?;
        let tree = self.repo.find_tree(tree_id)?;

        // An unborn branch gets a root commit
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(ReleaseError::commit(format!("Cannot resolve HEAD: {}", e))),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let signature = Self::signature(author)?;
        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )
            .map_err(|e| ReleaseError::commit(e.to_string()))
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| ReleaseError::commit(format!("Cannot find commit {}: {}", oid, e)))?;

        let author = commit.author();
        let info = CommitInfo {
            hash: oid.to_string(),
            message: commit.message().unwrap_or("(empty message)").to_string(),
            author: author.name().unwrap_or("unknown").to_string(),
        };
        Ok(info)
    }

    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        tagger: &Author,
        message: &str,
    ) -> Result<Oid> {
        let object = self
            .repo
            .find_object(target, Some(ObjectType::Commit))
            .map_err(|e| ReleaseError::tag(format!("Cannot find commit: {}", e)))?;

        let signature = Self::signature(tagger)?;
        self.repo
            .tag(name, &object, &signature, message, false)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))
    }
}
