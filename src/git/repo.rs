use crate::error::{ArtError, Result};
use crate::illustrate::Backend;
use crate::schedule::Identity;
use gix::objs::tree::{Entry, EntryKind};
use gix::refs::transaction::{Change, LogChange, PreviousValue, RefEdit, RefLog};
use gix::refs::{FullName, Target};
use gix::{ObjectId, Repository};
use std::path::{Component, Path, PathBuf};
use tracing::info;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
    tip: Option<ObjectId>,
    tree: ObjectId,
    staged: Vec<Entry>,
}

impl GitRepo {
    /// Open the repository at `directory`, creating the directory and a new
    /// non-bare repository first if there is none.
    pub fn init<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory)?;

        match gix::open(directory) {
            Ok(repo) => Self::from_repository(repo),
            Err(_) => {
                let repo = gix::init(directory).map_err(ArtError::git)?;
                info!(path = %directory.display(), "initialized git repository");
                Self::from_repository(repo)
            }
        }
    }

    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let repo = gix::open(directory.as_ref()).map_err(ArtError::git)?;
        Self::from_repository(repo)
    }

    fn from_repository(mut repo: Repository) -> Result<Self> {
        let path = repo
            .workdir()
            .ok_or_else(|| ArtError::Git(format!("'{}' is a bare repository", repo.path().display()).into()))?
            .to_path_buf();

        // Reflog entries need a committer even though commits carry their own.
        repo.committer_or_set_generic_fallback().map_err(ArtError::git)?;

        let tip = repo
            .head()
            .map_err(ArtError::git)?
            .id()
            .map(|id| id.detach());

        let tree = match tip {
            Some(id) => repo
                .find_commit(id)
                .map_err(ArtError::git)?
                .tree_id()
                .map_err(ArtError::git)?
                .detach(),
            None => repo
                .write_object(&gix::objs::Tree::empty())
                .map_err(ArtError::git)?
                .detach(),
        };

        info!(path = %path.display(), tip = ?tip, "opened git repository");
        Ok(Self {
            repo,
            path,
            tip,
            tree,
            staged: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tip(&self) -> Option<ObjectId> {
        self.tip
    }

    /// Tree of the tip with every staged entry inserted or replaced.
    fn staged_tree(&mut self) -> Result<ObjectId> {
        let mut tree: gix::objs::Tree = self
            .repo
            .find_tree(self.tree)
            .map_err(ArtError::git)?
            .decode()
            .map_err(ArtError::git)?
            .into();

        for entry in self.staged.drain(..) {
            tree.entries.retain(|e| e.filename != entry.filename);
            tree.entries.push(entry);
        }
        tree.entries.sort();

        let id = self.repo.write_object(&tree).map_err(ArtError::git)?.detach();

        // Keep the index in step with HEAD so the working tree reads as clean.
        let mut index = self.repo.index_from_tree(&id).map_err(ArtError::git)?;
        index.write(Default::default()).map_err(ArtError::git)?;

        Ok(id)
    }
}

fn signature(identity: &Identity) -> gix::actor::Signature {
    gix::actor::Signature {
        name: identity.name.as_str().into(),
        email: identity.email.as_str().into(),
        time: gix::date::Time::new(identity.seconds(), identity.offset_seconds()),
    }
}

impl Backend for GitRepo {
    fn workdir(&self) -> &Path {
        &self.path
    }

    fn add(&mut self, path: &Path) -> Result<()> {
        let filename = match path.components().collect::<Vec<_>>().as_slice() {
            [Component::Normal(name)] => name.to_string_lossy().into_owned(),
            _ => {
                return Err(ArtError::Git(
                    format!("only top-level files can be staged, got '{}'", path.display()).into(),
                ))
            }
        };

        let contents = std::fs::read(self.path.join(path))?;
        let oid = self.repo.write_blob(&contents).map_err(ArtError::git)?.detach();

        self.staged.push(Entry {
            mode: EntryKind::Blob.into(),
            filename: filename.into(),
            oid,
        });
        Ok(())
    }

    fn commit(&mut self, message: &str, author: &Identity, committer: &Identity) -> Result<()> {
        let tree = if self.staged.is_empty() {
            self.tree
        } else {
            self.staged_tree()?
        };

        let commit = gix::objs::Commit {
            tree,
            parents: self.tip.into_iter().collect(),
            author: signature(author),
            committer: signature(committer),
            encoding: None,
            message: message.into(),
            extra_headers: Vec::new(),
        };
        let id = self.repo.write_object(&commit).map_err(ArtError::git)?.detach();

        let head: FullName = "HEAD".try_into().map_err(ArtError::git)?;
        self.repo
            .edit_reference(RefEdit {
                change: Change::Update {
                    log: LogChange {
                        mode: RefLog::AndReference,
                        force_create_reflog: false,
                        message: format!("commit: {message}").into(),
                    },
                    expected: PreviousValue::Any,
                    new: Target::Object(id),
                },
                name: head,
                deref: true,
            })
            .map_err(ArtError::git)?;

        self.tip = Some(id);
        self.tree = tree;
        Ok(())
    }
}
