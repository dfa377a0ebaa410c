use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};

/// name of the reserved metadata directory at the repository root
pub const META_DIR: &str = ".sgit";

/// default branch HEAD points at after init
pub const DEFAULT_BRANCH: &str = "master";

/// an sgit repository
///
/// owns every path under the metadata directory; components receive a
/// `&Repo` instead of reaching for ambient global paths.
pub struct Repo {
    work_dir: PathBuf,
    config: Config,
}

impl Repo {
    /// initialize a new repository at the given path
    pub fn init(path: &Path) -> Result<Self> {
        let meta = path.join(META_DIR);
        if meta.exists() {
            return Err(Error::RepoExists(path.to_path_buf()));
        }

        // create directory structure
        fs::create_dir_all(meta.join("objects")).with_path(&meta)?;
        fs::create_dir_all(meta.join("refs/heads")).with_path(&meta)?;
        fs::create_dir_all(meta.join("tmp")).with_path(&meta)?;

        let repo = Self {
            work_dir: path.to_path_buf(),
            config: Config::default(),
        };

        // HEAD starts symbolic, pointing at a branch with no commits yet
        crate::fs::write_atomic(
            &repo.tmp_path(),
            &repo.head_path(),
            format!("ref: refs/heads/{}\n", DEFAULT_BRANCH).as_bytes(),
        )?;

        repo.config.save(&repo.config_path())?;
        crate::index::Index::new().save(&repo)?;

        Ok(repo)
    }

    /// open an existing repository
    pub fn open(path: &Path) -> Result<Self> {
        let meta = path.join(META_DIR);
        if !meta.is_dir() {
            return Err(Error::NoRepo(path.to_path_buf()));
        }

        let config = Config::load(&meta.join("config"))?;

        Ok(Self {
            work_dir: path.to_path_buf(),
            config,
        })
    }

    /// find an enclosing repository by walking up from `path`
    pub fn discover(path: &Path) -> Result<Self> {
        let mut current = path.to_path_buf();
        loop {
            if current.join(META_DIR).is_dir() {
                return Self::open(&current);
            }
            if !current.pop() {
                return Err(Error::NoRepo(path.to_path_buf()));
            }
        }
    }

    /// working directory root
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// save configuration changes
    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_path())
    }

    /// name of the current branch, None when HEAD is detached
    pub fn current_branch(&self) -> Result<Option<String>> {
        match crate::refs::read_head(self)? {
            crate::refs::Head::Symbolic(branch) => Ok(Some(branch)),
            crate::refs::Head::Detached(_) => Ok(None),
        }
    }

    /// path to the metadata directory
    pub fn meta_path(&self) -> PathBuf {
        self.work_dir.join(META_DIR)
    }

    /// path to the objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.meta_path().join("objects")
    }

    /// path to the branch refs directory
    pub fn heads_path(&self) -> PathBuf {
        self.meta_path().join("refs/heads")
    }

    /// path to the HEAD file
    pub fn head_path(&self) -> PathBuf {
        self.meta_path().join("HEAD")
    }

    /// path to the index file
    pub fn index_path(&self) -> PathBuf {
        self.meta_path().join("index")
    }

    /// path to the config file
    pub fn config_path(&self) -> PathBuf {
        self.meta_path().join("config")
    }

    /// path to the tmp directory (for atomic writes)
    pub fn tmp_path(&self) -> PathBuf {
        self.meta_path().join("tmp")
    }
}
