//! Flat-file persistence for [`Waypoints`].
//!
//! The store is a UTF-8 text file with one `name => path` record per line.
//! It is read whole, mutated in memory and rewritten whole.  Rewrites go
//! through a temp file in the same directory followed by a rename, so a crash
//! mid-write leaves either the old or the new content, never a truncated file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::record::Waypoints;
use crate::error::{Result, WaypointError};

/// Owner of the store file location.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open the store at `path`, creating an empty file (and its parent
    /// directories) if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    WaypointError::io(format!("creating {}", parent.display()), e)
                })?;
            }
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| WaypointError::io(format!("creating {}", path.display()), e))?;
            tracing::debug!("created empty store at {}", path.display());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole mapping.  A non-empty line without the separator is a
    /// [`WaypointError::StoreCorrupt`]; nothing is dropped silently.
    pub fn load(&self) -> Result<Waypoints> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(WaypointError::io(
                    format!("reading {}", self.path.display()),
                    e,
                ))
            }
        };

        let waypoints =
            Waypoints::parse(&text).map_err(|(line, content)| WaypointError::StoreCorrupt {
                path: self.path.clone(),
                line,
                content,
            })?;
        tracing::debug!(
            "loaded {} waypoint(s) from {}",
            waypoints.len(),
            self.path.display()
        );
        Ok(waypoints)
    }

    /// Overwrite the file with `waypoints` atomically.
    pub fn save(&self, waypoints: &Waypoints) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let context = || format!("writing {}", self.path.display());

        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| WaypointError::io(context(), e))?;
        tmp.write_all(waypoints.to_text().as_bytes())
            .map_err(|e| WaypointError::io(context(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| WaypointError::io(context(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| WaypointError::io(context(), e.error))?;

        tracing::debug!(
            "saved {} waypoint(s) to {}",
            waypoints.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Locked read-modify-write.  `f` runs against the freshly loaded mapping;
    /// the file is rewritten only when `f` succeeds.
    pub fn update<T>(&self, f: impl FnOnce(&mut Waypoints) -> Result<T>) -> Result<T> {
        let _lock = self.lock()?;
        let mut waypoints = self.load()?;
        let out = f(&mut waypoints)?;
        self.save(&waypoints)?;
        Ok(out)
    }

    #[cfg(unix)]
    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Exclusive advisory lock on a sidecar file, released on drop.
    #[cfg(unix)]
    fn lock(&self) -> Result<nix::fcntl::Flock<fs::File>> {
        use nix::fcntl::{Flock, FlockArg};

        let lock_path = self.lock_path();
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| WaypointError::io(format!("opening {}", lock_path.display()), e))?;
        Flock::lock(file, FlockArg::LockExclusive).map_err(|(_, errno)| {
            WaypointError::io(
                format!("locking {}", lock_path.display()),
                std::io::Error::from(errno),
            )
        })
    }

    #[cfg(not(unix))]
    fn lock(&self) -> Result<()> {
        Ok(())
    }
}
