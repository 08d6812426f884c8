use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, SystemTime};

use log::{debug, error};
use walkdir::WalkDir;

use super::WatchEvent;
use crate::utils::error::{AlvuError, Result};

/// Modification-time poller over a set of directory trees.
///
/// Each tick reports at most one change: the first tracked path, in path
/// order, whose timestamp moved. Other changes are picked up on later ticks.
#[derive(Debug, Default)]
pub struct Poller {
    roots: Vec<PathBuf>,
    mod_times: BTreeMap<PathBuf, SystemTime>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `root` and everything below it
    pub fn add(&mut self, root: &Path) -> Result<()> {
        if !root.is_dir() {
            return Err(AlvuError::Watch(format!("cannot watch {}: not a directory", root.display())));
        }
        self.roots.push(root.to_path_buf());
        self.scan(root)
    }

    pub fn tracked(&self) -> usize {
        self.mod_times.len()
    }

    /// Stat every tracked path once and report the first change
    pub fn poll_once(&mut self) -> Result<Option<PathBuf>> {
        for root in &self.roots {
            if !root.is_dir() {
                return Err(AlvuError::Watch(format!("{} disappeared", root.display())));
            }
        }

        let mut changed = None;
        for (path, last) in &self.mod_times {
            // Vanished files are skipped; their parent directory reports the change
            let modified = match fs::metadata(path).and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(_) => continue,
            };
            if modified != *last {
                changed = Some((path.clone(), modified));
                break;
            }
        }

        let (path, modified) = match changed {
            Some(change) => change,
            None => return Ok(None),
        };
        debug!("Change event: {}", path.display());
        self.mod_times.insert(path.clone(), modified);
        if path.is_dir() {
            self.rescan(&path)?;
        }
        Ok(Some(path))
    }

    /// Poll every `interval` until the receiver goes away or polling fails
    pub fn run(mut self, interval: Duration, tx: Sender<WatchEvent>) {
        loop {
            thread::sleep(interval);
            match self.poll_once() {
                Ok(Some(path)) => {
                    if tx.send(Ok(path)).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Stopped watching: {}", e);
                    let _ = tx.send(Err(e));
                    return;
                }
            }
        }
    }

    fn scan(&mut self, dir: &Path) -> Result<()> {
        for entry in WalkDir::new(dir) {
            let entry = entry?;
            let modified = entry.metadata()?.modified()?;
            self.mod_times.entry(entry.into_path()).or_insert(modified);
        }
        Ok(())
    }

    /// Pick up entries created in `dir` and forget the removed ones
    fn rescan(&mut self, dir: &Path) -> Result<()> {
        self.mod_times.retain(|path, _| !path.starts_with(dir) || path.exists());
        self.scan(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(path: &Path, secs_ahead: u64) {
        let time = SystemTime::now() + Duration::from_secs(secs_ahead);
        File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
    }

    fn poller(tmp: &TempDir) -> Poller {
        let mut poller = Poller::new();
        poller.add(tmp.path()).unwrap();
        poller
    }

    #[test]
    fn test_no_change_no_event() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "a").unwrap();
        let mut poller = poller(&tmp);

        assert_eq!(poller.tracked(), 2);
        assert_eq!(poller.poll_once().unwrap(), None);
    }

    #[test]
    fn test_one_event_per_tick() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.md");
        let b = tmp.path().join("b.md");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        let mut poller = poller(&tmp);

        touch(&a, 10);
        touch(&b, 10);

        assert_eq!(poller.poll_once().unwrap(), Some(a));
        assert_eq!(poller.poll_once().unwrap(), Some(b));
        assert_eq!(poller.poll_once().unwrap(), None);
    }

    #[test]
    fn test_new_file_reports_directory_then_is_tracked() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("blog")).unwrap();
        let mut poller = poller(&tmp);
        let dir = tmp.path().join("blog");
        let post = dir.join("post.md");

        fs::write(&post, "new").unwrap();
        File::open(&dir).unwrap().set_modified(SystemTime::now() + Duration::from_secs(10)).unwrap();

        assert_eq!(poller.poll_once().unwrap(), Some(dir));
        touch(&post, 20);
        assert_eq!(poller.poll_once().unwrap(), Some(post));
    }

    #[test]
    fn test_vanished_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("pages");
        fs::create_dir_all(&root).unwrap();
        let mut poller = Poller::new();
        poller.add(&root).unwrap();

        fs::remove_dir_all(&root).unwrap();

        assert!(matches!(poller.poll_once(), Err(AlvuError::Watch(_))));
    }

    #[test]
    fn test_add_missing_root_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(Poller::new().add(&tmp.path().join("nope")).is_err());
    }
}
