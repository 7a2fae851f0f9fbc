use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

use tokio::sync::{Mutex, MutexGuard};

const LOCK_STRIPES: usize = 64;

/// A fixed pool of async mutexes indexed by a hash of the absolute path.
///
/// Two writers to the same path always contend on the same stripe; unrelated
/// paths occasionally share one, which only costs throughput.
#[derive(Debug)]
pub(crate) struct PathLocks {
    stripes: Vec<Mutex<()>>,
}

pub(crate) struct PathGuard<'a> {
    _first: MutexGuard<'a, ()>,
    _second: Option<MutexGuard<'a, ()>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self {
            stripes: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    fn index(path: &Path) -> usize {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        (hasher.finish() % LOCK_STRIPES as u64) as usize
    }

    pub async fn lock(&self, path: &Path) -> PathGuard<'_> {
        PathGuard {
            _first: self.stripes[Self::index(path)].lock().await,
            _second: None,
        }
    }

    /// Lock two paths, always acquiring the lower stripe first.
    pub async fn lock_pair(&self, a: &Path, b: &Path) -> PathGuard<'_> {
        let (i, j) = (Self::index(a), Self::index(b));
        if i == j {
            return self.lock(a).await;
        }
        let (low, high) = if i < j { (i, j) } else { (j, i) };
        let first = self.stripes[low].lock().await;
        let second = self.stripes[high].lock().await;
        PathGuard {
            _first: first,
            _second: Some(second),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_index_is_stable() {
        let path = Path::new("/data/a@b.com/notes.txt");
        assert_eq!(PathLocks::index(path), PathLocks::index(path));
        assert!(PathLocks::index(path) < LOCK_STRIPES);
    }

    #[tokio::test]
    async fn test_same_path_is_exclusive() {
        let locks = Arc::new(PathLocks::new());
        let path = Path::new("/data/a@b.com/notes.txt");

        let guard = locks.lock(path).await;
        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock(Path::new("/data/a@b.com/notes.txt")).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());
        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_lock_pair_in_either_order_does_not_deadlock() {
        let locks = Arc::new(PathLocks::new());
        let a = Path::new("/data/x/a");
        let b = Path::new("/data/x/b");

        let mut tasks = Vec::new();
        for flip in [false, true].into_iter().cycle().take(16) {
            let locks = locks.clone();
            tasks.push(tokio::spawn(async move {
                let (first, second) = if flip { (b, a) } else { (a, b) };
                let _g = locks.lock_pair(first, second).await;
                tokio::task::yield_now().await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
    }
}
