use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs;

use super::{Identity, NamespaceError, RelativePath};

/// Maps `(identity, relative path)` pairs onto the storage root.
///
/// Resolution never creates anything on disk; writers call
/// [`Namespace::ensure_identity_root`] before the first write.
#[derive(Debug, Clone)]
pub struct Namespace {
    root: PathBuf,
}

impl Namespace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn identity_root(&self, identity: &Identity) -> PathBuf {
        self.root.join(identity.as_str())
    }

    pub async fn ensure_identity_root(&self, identity: &Identity) -> Result<PathBuf, NamespaceError> {
        let dir = self.identity_root(identity);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Resolve `path` under `root/identity`, failing with
    /// [`NamespaceError::PathEscape`] if the result could land anywhere else.
    pub async fn resolve(
        &self,
        identity: &Identity,
        path: &RelativePath,
    ) -> Result<PathBuf, NamespaceError> {
        let base = self.identity_root(identity);
        let mut resolved = base.clone();

        for segment in path.segments() {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(_)), None) => resolved.push(segment),
                _ => return Err(escape(identity, path)),
            }
        }

        if !resolved.starts_with(&base) {
            return Err(escape(identity, path));
        }

        if !real_path_contained(&base, &resolved).await? {
            return Err(escape(identity, path));
        }

        Ok(resolved)
    }
}

fn escape(identity: &Identity, path: &RelativePath) -> NamespaceError {
    tracing::warn!(identity = %identity, path = %path, "path escapes namespace");
    NamespaceError::PathEscape(format!("{}/{}", identity, path))
}

/// Follow symlinks on the deepest existing ancestor of `resolved` and check
/// that it still lies under the real location of `base`.
async fn real_path_contained(base: &Path, resolved: &Path) -> Result<bool, NamespaceError> {
    let real_base = match fs::canonicalize(base).await {
        Ok(path) => path,
        // nothing below a missing base can exist yet
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e.into()),
    };

    let mut existing = None;
    for ancestor in resolved.ancestors().take_while(|a| a.starts_with(base)) {
        if fs::symlink_metadata(ancestor).await.is_ok() {
            existing = Some(ancestor);
            break;
        }
    }

    match existing {
        None => Ok(true),
        Some(ancestor) => match fs::canonicalize(ancestor).await {
            Ok(real) => Ok(real.starts_with(&real_base)),
            // dangling symlink
            Err(_) => Ok(false),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn namespace() -> (TempDir, Namespace) {
        let dir = TempDir::new().unwrap();
        let ns = Namespace::new(dir.path().join("uploads"));
        (dir, ns)
    }

    #[tokio::test]
    async fn test_resolve_composes_root_identity_path() {
        let (_dir, ns) = namespace();
        let id = Identity::parse("a@b.com").unwrap();
        let path = RelativePath::parse("docs/a.txt").unwrap();

        let resolved = ns.resolve(&id, &path).await.unwrap();
        assert_eq!(resolved, ns.root().join("a@b.com").join("docs").join("a.txt"));
    }

    #[tokio::test]
    async fn test_resolve_does_not_create_directories() {
        let (_dir, ns) = namespace();
        let id = Identity::parse("a@b.com").unwrap();
        ns.resolve(&id, &RelativePath::parse("x/y").unwrap())
            .await
            .unwrap();
        assert!(!ns.identity_root(&id).exists());
    }

    #[tokio::test]
    async fn test_ensure_identity_root_creates_directory() {
        let (_dir, ns) = namespace();
        let id = Identity::parse("a@b.com").unwrap();
        let dir = ns.ensure_identity_root(&id).await.unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir, ns.identity_root(&id));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_namespace_is_escape() {
        let (dir, ns) = namespace();
        let id = Identity::parse("a@b.com").unwrap();
        let root = ns.ensure_identity_root(&id).await.unwrap();

        let outside = dir.path().join("outside");
        std::fs::create_dir_all(&outside).unwrap();
        std::fs::write(outside.join("secret.txt"), b"secret").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        let err = ns
            .resolve(&id, &RelativePath::parse("link/secret.txt").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, NamespaceError::PathEscape(_)));

        // a file that does not exist yet behind the link is caught too
        let err = ns
            .resolve(&id, &RelativePath::parse("link/new.txt").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, NamespaceError::PathEscape(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_within_namespace_is_allowed() {
        let (_dir, ns) = namespace();
        let id = Identity::parse("a@b.com").unwrap();
        let root = ns.ensure_identity_root(&id).await.unwrap();
        std::fs::create_dir_all(root.join("real")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("alias")).unwrap();

        assert!(ns
            .resolve(&id, &RelativePath::parse("alias/file.txt").unwrap())
            .await
            .is_ok());
    }
}
