use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::entry::{Download, StorageEntry, UploadFile};
use super::locks::PathLocks;
use super::StorageError;
use crate::namespace::sanitize::sanitize_segment;
use crate::namespace::{Identity, Namespace, RelativePath};
use crate::token;

/// Hard upper bound on files accepted in one upload batch.
pub const MAX_UPLOAD_FILES: usize = 20;

const UNNAMED_UPLOAD: &str = "unnamed";
const UPLOAD_DISAMBIGUATOR_BYTES: usize = 4;

/// The per-identity directory hierarchy under the storage root.
///
/// Every operation resolves through the [`Namespace`] first, so only
/// contained paths ever reach the filesystem. Mutations hold a per-path
/// lock for the duration of the filesystem call.
#[derive(Debug, Clone)]
pub struct StorageTree {
    namespace: Namespace,
    locks: Arc<PathLocks>,
}

impl StorageTree {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            locks: Arc::new(PathLocks::new()),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// List a folder; a folder that does not exist lists as empty.
    pub async fn list(
        &self,
        identity: &Identity,
        folder: &RelativePath,
    ) -> Result<Vec<StorageEntry>, StorageError> {
        let dir = self.namespace.resolve(identity, folder).await?;

        match fs::metadata(&dir).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(StorageError::Invalid(format!("{} is not a folder", folder))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        }

        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(&dir).await?;
        while let Some(dir_entry) = read_dir.next_entry().await? {
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            // names we could never address again are not listed
            let Ok(path) = folder.join(&name) else {
                continue;
            };
            if path.file_name() != Some(name.as_str()) {
                continue;
            }
            let metadata = dir_entry.metadata().await?;
            entries.push(StorageEntry::from_metadata(name, path, &metadata));
        }

        entries.sort_by(|a, b| b.is_folder.cmp(&a.is_folder).then_with(|| a.name.cmp(&b.name)));
        Ok(entries)
    }

    pub async fn exists(
        &self,
        identity: &Identity,
        path: &RelativePath,
    ) -> Result<bool, StorageError> {
        let absolute = self.namespace.resolve(identity, path).await?;
        Ok(fs::try_exists(&absolute).await?)
    }

    /// Create `parent/name` and any missing ancestors. Idempotent.
    pub async fn create_folder(
        &self,
        identity: &Identity,
        parent: &RelativePath,
        name: &str,
    ) -> Result<RelativePath, StorageError> {
        let path = parent.join(name)?;
        let absolute = self.namespace.resolve(identity, &path).await?;
        self.namespace.ensure_identity_root(identity).await?;

        if let Ok(metadata) = fs::metadata(&absolute).await {
            if !metadata.is_dir() {
                return Err(StorageError::AlreadyExists(path.to_string()));
            }
        }
        create_dirs(&absolute, &path).await?;

        tracing::debug!(identity = %identity, path = %path, "created folder");
        Ok(path)
    }

    /// Create an empty `name.extension` inside `folder`, failing if it exists.
    pub async fn create_file(
        &self,
        identity: &Identity,
        folder: &RelativePath,
        name: &str,
        extension: &str,
    ) -> Result<RelativePath, StorageError> {
        if sanitize_segment(name).is_empty() {
            return Err(StorageError::Invalid("file name is required".to_string()));
        }
        let extension = extension.trim_start_matches('.');
        let file_name = if extension.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, extension)
        };

        let path = folder.join(&file_name)?;
        let absolute = self.namespace.resolve(identity, &path).await?;
        let _guard = self.locks.lock(&absolute).await;

        self.prepare_parent(identity, &absolute, &path).await?;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&absolute)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(path.to_string()),
                _ => StorageError::Io(e),
            })?;

        tracing::debug!(identity = %identity, path = %path, "created file");
        Ok(path)
    }

    pub async fn read_content(
        &self,
        identity: &Identity,
        path: &RelativePath,
    ) -> Result<Vec<u8>, StorageError> {
        let absolute = self.resolve_file(identity, path).await?;
        fs::read(&absolute)
            .await
            .map_err(|e| not_found_or_io(e, path))
    }

    pub async fn read_text(
        &self,
        identity: &Identity,
        path: &RelativePath,
    ) -> Result<String, StorageError> {
        let bytes = self.read_content(identity, path).await?;
        String::from_utf8(bytes)
            .map_err(|_| StorageError::Invalid(format!("{} is not valid UTF-8 text", path)))
    }

    /// Overwrite `path` with `content`. Last writer wins.
    pub async fn write_content(
        &self,
        identity: &Identity,
        path: &RelativePath,
        content: impl AsRef<[u8]>,
    ) -> Result<u64, StorageError> {
        if path.is_root() {
            return Err(StorageError::Invalid("a file path is required".to_string()));
        }
        let absolute = self.namespace.resolve(identity, path).await?;
        let _guard = self.locks.lock(&absolute).await;

        if let Ok(metadata) = fs::metadata(&absolute).await {
            if metadata.is_dir() {
                return Err(StorageError::Invalid(format!("{} is a folder", path)));
            }
        }

        self.prepare_parent(identity, &absolute, path).await?;
        let content = content.as_ref();
        fs::write(&absolute, content).await?;

        tracing::debug!(identity = %identity, path = %path, size = content.len(), "wrote file");
        Ok(content.len() as u64)
    }

    /// Store an upload batch under collision-resistant names.
    ///
    /// The batch is validated as a whole; once writing starts each file
    /// stands alone and earlier files are kept if a later one fails.
    pub async fn store(
        &self,
        identity: &Identity,
        folder: &RelativePath,
        files: Vec<UploadFile>,
        max_files: usize,
    ) -> Result<Vec<String>, StorageError> {
        if files.is_empty() {
            return Err(StorageError::Invalid("no files uploaded".to_string()));
        }
        let max_files = max_files.clamp(1, MAX_UPLOAD_FILES);
        if files.len() > max_files {
            return Err(StorageError::Invalid(format!(
                "too many files: {} (max {})",
                files.len(),
                max_files
            )));
        }

        let dir = self.namespace.resolve(identity, folder).await?;
        self.namespace.ensure_identity_root(identity).await?;
        create_dirs(&dir, folder).await?;

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let stored_name = upload_name(&file.name)?;
            let path = folder.join(&stored_name)?;
            let absolute = self.namespace.resolve(identity, &path).await?;
            let _guard = self.locks.lock(&absolute).await;

            let mut handle = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&absolute)
                .await
                .map_err(|e| match e.kind() {
                    io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(path.to_string()),
                    _ => StorageError::Io(e),
                })?;
            handle.write_all(&file.content).await?;
            handle.flush().await?;

            tracing::info!(
                identity = %identity,
                path = %path,
                size = file.content.len(),
                "stored upload"
            );
            stored.push(stored_name);
        }

        Ok(stored)
    }

    /// Rename within the same parent folder. Never overwrites.
    pub async fn rename(
        &self,
        identity: &Identity,
        path: &RelativePath,
        new_name: &str,
    ) -> Result<RelativePath, StorageError> {
        let parent = path
            .parent()
            .ok_or_else(|| StorageError::Invalid("cannot rename the namespace root".to_string()))?;
        let target = parent.join(new_name)?;

        let from = self.namespace.resolve(identity, path).await?;
        let to = self.namespace.resolve(identity, &target).await?;
        let _guard = self.locks.lock_pair(&from, &to).await;

        if fs::symlink_metadata(&from).await.is_err() {
            return Err(StorageError::NotFound(path.to_string()));
        }
        if target == *path {
            return Ok(target);
        }
        if fs::symlink_metadata(&to).await.is_ok() {
            return Err(StorageError::AlreadyExists(target.to_string()));
        }

        fs::rename(&from, &to)
            .await
            .map_err(|e| not_found_or_io(e, path))?;

        tracing::info!(identity = %identity, from = %path, to = %target, "renamed");
        Ok(target)
    }

    /// Remove a file, or a folder with everything below it.
    pub async fn remove(&self, identity: &Identity, path: &RelativePath) -> Result<(), StorageError> {
        if path.is_root() {
            return Err(StorageError::Invalid(
                "cannot delete the namespace root".to_string(),
            ));
        }
        let absolute = self.namespace.resolve(identity, path).await?;
        let _guard = self.locks.lock(&absolute).await;

        let metadata = fs::symlink_metadata(&absolute)
            .await
            .map_err(|e| not_found_or_io(e, path))?;
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&absolute).await
        } else {
            fs::remove_file(&absolute).await
        };
        removed.map_err(|e| not_found_or_io(e, path))?;

        tracing::info!(identity = %identity, path = %path, "removed");
        Ok(())
    }

    /// Open a file for streaming along with the metadata a response needs.
    pub async fn download(
        &self,
        identity: &Identity,
        path: &RelativePath,
    ) -> Result<Download, StorageError> {
        let absolute = self.resolve_file(identity, path).await?;
        open_download(&absolute, path).await
    }

    /// Resolve `path` and require it to be an existing regular file.
    async fn resolve_file(
        &self,
        identity: &Identity,
        path: &RelativePath,
    ) -> Result<std::path::PathBuf, StorageError> {
        let absolute = self.namespace.resolve(identity, path).await?;
        match fs::metadata(&absolute).await {
            Ok(metadata) if metadata.is_file() => Ok(absolute),
            Ok(_) => Err(StorageError::NotFound(path.to_string())),
            Err(e) => Err(not_found_or_io(e, path)),
        }
    }

    async fn prepare_parent(
        &self,
        identity: &Identity,
        absolute: &Path,
        path: &RelativePath,
    ) -> Result<(), StorageError> {
        self.namespace.ensure_identity_root(identity).await?;
        if let Some(parent) = absolute.parent() {
            create_dirs(parent, path).await?;
        }
        Ok(())
    }
}

/// `create_dir_all`, reporting a file in the folder chain as a client error.
async fn create_dirs(dir: &Path, path: &RelativePath) -> Result<(), StorageError> {
    let Err(e) = fs::create_dir_all(dir).await else {
        return Ok(());
    };
    for ancestor in dir.ancestors() {
        if let Ok(metadata) = fs::metadata(ancestor).await {
            if !metadata.is_dir() {
                return Err(StorageError::Invalid(format!("{} runs through a file", path)));
            }
            break;
        }
    }
    Err(e.into())
}

async fn open_download(absolute: &Path, path: &RelativePath) -> Result<Download, StorageError> {
    let file = fs::File::open(absolute)
        .await
        .map_err(|e| not_found_or_io(e, path))?;
    let size = file.metadata().await?.len();
    let filename = path.file_name().unwrap_or("download").to_string();
    let mime = mime_guess::from_path(absolute)
        .first_or_octet_stream()
        .to_string();

    Ok(Download {
        file,
        filename,
        size,
        mime,
    })
}

fn upload_name(original: &str) -> Result<String, StorageError> {
    let name = sanitize_segment(original);
    let name = if name.is_empty() || name == "." {
        UNNAMED_UPLOAD.to_string()
    } else {
        name
    };
    Ok(format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        token::generate(UPLOAD_DISAMBIGUATOR_BYTES)?,
        name
    ))
}

fn not_found_or_io(e: io::Error, path: &RelativePath) -> StorageError {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
            StorageError::NotFound(path.to_string())
        }
        _ => StorageError::Io(e),
    }
}
