/**
 * Grant-based access to shared files.
 *  Turns a bearer token and a requested path into
 *  an allow / deny / not-found / expired decision.
 */
pub mod access;
/**
 * Stable error kinds shared by every module,
 *  so callers can branch without string matching.
 */
pub mod error;
/**
 * Mapping of untrusted identities and paths onto
 *  the storage root. Holds the containment invariant:
 *  nothing resolves outside `root/<identity>`.
 */
pub mod namespace;
/**
 * Short-lived, in-memory HTML previews.
 */
pub mod preview;
/**
 * Durable share records keyed by token.
 */
pub mod share;
/**
 * File and folder operations inside a namespace.
 */
pub mod storage;
pub mod token;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::access::{AccessDecision, AccessGate, Grant};
    pub use crate::error::ErrorKind;
    pub use crate::namespace::{Identity, Namespace, NamespaceError, RelativePath};
    pub use crate::preview::{PreviewError, PreviewRecord, PreviewStore, PREVIEW_TTL};
    pub use crate::share::{Permission, ShareError, ShareRecord, ShareRegistry, SHARE_TTL_HOURS};
    pub use crate::storage::{
        Download, EntryKind, StorageEntry, StorageError, StorageTree, UploadFile, MAX_UPLOAD_FILES,
    };
    pub use crate::version::{build_info, BuildInfo};
}
