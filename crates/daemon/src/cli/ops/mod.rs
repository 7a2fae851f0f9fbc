pub mod daemon;
pub mod files;
pub mod health;
pub mod init;
pub mod preview;
pub mod share;
pub mod version;

pub use daemon::Daemon;
pub use files::Files;
pub use health::Health;
pub use init::Init;
pub use preview::Preview;
pub use share::Share;
pub use version::Version;
