mod error;
mod file;
mod not_found;

pub use error::{error_response, status_for};
pub use file::{file_response, Disposition};
pub use not_found::not_found_handler;
