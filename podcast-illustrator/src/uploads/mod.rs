mod filename;
mod store;

pub use filename::sanitize_filename;
pub use store::{JobId, UploadError, UploadStore};
