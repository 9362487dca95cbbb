mod contact;
mod convert;
mod download;
mod health;
mod job_status;
mod upload;

pub use contact::contact_handler;
pub use convert::convert_handler;
pub use download::download_handler;
pub use health::health_handler;
pub use job_status::job_status_handler;
pub use upload::{upload_handler, MAX_UPLOAD_BYTES};
