//! Object-store access.

mod gcs;

pub use gcs::GcsClient;
