//! HTML preview of the collected documentation

pub mod model;
pub mod server;

pub use model::{PreviewEndpoint, PreviewField, PreviewGroup, PreviewHeader, PreviewModel, PreviewUsage};
pub use server::{start_preview, PreviewServer};
