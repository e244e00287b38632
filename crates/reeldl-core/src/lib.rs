pub mod config;
pub mod logging;

pub mod client;
pub mod controller;
pub mod delivery;
pub mod error;
pub mod filename;
pub mod health;
pub mod http;
pub mod media;
pub mod request;

pub use client::{Delivered, RequestClient};
pub use controller::{ControllerState, DownloadController, Phase, TriggerOutcome};
pub use delivery::{DirectoryTarget, SaveTarget};
pub use error::DownloadError;
pub use media::{MediaType, Platform};
pub use request::DownloadRequest;
