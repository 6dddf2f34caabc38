//! Client for the ViralClip upload API.
//!
//! This crate talks to the landing-page backend (upload, start processing,
//! task status, task result) and forwards captured leads to the marketing
//! webhook. The [`LandingBackend`] trait is the seam the uploader state
//! machine is written against.

pub mod backend;
pub mod client;
pub mod error;
pub mod file;

pub use backend::LandingBackend;
pub use client::{endpoints, ApiClientConfig, LandingApiClient};
pub use error::{ClientError, ClientResult};
pub use file::UploadFile;
