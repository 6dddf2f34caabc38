//! Landing page video uploader.
//!
//! A headless rendition of the marketing-site upload widget:
//! - Upload controller: validates a picked video and uploads it
//! - Lead capture form: collects a phone number and starts processing
//! - Status poller: checks the task until it finishes, then fetches clips
//! - Progress simulator: advances a progress bar while processing runs
//!
//! All state lives in a [`WidgetState`] observable through
//! [`UploadWidget::subscribe`].

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
mod poller;
pub mod progress;
pub mod state;
pub mod timers;
pub mod view;
pub mod widget;

pub use config::{LandingConfig, PollerConfig, ProgressConfig, WidgetConfig};
pub use error::{LandingError, LandingResult};
pub use state::WidgetState;
pub use timers::ProcessingTimers;
pub use widget::UploadWidget;
