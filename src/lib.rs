//! Archives idle, never-saved editor buffers to dated JSON files and closes
//! them without a save prompt.
//!
//! The embedding editor implements [`drafts::host::Host`], builds one
//! [`drafts::service::Archiver`] per process and forwards its buffer
//! notifications and timer ticks to it.

pub mod drafts;
pub mod error;

pub use drafts::host::{BufferId, Host, HostError, TabIndex, WindowId};
pub use drafts::service::{Archiver, Clock, SystemClock};
pub use error::{DraftError, DraftResult};
