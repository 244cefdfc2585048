//! Descriptor watcher.
//!
//! The watcher polls a directory for new JSON descriptors, runs generation
//! out of process for each one, waits for the project directory to appear
//! and copies the descriptor into it.
//!
//! ## Main Parts
//!
//! - [`Watcher`] - The polling loop
//! - [`SeenFiles`] - Persisted set of handled descriptor names
//! - [`Launcher`] / [`ProcessLauncher`] - How generation is invoked
//! - [`wait_for`] / [`Clock`] - Bounded waiting with an injectable clock

pub mod descriptor;
pub mod launcher;
pub mod monitor;
pub mod seen;
pub mod wait;

pub use descriptor::{DESCRIPTOR_COPY_NAME, Descriptor};
pub use launcher::{GenerateRequest, Launcher, ProcessLauncher};
pub use monitor::{DEFAULT_POLL_INTERVAL, DescriptorOutcome, WatchOptions, Watcher};
pub use seen::SeenFiles;
pub use wait::{Clock, SystemClock, WaitPolicy, wait_for};
