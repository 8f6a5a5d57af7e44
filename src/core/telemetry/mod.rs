//! Provider telemetry and cooldown tracking
//!
//! - `clock` - Time source abstraction (system and manual clocks)
//! - `tracker` - Success/failure counters, running latency and cooldown windows

pub mod clock;
pub mod tracker;


pub use clock::{Clock, ManualClock, SystemClock};
pub use tracker::{DEFAULT_COOLDOWN, TelemetryStats, TelemetryTracker};
