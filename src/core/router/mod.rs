//! Provider router
//!
//! Dispatches prompts to registered provider handlers and records every outcome into
//! telemetry and scoring.
//!
//! ## Module Structure
//!
//! - `config` - Router settings
//! - `error` - Error taxonomy shared by the router and the strategies
//! - `events` - Broadcast bus for outcome notifications
//! - `router` - Core Router struct, dispatch and candidate ranking

pub mod config;
pub mod error;
pub mod events;
pub mod router;


pub use config::RouterConfig;
pub use error::RouterError;
pub use events::{EventBus, RouterEvent};
pub use router::Router;
