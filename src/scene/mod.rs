//! The allocation scene
//!
//! This module turns a scenario into a navigable sequence of frames:
//! - [`config`]: literal tables for the program, stack, heap and OS API
//! - [`parse`]: scenario file reader
//! - [`director`]: plays the narrative, driving the allocation walk
//! - [`frame`]: one immutable snapshot of every panel
//! - [`timeline`]: frame history with forward/backward navigation
//! - [`errors`]: scenario, timeline and build errors
//! - [`constants`]: default addresses, sizes and limits

pub mod config;
pub mod constants;
pub mod director;
pub mod errors;
pub mod frame;
pub mod parse;
pub mod timeline;

pub use config::ScenarioConfig;
pub use director::{build_timeline, Director};
pub use errors::{SceneError, ScenarioError, TimelineError};
pub use frame::Frame;
pub use timeline::Timeline;
