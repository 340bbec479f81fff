//! First-fit allocation walk
//!
//! This is the part of the narrative with real logic: given an ordered heap
//! table and a request, examine blocks one at a time and accept the first
//! whose free space covers the request.
//!
//! # Stepping
//!
//! ```text
//! Created ──step──▶ Walking ──step──▶ … ──▶ Accepted   (first block that fits)
//!                                      └──▶ Exhausted  (ran off the end)
//! ```
//!
//! Each call to [`AllocationWalkSimulator::step`] examines one block and
//! yields a [`WalkStep`]. The walk is a pure function of its inputs: the same
//! blocks and request always produce the same steps.

pub mod errors;
pub mod simulator;

pub use errors::WalkError;
pub use simulator::{
    fits, walk, AllocationRequest, AllocationWalkSimulator, RejectReason, WalkEvent, WalkState,
    WalkStep, WalkTrace,
};
