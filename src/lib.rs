//! # Introduction
//!
//! heapwalk steps through what happens when a C++ program runs
//! `int* ptr = new int; *ptr = 42; delete ptr;`: the request travels through
//! `malloc()` to the operating system, the OS walks the heap for a block with
//! enough free space, and the block's address comes back to land in `ptr`.
//! Every beat is a frame, navigated forward and backward through a terminal
//! UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Scenario → Director ⇄ AllocationWalkSimulator → Timeline → TUI
//! ```
//!
//! 1. [`scene::config`] / [`scene::parse`]: the literal tables: program,
//!    disassembly, OS API, stack slots, heap blocks, request size.
//! 2. [`walk`]: the first-fit heap search. Pure and deterministic; emits one
//!    [`walk::WalkStep`] per examined block.
//! 3. [`scene::director`]: plays the narrative, turning walk steps into
//!    immutable [`scene::Frame`]s collected in a [`scene::Timeline`].
//! 4. [`memory`]: heap blocks, reservations and stack slots shared by the
//!    walk and the frames.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.

pub mod memory;
pub mod scene;
pub mod ui;
pub mod walk;
