//! TUI pane rendering modules
//!
//! Each pane is a stateless render function over the current scene frame.
//!
//! # Pane Modules
//!
//! - [`source`]: C++ program with syntax highlighting and the current line
//! - [`disasm`]: Disassembly of the store through the pointer
//! - [`os`]: OS allocation API, C runtime call, clock and arrows
//! - [`stack`]: Slots of `main()`'s frame, including the pointer
//! - [`heap`]: Heap blocks with occupancy, search cursor and highlights
//! - [`caption`]: Narration for the current frame
//! - [`status`]: Status bar with keybindings and playback state
//! - `utils`: Shared block styling and scrolling helpers

mod utils;

pub mod caption;
pub mod disasm;
pub mod heap;
pub mod os;
pub mod source;
pub mod stack;
pub mod status;

// Re-export render functions for convenience
pub use caption::render_caption_pane;
pub use disasm::render_disasm_pane;
pub use heap::{render_heap_pane, HeapRenderData};
pub use os::render_os_pane;
pub use source::render_source_pane;
pub use stack::render_stack_pane;
pub use status::render_status_bar;
