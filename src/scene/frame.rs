//! Frames: immutable snapshots of the whole scene
//!
//! Every visible change in the narrative (a highlighted line, a cursor move,
//! a stack update) produces one [`Frame`]. Frames own clones of the heap and
//! stack, so stepping backward is just reading an earlier frame.

use crate::memory::heap::Heap;
use crate::memory::stack::Stack;

/// Which part of the narrative a frame belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Allocate,
    Search,
    Return,
    Store,
    Delete,
    OutOfMemory,
    Done,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Intro => "intro",
            Phase::Allocate => "new",
            Phase::Search => "search",
            Phase::Return => "return",
            Phase::Store => "store",
            Phase::Delete => "delete",
            Phase::OutOfMemory => "out of memory",
            Phase::Done => "done",
        }
    }
}

/// C runtime function standing between the program and the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeCall {
    Malloc,
    Free,
}

impl RuntimeCall {
    pub fn name(self) -> &'static str {
        match self {
            RuntimeCall::Malloc => "malloc()",
            RuntimeCall::Free => "free()",
        }
    }
}

/// A panel an arrow can start or end at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Code,
    Disasm,
    Call,
    Os,
    Heap,
}

/// An arrow drawn between two panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flow {
    pub from: Panel,
    pub to: Panel,
}

impl Flow {
    pub const fn new(from: Panel, to: Panel) -> Self {
        Flow { from, to }
    }
}

/// How a heap block is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    /// Red, shown only while the rejection is on screen
    Rejected,
    /// Green, stays until the block is released
    Reserved,
    /// The reservation was given back
    Released,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHighlight {
    pub index: usize,
    pub kind: HighlightKind,
    pub note: String,
}

/// Complete scene state at one point in the timeline
#[derive(Debug, Clone)]
pub struct Frame {
    pub phase: Phase,
    pub code_line: Option<usize>,
    pub disasm_line: Option<usize>,
    pub active_api: Option<usize>,
    pub call: Option<RuntimeCall>,
    pub flows: Vec<Flow>,
    /// Number of clock-hand ticks so far; each examined block costs one
    pub clock_ticks: u32,
    /// Heap block the search pointer is at
    pub cursor: Option<usize>,
    pub highlight: Option<BlockHighlight>,
    pub heap: Heap,
    pub stack: Stack,
    /// Stack slot changed by this frame
    pub changed_slot: Option<usize>,
    /// Heap block whose contents changed in this frame
    pub changed_block: Option<usize>,
    pub caption: String,
}

impl Frame {
    pub fn new(heap: Heap, stack: Stack) -> Self {
        Frame {
            phase: Phase::Intro,
            code_line: None,
            disasm_line: None,
            active_api: None,
            call: None,
            flows: Vec::new(),
            clock_ticks: 0,
            cursor: None,
            highlight: None,
            heap,
            stack,
            changed_slot: None,
            changed_block: None,
            caption: String::new(),
        }
    }

    /// Whether an arrow between two panels is on screen
    pub fn has_flow(&self, from: Panel, to: Panel) -> bool {
        self.flows.contains(&Flow::new(from, to))
    }
}
