//! Scene director
//!
//! The director turns a [`ScenarioConfig`] into a [`Timeline`]. It keeps one
//! working [`Frame`], changes a few fields for each beat of the narrative and
//! pushes a clone. The heap search itself is not scripted here: the director
//! drives an [`AllocationWalkSimulator`] and renders whatever steps it yields,
//! so a different heap table produces a different story.
//!
//! # Narrative
//!
//! 1. Intro with every panel at rest
//! 2. `new`: the source line, `malloc()` and the OS allocation API light up
//! 3. Search: one or two frames per examined block (examine, then reject or
//!    reserve)
//! 4. Return: the address travels heap → OS → `malloc()` → code and lands in
//!    the pointer slot
//! 5. Store: the disassembly runs and the value lands in the reserved block
//! 6. Delete: `free()` and the OS release API give the block back
//!
//! If the walk is exhausted the timeline ends after step 3 with an
//! out-of-memory frame; the pointer slot keeps its placeholder.

use super::config::{ScenarioConfig, API_ACCESS, API_ALLOC, API_FREE};
use super::constants::MAX_FRAMES;
use super::errors::SceneError;
use super::frame::{BlockHighlight, Flow, Frame, HighlightKind, Panel, Phase, RuntimeCall};
use super::timeline::Timeline;
use crate::memory::format_address;
use crate::memory::heap::Heap;
use crate::memory::stack::Stack;
use crate::memory::Address;
use crate::walk::{AllocationWalkSimulator, RejectReason, WalkEvent, WalkStep};

pub struct Director {
    config: ScenarioConfig,
    working: Frame,
    timeline: Timeline,
}

impl Director {
    pub fn new(config: ScenarioConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let heap = Heap::new(config.heap.clone(), config.page_size);
        let stack = Stack::new(config.stack.clone());
        Ok(Director {
            working: Frame::new(heap, stack),
            timeline: Timeline::new(MAX_FRAMES),
            config,
        })
    }

    /// Cap the number of frames the timeline may hold
    pub fn with_frame_limit(mut self, max_frames: usize) -> Self {
        self.timeline = Timeline::new(max_frames);
        self
    }

    /// Play the whole narrative into a timeline
    pub fn build(mut self) -> Result<Timeline, SceneError> {
        self.intro()?;
        match self.allocate()? {
            Some(addr) => {
                self.return_address(addr)?;
                self.store(addr)?;
                self.delete(addr)?;
            }
            None => self.out_of_memory()?,
        }
        Ok(self.timeline)
    }

    fn emit(&mut self, caption: impl Into<String>) -> Result<(), SceneError> {
        self.working.caption = caption.into();
        self.timeline.push(self.working.clone())?;
        // Change markers only last for the frame that made the change
        self.working.changed_slot = None;
        self.working.changed_block = None;
        Ok(())
    }

    fn source_line(&self, index: usize) -> String {
        self.config
            .source
            .get(index)
            .map(|l| l.trim().to_string())
            .unwrap_or_default()
    }

    fn api(&self, index: usize) -> &str {
        self.config.os_api.get(index).map(String::as_str).unwrap_or("?")
    }

    fn intro(&mut self) -> Result<(), SceneError> {
        self.working.phase = Phase::Intro;
        self.emit(format!(
            "{}: the program keeps locals on the stack and asks the OS for heap memory",
            self.config.title
        ))
    }

    /// Run the heap search; returns the reserved address, or `None` when no block fits
    fn allocate(&mut self) -> Result<Option<Address>, SceneError> {
        let requested = self.config.request.requested_bytes;

        self.working.phase = Phase::Allocate;
        self.working.code_line = Some(self.config.alloc_line);
        let line = self.source_line(self.config.alloc_line);
        self.emit(format!("`{}` asks the heap for {} bytes", line, requested))?;

        self.working.call = Some(RuntimeCall::Malloc);
        self.working.flows = vec![Flow::new(Panel::Code, Panel::Call)];
        self.emit("new hands the request to the C runtime: malloc()")?;

        self.working.flows.push(Flow::new(Panel::Call, Panel::Os));
        self.working.active_api = Some(API_ALLOC);
        let api = self.api(API_ALLOC).to_string();
        self.emit(format!("malloc() asks the operating system: {}", api))?;

        self.working.phase = Phase::Search;
        self.working.flows.clear();
        self.working.cursor = Some(0);
        self.emit(format!(
            "The OS walks the heap looking for a block with {} free bytes",
            requested
        ))?;

        let sim = AllocationWalkSimulator::new(self.config.heap.clone(), self.config.request)?;
        for step in sim {
            match step {
                WalkStep::Event(WalkEvent::Rejected {
                    index,
                    block,
                    reason,
                }) => {
                    self.examine(index, block.address, block.occupied_bytes, block.capacity_bytes)?;
                    let RejectReason::InsufficientSpace {
                        free_bytes,
                        requested_bytes,
                    } = reason;
                    self.working.highlight = Some(BlockHighlight {
                        index,
                        kind: HighlightKind::Rejected,
                        note: "Not enough free space!".to_string(),
                    });
                    self.emit(format!(
                        "Block {} has only {} free bytes, {} needed: rejected",
                        format_address(block.address),
                        free_bytes,
                        requested_bytes
                    ))?;
                    self.working.highlight = None;
                }
                WalkStep::Event(WalkEvent::Accepted { index, block }) => {
                    self.examine(index, block.address, block.occupied_bytes, block.capacity_bytes)?;
                    self.working.heap.reserve(block.address, requested)?;
                    self.working.changed_block = Some(index);
                    self.working.highlight = Some(BlockHighlight {
                        index,
                        kind: HighlightKind::Reserved,
                        note: "Block reserved".to_string(),
                    });
                    self.emit(format!(
                        "Block {} has {} free bytes: reserved",
                        format_address(block.address),
                        block.free_bytes()
                    ))?;
                    return Ok(Some(block.address));
                }
                WalkStep::Exhausted => return Ok(None),
            }
        }

        Ok(None)
    }

    fn examine(
        &mut self,
        index: usize,
        addr: Address,
        occupied: usize,
        capacity: usize,
    ) -> Result<(), SceneError> {
        self.working.cursor = Some(index);
        self.working.clock_ticks += 1;
        self.emit(format!(
            "Checking block {}: {} of {} bytes occupied",
            format_address(addr),
            occupied,
            capacity
        ))
    }

    fn return_address(&mut self, addr: Address) -> Result<(), SceneError> {
        let shown = format_address(addr);
        let api = self.api(API_ALLOC).to_string();

        self.working.phase = Phase::Return;
        self.working.flows = vec![Flow::new(Panel::Heap, Panel::Os)];
        self.emit(format!("The block's address {} goes back to the OS", shown))?;

        self.working.flows.push(Flow::new(Panel::Os, Panel::Call));
        self.emit(format!("{} returns {} to malloc()", api, shown))?;

        self.working.flows.push(Flow::new(Panel::Call, Panel::Code));
        self.emit(format!("malloc() returns {}, so new evaluates to it", shown))?;

        let pointer = self.config.pointer.clone();
        self.working.stack.assign_pointer(&pointer, addr)?;
        self.working.changed_slot = self.working.stack.index_of(&pointer);
        self.working.flows.clear();
        self.working.call = None;
        self.emit(format!("{} now holds {}", pointer, shown))
    }

    fn store(&mut self, addr: Address) -> Result<(), SceneError> {
        let value = self.config.value;

        self.working.phase = Phase::Store;
        self.working.code_line = Some(self.config.assign_line);
        self.working.active_api = Some(API_ACCESS);
        self.working.cursor = None;
        let line = self.source_line(self.config.assign_line);
        self.emit(format!("`{}` writes through the pointer", line))?;

        self.working.flows = vec![Flow::new(Panel::Code, Panel::Disasm)];
        for (i, instruction) in self.config.disasm.clone().iter().enumerate() {
            self.working.disasm_line = Some(i);
            self.emit(format!("The CPU executes `{}`", instruction))?;
        }

        self.working.flows.push(Flow::new(Panel::Disasm, Panel::Heap));
        self.working.heap.write_value(addr, value)?;
        self.working.changed_block = self.working.heap.index_of(addr);
        self.emit(format!("{} is stored at {}", value, format_address(addr)))?;

        self.working.flows.clear();
        self.working.disasm_line = None;
        Ok(())
    }

    fn delete(&mut self, addr: Address) -> Result<(), SceneError> {
        let shown = format_address(addr);
        let api = self.api(API_FREE).to_string();

        self.working.phase = Phase::Delete;
        self.working.code_line = Some(self.config.delete_line);
        self.working.active_api = None;
        let line = self.source_line(self.config.delete_line);
        self.emit(format!("`{}` gives the memory back", line))?;

        self.working.call = Some(RuntimeCall::Free);
        self.working.flows = vec![Flow::new(Panel::Code, Panel::Call)];
        self.emit("delete hands the pointer to the C runtime: free()")?;

        self.working.flows.push(Flow::new(Panel::Call, Panel::Os));
        self.working.active_api = Some(API_FREE);
        self.emit(format!("free() asks the operating system: {}", api))?;

        self.working.clock_ticks += 1;
        self.working.heap.release(addr)?;
        self.working.changed_block = self.working.heap.index_of(addr);
        self.working.highlight = self.working.heap.index_of(addr).map(|index| BlockHighlight {
            index,
            kind: HighlightKind::Released,
            note: "Block released".to_string(),
        });
        self.emit(format!("Block {} is free again", shown))?;

        self.working.phase = Phase::Done;
        self.working.flows.clear();
        self.working.call = None;
        self.working.active_api = None;
        self.working.code_line = None;
        self.working.highlight = None;
        self.emit(format!(
            "{} still holds {}, but that memory is gone: {} is now a dangling pointer",
            self.config.pointer, shown, self.config.pointer
        ))
    }

    fn out_of_memory(&mut self) -> Result<(), SceneError> {
        let api = self.api(API_ALLOC).to_string();
        self.working.phase = Phase::OutOfMemory;
        self.working.cursor = None;
        self.working.highlight = None;
        self.working.flows = vec![
            Flow::new(Panel::Os, Panel::Call),
            Flow::new(Panel::Call, Panel::Code),
        ];
        self.emit(format!(
            "No block has {} free bytes: {} fails and new throws std::bad_alloc",
            self.config.request.requested_bytes, api
        ))
    }
}

/// Build the timeline for a scenario
pub fn build_timeline(config: ScenarioConfig) -> Result<Timeline, SceneError> {
    Director::new(config)?.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::heap::HeapBlock;
    use crate::walk::AllocationRequest;

    #[test]
    fn test_default_timeline_phases_in_order() {
        let timeline = build_timeline(ScenarioConfig::default()).unwrap();
        let mut phases: Vec<Phase> = Vec::new();
        for frame in timeline.frames() {
            if phases.last() != Some(&frame.phase) {
                phases.push(frame.phase);
            }
        }
        assert_eq!(
            phases,
            vec![
                Phase::Intro,
                Phase::Allocate,
                Phase::Search,
                Phase::Return,
                Phase::Store,
                Phase::Delete,
                Phase::Done
            ]
        );
    }

    #[test]
    fn test_clock_ticks_once_per_examined_block_and_release() {
        let timeline = build_timeline(ScenarioConfig::default()).unwrap();
        let last = timeline.last().unwrap();
        // three blocks examined, one release
        assert_eq!(last.clock_ticks, 4);
    }

    #[test]
    fn test_frame_limit_surfaces_as_error() {
        let result = Director::new(ScenarioConfig::default())
            .unwrap()
            .with_frame_limit(3)
            .build();
        assert!(matches!(result, Err(SceneError::Timeline(_))));
    }

    #[test]
    fn test_zero_byte_request_is_rejected() {
        let config = ScenarioConfig {
            request: AllocationRequest::new(0),
            ..ScenarioConfig::default()
        };
        assert!(Director::new(config).is_err());
    }

    #[test]
    fn test_first_block_fit_skips_rejections() {
        let config = ScenarioConfig {
            heap: vec![HeapBlock::new(0x1000, 4096, 0).unwrap()],
            ..ScenarioConfig::default()
        };
        let timeline = build_timeline(config).unwrap();
        assert!(timeline
            .frames()
            .iter()
            .all(|f| !matches!(&f.highlight, Some(h) if h.kind == HighlightKind::Rejected)));
    }
}
