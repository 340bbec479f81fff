use super::errors::WalkError;
use crate::memory::heap::HeapBlock;

/// A single `new` expression's request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRequest {
    pub requested_bytes: usize,
}

impl AllocationRequest {
    pub fn new(requested_bytes: usize) -> Self {
        AllocationRequest { requested_bytes }
    }
}

/// Why a block was passed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InsufficientSpace {
        free_bytes: usize,
        requested_bytes: usize,
    },
}

/// Outcome of examining one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    Rejected {
        index: usize,
        block: HeapBlock,
        reason: RejectReason,
    },
    Accepted {
        index: usize,
        block: HeapBlock,
    },
}

impl WalkEvent {
    pub fn index(&self) -> usize {
        match self {
            WalkEvent::Rejected { index, .. } | WalkEvent::Accepted { index, .. } => *index,
        }
    }

    pub fn block(&self) -> &HeapBlock {
        match self {
            WalkEvent::Rejected { block, .. } | WalkEvent::Accepted { block, .. } => block,
        }
    }
}

/// What one call to `step()` produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkStep {
    Event(WalkEvent),
    /// Every block was rejected; the allocation fails
    Exhausted,
}

/// Position in the walk's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Created,
    Walking,
    Accepted,
    Exhausted,
}

impl WalkState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WalkState::Accepted | WalkState::Exhausted)
    }
}

/// Admission predicate: the block's free space covers the request
pub fn fits(block: &HeapBlock, request: &AllocationRequest) -> bool {
    block.free_bytes() >= request.requested_bytes
}

/// Walks a heap table looking for the first block that fits a request
#[derive(Debug, Clone)]
pub struct AllocationWalkSimulator {
    blocks: Vec<HeapBlock>,
    request: AllocationRequest,
    cursor: usize,
    state: WalkState,
    reserved: Option<usize>,
}

impl AllocationWalkSimulator {
    /// Start a walk over `blocks`
    pub fn new(blocks: Vec<HeapBlock>, request: AllocationRequest) -> Result<Self, WalkError> {
        if blocks.is_empty() {
            return Err(WalkError::InvalidInput {
                reason: "heap table has no blocks".to_string(),
            });
        }
        if request.requested_bytes == 0 {
            return Err(WalkError::InvalidInput {
                reason: "request is for zero bytes".to_string(),
            });
        }

        Ok(AllocationWalkSimulator {
            blocks,
            request,
            cursor: 0,
            state: WalkState::Created,
            reserved: None,
        })
    }

    /// Examine the next block.
    ///
    /// Returns `None` once Accepted or Exhausted has been reported.
    pub fn step(&mut self) -> Option<WalkStep> {
        if self.state.is_terminal() {
            return None;
        }

        let Some(block) = self.blocks.get(self.cursor) else {
            self.state = WalkState::Exhausted;
            return Some(WalkStep::Exhausted);
        };

        let index = self.cursor;
        self.cursor += 1;

        let event = if fits(block, &self.request) {
            self.state = WalkState::Accepted;
            self.reserved = Some(index);
            WalkEvent::Accepted {
                index,
                block: block.clone(),
            }
        } else {
            self.state = WalkState::Walking;
            WalkEvent::Rejected {
                index,
                block: block.clone(),
                reason: RejectReason::InsufficientSpace {
                    free_bytes: block.free_bytes(),
                    requested_bytes: self.request.requested_bytes,
                },
            }
        };

        Some(WalkStep::Event(event))
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    pub fn request(&self) -> AllocationRequest {
        self.request
    }

    pub fn blocks(&self) -> &[HeapBlock] {
        &self.blocks
    }

    /// Index of the next block to examine
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The block reserved for the request, once one has been accepted
    pub fn reserved(&self) -> Option<&HeapBlock> {
        self.reserved.and_then(|i| self.blocks.get(i))
    }
}

impl Iterator for AllocationWalkSimulator {
    type Item = WalkStep;

    fn next(&mut self) -> Option<WalkStep> {
        self.step()
    }
}

/// Full result of one walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkTrace {
    pub steps: Vec<WalkStep>,
    pub reserved: Option<HeapBlock>,
}

impl WalkTrace {
    /// Only the block events, without the trailing `Exhausted` marker
    pub fn events(&self) -> impl Iterator<Item = &WalkEvent> {
        self.steps.iter().filter_map(|s| match s {
            WalkStep::Event(e) => Some(e),
            WalkStep::Exhausted => None,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.steps.last(), Some(WalkStep::Exhausted))
    }
}

/// Run a walk to completion
pub fn walk(blocks: Vec<HeapBlock>, request: AllocationRequest) -> Result<WalkTrace, WalkError> {
    let mut sim = AllocationWalkSimulator::new(blocks, request)?;
    let steps: Vec<WalkStep> = sim.by_ref().collect();
    Ok(WalkTrace {
        steps,
        reserved: sim.reserved().cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(address: u64, capacity: usize, occupied: usize) -> HeapBlock {
        HeapBlock::new(address, capacity, occupied).unwrap()
    }

    #[test]
    fn test_state_transitions() {
        let mut sim = AllocationWalkSimulator::new(
            vec![block(0x1000, 16, 16), block(0x2000, 16, 0)],
            AllocationRequest::new(8),
        )
        .unwrap();
        assert_eq!(sim.state(), WalkState::Created);

        assert!(matches!(
            sim.step(),
            Some(WalkStep::Event(WalkEvent::Rejected { index: 0, .. }))
        ));
        assert_eq!(sim.state(), WalkState::Walking);
        assert!(sim.reserved().is_none());

        assert!(matches!(
            sim.step(),
            Some(WalkStep::Event(WalkEvent::Accepted { index: 1, .. }))
        ));
        assert_eq!(sim.state(), WalkState::Accepted);
        assert_eq!(sim.reserved().map(|b| b.address), Some(0x2000));

        assert_eq!(sim.step(), None);
        assert_eq!(sim.cursor(), 2);
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        let block = block(0x1000, 4096, 4092);
        assert!(fits(&block, &AllocationRequest::new(4)));
        assert!(!fits(&block, &AllocationRequest::new(5)));
    }

    #[test]
    fn test_exhausted_reported_once() {
        let mut sim =
            AllocationWalkSimulator::new(vec![block(0x1000, 8, 8)], AllocationRequest::new(1))
                .unwrap();
        assert!(matches!(sim.step(), Some(WalkStep::Event(_))));
        assert_eq!(sim.step(), Some(WalkStep::Exhausted));
        assert_eq!(sim.state(), WalkState::Exhausted);
        assert_eq!(sim.step(), None);
    }

    #[test]
    fn test_reject_reason_carries_sizes() {
        let trace = walk(vec![block(0x1000, 4096, 3072)], AllocationRequest::new(3000)).unwrap();
        match &trace.steps[0] {
            WalkStep::Event(WalkEvent::Rejected { reason, .. }) => {
                assert_eq!(
                    *reason,
                    RejectReason::InsufficientSpace {
                        free_bytes: 1024,
                        requested_bytes: 3000
                    }
                );
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
        assert!(trace.is_exhausted());
    }
}
