// Integration tests for the first-fit allocation walk

use heapwalk::memory::heap::HeapBlock;
use heapwalk::walk::{
    walk, AllocationRequest, AllocationWalkSimulator, WalkError, WalkEvent, WalkState, WalkStep,
};

fn block(address: u64, capacity: usize, occupied: usize) -> HeapBlock {
    HeapBlock::new(address, capacity, occupied).expect("valid block")
}

fn reference_heap() -> Vec<HeapBlock> {
    vec![
        block(0x55a1_1000, 4096, 2048),
        block(0x55a1_2000, 4096, 3072),
        block(0x55a1_3000, 4096, 0),
    ]
}

/// Compact form of a trace: ('R' | 'A', address) per event, 'X' for exhausted
fn summarize(steps: &[WalkStep]) -> Vec<(char, u64)> {
    steps
        .iter()
        .map(|s| match s {
            WalkStep::Event(WalkEvent::Rejected { block, .. }) => ('R', block.address),
            WalkStep::Event(WalkEvent::Accepted { block, .. }) => ('A', block.address),
            WalkStep::Exhausted => ('X', 0),
        })
        .collect()
}

#[test]
fn test_reference_heap_rejects_twice_then_accepts() {
    let trace = walk(reference_heap(), AllocationRequest::new(3000)).expect("walk failed");

    assert_eq!(
        summarize(&trace.steps),
        vec![('R', 0x55a1_1000), ('R', 0x55a1_2000), ('A', 0x55a1_3000)]
    );
    assert_eq!(trace.reserved.map(|b| b.address), Some(0x55a1_3000));
    assert!(!trace.is_exhausted());
}

#[test]
fn test_full_block_exhausts() {
    let trace = walk(vec![block(0xA, 100, 100)], AllocationRequest::new(1)).expect("walk failed");

    assert_eq!(summarize(&trace.steps), vec![('R', 0xA), ('X', 0)]);
    assert!(trace.reserved.is_none());
    assert!(trace.is_exhausted());
}

#[test]
fn test_no_fit_rejects_every_block() {
    let blocks = vec![block(0x1, 64, 32), block(0x2, 64, 48), block(0x3, 64, 63)];
    let trace = walk(blocks, AllocationRequest::new(33)).expect("walk failed");

    assert_eq!(trace.events().count(), 3);
    assert!(trace
        .events()
        .all(|e| matches!(e, WalkEvent::Rejected { .. })));
    assert_eq!(trace.steps.last(), Some(&WalkStep::Exhausted));
}

#[test]
fn test_halts_at_first_fit_not_best_fit() {
    // 0x3 has exactly 16 bytes free, but first-fit stops at 0x2
    let blocks = vec![block(0x1, 64, 60), block(0x2, 64, 32), block(0x3, 64, 48)];
    let trace = walk(blocks, AllocationRequest::new(16)).expect("walk failed");

    assert_eq!(summarize(&trace.steps), vec![('R', 0x1), ('A', 0x2)]);
}

#[test]
fn test_outcome_follows_data_not_position() {
    let mut blocks = reference_heap();
    blocks[0] = block(0x55a1_1000, 4096, 0);

    let trace = walk(blocks, AllocationRequest::new(3000)).expect("walk failed");
    assert_eq!(summarize(&trace.steps), vec![('A', 0x55a1_1000)]);
}

#[test]
fn test_events_before_acceptance_are_rejections() {
    let blocks: Vec<HeapBlock> = (0..8)
        .map(|i| block(0x1000 * (i + 1), 256, if i == 5 { 0 } else { 200 }))
        .collect();
    let trace = walk(blocks, AllocationRequest::new(100)).expect("walk failed");

    let events: Vec<&WalkEvent> = trace.events().collect();
    assert_eq!(events.len(), 6);
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.index(), i);
        if i < 5 {
            assert!(matches!(event, WalkEvent::Rejected { .. }));
        } else {
            assert!(matches!(event, WalkEvent::Accepted { .. }));
        }
    }
}

#[test]
fn test_repeated_walks_are_identical() {
    let first = walk(reference_heap(), AllocationRequest::new(3000)).expect("walk failed");
    let second = walk(reference_heap(), AllocationRequest::new(3000)).expect("walk failed");
    assert_eq!(first, second);
}

#[test]
fn test_invalid_input() {
    let empty = AllocationWalkSimulator::new(Vec::new(), AllocationRequest::new(4));
    assert!(matches!(empty, Err(WalkError::InvalidInput { .. })));

    let zero = AllocationWalkSimulator::new(reference_heap(), AllocationRequest::new(0));
    assert!(matches!(zero, Err(WalkError::InvalidInput { .. })));
}

#[test]
fn test_stepping_by_hand() {
    let mut sim = AllocationWalkSimulator::new(reference_heap(), AllocationRequest::new(3000))
        .expect("init failed");

    let mut count = 0;
    while let Some(step) = sim.step() {
        count += 1;
        if let WalkStep::Event(WalkEvent::Accepted { block, .. }) = step {
            assert_eq!(block.address, 0x55a1_3000);
        }
    }

    assert_eq!(count, 3);
    assert_eq!(sim.state(), WalkState::Accepted);
    assert_eq!(sim.reserved().map(|b| b.address), Some(0x55a1_3000));
}
