// Integration tests for building and navigating the allocation scene

use heapwalk::memory::heap::{HeapBlock, ReservationState};
use heapwalk::memory::stack::SlotValue;
use heapwalk::scene::frame::{HighlightKind, Panel, Phase};
use heapwalk::scene::parse::parse_scenario;
use heapwalk::scene::{build_timeline, ScenarioConfig, SceneError};
use heapwalk::walk::AllocationRequest;

#[test]
fn test_pointer_slot_receives_accepted_address() {
    let timeline = build_timeline(ScenarioConfig::default()).expect("Build failed");

    let reserve_at = timeline
        .frames()
        .iter()
        .position(|f| matches!(&f.highlight, Some(h) if h.kind == HighlightKind::Reserved))
        .expect("No reservation frame");

    // Placeholder until the address comes back
    let before = timeline.get(reserve_at).unwrap();
    assert_eq!(
        before.stack.slot("ptr").unwrap().value,
        SlotValue::Literal("0x00000000".to_string())
    );

    let assigned = timeline
        .frames()
        .iter()
        .find(|f| f.changed_slot.is_some())
        .expect("No stack update frame");
    let slot = assigned.stack.slot("ptr").unwrap();
    assert_eq!(slot.value, SlotValue::Pointer(0x55a1_3000));
    assert_eq!(slot.display_value(), "ptr=0x55a13000");
    assert_eq!(assigned.changed_slot, Some(1));
}

#[test]
fn test_search_frames_follow_walk_order() {
    let timeline = build_timeline(ScenarioConfig::default()).expect("Build failed");

    let verdicts: Vec<(usize, HighlightKind)> = timeline
        .frames()
        .iter()
        .filter(|f| f.phase == Phase::Search)
        .filter_map(|f| f.highlight.as_ref().map(|h| (h.index, h.kind)))
        .collect();

    assert_eq!(
        verdicts,
        vec![
            (0, HighlightKind::Rejected),
            (1, HighlightKind::Rejected),
            (2, HighlightKind::Reserved)
        ]
    );

    // Blocks past the accepted one are never examined
    assert!(timeline
        .frames()
        .iter()
        .all(|f| f.cursor.map_or(true, |c| c <= 2)));
}

#[test]
fn test_store_and_delete_update_heap() {
    let timeline = build_timeline(ScenarioConfig::default()).expect("Build failed");

    let stored = timeline
        .frames()
        .iter()
        .find(|f| f.phase == Phase::Store && f.has_flow(Panel::Disasm, Panel::Heap))
        .expect("No store frame");
    let reservation = stored.heap.reservation(0x55a1_3000).unwrap();
    assert_eq!(reservation.value, Some(42));
    assert_eq!(stored.heap.occupied_bytes(0x55a1_3000), Some(3000));

    let last = timeline.last().unwrap();
    assert_eq!(last.phase, Phase::Done);
    assert_eq!(
        last.heap.reservation(0x55a1_3000).map(|r| r.state),
        Some(ReservationState::Released)
    );
    // The pointer dangles: it still holds the released address
    assert_eq!(
        last.stack.slot("ptr").unwrap().value,
        SlotValue::Pointer(0x55a1_3000)
    );
    assert!(last.caption.contains("dangling"));
}

#[test]
fn test_exhausted_walk_ends_in_out_of_memory() {
    let config = ScenarioConfig {
        heap: vec![
            HeapBlock::new(0x55a1_1000, 4096, 4000).unwrap(),
            HeapBlock::new(0x55a1_2000, 4096, 4096).unwrap(),
        ],
        request: AllocationRequest::new(512),
        ..ScenarioConfig::default()
    };
    let timeline = build_timeline(config).expect("Build failed");

    let last = timeline.last().unwrap();
    assert_eq!(last.phase, Phase::OutOfMemory);
    assert!(last.caption.contains("std::bad_alloc"));
    assert_eq!(
        last.stack.slot("ptr").unwrap().value,
        SlotValue::Literal("0x00000000".to_string())
    );
    assert!(timeline
        .frames()
        .iter()
        .all(|f| !matches!(f.phase, Phase::Store | Phase::Delete)));

    let rejections = timeline
        .frames()
        .iter()
        .filter(|f| matches!(&f.highlight, Some(h) if h.kind == HighlightKind::Rejected))
        .count();
    assert_eq!(rejections, 2);
}

#[test]
fn test_rebuild_is_deterministic() {
    let a = build_timeline(ScenarioConfig::default()).expect("Build failed");
    let b = build_timeline(ScenarioConfig::default()).expect("Build failed");

    assert_eq!(a.len(), b.len());
    for (fa, fb) in a.frames().iter().zip(b.frames()) {
        assert_eq!(fa.caption, fb.caption);
        assert_eq!(fa.cursor, fb.cursor);
        assert_eq!(fa.highlight, fb.highlight);
    }
}

#[test]
fn test_scenario_file_drives_the_walk() {
    let text = r#"
        # a heap where only the last block fits
        request 64
        value 7
        heap 0x1000 128 100
        heap 0x2000 128 128
        heap 0x3000 128 0
    "#;
    let config = parse_scenario(text).expect("Parse failed");
    let timeline = build_timeline(config).expect("Build failed");

    let last = timeline.last().unwrap();
    assert_eq!(last.stack.slot("ptr").unwrap().value, SlotValue::Pointer(0x3000));

    let stored = timeline
        .frames()
        .iter()
        .find_map(|f| f.heap.reservation(0x3000).and_then(|r| r.value));
    assert_eq!(stored, Some(7));
}

#[test]
fn test_empty_heap_is_rejected_before_building() {
    let config = ScenarioConfig {
        heap: Vec::new(),
        ..ScenarioConfig::default()
    };
    assert!(matches!(build_timeline(config), Err(SceneError::Scenario(_))));
}
