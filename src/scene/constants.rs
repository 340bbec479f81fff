// Constants for the allocation scene

/// Size of one heap page; every block in the default heap table is one page
pub const PAGE_SIZE: usize = 4096;

/// Address of the first block in the default heap table
/// Blocks follow one page apart: 0x55a11000, 0x55a12000, ...
pub const HEAP_ADDRESS_START: u64 = 0x55a1_1000;

/// Address of the top slot of `main()`'s frame
/// Slots grow downward four bytes at a time
pub const STACK_ADDRESS_START: u64 = 0x7ffd_1234;

/// Bytes requested by the `new int` in the default scenario
pub const DEFAULT_REQUEST_BYTES: usize = 3000;

/// Upper bound on frames in one timeline
pub const MAX_FRAMES: usize = 10_000;
