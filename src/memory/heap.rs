//! Heap blocks and the reservation table
//!
//! The heap is a fixed, ordered table of page-sized blocks. Each block has a
//! capacity and a number of bytes already occupied by earlier allocations;
//! neither ever changes once listed. What *does* change over the course of a
//! scene is tracked separately, in the reservation table:
//! - a block accepted by the allocation walk is reserved for the request
//! - a store through the pointer writes a value into the reservation
//! - `delete` releases it, leaving a tombstone so a second release is caught
//!
//! # Error Handling
//!
//! Like the rest of the memory model, methods return `Result<_, String>`; the
//! scene director wraps these into `SceneError::Memory` at its boundary.

use super::{format_address, Address};
use rustc_hash::FxHashMap;

/// A candidate block in the heap table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapBlock {
    pub address: Address,
    pub capacity_bytes: usize,
    pub occupied_bytes: usize,
}

impl HeapBlock {
    /// Create a block, rejecting occupancy beyond capacity
    pub fn new(
        address: Address,
        capacity_bytes: usize,
        occupied_bytes: usize,
    ) -> Result<Self, String> {
        if occupied_bytes > capacity_bytes {
            return Err(format!(
                "Block {} has {} bytes occupied but only {} bytes of capacity",
                format_address(address),
                occupied_bytes,
                capacity_bytes
            ));
        }
        Ok(HeapBlock {
            address,
            capacity_bytes,
            occupied_bytes,
        })
    }

    /// Bytes still available in this block
    pub fn free_bytes(&self) -> usize {
        self.capacity_bytes.saturating_sub(self.occupied_bytes)
    }
}

/// State of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationState {
    Reserved,
    Released, // Kept as a tombstone to detect double delete
}

/// Bytes handed out from a block for one `new` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub bytes: usize,
    pub state: ReservationState,
    pub value: Option<i32>,
}

/// The heap as shown in the heap pane
#[derive(Debug, Clone)]
pub struct Heap {
    blocks: Vec<HeapBlock>,
    reservations: FxHashMap<Address, Reservation>,
    page_size: usize,
}

impl Heap {
    pub fn new(blocks: Vec<HeapBlock>, page_size: usize) -> Self {
        Heap {
            blocks,
            reservations: FxHashMap::default(),
            page_size,
        }
    }

    /// All blocks in table order
    pub fn blocks(&self) -> &[HeapBlock] {
        &self.blocks
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Look up a block by its address
    pub fn block(&self, addr: Address) -> Option<&HeapBlock> {
        self.blocks.iter().find(|b| b.address == addr)
    }

    /// Position of a block in the table
    pub fn index_of(&self, addr: Address) -> Option<usize> {
        self.blocks.iter().position(|b| b.address == addr)
    }

    /// Get the reservation recorded for a block (includes tombstones)
    pub fn reservation(&self, addr: Address) -> Option<&Reservation> {
        self.reservations.get(&addr)
    }

    /// Whether a block currently holds a live reservation
    pub fn is_reserved(&self, addr: Address) -> bool {
        self.reservations
            .get(&addr)
            .is_some_and(|r| r.state == ReservationState::Reserved)
    }

    /// Occupied bytes including a live reservation, for display
    pub fn occupied_bytes(&self, addr: Address) -> Option<usize> {
        let block = self.block(addr)?;
        let reserved = match self.reservations.get(&addr) {
            Some(r) if r.state == ReservationState::Reserved => r.bytes,
            _ => 0,
        };
        Some(block.occupied_bytes + reserved)
    }

    /// Reserve `bytes` in the block at `addr`
    pub fn reserve(&mut self, addr: Address, bytes: usize) -> Result<(), String> {
        let block = self.block(addr).ok_or_else(|| {
            format!("Invalid reservation: no block at {}", format_address(addr))
        })?;

        if bytes > block.free_bytes() {
            return Err(format!(
                "Block {} has {} free bytes, cannot reserve {}",
                format_address(addr),
                block.free_bytes(),
                bytes
            ));
        }

        if self.is_reserved(addr) {
            return Err(format!(
                "Block {} is already reserved",
                format_address(addr)
            ));
        }

        self.reservations.insert(
            addr,
            Reservation {
                bytes,
                state: ReservationState::Reserved,
                value: None,
            },
        );
        Ok(())
    }

    /// Store a value into a reserved block
    pub fn write_value(&mut self, addr: Address, value: i32) -> Result<(), String> {
        match self.reservations.get_mut(&addr) {
            Some(r) if r.state == ReservationState::Reserved => {
                r.value = Some(value);
                Ok(())
            }
            Some(_) => Err(format!(
                "Use-after-free: address {} has been released",
                format_address(addr)
            )),
            None => Err(format!(
                "Invalid pointer: address {} was never reserved",
                format_address(addr)
            )),
        }
    }

    /// Release a reservation (mark as tombstone)
    pub fn release(&mut self, addr: Address) -> Result<(), String> {
        match self.reservations.get_mut(&addr) {
            Some(r) if r.state == ReservationState::Reserved => {
                r.state = ReservationState::Released;
                Ok(())
            }
            Some(_) => Err(format!("Double delete detected at {}", format_address(addr))),
            None => Err(format!(
                "Invalid delete: address {} was never reserved",
                format_address(addr)
            )),
        }
    }
}
