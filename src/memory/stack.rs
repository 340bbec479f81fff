//! Stack slots for `main()`'s frame
//!
//! The stack pane shows a handful of fixed slots, top of frame first. Most
//! hold literal placeholder words (`0xdddddddd`, `main()`); one is the
//! pointer variable that receives the address produced by `new`.
//!
//! A pointer slot is assigned exactly once. `delete` does not clear it: the
//! slot keeps the now-dangling address, which is the point the last frame of
//! the scene makes.

use super::{format_address, Address};
use std::fmt;

/// What a stack slot currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    Literal(String),
    Pointer(Address),
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotValue::Literal(text) => write!(f, "{}", text),
            SlotValue::Pointer(addr) => write!(f, "{}", format_address(*addr)),
        }
    }
}

/// One row of the stack pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSlot {
    pub label: Option<String>, // Variable name, if this slot is a named local
    pub address: Address,
    pub value: SlotValue,
}

impl StackSlot {
    pub fn new(address: Address, value: SlotValue, label: Option<String>) -> Self {
        StackSlot {
            label,
            address,
            value,
        }
    }

    /// Text shown in the value column, e.g. `ptr=0x55a13000`
    pub fn display_value(&self) -> String {
        match (&self.label, &self.value) {
            (Some(label), SlotValue::Pointer(_)) => format!("{}={}", label, self.value),
            _ => self.value.to_string(),
        }
    }
}

/// The stack frame of `main()`
#[derive(Debug, Clone, Default)]
pub struct Stack {
    slots: Vec<StackSlot>,
}

impl Stack {
    pub fn new(slots: Vec<StackSlot>) -> Self {
        Stack { slots }
    }

    pub fn slots(&self) -> &[StackSlot] {
        &self.slots
    }

    /// Find a slot by variable name
    pub fn slot(&self, label: &str) -> Option<&StackSlot> {
        self.slots
            .iter()
            .find(|s| s.label.as_deref() == Some(label))
    }

    /// Position of a named slot
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.label.as_deref() == Some(label))
    }

    /// Record the address returned by `new` in the named slot
    pub fn assign_pointer(&mut self, label: &str, addr: Address) -> Result<(), String> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.label.as_deref() == Some(label))
            .ok_or_else(|| format!("Unknown stack slot '{}'", label))?;

        if let SlotValue::Pointer(existing) = slot.value {
            return Err(format!(
                "Stack slot '{}' already holds {}",
                label,
                format_address(existing)
            ));
        }

        slot.value = SlotValue::Pointer(addr);
        Ok(())
    }
}
