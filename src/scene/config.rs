//! Scenario configuration
//!
//! A [`ScenarioConfig`] holds every literal table the scene needs: the C++
//! program, its disassembly, the OS allocation API, the initial stack and
//! heap, and the size of the request. [`ScenarioConfig::default`] is the
//! classic `new int` / `*ptr = 42` / `delete ptr` walkthrough; scenario files
//! (see [`super::parse`]) override parts of it.

use super::constants::{DEFAULT_REQUEST_BYTES, HEAP_ADDRESS_START, PAGE_SIZE, STACK_ADDRESS_START};
use super::errors::ScenarioError;
use crate::memory::heap::HeapBlock;
use crate::memory::stack::{SlotValue, StackSlot};
use crate::memory::Address;
use crate::walk::AllocationRequest;
use rustc_hash::FxHashSet;

/// OS API entry called to obtain memory
pub const API_ALLOC: usize = 0;
/// OS API entry highlighted while the program touches the new memory
pub const API_ACCESS: usize = 1;
/// OS API entry called to give memory back
pub const API_FREE: usize = 2;

#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub title: String,
    pub page_size: usize,
    pub source: Vec<String>,
    pub disasm: Vec<String>,
    pub os_api: Vec<String>,
    pub stack: Vec<StackSlot>,
    /// Label of the stack slot that receives the pointer
    pub pointer: String,
    pub heap: Vec<HeapBlock>,
    pub request: AllocationRequest,
    /// Value stored through the pointer
    pub value: i32,
    /// 0-based source line of the `new` expression
    pub alloc_line: usize,
    /// 0-based source line of the store through the pointer
    pub assign_line: usize,
    /// 0-based source line of the `delete`
    pub delete_line: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let lines = |text: &[&str]| text.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let stack_words = ["main()", "0x00000000", "0xdddddddd", "0xffffffff", "0x00000000"];
        let stack = stack_words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let label = (i == 1).then(|| "ptr".to_string());
                StackSlot::new(
                    STACK_ADDRESS_START - 4 * i as Address,
                    SlotValue::Literal(word.to_string()),
                    label,
                )
            })
            .collect();

        let heap = [2048, 3072, 0, 1024, 4078]
            .iter()
            .enumerate()
            .map(|(i, &occupied)| HeapBlock {
                address: HEAP_ADDRESS_START + (i * PAGE_SIZE) as Address,
                capacity_bytes: PAGE_SIZE,
                occupied_bytes: occupied,
            })
            .collect();

        ScenarioConfig {
            title: "Dynamic memory: new / delete".to_string(),
            page_size: PAGE_SIZE,
            source: lines(&[
                "int main() {",
                "    int* ptr = new int;",
                "    *ptr = 42;",
                "    delete ptr;",
                "}",
            ]),
            disasm: lines(&["mov rax, [rsp + addr_ptr]", "mov [rax], 42"]),
            os_api: lines(&["VirtualAlloc()", "HeapAlloc()", "VirtualFree()"]),
            stack,
            pointer: "ptr".to_string(),
            heap,
            request: AllocationRequest::new(DEFAULT_REQUEST_BYTES),
            value: 42,
            alloc_line: 1,
            assign_line: 2,
            delete_line: 3,
        }
    }
}

impl ScenarioConfig {
    /// Check cross-references between the tables
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let fail = |message: String| -> Result<(), ScenarioError> {
            Err(ScenarioError::new(0, message))
        };

        if self.source.is_empty() {
            return fail("no source lines".to_string());
        }
        for (name, line) in [
            ("alloc", self.alloc_line),
            ("assign", self.assign_line),
            ("delete", self.delete_line),
        ] {
            if line >= self.source.len() {
                return fail(format!(
                    "{} line {} is past the end of the source ({} lines)",
                    name,
                    line + 1,
                    self.source.len()
                ));
            }
        }

        if self.os_api.len() <= API_FREE {
            return fail(format!(
                "expected at least {} OS API entries, found {}",
                API_FREE + 1,
                self.os_api.len()
            ));
        }

        if !self
            .stack
            .iter()
            .any(|s| s.label.as_deref() == Some(self.pointer.as_str()))
        {
            return fail(format!("no stack slot labelled '{}'", self.pointer));
        }
        let mut labels = FxHashSet::default();
        for label in self.stack.iter().filter_map(|s| s.label.as_deref()) {
            if !labels.insert(label) {
                return fail(format!("stack label '{}' is used twice", label));
            }
        }

        if self.page_size == 0 {
            return fail("page size must be at least one byte".to_string());
        }

        if self.heap.is_empty() {
            return fail("heap has no blocks".to_string());
        }
        let mut seen = FxHashSet::default();
        for block in &self.heap {
            if block.occupied_bytes > block.capacity_bytes {
                return fail(format!(
                    "block 0x{:08x} has more bytes occupied than its capacity",
                    block.address
                ));
            }
            if block.capacity_bytes > self.page_size {
                return fail(format!(
                    "block 0x{:08x} holds {} bytes, more than a {} byte page",
                    block.address, block.capacity_bytes, self.page_size
                ));
            }
            if !seen.insert(block.address) {
                return fail(format!("block 0x{:08x} is listed twice", block.address));
            }
        }

        if self.request.requested_bytes == 0 {
            return fail("request must be for at least one byte".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_is_valid() {
        let config = ScenarioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.heap.len(), 5);
        assert_eq!(config.heap[2].address, 0x55a1_3000);
        assert_eq!(config.stack[1].address, 0x7ffd_1230);
        assert_eq!(config.stack[4].address, 0x7ffd_1224);
        assert_eq!(config.source[config.alloc_line].trim(), "int* ptr = new int;");
    }

    #[test]
    fn test_validate_catches_bad_references() {
        let mut config = ScenarioConfig::default();
        config.delete_line = 9;
        assert!(config.validate().unwrap_err().message.contains("delete line 10"));

        let mut config = ScenarioConfig::default();
        config.pointer = "q".to_string();
        assert!(config.validate().is_err());

        let mut config = ScenarioConfig::default();
        config.heap.push(config.heap[0].clone());
        assert!(config.validate().unwrap_err().message.contains("listed twice"));

        let mut config = ScenarioConfig::default();
        config.os_api.truncate(2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_checks_page_size() {
        let mut config = ScenarioConfig::default();
        config.page_size = 0;
        assert!(config.validate().unwrap_err().message.contains("page size"));

        let mut config = ScenarioConfig::default();
        config.page_size = 2048;
        assert!(config
            .validate()
            .unwrap_err()
            .message
            .contains("more than a 2048 byte page"));
    }

    #[test]
    fn test_validate_rejects_duplicate_stack_labels() {
        let mut config = ScenarioConfig::default();
        let mut copy = config.stack[1].clone();
        copy.address = 0x7ffd_1220;
        config.stack.push(copy);
        assert!(config
            .validate()
            .unwrap_err()
            .message
            .contains("stack label 'ptr' is used twice"));
    }
}
