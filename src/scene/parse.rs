//! Scenario file parser
//!
//! Scenario files are line-oriented. Each non-blank line that does not start
//! with `#` is a directive followed by its arguments:
//!
//! ```text
//! title Dynamic memory: new / delete
//! page 4096
//! request 3000
//! value 42
//! source int main() {
//! source     int* ptr = new int;
//! disasm mov [rax], 42
//! api VirtualAlloc()
//! stack 0x7ffd1230 0x00000000 ptr
//! pointer ptr
//! heap 0x55a11000 4096 2048
//! line alloc 2
//! ```
//!
//! Text directives (`title`, `source`, `disasm`, `api`) take the rest of the
//! line verbatim after a single separating space, so source indentation
//! survives. The first `source`, `disasm`, `api`, `stack` or `heap` line
//! replaces the default table of that kind; later lines append to it.
//! Anything not mentioned keeps its default.

use super::config::ScenarioConfig;
use super::errors::ScenarioError;
use crate::memory::heap::HeapBlock;
use crate::memory::parse_address;
use crate::memory::stack::{SlotValue, StackSlot};
use crate::walk::AllocationRequest;

/// Which default tables have already been replaced
#[derive(Default)]
struct Replaced {
    source: bool,
    disasm: bool,
    api: bool,
    stack: bool,
    heap: bool,
}

/// Parse a scenario file and validate the result
pub fn parse_scenario(text: &str) -> Result<ScenarioConfig, ScenarioError> {
    let mut config = ScenarioConfig::default();
    let mut replaced = Replaced::default();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (directive, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((d, r)) => (d, r),
            None => (trimmed, ""),
        };
        // `rest` keeps everything after the first separator, indentation included
        let args: Vec<&str> = rest.split_whitespace().collect();
        let err = |message: String| ScenarioError::new(line_no, message);

        match directive {
            "title" => config.title = rest.trim().to_string(),
            "page" => {
                let size = parse_number(&args, 0, "page size").map_err(err)?;
                if size == 0 {
                    return Err(err("page size must be at least one byte".to_string()));
                }
                config.page_size = size;
            }
            "request" => {
                let bytes = parse_number(&args, 0, "request size").map_err(err)?;
                config.request = AllocationRequest::new(bytes);
            }
            "value" => {
                let raw_value = args
                    .first()
                    .ok_or_else(|| err("missing value".to_string()))?;
                config.value = raw_value
                    .parse::<i32>()
                    .map_err(|_| err(format!("invalid value '{}'", raw_value)))?;
            }
            "source" => {
                if !replaced.source {
                    config.source.clear();
                    replaced.source = true;
                }
                config.source.push(rest.to_string());
            }
            "disasm" => {
                if !replaced.disasm {
                    config.disasm.clear();
                    replaced.disasm = true;
                }
                config.disasm.push(rest.trim().to_string());
            }
            "api" => {
                if !replaced.api {
                    config.os_api.clear();
                    replaced.api = true;
                }
                config.os_api.push(rest.trim().to_string());
            }
            "stack" => {
                if args.len() < 2 || args.len() > 3 {
                    return Err(err("expected: stack <address> <value> [label]".to_string()));
                }
                let address = parse_address(args[0]).map_err(err)?;
                let label = args.get(2).map(|s| s.to_string());
                if !replaced.stack {
                    config.stack.clear();
                    replaced.stack = true;
                }
                config.stack.push(StackSlot::new(
                    address,
                    SlotValue::Literal(args[1].to_string()),
                    label,
                ));
            }
            "pointer" => {
                let label = args
                    .first()
                    .ok_or_else(|| err("missing pointer label".to_string()))?;
                config.pointer = label.to_string();
            }
            "heap" => {
                if args.len() != 3 {
                    return Err(err("expected: heap <address> <capacity> <occupied>".to_string()));
                }
                let address = parse_address(args[0]).map_err(err)?;
                let capacity = parse_number(&args, 1, "capacity").map_err(err)?;
                let occupied = parse_number(&args, 2, "occupied bytes").map_err(err)?;
                let block = HeapBlock::new(address, capacity, occupied).map_err(err)?;
                if !replaced.heap {
                    config.heap.clear();
                    replaced.heap = true;
                }
                config.heap.push(block);
            }
            "line" => {
                let which = args
                    .first()
                    .ok_or_else(|| err("expected: line alloc|assign|delete <n>".to_string()))?;
                let n: usize = parse_number(&args, 1, "line number").map_err(err)?;
                if n == 0 {
                    return Err(err("line numbers start at 1".to_string()));
                }
                match *which {
                    "alloc" => config.alloc_line = n - 1,
                    "assign" => config.assign_line = n - 1,
                    "delete" => config.delete_line = n - 1,
                    other => return Err(err(format!("unknown line kind '{}'", other))),
                }
            }
            other => return Err(err(format!("unknown directive '{}'", other))),
        }
    }

    config.validate()?;
    Ok(config)
}

fn parse_number(args: &[&str], index: usize, what: &str) -> Result<usize, String> {
    let raw = args
        .get(index)
        .ok_or_else(|| format!("missing {}", what))?;
    raw.parse::<usize>()
        .map_err(|_| format!("invalid {} '{}'", what, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = parse_scenario("# nothing here\n\n").unwrap();
        let default = ScenarioConfig::default();
        assert_eq!(config.heap, default.heap);
        assert_eq!(config.source, default.source);
        assert_eq!(config.request, default.request);
    }

    #[test]
    fn test_heap_and_request_override() {
        let text = "request 8\nheap 0x1000 16 12\nheap 0x2000 16 0\n";
        let config = parse_scenario(text).unwrap();
        assert_eq!(config.request.requested_bytes, 8);
        assert_eq!(config.heap.len(), 2);
        assert_eq!(config.heap[1].address, 0x2000);
        assert_eq!(config.heap[0].free_bytes(), 4);
    }

    #[test]
    fn test_source_keeps_indentation() {
        let text = "source int main() {\nsource     int* p = new int;\nsource }\n\
                    line alloc 2\nline assign 2\nline delete 2\n";
        let config = parse_scenario(text).unwrap();
        assert_eq!(config.source.len(), 3);
        assert_eq!(config.source[1], "    int* p = new int;");
        assert_eq!(config.alloc_line, 1);
    }

    #[test]
    fn test_errors_report_line_numbers() {
        let err = parse_scenario("title ok\nheap 0x1000 100 200\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("occupied"));

        let err = parse_scenario("\n\nbogus 1\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.to_string().contains("unknown directive 'bogus'"));

        let err = parse_scenario("request lots\n").unwrap_err();
        assert_eq!(err.line, 1);

        let err = parse_scenario("title ok\npage 0\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("page size"));
    }

    #[test]
    fn test_blocks_must_fit_in_a_page() {
        let err = parse_scenario("heap 0x1000 8192 0\n").unwrap_err();
        assert_eq!(err.line, 0);
        assert!(err.message.contains("4096 byte page"));

        let config = parse_scenario("page 8192\nheap 0x1000 8192 0\n").unwrap();
        assert_eq!(config.page_size, 8192);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let err = parse_scenario("pointer nowhere\n").unwrap_err();
        assert_eq!(err.line, 0);
        assert!(err.message.contains("nowhere"));
    }
}
