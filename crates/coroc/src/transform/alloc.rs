//! Resume codes and layer labels.
//!
//! Both come from deterministic per-function counters, so the same input
//! always lowers to the same output and no two suspension points or layers
//! can share an identifier.

/// Prefix of the per-layer piece counter variables.
pub const PC_PREFIX: &str = "__pc_";
/// Local holding the resume code for the current tick.
pub const RESUME_VAR: &str = "__resume";

#[derive(Debug)]
pub struct Allocator {
    next_code: i64,
    ordinals: Vec<usize>,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator {
    pub fn new() -> Self {
        Self {
            next_code: 1,
            ordinals: Vec::new(),
        }
    }

    /// Next resume code. Codes start at 1 and are never reused.
    pub fn resume_code(&mut self) -> i64 {
        let code = self.next_code;
        self.next_code += 1;
        code
    }

    /// Next label for a layer at `depth`: `l<depth>_<ordinal>`.
    pub fn layer_label(&mut self, depth: usize) -> String {
        if self.ordinals.len() <= depth {
            self.ordinals.resize(depth + 1, 0);
        }
        let ordinal = self.ordinals[depth];
        self.ordinals[depth] += 1;
        format!("l{}_{}", depth, ordinal)
    }
}
