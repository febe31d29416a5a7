//! Per-conversion numbering of staves and measures
//!
//! Each conversion gets its own counters, so numbering starts at 1 for every
//! file and concurrent conversions cannot interfere.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbering {
    next_staff: u32,
    next_measure: u32,
}

impl Default for Numbering {
    fn default() -> Self {
        Self::new()
    }
}

impl Numbering {
    pub fn new() -> Self {
        Self {
            next_staff: 1,
            next_measure: 1,
        }
    }

    pub fn next_staff(&mut self) -> u32 {
        let n = self.next_staff;
        self.next_staff += 1;
        n
    }

    pub fn next_measure(&mut self) -> u32 {
        let n = self.next_measure;
        self.next_measure += 1;
        n
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
