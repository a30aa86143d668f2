//! Per-case usage counters
//!
//! Useful for spotting which sign configurations a field actually exercises
//! and for checking that none of them came out empty.

use std::fmt::Write;

use amc_cases::{CaseTable, CASE_COUNT};

/// How many live cells used each of the 256 cases
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageStats {
    counts: [u64; CASE_COUNT],
}

impl Default for UsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageStats {
    pub fn new() -> Self {
        Self { counts: [0; CASE_COUNT] }
    }

    #[inline]
    pub fn record(&mut self, code: u8) {
        self.counts[code as usize] += 1;
    }

    pub fn get(&self, code: u8) -> u64 {
        self.counts[code as usize]
    }

    pub fn reset(&mut self) {
        self.counts = [0; CASE_COUNT];
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Distinct codes seen at least once
    pub fn distinct_cases(&self) -> usize {
        self.counts.iter().filter(|&&n| n > 0).count()
    }

    /// The `n` most frequent codes, most frequent first (ties by code)
    pub fn most_used(&self, n: usize) -> Vec<(u8, u64)> {
        let mut used: Vec<(u8, u64)> = (0..=u8::MAX)
            .map(|code| (code, self.get(code)))
            .filter(|&(_, count)| count > 0)
            .collect();
        used.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        used.truncate(n);
        used
    }

    /// Interior codes (1..=254) whose table entry has triangles
    pub fn cases_ok(table: &CaseTable) -> usize {
        (1..u8::MAX).filter(|&code| !table.get(code).is_empty()).count()
    }

    /// Interior codes (1..=254) whose table entry is empty
    pub fn cases_empty(table: &CaseTable) -> usize {
        (1..u8::MAX).filter(|&code| table.get(code).is_empty()).count()
    }

    /// Counts laid out 16 per row followed by the table coverage line
    pub fn report(&self, table: &CaseTable) -> String {
        let mut out = String::new();
        for (row, chunk) in self.counts.chunks(16).enumerate() {
            let _ = write!(out, "{:3}:", row * 16);
            for count in chunk {
                let _ = write!(out, " {:5}", count);
            }
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "cases ok: {}, cases empty: {}, cells: {}",
            Self::cases_ok(table),
            Self::cases_empty(table),
            self.total()
        );
        out
    }
}
