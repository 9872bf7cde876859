//! Per-opcode invocation counters.

use duet_common::opcode::ALL_OPCODES;
use duet_common::Opcode;

/// How many times each opcode has executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpCounts {
    counts: [u64; Opcode::COUNT],
}

impl OpCounts {
    /// Count for one opcode.
    pub fn get(&self, op: Opcode) -> u64 {
        self.counts[op as usize]
    }

    /// Sum over all opcodes.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(opcode, count)` pairs in opcode order, including zero counts.
    pub fn iter(&self) -> impl Iterator<Item = (Opcode, u64)> + '_ {
        ALL_OPCODES.iter().map(move |&op| (op, self.get(op)))
    }

    pub(crate) fn record(&mut self, op: Opcode) {
        self.counts[op as usize] += 1;
    }
}
