//! Bracket pairing: locate the structurally matching partner of a jump
//! instruction, accounting for nesting.
//!
//! Matching is computed lazily, by re-scanning the program each time a jump
//! is actually evaluated. Bracket structure is static, so a precomputed pair
//! table would be semantically equivalent, but the per-jump scan is the
//! behavior the rest of the crate is written against.

use crate::instruction::Instruction;

/// Direction a bracket seeks its partner in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// A `[` looking ahead for its `]`.
    Forward,
    /// A `]` looking back for its `[`.
    Backward,
}

/// Find the partner of the bracket at `from`, or `None` if the scan
/// exhausts the program without closing the nesting.
///
/// The scan starts strictly after (or before) `from` with a nesting counter
/// at zero. Each same-direction bracket deepens the nesting; a partner
/// bracket at depth zero is the match, otherwise it unwinds one level. The
/// backward case is the exact mirror of the forward case, so nested pairs
/// resolve identically from either end.
pub fn find_match(program: &[Instruction], kind: JumpKind, from: usize) -> Option<usize> {
    match kind {
        JumpKind::Forward => {
            let mut nests = 0usize;
            for (i, instr) in program.iter().enumerate().skip(from + 1) {
                match instr {
                    Instruction::JumpIfZero => nests += 1,
                    Instruction::JumpIfNotZero => {
                        if nests == 0 {
                            return Some(i);
                        }
                        nests -= 1;
                    }
                    _ => {}
                }
            }
            None
        }
        JumpKind::Backward => {
            let mut nests = 0usize;
            for i in (0..from).rev() {
                match program[i] {
                    Instruction::JumpIfNotZero => nests += 1,
                    Instruction::JumpIfZero => {
                        if nests == 0 {
                            return Some(i);
                        }
                        nests -= 1;
                    }
                    _ => {}
                }
            }
            None
        }
    }
}
