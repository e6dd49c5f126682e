//! A tiny Brainfuck interpreter library.
//!
//! This crate executes programs in the 8-instruction tape language against a
//! fixed-size memory tape (default 1,024 cells) with a single head.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; cell arithmetic wraps modulo 256.
//! - Toroidal head addressing: moving left from cell 0 lands on the last
//!   cell and vice versa. A strict-bounds policy is available at tape
//!   construction for callers that prefer a hard error.
//! - Non-instruction characters in the source are silently discarded.
//! - Output `.` accumulates bytes; the whole sequence is decoded as UTF-8
//!   (lossy replacement) and returned once, at normal halt.
//! - Input `,` is recognized but unimplemented; it executes as a no-op.
//! - A jump with no structurally matching bracket halts the run with an
//!   [`InterpreterError::UnmatchedBracket`] and the accumulated output is
//!   discarded.
//!
//! Quick start:
//!
//! ```
//! use bfi::Interpreter;
//!
//! let code = "+++[-.]";
//! let mut bfi = Interpreter::new(code);
//! let out = bfi.run().expect("program should run");
//! assert_eq!(out.as_bytes(), &[2, 1, 0]);
//! ```

pub mod cli_util;
pub mod instruction;
pub mod interpreter;
pub mod jump;
pub mod tape;

pub use instruction::{Instruction, tokenize};
pub use interpreter::{
    BracketKind, DEFAULT_TAPE_CELLS, Interpreter, InterpreterError, StepControl, StepTrace,
};
pub use jump::{JumpKind, find_match};
pub use tape::{HeadPolicy, Tape};
