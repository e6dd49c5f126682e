//! The fetch-decode-execute engine.
//!
//! The engine owns the program counter, drives the [`Tape`] and the jump
//! resolver, and accumulates output bytes. Output is delivered exactly once,
//! at normal halt; a run that halts on an unmatched bracket discards whatever
//! was accumulated and surfaces the failure as an error instead.

use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::instruction::{Instruction, tokenize};
use crate::jump::{JumpKind, find_match};
use crate::tape::Tape;

/// Default tape size, in cells.
pub const DEFAULT_TAPE_CELLS: usize = 1024;

/// Errors that can halt a run before it completes normally.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// A jump instruction had no structurally matching partner. Accumulated
    /// output is discarded on this path.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: BracketKind },

    /// The head was moved out of range on a tape with a strict policy.
    #[error("Head out of range at instruction {ip} (head={head}, op='{op}')")]
    HeadOutOfBounds { ip: usize, head: usize, op: char },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (e.g., timeout).
    #[error("Execution aborted: cancelled")]
    Canceled,
}

/// Which bracket was left without a partner.
#[derive(Debug, Clone, Copy)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Controls for cooperative cancellation and step limiting.
///
/// The baseline engine has no limits at all; these exist for callers running
/// untrusted programs that may not terminate.
#[derive(Clone)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self {
            max_steps,
            cancel_flag,
        }
    }
}

/// Snapshot of one executed step, handed to the step observer after the
/// instruction's effect has been applied.
#[derive(Debug, Clone)]
pub struct StepTrace {
    /// Steps executed so far, starting at 0.
    pub step: usize,
    /// Program counter the instruction was fetched from.
    pub ip: usize,
    /// Head index before the instruction ran.
    pub head: usize,
    /// Cell value under the head before the instruction ran.
    pub cell: u8,
    pub instruction: Instruction,
    /// Human-readable description of what the step did.
    pub action: String,
}

/// A single-run Brainfuck interpreter.
///
/// Holds the tokenized program, the memory tape, the program counter, and
/// the output accumulator. One instance executes one program once; run it
/// again on a fresh instance for a fresh tape.
pub struct Interpreter {
    program: Vec<Instruction>,
    tape: Tape,
    pc: usize,
    output: Vec<u8>,
    // Optional per-step observer; debug printing hangs off this rather than
    // living inside the dispatch loop.
    step_observer: Option<Box<dyn Fn(&StepTrace) + Send + Sync>>,
}

impl Interpreter {
    /// Tokenize `source` and set up a default-sized wrapping tape
    /// ([`DEFAULT_TAPE_CELLS`] cells).
    pub fn new(source: &str) -> Self {
        Self::new_with_memory(source, DEFAULT_TAPE_CELLS)
    }

    /// Tokenize `source` with a custom tape size (wrapping policy).
    pub fn new_with_memory(source: &str, cells: usize) -> Self {
        Self::with_tape(source, Tape::new(cells))
    }

    /// Tokenize `source` and run it against a caller-built tape. This is the
    /// constructor to use for a [`crate::HeadPolicy::Strict`] tape.
    pub fn with_tape(source: &str, tape: Tape) -> Self {
        Self {
            program: tokenize(source),
            tape,
            pc: 0,
            output: Vec::new(),
            step_observer: None,
        }
    }

    /// Install a per-step observer. The callback fires once per executed
    /// instruction, after its effect is applied, and never on the halt paths.
    pub fn set_step_observer<F>(&mut self, observer: F)
    where
        F: Fn(&StepTrace) + Send + Sync + 'static,
    {
        self.step_observer = Some(Box::new(observer));
    }

    /// Execute until halt.
    ///
    /// On normal halt (the program counter ran off the end of the program)
    /// returns every byte written by `.`, in write order, decoded as UTF-8
    /// with lossy replacement; the decode is deterministic. On any other
    /// halt the accumulated output is not delivered.
    pub fn run(&mut self) -> Result<String, InterpreterError> {
        self.execute(None)
    }

    /// Execute with cooperative cancellation and an optional step limit.
    pub fn run_with_control(
        &mut self,
        step_control: StepControl,
    ) -> Result<String, InterpreterError> {
        self.execute(Some(&step_control))
    }

    fn execute(
        &mut self,
        step_control: Option<&StepControl>,
    ) -> Result<String, InterpreterError> {
        let mut step: usize = 0;

        loop {
            if let Some(ctrl) = step_control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(InterpreterError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if step >= max {
                        return Err(InterpreterError::StepLimitExceeded { limit: max });
                    }
                }
            }

            // Running off the end is the only normal termination path; this
            // is where the output sink is flushed.
            let Some(&instr) = self.program.get(self.pc) else {
                return Ok(String::from_utf8_lossy(&self.output).into_owned());
            };

            let ip = self.pc;
            let (head_before, cell_before) = (self.tape.head(), self.tape.read());
            let mut redirected = false;
            let mut action: Option<String> = self.step_observer.as_ref().map(|_| String::new());

            match instr {
                Instruction::Increment => {
                    let after = cell_before.wrapping_add(1);
                    self.tape.write(after);
                    if let Some(a) = action.as_mut() {
                        *a = format!(
                            "Increment cell[{head_before}] from {cell_before} to {after}"
                        );
                    }
                }
                Instruction::Decrement => {
                    let after = cell_before.wrapping_sub(1);
                    self.tape.write(after);
                    if let Some(a) = action.as_mut() {
                        *a = format!(
                            "Decrement cell[{head_before}] from {cell_before} to {after}"
                        );
                    }
                }
                Instruction::MoveLeft => {
                    self.tape
                        .move_left()
                        .map_err(|e| InterpreterError::HeadOutOfBounds {
                            ip,
                            head: e.head,
                            op: e.op,
                        })?;
                    if let Some(a) = action.as_mut() {
                        *a = format!("Moved head to index {}", self.tape.head());
                    }
                }
                Instruction::MoveRight => {
                    self.tape
                        .move_right()
                        .map_err(|e| InterpreterError::HeadOutOfBounds {
                            ip,
                            head: e.head,
                            op: e.op,
                        })?;
                    if let Some(a) = action.as_mut() {
                        *a = format!("Moved head to index {}", self.tape.head());
                    }
                }
                Instruction::Output => {
                    self.output.push(cell_before);
                    if let Some(a) = action.as_mut() {
                        *a = format!("Output byte {cell_before}");
                    }
                }
                Instruction::Input => {
                    // Reserved: the read instruction is recognized but not
                    // implemented, and executes as a no-op.
                    if let Some(a) = action.as_mut() {
                        *a = "Read instruction is unimplemented; no-op".to_string();
                    }
                }
                Instruction::JumpIfZero => {
                    if cell_before == 0 {
                        match find_match(&self.program, JumpKind::Forward, ip) {
                            Some(target) => {
                                self.pc = target;
                                redirected = true;
                                if let Some(a) = action.as_mut() {
                                    *a = format!(
                                        "Cell is 0; jump forward to matching ']' at IP {target}"
                                    );
                                }
                            }
                            None => {
                                return Err(InterpreterError::UnmatchedBracket {
                                    ip,
                                    kind: BracketKind::Open,
                                });
                            }
                        }
                    } else if let Some(a) = action.as_mut() {
                        *a = "Enter loop (cell != 0)".to_string();
                    }
                }
                Instruction::JumpIfNotZero => {
                    if cell_before != 0 {
                        match find_match(&self.program, JumpKind::Backward, ip) {
                            Some(target) => {
                                self.pc = target;
                                redirected = true;
                                if let Some(a) = action.as_mut() {
                                    *a = format!(
                                        "Cell != 0; jump back to matching '[' at IP {target}"
                                    );
                                }
                            }
                            None => {
                                return Err(InterpreterError::UnmatchedBracket {
                                    ip,
                                    kind: BracketKind::Close,
                                });
                            }
                        }
                    } else if let Some(a) = action.as_mut() {
                        *a = "Exit loop (cell is 0)".to_string();
                    }
                }
            }

            if let Some(observer) = self.step_observer.as_ref() {
                (observer)(&StepTrace {
                    step,
                    ip,
                    head: head_before,
                    cell: cell_before,
                    instruction: instr,
                    action: action.unwrap_or_default(),
                });
            }

            // A taken jump repositions the counter without the usual advance.
            if !redirected {
                self.pc += 1;
            }
            step += 1;
        }
    }
}
