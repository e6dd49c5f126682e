//! The memory tape: a fixed-size byte buffer plus a single head index.

/// What happens when the head is moved past either end of the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadPolicy {
    /// Toroidal addressing: moving left from cell 0 lands on the last cell,
    /// moving right from the last cell lands on cell 0. This matches the
    /// reference behavior and is the default.
    #[default]
    Wrap,
    /// An out-of-range move is a hard error.
    Strict,
}

/// The head was moved out of range under [`HeadPolicy::Strict`].
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("head out of range (head={head}, op='{op}')")]
pub struct HeadOutOfRange {
    /// Head index before the offending move.
    pub head: usize,
    /// The move operator, `<` or `>`.
    pub op: char,
}

/// A fixed-length sequence of unsigned 8-bit cells, all starting at zero,
/// addressed through a single head.
///
/// The head is always within `[0, len)` after any operation; how an
/// out-of-range move is resolved is the [`HeadPolicy`] chosen at
/// construction. Cell arithmetic is the caller's concern (the engine uses
/// wrapping adds), the tape only stores bytes.
#[derive(Debug)]
pub struct Tape {
    cells: Vec<u8>,
    head: usize,
    policy: HeadPolicy,
}

impl Tape {
    /// Create a zeroed tape of `len` cells with wraparound addressing.
    ///
    /// `len` must be at least 1.
    pub fn new(len: usize) -> Self {
        Self::with_policy(len, HeadPolicy::Wrap)
    }

    /// Create a zeroed tape of `len` cells with an explicit head policy.
    pub fn with_policy(len: usize, policy: HeadPolicy) -> Self {
        assert!(len > 0, "tape must have at least one cell");
        Self {
            cells: vec![0; len],
            head: 0,
            policy,
        }
    }

    /// The cell value under the head.
    pub fn read(&self) -> u8 {
        self.cells[self.head]
    }

    /// Store `value` into the cell under the head.
    pub fn write(&mut self, value: u8) {
        self.cells[self.head] = value;
    }

    /// Shift the head one cell left, wrapping or erroring per policy.
    pub fn move_left(&mut self) -> Result<(), HeadOutOfRange> {
        if self.head == 0 {
            match self.policy {
                HeadPolicy::Wrap => self.head = self.cells.len() - 1,
                HeadPolicy::Strict => {
                    return Err(HeadOutOfRange {
                        head: self.head,
                        op: '<',
                    });
                }
            }
        } else {
            self.head -= 1;
        }
        Ok(())
    }

    /// Shift the head one cell right, wrapping or erroring per policy.
    pub fn move_right(&mut self) -> Result<(), HeadOutOfRange> {
        if self.head == self.cells.len() - 1 {
            match self.policy {
                HeadPolicy::Wrap => self.head = 0,
                HeadPolicy::Strict => {
                    return Err(HeadOutOfRange {
                        head: self.head,
                        op: '>',
                    });
                }
            }
        } else {
            self.head += 1;
        }
        Ok(())
    }

    /// Current head index.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_start_zeroed_and_head_at_zero() {
        let tape = Tape::new(16);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), 0);
        assert_eq!(tape.len(), 16);
    }

    #[test]
    fn write_then_read_same_cell() {
        let mut tape = Tape::new(4);
        tape.write(42);
        assert_eq!(tape.read(), 42);
    }

    #[test]
    fn moving_left_from_zero_wraps_to_last_cell() {
        let mut tape = Tape::new(8);
        tape.move_left().unwrap();
        assert_eq!(tape.head(), 7);
    }

    #[test]
    fn moving_right_from_last_cell_wraps_to_zero() {
        let mut tape = Tape::new(3);
        tape.move_right().unwrap();
        tape.move_right().unwrap();
        assert_eq!(tape.head(), 2);
        tape.move_right().unwrap();
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn wraparound_lands_on_real_cells() {
        // Write through a wrapped head and read the same cell going forward.
        let mut tape = Tape::new(4);
        tape.move_left().unwrap();
        tape.write(9);
        assert_eq!(tape.head(), 3);
        assert_eq!(tape.read(), 9);
    }

    #[test]
    fn strict_policy_errors_on_left_edge() {
        let mut tape = Tape::with_policy(8, HeadPolicy::Strict);
        let err = tape.move_left().unwrap_err();
        assert_eq!(err.op, '<');
        assert_eq!(err.head, 0);
        // Head is unchanged after a refused move.
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn strict_policy_errors_on_right_edge() {
        let mut tape = Tape::with_policy(2, HeadPolicy::Strict);
        tape.move_right().unwrap();
        let err = tape.move_right().unwrap_err();
        assert_eq!(err.op, '>');
        assert_eq!(err.head, 1);
    }

    #[test]
    fn single_cell_tape_wraps_onto_itself() {
        let mut tape = Tape::new(1);
        tape.move_left().unwrap();
        assert_eq!(tape.head(), 0);
        tape.move_right().unwrap();
        assert_eq!(tape.head(), 0);
    }

    #[test]
    #[should_panic(expected = "at least one cell")]
    fn zero_length_tape_is_rejected() {
        let _ = Tape::new(0);
    }
}
