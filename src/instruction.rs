//! The Brainfuck instruction set and the source-text tokenizer.

/// A single Brainfuck instruction.
///
/// Programs are immutable once tokenized; an instruction's position in the
/// program is what the jump resolver operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `+` -- increment the cell under the head, wrapping at 255.
    Increment,
    /// `-` -- decrement the cell under the head, wrapping at 0.
    Decrement,
    /// `<` -- move the head one cell left.
    MoveLeft,
    /// `>` -- move the head one cell right.
    MoveRight,
    /// `.` -- append the cell under the head to the output.
    Output,
    /// `,` -- read a byte. Reserved; currently an explicit no-op.
    Input,
    /// `[` -- jump forward past the matching `]` when the cell is zero.
    JumpIfZero,
    /// `]` -- jump back to the matching `[` when the cell is nonzero.
    JumpIfNotZero,
}

impl Instruction {
    /// Map a source character to its instruction, or `None` for anything
    /// outside the `><+-.,[]` set.
    pub fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '<' => Instruction::MoveLeft,
            '>' => Instruction::MoveRight,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            '[' => Instruction::JumpIfZero,
            ']' => Instruction::JumpIfNotZero,
            _ => return None,
        })
    }

    /// The source character this instruction was tokenized from.
    pub fn symbol(self) -> char {
        match self {
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::MoveLeft => '<',
            Instruction::MoveRight => '>',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::JumpIfZero => '[',
            Instruction::JumpIfNotZero => ']',
        }
    }
}

/// Filter raw source text down to the ordered instruction sequence.
///
/// Everything that is not one of the eight recognized characters is
/// discarded, including whitespace and comments. Relative order is
/// preserved. There is no further validation here; unmatched brackets are
/// only detected when a jump is actually evaluated.
pub fn tokenize(source: &str) -> Vec<Instruction> {
    source.chars().filter_map(Instruction::from_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_keeps_only_instruction_characters() {
        let program = tokenize("+ hello - [world] ,.\n<>");
        assert_eq!(
            program,
            vec![
                Instruction::Increment,
                Instruction::Decrement,
                Instruction::JumpIfZero,
                Instruction::JumpIfNotZero,
                Instruction::Input,
                Instruction::Output,
                Instruction::MoveLeft,
                Instruction::MoveRight,
            ]
        );
    }

    #[test]
    fn tokenize_of_comment_only_source_is_empty() {
        assert!(tokenize("this text has no instructions at all").is_empty());
    }

    #[test]
    fn symbol_round_trips_through_from_char() {
        for ch in "+-<>.,[]".chars() {
            let instr = Instruction::from_char(ch).unwrap();
            assert_eq!(instr.symbol(), ch);
        }
    }
}
