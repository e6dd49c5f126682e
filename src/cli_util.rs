use std::io::{self, Write};

use crate::InterpreterError;

/// Pretty-print a structured [`InterpreterError`] with caret positioning.
/// If `program` is `Some("bfi")`, messages are prefixed with "bfi: ..." for
/// CLI run mode.
///
/// `code` must be the filtered instruction text (all ASCII), since error
/// instruction indexes count instructions, not raw source characters.
pub fn print_run_error(program: Option<&str>, code: &str, err: &InterpreterError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        InterpreterError::UnmatchedBracket { ip, kind } => {
            let msg = prefix_program(&format!("Runtime error: unmatched bracket {kind}"));
            print_error_with_context(&msg, code, *ip);
        }
        InterpreterError::HeadOutOfBounds { ip, head, op } => {
            let msg = prefix_program(&format!(
                "Runtime error: head out of range (head={head}, op={op})"
            ));
            print_error_with_context(&msg, code, *ip);
        }
        InterpreterError::StepLimitExceeded { .. } | InterpreterError::Canceled => {
            eprintln!("{}", prefix_program(&err.to_string()));
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with the instruction index and a caret under the
/// offending instruction, inside a short context window.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    const WINDOW: usize = 32;

    let start = pos.saturating_sub(WINDOW).min(code.len());
    let end = (pos + WINDOW + 1).min(code.len());
    eprintln!("  {}", &code[start..end]);

    // Caret under the exact position
    let mut underline = String::new();
    for _ in 0..pos.saturating_sub(start) {
        underline.push(' ');
    }
    underline.push('^');
    eprintln!("  {}", underline);
    let _ = io::stderr().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Interpreter;

    #[test]
    fn printing_an_error_does_not_panic_near_the_edges() {
        let err = Interpreter::new_with_memory("+.]", 4).run().unwrap_err();
        print_run_error(Some("bfi"), "+.]", &err);
        print_run_error(None, "", &err);
    }
}
