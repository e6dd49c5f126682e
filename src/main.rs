use bfi::cli_util::print_run_error;
use bfi::{DEFAULT_TAPE_CELLS, Instruction, Interpreter, StepControl, StepTrace, tokenize};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run  [--debug|-d] "<code>"       # Run Brainfuck code (args are concatenated)
  {0} run  [--debug|-d] --file <PATH>  # Run Brainfuck code loaded from file
  {0} repl                             # Start a Brainfuck REPL (read-eval-print loop)

Run "{0} <subcommand> --help" for more info.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

fn run_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [--debug|-d] [--tape-size N] [--max-steps N] "<code>"
  {0} run [--debug|-d] [--tape-size N] [--max-steps N] --file <PATH>

Options:
  --file,      -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --debug,     -d         Print a step-by-step table of operations instead of the output
  --tape-size <N>         Number of tape cells (default {1})
  --max-steps <N>         Abort after N steps (default: no limit)
  --help,      -h         Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- Input (`,`) is not implemented and executes as a no-op.
- The head wraps around at both ends of the tape.
- Program output is printed after the program halts, followed by a newline.
- A jump with no matching bracket aborts the run; no output is printed.

Examples:
- Run code given inline:
    {0} run "+++[-.]"
- Load Brainfuck code from a file:
    {0} run --file ./program.bf
"#,
        program, DEFAULT_TAPE_CELLS
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

fn repl_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} repl   # Start a Brainfuck REPL (read-eval-print loop)

Options:
  --help,   -h        Show this help

Description:
  Starts a REPL where you can enter Brainfuck code and execute it live.

Notes:
    - Ctrl+d executes the current buffer on *nix/macOS.
    - Ctrl+z and Enter will execute the current buffer on Windows.
    - Ctrl+c exits the REPL immediately.
    - Each execution starts with a fresh tape and head.
    - The REPL will exit after a single execution if the environment variable `BFI_REPL_ONCE` is set to `1`.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bfi", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
    Repl(ReplArgs),
}

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
struct RunArgs {
    /// Print a step-by-step table of operations instead of the output
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    file: Option<String>,

    /// Number of tape cells
    #[arg(long = "tape-size")]
    tape_size: Option<usize>,

    /// Abort after this many steps
    #[arg(long = "max-steps")]
    max_steps: Option<usize>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,
}

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
struct ReplArgs {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,
}

fn run_run_with_args(program: &str, args: RunArgs) -> i32 {
    if args.help {
        run_usage_and_exit(program, 0);
    }

    let RunArgs {
        debug,
        file,
        tape_size,
        max_steps,
        code,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        run_usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        run_usage_and_exit(program, 2);
    }

    let code_str = if let Some(path) = file {
        match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("")
    };

    let cells = tape_size.unwrap_or(DEFAULT_TAPE_CELLS);
    if cells == 0 {
        eprintln!("{program}: --tape-size must be at least 1");
        let _ = io::stderr().flush();
        return 2;
    }

    // Error instruction indexes count instructions, so render error context
    // against the filtered text rather than the raw source.
    let filtered: String = tokenize(&code_str)
        .iter()
        .map(|i| i.symbol())
        .collect();

    let mut bfi = Interpreter::new_with_memory(&filtered, cells);

    if debug {
        println!("STEP | IP  | HEAD | CELL | INSTR | ACTION");
        println!("-----+-----+------+------+-------+------------------------------------------------");
        bfi.set_step_observer(print_trace_row);
    }

    let ctrl = StepControl::new(max_steps, Arc::new(AtomicBool::new(false)));
    match bfi.run_with_control(ctrl) {
        Ok(out) => {
            // The debug table replaces program output.
            if !debug {
                println!("{out}");
            }
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            print_run_error(Some(program), &filtered, &err);
            let _ = io::stderr().flush();
            1
        }
    }
}

fn print_trace_row(trace: &StepTrace) {
    println!(
        "{:<4} | {:<3} | {:<4} | {:<4} |  {}    | {}",
        trace.step,
        trace.ip,
        trace.head,
        trace.cell,
        trace.instruction.symbol(),
        trace.action
    );
}

/// Executes a single Brainfuck program contained in `buffer`.
/// - Decoded program output goes to stdout.
/// - Errors are printed concisely to stderr.
/// - A newline is always written to stdout after execution (success or error)
///   so that the prompt begins at column 0 on the next iteration.
fn execute_buffer(buffer: &str) {
    let mut bfi = Interpreter::new(buffer);
    match bfi.run() {
        Ok(out) => print!("{out}"),
        Err(err) => {
            print_run_error(None, buffer, &err);
            let _ = io::stderr().flush();
        }
    }
    println!();
    let _ = io::stdout().flush();
}

fn run_repl_with_args(program: &str, args: ReplArgs) -> i32 {
    if args.help {
        repl_usage_and_exit(program, 0);
    }

    // Install SIGINT (ctrl+c) handler to flush and exit(0) immediately
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    println!("Brainfuck REPL");
    println!("Ctrl+d/Ctrl+z Enter (Windows) executes the current buffer. Press ctrl+c to exit");

    repl_loop().unwrap();
    0
}

fn repl_loop() -> io::Result<()> {
    loop {
        let mut stdin = io::stdin().lock();

        print!("bfi> ");
        io::stdout().flush()?;

        let Some(submission) = read_submission(&mut stdin) else {
            // EOF or empty input
            println!();
            io::stdout().flush()?;
            continue;
        };

        let filtered: String = tokenize(&submission)
            .into_iter()
            .map(Instruction::symbol)
            .collect();
        if filtered.is_empty() {
            continue;
        }

        execute_buffer(&filtered);

        // Test hook: exit after a single execution to allow integration testing
        if env::var("BFI_REPL_ONCE").ok().as_deref() == Some("1") {
            return Ok(());
        }
    }
}

fn read_submission<R: io::BufRead>(stdin: &mut R) -> Option<String> {
    // Collect all lines until EOF
    let mut buffer = String::new();

    loop {
        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => {
                // EOF
                break;
            }
            Ok(_) => {
                buffer.push_str(&line);
            }
            Err(_) => {
                // Read error, ignore
                return None;
            }
        }
    }

    if buffer.is_empty() { None } else { Some(buffer) }
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bfi"));

    let cli = Cli::parse();

    if cli.help || cli.command.is_none() {
        print_top_usage_and_exit(&program, if cli.help { 0 } else { 2 });
    }

    let code = match cli.command.unwrap() {
        Command::Run(args) => run_run_with_args(&program, args),
        Command::Repl(args) => run_repl_with_args(&program, args),
    };

    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_submission_reads_until_eof_multiple_lines() {
        let input = b"+++\n>+.\n";
        let mut cursor = Cursor::new(&input[..]);
        let got = read_submission(&mut cursor);
        assert_eq!(got.as_deref(), Some("+++\n>+.\n"));
    }

    #[test]
    fn read_submission_empty_returns_none() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let got = read_submission(&mut cursor);
        assert!(got.is_none());
    }
}
