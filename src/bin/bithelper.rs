use std::io::{self, BufRead, IsTerminal, Write};
use std::process;

use clap::Parser;
use tracing::Level;

use bithelper::{render, Session, Step, DEFAULT_BYTES};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Build and inspect a bit string with short textual commands.
///
/// With no COMMANDS, runs interactively, reading one command per line from stdin.
/// Otherwise each argument is applied as one command and the final string is
/// printed.
#[derive(Parser)]
#[command(name = "bithelper", version)]
struct Cli {
    /// Initial size in bytes (1 - 32).
    #[arg(short, long, default_value_t = DEFAULT_BYTES)]
    bytes: usize,

    /// Log to stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Never clear the screen between interactive prompts.
    #[arg(long, default_value_t = false)]
    no_clear: bool,

    /// In batch mode, print the final string without `_` grouping.
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// Commands to apply in order, e.g. 's 0-7' 'xor FF'.
    commands: Vec<String>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::ERROR,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut session = match Session::new(cli.bytes) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: --bytes {}: {e}", cli.bytes);
            process::exit(2);
        }
    };

    if !cli.commands.is_empty() {
        run_batch(&mut session, &cli.commands, cli.raw);
        return;
    }

    let clear = !cli.no_clear && io::stdout().is_terminal();
    if let Err(e) = run_interactive(&mut session, clear) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run_batch(session: &mut Session, commands: &[String], raw: bool) {
    for cmd in commands {
        match session.run(cmd) {
            Ok(Step::Continue) => {}
            Ok(Step::Page(page)) => print!("{page}"),
            Ok(Step::Copied(hex)) => println!("copied: {hex}"),
            Ok(Step::Quit) => break,
            Err(e) => {
                eprintln!("error: {cmd:?}: {e}");
                process::exit(2);
            }
        }
    }

    if raw {
        match session.engine().to_hex() {
            Ok(hex) => println!("{hex}"),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{}", session.display_hex());
    }
}

fn run_interactive(session: &mut Session, clear: bool) -> io::Result<()> {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut notice: Option<String> = None;

    loop {
        if clear {
            write!(stdout, "{CLEAR_SCREEN}")?;
        }
        write!(stdout, "{}", render::screen(session, notice.take().as_deref()))?;
        stdout.flush()?;

        let Some(line) = read_line(&mut stdin)? else {
            writeln!(stdout)?;
            return Ok(());
        };

        match session.step(&line) {
            Step::Continue => {}
            Step::Quit => return Ok(()),
            Step::Copied(hex) => notice = Some(format!("Copied: {hex}")),
            Step::Page(page) => {
                if clear {
                    write!(stdout, "{CLEAR_SCREEN}")?;
                }
                write!(stdout, "{page}\n  Press enter to return. ")?;
                stdout.flush()?;
                if read_line(&mut stdin)?.is_none() {
                    writeln!(stdout)?;
                    return Ok(());
                }
            }
        }
    }
}

/// Next line without its terminator; `None` at end of input.
///
/// Bytes that are not UTF-8 are replaced rather than rejected, so a garbled line
/// is reported as unrecognized input instead of ending the session.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    // Trim \n, then optional \r.
    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
