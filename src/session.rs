use tracing::warn;

use bithelper_core::{format_display, Command, CommandParser, Engine, Error};

use crate::render;

/// What the caller should do after a line has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Read the next line.
    Continue,
    /// Show a full page (help or bit schema) before reading on.
    Page(String),
    /// The current hex string was copied; hand it to the clipboard.
    Copied(String),
    Quit,
}

/// One interactive session: the engine, the last error and display toggles.
pub struct Session {
    parser: CommandParser,
    engine: Engine,
    last_error: Option<Error>,
    quick_help: bool,
}

impl Session {
    /// Start a session with a zeroed vector of `bytes` bytes.
    pub fn new(bytes: usize) -> Result<Self, Error> {
        Ok(Self {
            parser: CommandParser::new()?,
            engine: Engine::new(bytes)?,
            last_error: None,
            quick_help: true,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn quick_help(&self) -> bool {
        self.quick_help
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// The status line text: the last error, or `none`.
    pub fn status(&self) -> String {
        match &self.last_error {
            Some(e) => e.to_string(),
            None => "none".to_string(),
        }
    }

    /// The current string grouped for display.
    pub fn display_hex(&self) -> String {
        match self.engine.to_hex() {
            Ok(hex) => format_display(&hex),
            Err(e) => e.to_string(),
        }
    }

    /// Handle one line, recording any error as the status.
    pub fn step(&mut self, line: &str) -> Step {
        match self.run(line) {
            Ok(step) => {
                self.last_error = None;
                step
            }
            Err(e) => {
                warn!(%e, line, "rejected input");
                self.last_error = Some(e);
                Step::Continue
            }
        }
    }

    /// Handle one line. On error the vector is unchanged.
    pub fn run(&mut self, line: &str) -> Result<Step, Error> {
        let step = match self.parser.parse_line(line)? {
            Command::Apply(op) => {
                self.engine.apply(&op)?;
                Step::Continue
            }
            Command::Copy => Step::Copied(self.engine.to_hex()?),
            Command::Help => Step::Page(render::help_page()),
            Command::QuickHelp => {
                self.quick_help = !self.quick_help;
                Step::Continue
            }
            Command::BitSchema => Step::Page(render::bit_schema(self)),
            Command::Quit => Step::Quit,
        };
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean() {
        let s = Session::new(4).unwrap();
        assert_eq!(s.display_hex(), "0000_0000");
        assert_eq!(s.status(), "none");
        assert!(s.quick_help());
    }

    #[test]
    fn rejects_bad_initial_size() {
        assert_eq!(Session::new(0).err(), Some(Error::InputOutOfRange(0)));
    }

    #[test]
    fn error_is_recorded_then_cleared() {
        let mut s = Session::new(4).unwrap();
        assert_eq!(s.step("t 32"), Step::Continue);
        assert_eq!(s.status(), "index outside of size boundary");
        assert_eq!(s.display_hex(), "0000_0000");

        assert_eq!(s.step(""), Step::Continue);
        assert_eq!(s.last_error(), Some(&Error::NoInput));

        assert_eq!(s.step("t 31"), Step::Continue);
        assert_eq!(s.status(), "none");
        assert_eq!(s.display_hex(), "8000_0000");
    }

    #[test]
    fn unrecognized_input() {
        let mut s = Session::new(1).unwrap();
        s.step("frobnicate");
        assert_eq!(s.status(), "unrecognized input");
    }

    #[test]
    fn copy_yields_raw_hex() {
        let mut s = Session::new(3).unwrap();
        s.step("or abcdef");
        assert_eq!(s.display_hex(), "xxAB_CDEF");
        assert_eq!(s.step("copy"), Step::Copied("ABCDEF".into()));
    }

    #[test]
    fn quick_help_toggles() {
        let mut s = Session::new(1).unwrap();
        s.step("qh");
        assert!(!s.quick_help());
        s.step("QUICK");
        assert!(s.quick_help());
    }

    #[test]
    fn pages_and_quit() {
        let mut s = Session::new(1).unwrap();
        assert!(matches!(s.step("help"), Step::Page(p) if p.contains("sticky set")));
        assert!(matches!(s.step("bits"), Step::Page(p) if p.contains("Bit  7: 0")));
        assert_eq!(s.step("exit"), Step::Quit);
    }
}
