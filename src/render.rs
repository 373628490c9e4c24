//! Text screens for the interactive session.

use std::fmt;

use crate::session::Session;

const QUICK_HELP: &[(&str, &str)] = &[
    ("t      <x>", "toggle bit at position x"),
    ("t  <x>-<y>", "toggle bits at positions x-y"),
    ("s      <x>", "set bit at position x"),
    ("s  <x>-<y>", "set bits at positions x-y"),
    ("c      <x>", "clear bit at position x"),
    ("c  <x>-<y>", "clear bits at positions x-y"),
    ("ss <x>-<y>", "sticky set bits at x-y"),
    ("sc <x>-<y>", "sticky clr bits at x-y"),
    ("or     <x>", "bitwise OR with hexadecimal string x"),
    ("xor    <x>", "bitwise XOR with hexadecimal string x"),
    ("and    <x>", "bitwise AND with hexadecimal string x"),
    ("not       ", "invert entire string"),
    ("size   <x>", "resize string to x number of bytes"),
    ("set       ", "set all bits"),
    ("clr       ", "clear all bits"),
    ("qh        ", "toggle quick help menu"),
    ("bits      ", "view bit schema"),
    ("help      ", "display help menu"),
    ("copy      ", "copy string to clipboard"),
    ("quit      ", "quit"),
    ("[<q>x<a>] ", "repeat string a, q number of times"),
];

const SHORT_HELP: &[(&str, &str)] = &[
    ("qh        ", "toggle quick help menu"),
    ("help      ", "display help menu"),
    ("quit      ", "quit"),
];

const REFERENCE: &[(&str, &str, &str, &str)] = &[
    ("t", "toggle", "<x>", "Toggle the bit at position x."),
    ("t", "toggle", "<x>-<y>", "Toggle bits at positions x through y."),
    ("s", "set", "<x>", "Set the bit at position x."),
    ("s", "set", "<x>-<y>", "Set bits at positions x through y."),
    ("c", "clear", "<x>", "Clear the bit at position x."),
    ("c", "clear", "<x>-<y>", "Clear bits at positions x through y."),
    ("ss", "sticky set", "<x>-<y>", "If any bit in x-y is clear, set the range. Else clear it."),
    ("sc", "sticky clear", "<x>-<y>", "If any bit in x-y is set, clear the range. Else set it."),
    ("or", "or", "<hex>", "Bitwise OR with a hexadecimal string."),
    ("xor", "xor", "<hex>", "Bitwise XOR with a hexadecimal string."),
    ("and", "and", "<hex>", "Bitwise AND with a hexadecimal string."),
    ("not", "not", "", "Invert the entire bit string."),
    ("size", "byte size", "<x>", "Resize to x bytes (1 - 32). Clears all bits."),
    ("set", "set all", "", "Set all bits."),
    ("clr", "clear all", "", "Clear all bits."),
    ("qh", "quick help", "", "Toggle the quick help menu."),
    ("bits", "bit schema", "", "View the bit layout."),
    ("help", "help", "", "Display this page."),
    ("copy", "copy", "", "Copy the hexadecimal string."),
    ("quit", "quit", "", "Exit."),
];

/// The main screen: command list, current string, status and prompt.
pub fn screen(session: &Session, notice: Option<&str>) -> String {
    Screen { session, notice }.to_string()
}

/// Full command reference.
pub fn help_page() -> String {
    HelpPage.to_string()
}

/// Every bit from the highest index down, eight per row.
pub fn bit_schema(session: &Session) -> String {
    BitSchema { session }.to_string()
}

struct Screen<'a> {
    session: &'a Session,
    notice: Option<&'a str>,
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n  Inputs:")?;
        let menu = if self.session.quick_help() { QUICK_HELP } else { SHORT_HELP };
        for (cmd, desc) in menu {
            writeln!(f, "  {cmd} : {desc}")?;
        }
        writeln!(f, "\n  Current string: {}", self.session.display_hex())?;
        writeln!(f, "\n  Error: {}", self.session.status())?;
        if let Some(notice) = self.notice {
            writeln!(f, "  {notice}")?;
        }
        write!(f, "  Requested input: ")
    }
}

struct HelpPage;

impl fmt::Display for HelpPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n  bithelper {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(f, "  Aids in visualization of hexadecimal strings.")?;
        writeln!(f, "\n  Inputs:")?;
        writeln!(
            f,
            "  {:<11} {:<17} {:<16} {}",
            "Command:", "Expanded name:", "Parameter(s):", "Description:"
        )?;
        for (cmd, name, params, desc) in REFERENCE {
            writeln!(f, "  {cmd:<11} {name:<17} {params:<16} {desc}")?;
        }
        writeln!(f, "\n  Preprocess:")?;
        writeln!(
            f,
            "  {:<11} {:<17} {:<16} {}",
            "[<q>x<a>]", "repetition", "<q>, <a>", "Repeat string a quantity q times."
        )?;
        writeln!(
            f,
            "  Examples:   or A[4xF]123, or [4x01], or [1x0][2xA01]8, or [2x01][1xF]A[0xC][2x0]"
        )?;
        writeln!(f, "\n  Notes:")?;
        writeln!(
            f,
            "  Underscore characters are ignored. The input 'or 1234_0000' is equivalent to 'or 12340000'."
        )?;
        writeln!(
            f,
            "  Range value order does not matter. The input 'sc 4-7' is equivalent to 'sc 7-4'."
        )?;
        writeln!(f, "  Aliases: clear = cls = clr, exit = q = quit, quick = qh")
    }
}

struct BitSchema<'a> {
    session: &'a Session,
}

impl fmt::Display for BitSchema<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.session.engine().bits();
        let len = bits.len();
        // Three-digit indices need an extra column; values below 100 are padded to match.
        let wide = len > 99;

        writeln!(f, "\n  Current string: {}\n", self.session.display_hex())?;
        let values: Vec<bool> = bits.iter().rev().collect();
        for (row, chunk) in values.chunks(8).enumerate() {
            write!(f, "  ")?;
            for (i, &b) in chunk.iter().enumerate() {
                let l = len - 1 - row * 8 - i;
                let index_pad = if l < 10 { " " } else { "" };
                let value_pad = if wide && l < 100 { " " } else { "" };
                let gap = if l > 99 || (wide && l < 100) { "   " } else { "    " };
                write!(f, "Bit {index_pad}{l}: {value_pad}{}{gap}", u8::from(b))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
