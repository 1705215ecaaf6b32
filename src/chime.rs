//! Audible cue played when an interval finishes.

use std::io::{self, Write};

/// Something that can make a completion sound.
///
/// Playback is best-effort: callers log the error and carry on.
pub trait Chime {
    fn ring(&mut self) -> io::Result<()>;
}

/// Rings the terminal bell on stdout.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl Chime for TerminalBell {
    fn ring(&mut self) -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(b"\x07")?;
        out.flush()
    }
}

/// No sound at all. Used with `--quiet`.
#[derive(Debug, Default)]
pub struct Silent;

impl Chime for Silent {
    fn ring(&mut self) -> io::Result<()> {
        Ok(())
    }
}
