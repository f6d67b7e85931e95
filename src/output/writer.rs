// file: src/output/writer.rs
// version: 1.2.0
// guid: 545a9e39-f05e-4241-b566-e1928b3a5aed

//! Color-aware output writer selection

use crate::console::OutputStream;
use std::io;

/// How ANSI color sequences are treated on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Pass bytes through untouched (redirected or buffered output).
    Plain,
    /// Remove ANSI escape sequences entirely.
    Strip,
    /// Keep sequences and let the platform render them. On Windows this
    /// requires VT processing, enabled at construction.
    Native,
}

/// Writer handle registered in the execution context. Clones share the
/// underlying stream; each clone keeps its own stripper state.
#[derive(Clone)]
pub struct OutputWriter {
    target: OutputStream,
    color: ColorMode,
    stripper: AnsiStripper,
}

impl OutputWriter {
    pub fn new(target: OutputStream, color: ColorMode) -> Self {
        Self {
            target,
            color,
            stripper: AnsiStripper::default(),
        }
    }

    /// Writer for the real process stdout with platform color support.
    pub fn native_stdout() -> Self {
        #[cfg(windows)]
        {
            // Probing flips the console into VT mode when it can.
            let _ = crossterm::ansi_support::supports_ansi();
        }
        Self::new(OutputStream::Stdout, ColorMode::Native)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color
    }

    pub fn target(&self) -> &OutputStream {
        &self.target
    }
}

impl io::Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.color {
            ColorMode::Plain | ColorMode::Native => self.target.write(buf),
            ColorMode::Strip => {
                let cleaned = self.stripper.strip(buf);
                self.target.write_all(&cleaned)?;
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.target.flush()
    }
}

/// Choose the writer for an invocation's stdout handle.
///
/// `NO_COLOR` set to any non-empty value wins over everything else; the real
/// process stdout gets the native-color writer; anything else is passthrough.
pub fn select_writer(stdout: &OutputStream) -> OutputWriter {
    if no_color_requested() {
        OutputWriter::new(stdout.clone(), ColorMode::Strip)
    } else if stdout.is_process_stdout() {
        OutputWriter::native_stdout()
    } else {
        OutputWriter::new(stdout.clone(), ColorMode::Plain)
    }
}

fn no_color_requested() -> bool {
    std::env::var("NO_COLOR").map(|v| !v.is_empty()).unwrap_or(false)
}

/// Byte-level ANSI escape stripper.
///
/// Carries its state between writes, so a sequence split across two write
/// calls is still removed. Handles CSI (`ESC [`), OSC (`ESC ]` terminated by
/// BEL or ST), bare two-byte escapes and charset designators (`ESC ( B`),
/// which carry intermediate bytes before their final one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiStripper {
    state: StripState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum StripState {
    #[default]
    Text,
    Escape,
    EscapeIntermediate,
    Csi,
    Osc,
    OscEscape,
}

impl AnsiStripper {
    pub fn strip(&mut self, input: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(input.len());
        for &byte in input {
            self.state = match self.state {
                StripState::Text => {
                    if byte == 0x1b {
                        StripState::Escape
                    } else {
                        out.push(byte);
                        StripState::Text
                    }
                }
                StripState::Escape => match byte {
                    b'[' => StripState::Csi,
                    b']' => StripState::Osc,
                    0x1b => StripState::Escape,
                    // Intermediate bytes precede the sequence's final byte.
                    0x20..=0x2f => StripState::EscapeIntermediate,
                    _ => StripState::Text,
                },
                StripState::EscapeIntermediate => match byte {
                    0x20..=0x2f => StripState::EscapeIntermediate,
                    0x1b => StripState::Escape,
                    // Final byte, consumed with the sequence.
                    _ => StripState::Text,
                },
                // Parameter and intermediate bytes run until a final byte
                // in 0x40..=0x7e.
                StripState::Csi => {
                    if (0x40..=0x7e).contains(&byte) {
                        StripState::Text
                    } else {
                        StripState::Csi
                    }
                }
                StripState::Osc => match byte {
                    0x07 => StripState::Text,
                    0x1b => StripState::OscEscape,
                    _ => StripState::Osc,
                },
                StripState::OscEscape => match byte {
                    b'\\' => StripState::Text,
                    0x1b => StripState::OscEscape,
                    _ => StripState::Osc,
                },
            };
        }
        out
    }
}
