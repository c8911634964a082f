use arch::Word;
use std::collections::VecDeque;
use std::io::{self, IsTerminal, Read, Write};

/// Character source and sink used by the I/O operation.
pub trait Console {
    /// Blocks until one character is available. `echo` also writes it to the output.
    fn read_char(&mut self, echo: bool) -> io::Result<Word>;
    fn write_char(&mut self, c: char) -> io::Result<()>;
    fn write_number(&mut self, n: Word) -> io::Result<()>;
}

/// Standard input and output.
///
/// Input is read byte by byte from stdin. A terminal stays in cooked mode, so it echoes
/// and buffers lines by itself. Piped input is echoed here when `echo` is set.
#[derive(Debug, Default)]
pub struct Terminal;

// A cooked terminal has already shown the keystroke.
fn echo_needed(echo: bool, tty: bool) -> bool {
    echo && !tty
}

impl Console for Terminal {
    fn read_char(&mut self, echo: bool) -> io::Result<Word> {
        io::stdout().flush()?;
        let stdin = io::stdin();
        let mut buf = [0u8; 1];
        stdin.lock().read_exact(&mut buf)?;
        if echo_needed(echo, stdin.is_terminal()) {
            self.write_char(buf[0] as char)?;
        }
        Ok(buf[0] as Word)
    }

    fn write_char(&mut self, c: char) -> io::Result<()> {
        let mut out = io::stdout();
        write!(out, "{}", c)?;
        out.flush()
    }

    fn write_number(&mut self, n: Word) -> io::Result<()> {
        let mut out = io::stdout();
        write!(out, "{}", n)?;
        out.flush()
    }
}

/// Pre-loaded input characters and an arbitrary output writer.
pub struct Tape<W: Write> {
    input: VecDeque<char>,
    output: W,
}

impl<W: Write> Tape<W> {
    pub fn new(input: &str, output: W) -> Self {
        Tape {
            input: input.chars().collect(),
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<W: Write> Console for Tape<W> {
    fn read_char(&mut self, echo: bool) -> io::Result<Word> {
        let c = self
            .input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input tape is empty"))?;
        if echo {
            self.write_char(c)?;
        }
        Ok(c as Word)
    }

    fn write_char(&mut self, c: char) -> io::Result<()> {
        write!(self.output, "{}", c)?;
        self.output.flush()
    }

    fn write_number(&mut self, n: Word) -> io::Result<()> {
        write!(self.output, "{}", n)?;
        self.output.flush()
    }
}
