//! Console input fed through a channel.
//!
//! # Responsibility
//! - Pump stdin lines from a background thread into the interactive loop.
//! - Deliver a Ctrl+C request to the loop as an input error, so interruption
//!   ends the session through the same shutdown path as closed input.
//!
//! # Invariants
//! - Once input is closed every later read reports end of input.
//! - A user interrupt surfaces as an `io::Error` wrapping [`UserInterrupt`].

use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Read};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Message delivered to [`ConsoleInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// One raw line including its terminator.
    Line(String),
    /// Ctrl+C was pressed.
    Interrupt,
    /// The underlying input reached end of file.
    Closed,
}

/// Marker error carried inside `io::Error` when the user interrupts.
#[derive(Debug)]
pub struct UserInterrupt;

impl Display for UserInterrupt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "stopped by user (Ctrl+C)")
    }
}

impl Error for UserInterrupt {}

/// Returns true when `err` was produced by a user interrupt.
pub fn is_user_interrupt(err: &io::Error) -> bool {
    err.get_ref()
        .is_some_and(|inner| inner.is::<UserInterrupt>())
}

/// `BufRead` over a stream of [`ConsoleEvent`]s.
pub struct ConsoleInput {
    events: Receiver<ConsoleEvent>,
    buffer: Vec<u8>,
    pos: usize,
    closed: bool,
}

impl ConsoleInput {
    /// Creates an input and the sender that feeds it.
    pub fn channel() -> (Sender<ConsoleEvent>, Self) {
        let (sender, events) = mpsc::channel();
        let input = Self {
            events,
            buffer: Vec::new(),
            pos: 0,
            closed: false,
        };
        (sender, input)
    }
}

impl Read for ConsoleInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.consume(count);
        Ok(count)
    }
}

impl BufRead for ConsoleInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        while self.pos >= self.buffer.len() && !self.closed {
            // Every sender gone means nothing more can arrive.
            match self.events.recv().unwrap_or(ConsoleEvent::Closed) {
                ConsoleEvent::Line(line) => {
                    self.buffer = line.into_bytes();
                    self.pos = 0;
                }
                ConsoleEvent::Closed => self.closed = true,
                ConsoleEvent::Interrupt => {
                    return Err(io::Error::other(UserInterrupt));
                }
            }
        }
        if self.pos >= self.buffer.len() {
            return Ok(&[]);
        }
        Ok(&self.buffer[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.buffer.len());
    }
}

/// Forwards stdin lines to `sender` from a detached thread.
pub fn spawn_stdin_pump(sender: Sender<ConsoleEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        loop {
            let mut line = String::new();
            let event = match stdin.lock().read_line(&mut line) {
                Ok(0) => ConsoleEvent::Closed,
                Ok(_) => ConsoleEvent::Line(line),
                Err(err) => {
                    warn!("event=stdin_read module=cli status=error error={err}");
                    ConsoleEvent::Closed
                }
            };
            let done = event == ConsoleEvent::Closed;
            if sender.send(event).is_err() || done {
                return;
            }
        }
    });
}

/// Routes Ctrl+C into `sender` as [`ConsoleEvent::Interrupt`].
///
/// # Errors
/// - Returns the handler registration error when another handler is installed.
pub fn install_interrupt_handler(sender: Sender<ConsoleEvent>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        // Why: the loop may already have ended and dropped its receiver.
        let _ = sender.send(ConsoleEvent::Interrupt);
    })
}
