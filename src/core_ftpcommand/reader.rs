use crate::constants::MAX_VERB_LENGTH;
use crate::core_network::transport::Transport;

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Upper-cased, at most four characters.
    pub verb: String,
    /// Everything after the first space, leading spaces skipped.
    pub parameter: String,
    /// Length of the raw line.
    pub len: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    NoData,
    LineTooLong,
    EmptyLine,
    SyntaxError,
    Command(Command),
}

/// Assembles control lines one byte at a time.
#[derive(Debug)]
pub struct CommandReader {
    line: Vec<u8>,
    capacity: usize,
    discarding: bool,
}

impl CommandReader {
    pub fn new(capacity: usize) -> Self {
        Self {
            line: Vec::with_capacity(capacity),
            capacity,
            discarding: false,
        }
    }

    pub fn reset(&mut self) {
        self.line.clear();
        self.discarding = false;
    }

    /// Pulls at most one byte from the control channel.
    pub fn poll(&mut self, transport: &mut dyn Transport) -> ReadOutcome {
        match transport.read_control_byte() {
            Some(byte) => self.push_byte(byte),
            None => ReadOutcome::NoData,
        }
    }

    pub fn push_byte(&mut self, byte: u8) -> ReadOutcome {
        match byte {
            b'\r' => ReadOutcome::NoData,
            b'\n' if self.discarding => {
                self.reset();
                ReadOutcome::NoData
            }
            b'\n' => self.finish_line(),
            _ if self.discarding => ReadOutcome::NoData,
            _ if self.line.len() >= self.capacity => {
                // The tail of an overlong line is dropped up to its LF
                self.line.clear();
                self.discarding = true;
                ReadOutcome::LineTooLong
            }
            b'\\' => {
                self.line.push(b'/');
                ReadOutcome::NoData
            }
            _ => {
                self.line.push(byte);
                ReadOutcome::NoData
            }
        }
    }

    fn finish_line(&mut self) -> ReadOutcome {
        let line = String::from_utf8_lossy(&self.line).into_owned();
        self.line.clear();
        if line.is_empty() {
            return ReadOutcome::EmptyLine;
        }

        let (verb, parameter) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, rest.trim_start_matches(' ')),
            None => (line.as_str(), ""),
        };
        if verb.chars().count() > MAX_VERB_LENGTH {
            return ReadOutcome::SyntaxError;
        }

        ReadOutcome::Command(Command {
            verb: verb.to_ascii_uppercase(),
            parameter: parameter.to_string(),
            len: line.len(),
        })
    }
}
