use std::collections::VecDeque;

use crate::{error::Result, scpi::Scpi};

/// In-memory connection: records every command written and answers reads from a queue of
/// canned responses. Lets drivers be exercised without hardware.
#[derive(Debug, Default, Clone)]
pub struct Loopback {
    written: Vec<String>,
    responses: VecDeque<String>,
}

impl Loopback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            written: Vec::new(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push_response<S: Into<String>>(&mut self, response: S) -> &mut Self {
        self.responses.push_back(response.into());
        self
    }

    pub fn written(&self) -> &[String] {
        &self.written
    }

    pub fn take_written(&mut self) -> Vec<String> {
        std::mem::take(&mut self.written)
    }

    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }
}

impl Scpi for Loopback {
    fn write(&mut self, command: &str) -> Result<()> {
        self.written.push(command.to_string());
        Ok(())
    }
    fn read(&mut self) -> Result<String> {
        self.responses.pop_front().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no response queued on loopback",
            )
            .into()
        })
    }
}
