use std::io::{self, Write};

use measure_core::{DisplayMessage, OutputSink};

/// Prints each message on its own line.
pub struct WriterSink<W> {
    out: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn write(&mut self, message: &DisplayMessage) {
        if let Err(e) = writeln!(self.out, "{message}") {
            tracing::error!(error = %e, "failed to write message");
        }
    }
}
