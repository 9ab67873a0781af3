//! Fan-out writer copying one byte stream into several independent sinks.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A destination for captured bytes.
pub trait Sink: Send {
    /// Short label used when reporting a failure.
    fn label(&self) -> &str;

    /// Appends `chunk` to the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination rejects the write.
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()>;
}

/// In-memory buffer that can be shared between several tees.
///
/// Clones refer to the same underlying buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    label: &'static str,
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self { label, bytes: Arc::default() }
    }

    /// Returns a copy of everything written so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Sink for SharedBuffer {
    fn label(&self) -> &str {
        self.label
    }

    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(chunk);
        Ok(())
    }
}

/// Forwards bytes to a writer as they arrive, flushing after each chunk.
pub struct Passthrough<W> {
    label: &'static str,
    writer: W,
}

impl<W: Write + Send> Passthrough<W> {
    /// Wraps `writer`.
    pub fn new(label: &'static str, writer: W) -> Self {
        Self { label, writer }
    }
}

impl Passthrough<io::Stdout> {
    /// Mirrors onto this process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new("stdout", io::stdout())
    }
}

impl Passthrough<io::Stderr> {
    /// Mirrors onto this process's standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new("stderr", io::stderr())
    }
}

impl<W: Write + Send> Sink for Passthrough<W> {
    fn label(&self) -> &str {
        self.label
    }

    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.writer.write_all(chunk)?;
        self.writer.flush()
    }
}

/// Copies every chunk to each registered sink.
///
/// A sink that fails is dropped from the fan-out and the remaining sinks
/// keep receiving the full stream.
#[derive(Default)]
pub struct Tee {
    sinks: Vec<Box<dyn Sink>>,
}

impl Tee {
    /// Creates a tee with no sinks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers another sink.
    #[must_use]
    pub fn with(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Number of sinks still receiving data.
    #[must_use]
    pub fn live_sinks(&self) -> usize {
        self.sinks.len()
    }

    /// Writes `chunk` to every live sink.
    pub fn write(&mut self, chunk: &[u8]) {
        self.sinks.retain_mut(|sink| match sink.write_chunk(chunk) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(sink = sink.label(), error = %err, "dropping failed output sink");
                false
            }
        });
    }
}
