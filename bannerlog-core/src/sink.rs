use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

/// Any destination a logger can write rendered lines to.
pub type Sink = Box<dyn Write + Send>;

/// A writer duplicating every byte sequence to all of its destinations, in insertion order.
///
/// Writes are best effort: every destination is attempted even if an earlier one failed.
/// `write_all` and `flush` report the first error encountered; `write` never fails.
#[derive(Default)]
pub struct FanOut {
    writers: Vec<Sink>,
}

impl FanOut {
    pub fn new(writer: Sink) -> Self {
        Self {
            writers: vec![writer],
        }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    /// Drops every destination and keeps only `writer`.
    pub fn replace(&mut self, writer: Sink) {
        self.writers.clear();
        self.writers.push(writer);
    }

    pub fn push(&mut self, writer: Sink) {
        self.writers.push(writer);
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl Write for FanOut {
    /// Hands `buf` to every destination and always reports it as fully written, so a caller
    /// retrying after an error never duplicates bytes on the destinations that took them.
    /// Use [`Write::write_all`] to see the first failure.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for writer in &mut self.writers {
            let _ = writer.write_all(buf);
        }
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let mut first_err = None;
        for writer in &mut self.writers {
            if let Err(e) = writer.write_all(buf) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut first_err = None;
        for writer in &mut self.writers {
            if let Err(e) = writer.flush() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Log file opened in append mode. Created if it does not exist.
pub struct LogFile {
    file: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let file = File::options().create(true).append(true).open(&path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// In-memory sink. Clones share the same buffer, so one clone can be handed to a logger
/// while another is kept to inspect what was written.
#[derive(Clone, Default, Debug)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) struct FailingWriter;

#[cfg(test)]
impl Write for FailingWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
