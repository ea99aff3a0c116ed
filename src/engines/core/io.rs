//! File access for GenBank flat files
//!
//! Small inputs are read through a buffered reader, large ones are
//! memory-mapped. Either way the parser receives one contiguous buffer.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

const DEFAULT_READ_BUFFER_SIZE: usize = 1024 * 1024; // 1MB

/// Buffered file reader
pub struct FastReader {
    reader: BufReader<File>,
}

impl FastReader {
    /// Open a reader for the given file path
    pub fn new<P: AsRef<Path>>(path: P, buffer_size: Option<usize>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        let capacity = buffer_size.unwrap_or(DEFAULT_READ_BUFFER_SIZE);

        Ok(Self {
            reader: BufReader::with_capacity(capacity, file),
        })
    }

    /// Read the rest of the file into a vector
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// Iterate over the lines of the file, `\n` and `\r\n` removed
    pub fn read_lines(&mut self) -> io::Lines<&mut BufReader<File>> {
        (&mut self.reader).lines()
    }
}

/// Read-only memory map over a whole file
pub struct MemoryMappedReader {
    mmap: Mmap,
}

impl MemoryMappedReader {
    /// Map the file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        // SAFETY: read-only mapping; the file must not be truncated while mapped.
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        Ok(Self { mmap })
    }

    /// Get the mapped bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap[..]
    }
}

/// Size of the file at `path` in bytes. Sizes that do not fit the address
/// space saturate at `usize::MAX`.
pub fn file_size<P: AsRef<Path>>(path: P) -> io::Result<usize> {
    let len = fs::metadata(path.as_ref())?.len();
    Ok(usize::try_from(len).unwrap_or(usize::MAX))
}

/// Read a whole file as text, memory-mapping it when it is at least
/// `mmap_threshold` bytes long. Invalid UTF-8 is replaced, not rejected.
pub fn read_text<P: AsRef<Path>>(
    path: P,
    buffer_size: Option<usize>,
    mmap_threshold: usize,
) -> io::Result<String> {
    let size = file_size(path.as_ref())?;

    if size >= mmap_threshold {
        log::debug!("memory-mapping {} ({} bytes)", path.as_ref().display(), size);
        let reader = MemoryMappedReader::new(path)?;
        return Ok(String::from_utf8_lossy(reader.as_slice()).into_owned());
    }

    let bytes = FastReader::new(path, buffer_size)?.read_all()?;
    // Only re-allocate when the bytes are not valid UTF-8
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
