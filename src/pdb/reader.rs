use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use chrono::NaiveDateTime;
use log::{debug, info, trace};

use super::codec::{date, text};
use super::converter::{Converter, RecordContext};
use super::format;
use super::types::error::{PdbError, Result};
use super::types::models::{PdbDatabase, RecordEntry};
use super::utils::ReadContext;

/// A seekable PDB byte source with the primitive reads all decoders use.
///
/// All integers are big-endian. Every read that runs out of bytes fails
/// with [`PdbError::Truncated`], naming the value and offset.
#[derive(Debug)]
pub struct PdbFile<R> {
    inner: R,
    pos: u64,
    len: u64,
}

impl PdbFile<BufReader<File>> {
    /// Opens a PDB file from disk.
    ///
    /// The handle is closed when the `PdbFile` is dropped, whether or not
    /// decoding succeeded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening PDB file: {}", path.display());
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> PdbFile<R> {
    /// Wraps any seekable source, for example a `Cursor<Vec<u8>>`.
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, pos: 0, len })
    }

    /// Total length of the source in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current read position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Bytes left between the current position and the end of the source.
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }

    /// Skips `count` bytes that carry no information.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        if count > self.remaining() {
            return Err(PdbError::truncated(format!("{} skipped bytes at offset {}", count, self.pos)));
        }
        self.seek(self.pos + count)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let pos = self.pos;
        let value = self.inner.read_u8().or_truncated(|| format!("u8 at offset {}", pos))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        let pos = self.pos;
        let value = self.inner.read_i8().or_truncated(|| format!("i8 at offset {}", pos))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let pos = self.pos;
        let value = self
            .inner
            .read_u16::<BigEndian>()
            .or_truncated(|| format!("u16 at offset {}", pos))?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let pos = self.pos;
        let value = self
            .inner
            .read_u32::<BigEndian>()
            .or_truncated(|| format!("u32 at offset {}", pos))?;
        self.pos += 4;
        Ok(value)
    }

    /// Reads exactly `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let pos = self.pos;
        let mut buf = vec![0u8; count];
        self.inner
            .read_exact(&mut buf)
            .or_truncated(|| format!("{} bytes at offset {}", count, pos))?;
        self.pos += count as u64;
        Ok(buf)
    }

    /// Reads a fixed-length string, decoding the whole range.
    pub fn read_fixed_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        Ok(text::decode(&bytes))
    }

    /// Reads a fixed-length string that ends at its first zero byte.
    ///
    /// The full `length` is consumed regardless of where the string ends.
    pub fn read_terminated_fixed_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        Ok(text::decode_terminated(&bytes))
    }

    /// Reads a zero-terminated string of any length, consuming the terminator.
    pub fn read_terminated_string(&mut self) -> Result<String> {
        let start = self.pos;
        let mut bytes = Vec::new();
        loop {
            let pos = self.pos;
            let byte = self
                .inner
                .read_u8()
                .or_truncated(|| format!("string starting at offset {} (no terminator by offset {})", start, pos))?;
            self.pos += 1;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }
        Ok(text::decode(&bytes))
    }

    /// Reads an unsigned 32-bit timestamp (seconds since 1904).
    pub fn read_date(&mut self) -> Result<NaiveDateTime> {
        Ok(date::from_palm_seconds(self.read_u32()?))
    }

    /// Reads a timestamp where 0 means "never".
    pub fn read_optional_date(&mut self) -> Result<Option<NaiveDateTime>> {
        let seconds = self.read_u32()?;
        Ok((seconds != 0).then(|| date::from_palm_seconds(seconds)))
    }

    /// Reads a packed 16-bit date, `None` for the 0xFFFF sentinel.
    pub fn read_packed_date(&mut self) -> Result<Option<date::ShortDate>> {
        Ok(date::ShortDate::from_packed_opt(self.read_u16()?))
    }

    /// Reads seven date-time words (second, minute, hour, day, month, year, weekday).
    pub fn read_date_time_words(&mut self) -> Result<Option<NaiveDateTime>> {
        let mut words = [0u16; 7];
        for word in words.iter_mut() {
            *word = self.read_u16()?;
        }
        Ok(date::from_date_time_words(words))
    }

    /// Decodes the whole database with the given converter.
    ///
    /// # Process
    /// 1. Parse the header and the record table
    /// 2. Decode the application info block, if the header points to one
    /// 3. Ask the converter whether it accepts the database
    /// 4. Decode every record in table order
    ///
    /// Deleted records whose data lies beyond the end of the file are
    /// skipped. Records the converter returns `None` for are omitted.
    ///
    /// # Errors
    /// - [`PdbError::Truncated`] / [`PdbError::InvalidFormat`] if the file is broken
    /// - [`PdbError::WrongFormat`] if the converter rejects the database
    /// - [`PdbError::Record`] wrapping any failure inside a record
    pub fn read_database<C: Converter>(&mut self, converter: &C) -> Result<PdbDatabase<C::Record, C::AppInfo>> {
        debug!("Reading database with {} converter", C::DEBUG_NAME);

        // Step 1: header and record table
        let (header, entries) = format::header::parse(self)?;

        // Step 2: application info
        let app_info = if header.app_info_offset > 0 {
            let offset = u64::from(header.app_info_offset);
            let end = entries
                .iter()
                .map(|e| u64::from(e.offset))
                .filter(|&o| o > offset)
                .min()
                .unwrap_or(self.len)
                .min(self.len);
            let size = end.saturating_sub(offset);
            debug!("Application info at offset {}, {} bytes", offset, size);
            self.seek(offset)?;
            Some(converter.convert_app_info(self, size, &header)?)
        } else {
            debug!("No application info block");
            None
        };

        // Step 3: acceptance
        if !converter.is_acceptable(&header, app_info.as_ref()) {
            return Err(PdbError::WrongFormat {
                converter: C::DEBUG_NAME,
                name: header.name.clone(),
                creator: header.creator.clone(),
            });
        }

        // Step 4: records
        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let offset = u64::from(entry.offset);
            if entry.attributes.is_deleted() && offset >= self.len {
                debug!("Skipping deleted record {} at offset {} beyond end of file", index, offset);
                continue;
            }

            let size = record_span(&entries, index, self.len).map_err(|e| e.in_record(index))?;
            trace!("Record {}: offset={}, size={}, attributes={:#04x}", index, offset, size, entry.attributes.0);

            let context = RecordContext {
                index,
                size,
                attributes: entry.attributes,
                header: &header,
                app_info: app_info.as_ref(),
            };

            self.seek(offset)?;
            match converter.convert(self, &context).map_err(|e| e.in_record(index))? {
                Some(record) => records.push(record),
                None => trace!("Record {} omitted by converter", index),
            }
        }

        info!(
            "Read database '{}' (type={}, creator={}): {} of {} records",
            header.name,
            header.db_type,
            header.creator,
            records.len(),
            entries.len()
        );

        Ok(PdbDatabase {
            header,
            app_info,
            records,
        })
    }
}

/// Computes the byte span of a record: up to the next entry's offset, or
/// to the end of the file for the last entry.
fn record_span(entries: &[RecordEntry], index: usize, file_len: u64) -> Result<u64> {
    let offset = u64::from(entries[index].offset);
    if offset > file_len {
        return Err(PdbError::truncated(format!("record data at offset {} beyond end of file ({})", offset, file_len)));
    }
    let end = match entries.get(index + 1) {
        Some(next) => u64::from(next.offset).min(file_len),
        None => file_len,
    };
    end.checked_sub(offset).ok_or_else(|| {
        PdbError::InvalidFormat(format!("record offsets not ascending: {} followed by {}", offset, end))
    })
}

/// Reads a PDB file from disk with the given converter.
///
/// Convenience wrapper around [`PdbFile::open`] and [`PdbFile::read_database`].
pub fn read_database<C: Converter>(
    path: impl AsRef<Path>,
    converter: &C,
) -> Result<PdbDatabase<C::Record, C::AppInfo>> {
    PdbFile::open(path)?.read_database(converter)
}
