//! Builders for synthetic PDB files.
#![allow(dead_code)]

use std::io::Cursor;

use pdb_reader::pdb::PdbFile;

pub const HEADER_SIZE: usize = 78;
pub const ENTRY_SIZE: usize = 8;

/// Seconds since 1904 for 2009-07-29 12:00:00, which has the top bit set.
pub const CREATED_2009: u32 = 3_331_713_600;

/// A record table entry and its data.
struct Entry {
    attributes: u8,
    data: Option<Vec<u8>>,
    offset_override: Option<u32>,
}

/// Builds a PDB file in memory.
pub struct PdbBuilder {
    name: String,
    db_type: String,
    creator: String,
    created: u32,
    modified: u32,
    backed_up: u32,
    app_info: Option<Vec<u8>>,
    entries: Vec<Entry>,
    declared_count: Option<u16>,
}

impl PdbBuilder {
    pub fn new(name: &str, creator: &str) -> Self {
        Self {
            name: name.to_owned(),
            db_type: "DATA".to_owned(),
            creator: creator.to_owned(),
            created: CREATED_2009,
            modified: CREATED_2009 + 60,
            backed_up: 0,
            app_info: None,
            entries: Vec::new(),
            declared_count: None,
        }
    }

    pub fn backed_up(mut self, seconds: u32) -> Self {
        self.backed_up = seconds;
        self
    }

    pub fn app_info(mut self, data: Vec<u8>) -> Self {
        self.app_info = Some(data);
        self
    }

    pub fn record(mut self, attributes: u8, data: Vec<u8>) -> Self {
        self.entries.push(Entry {
            attributes,
            data: Some(data),
            offset_override: None,
        });
        self
    }

    /// A deleted entry whose offset points past the end of the file.
    pub fn deleted_beyond_eof(mut self) -> Self {
        self.entries.push(Entry {
            attributes: 0x80,
            data: None,
            offset_override: Some(0x00FF_FFFF),
        });
        self
    }

    /// Declares a record count that differs from the entries written.
    pub fn declared_count(mut self, count: u16) -> Self {
        self.declared_count = Some(count);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let count = self.declared_count.unwrap_or(self.entries.len() as u16);
        let table_end = HEADER_SIZE + ENTRY_SIZE * self.entries.len();
        let app_info_offset = if self.app_info.is_some() { table_end } else { 0 };
        let mut data_offset = table_end + self.app_info.as_ref().map_or(0, Vec::len);

        let mut out = Vec::new();
        out.extend_from_slice(&fixed(&self.name, 32));
        out.extend_from_slice(&0u16.to_be_bytes()); // attributes
        out.extend_from_slice(&1u16.to_be_bytes()); // version
        out.extend_from_slice(&self.created.to_be_bytes());
        out.extend_from_slice(&self.modified.to_be_bytes());
        out.extend_from_slice(&self.backed_up.to_be_bytes());
        out.extend_from_slice(&7u32.to_be_bytes()); // modification number
        out.extend_from_slice(&(app_info_offset as u32).to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes()); // sort info
        out.extend_from_slice(&fixed(&self.db_type, 4));
        out.extend_from_slice(&fixed(&self.creator, 4));
        out.extend_from_slice(&0u32.to_be_bytes()); // unique id seed
        out.extend_from_slice(&0u32.to_be_bytes()); // next record list
        out.extend_from_slice(&count.to_be_bytes());
        assert_eq!(out.len(), HEADER_SIZE);

        for (ix, entry) in self.entries.iter().enumerate() {
            let offset = match entry.offset_override {
                Some(offset) => offset,
                None => {
                    let offset = data_offset as u32;
                    data_offset += entry.data.as_ref().map_or(0, Vec::len);
                    offset
                }
            };
            out.extend_from_slice(&offset.to_be_bytes());
            out.push(entry.attributes);
            out.extend_from_slice(&[0, 0, ix as u8]);
        }

        if let Some(app_info) = &self.app_info {
            out.extend_from_slice(app_info);
        }
        for entry in &self.entries {
            if let Some(data) = &entry.data {
                out.extend_from_slice(data);
            }
        }
        out
    }

    pub fn open(self) -> PdbFile<Cursor<Vec<u8>>> {
        PdbFile::new(Cursor::new(self.build())).expect("in-memory source")
    }
}

/// A zero-padded fixed-length field.
pub fn fixed(text: &str, len: usize) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(len, 0);
    bytes
}

/// A zero-terminated string.
pub fn cstr(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

pub fn packed_date(year: u16, month: u8, day: u8) -> u16 {
    ((year - 1904) << 9) | (u16::from(month) << 5) | u16::from(day)
}

/// A category block with names in the first slots and key = slot + 10.
pub fn category_block(names: &[&str], renamed_mask: u16) -> Vec<u8> {
    let mut out = renamed_mask.to_be_bytes().to_vec();
    for ix in 0..16 {
        out.extend_from_slice(&fixed(names.get(ix).copied().unwrap_or(""), 16));
    }
    for ix in 0..16u8 {
        out.push(ix + 10);
    }
    out
}

/// Seven date-time words.
pub fn date_time_words(year: u16, month: u16, day: u16, hour: u16, minute: u16, second: u16) -> Vec<u8> {
    [second, minute, hour, day, month, year, 0]
        .iter()
        .flat_map(|w| w.to_be_bytes())
        .collect()
}

/// Builds a calendar record body.
#[derive(Default)]
pub struct EventBuilder {
    pub start: Option<(i8, i8)>,
    pub end: Option<(i8, i8)>,
    pub date: (u16, u8, u8),
    pub alarm: Option<(i8, u8)>,
    pub repeat: Option<[u8; 8]>,
    pub exceptions: Vec<(u16, u8, u8)>,
    pub description: Option<String>,
    pub note: Option<String>,
    pub location: Option<String>,
}

impl EventBuilder {
    pub fn on(year: u16, month: u8, day: u8) -> Self {
        Self {
            date: (year, month, day),
            ..Self::default()
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let (sh, sm) = self.start.unwrap_or((-1, -1));
        let (eh, em) = self.end.unwrap_or((-1, -1));
        let mut out = vec![sh as u8, sm as u8, eh as u8, em as u8];
        out.extend_from_slice(&packed_date(self.date.0, self.date.1, self.date.2).to_be_bytes());

        let mut flags = 0u16;
        if self.alarm.is_some() {
            flags |= 0x4000;
        }
        if self.repeat.is_some() {
            flags |= 0x2000;
        }
        if self.note.is_some() {
            flags |= 0x1000;
        }
        if !self.exceptions.is_empty() {
            flags |= 0x0800;
        }
        if self.description.is_some() {
            flags |= 0x0400;
        }
        if self.location.is_some() {
            flags |= 0x0200;
        }
        out.extend_from_slice(&flags.to_be_bytes());

        if let Some((advance, unit)) = self.alarm {
            out.push(advance as u8);
            out.push(unit);
        }
        if let Some(repeat) = self.repeat {
            out.extend_from_slice(&repeat);
        }
        if !self.exceptions.is_empty() {
            out.extend_from_slice(&(self.exceptions.len() as u16).to_be_bytes());
            for &(y, m, d) in &self.exceptions {
                out.extend_from_slice(&packed_date(y, m, d).to_be_bytes());
            }
        }
        for text in [&self.description, &self.note, &self.location].into_iter().flatten() {
            out.extend_from_slice(&cstr(text));
        }
        out
    }
}

/// An 8-byte binary repeat block.
pub fn repeat_block(mode: u8, until: Option<(u16, u8, u8)>, frequency: u8, repeat_on: u8) -> [u8; 8] {
    let until = until.map_or(0xFFFF, |(y, m, d)| packed_date(y, m, d));
    let [hi, lo] = until.to_be_bytes();
    [mode, 0, hi, lo, frequency, repeat_on, 0, 0]
}
