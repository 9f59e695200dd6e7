mod common;

use std::io::{Read, Seek, Write};

use chrono::{NaiveDate, NaiveDateTime};
use common::{CREATED_2009, HEADER_SIZE, PdbBuilder, category_block, cstr};
use pdb_reader::pdb::codec::date::{self, NO_DATE, ShortDate};
use pdb_reader::pdb::converter::{MemoConverter, RawConverter, RecordContext};
use pdb_reader::pdb::format::appinfo::{self, CATEGORY_BLOCK_SIZE};
use pdb_reader::pdb::types::records::MemoRecord;
use pdb_reader::pdb::{CategoryAppInfo, PdbRecord};
use pdb_reader::{Converter, DatabaseHeader, PdbError, PdbFile, read_database};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn memo_db() -> PdbBuilder {
    PdbBuilder::new("MemoDB", "memo").app_info(category_block(&["Unfiled", "Business", "Personal"], 0))
}

#[test]
fn header_fields_are_read() {
    let mut file = memo_db().record(0, cstr("hello")).open();
    let db = file.read_database(&MemoConverter).unwrap();

    let header = &db.header;
    assert_eq!("MemoDB", header.name);
    assert_eq!("memo", header.creator);
    assert_eq!("DATA", header.db_type);
    assert_eq!(1, header.version);
    assert_eq!(7, header.modification_number);
    assert_eq!(HEADER_SIZE as u32 + 8, header.app_info_offset, "app info follows the record table");
    assert_eq!(at(2009, 7, 29, 12, 0), header.created, "created timestamp must not be sign-extended");
    assert_eq!(at(2009, 7, 29, 12, 1), header.modified);
    assert_eq!(None, header.backed_up, "zero backup time means never backed up");
}

#[test]
fn backup_timestamp_is_unsigned() {
    let mut file = memo_db().backed_up(CREATED_2009).open();
    let db = file.read_database(&MemoConverter).unwrap();
    assert_eq!(Some(at(2009, 7, 29, 12, 0)), db.header.backed_up);
    assert!(db.is_empty());
}

#[test]
fn palm_seconds_round_trip() {
    let when = date::from_palm_seconds(u32::MAX);
    assert_eq!(Some(u32::MAX), date::to_palm_seconds(when));
    assert_eq!(date::epoch(), date::from_palm_seconds(0));
    assert_eq!(None, date::to_palm_seconds(at(1903, 12, 31, 23, 59)));
}

#[test]
fn records_keep_table_order() {
    let mut file = memo_db()
        .record(0, cstr("one"))
        .record(1, cstr("two"))
        .record(2, cstr("three"))
        .open();
    let db = file.read_database(&MemoConverter).unwrap();

    let memos: Vec<&str> = db.records.iter().map(|r| r.memo.as_str()).collect();
    assert_eq!(vec!["one", "two", "three"], memos);
    let categories: Vec<usize> = db.records.iter().map(|r| r.category_index()).collect();
    assert_eq!(vec![0, 1, 2], categories);
}

#[test]
fn deleted_record_beyond_eof_is_skipped() {
    let mut file = memo_db()
        .record(0, cstr("kept"))
        .record(0, cstr("also kept"))
        .deleted_beyond_eof()
        .open();
    let db = file.read_database(&MemoConverter).unwrap();

    assert_eq!(2, db.len(), "three table entries, one of them deleted past the end");
    assert_eq!("also kept", db.records[1].memo, "span of the last record is clamped to the file");
}

#[test]
fn deleted_record_inside_file_is_decoded() {
    let mut file = memo_db().record(0x80, cstr("gone")).open();
    let db = file.read_database(&MemoConverter).unwrap();
    assert_eq!(1, db.len());
    assert!(db.records[0].is_deleted());
}

#[test]
fn deleted_entry_without_bytes_is_omitted() {
    let mut file = memo_db()
        .record(0, cstr("a"))
        .record(0x80, Vec::new())
        .record(0, cstr("b"))
        .open();
    let db = file.read_database(&MemoConverter).unwrap();

    let memos: Vec<(&str, bool)> = db.records.iter().map(|r| (r.memo.as_str(), r.is_deleted())).collect();
    assert_eq!(vec![("a", false), ("b", false)], memos, "the empty entry must not decode the next record");
}

#[test]
fn category_index_resolves_or_is_absent() {
    let mut file = memo_db()
        .record(0x11, cstr("secret business"))
        .record(0x0F, cstr("last slot"))
        .open();
    let db = file.read_database(&MemoConverter).unwrap();

    for record in &db.records {
        assert!(record.category_index() < 16, "category index {} out of range", record.category_index());
    }
    assert!(db.records[0].is_secret());
    assert_eq!(Some("Business"), db.category_of(&db.records[0]).map(|c| c.name.as_str()));
    assert_eq!(None, db.category_of(&db.records[1]), "slot 15 is not defined");
}

#[test]
fn declared_record_count_beyond_data_is_structural() {
    let mut file = PdbBuilder::new("MemoDB", "memo").declared_count(5).open();
    let err = file.read_database(&MemoConverter).unwrap_err();

    assert!(err.is_structural(), "expected a structural error, got {}", err);
    assert!(!err.is_wrong_format());
    assert!(matches!(err, PdbError::Truncated { .. }), "got {:?}", err);
}

#[test]
fn truncated_header_is_structural() {
    let mut bytes = memo_db().build();
    bytes.truncate(40);
    let mut file = PdbFile::new(std::io::Cursor::new(bytes)).unwrap();
    let err = file.read_database(&MemoConverter).unwrap_err();
    assert!(err.is_structural(), "expected a structural error, got {}", err);
}

#[test]
fn wrong_signature_is_rejected() {
    let mut file = PdbBuilder::new("ToDoDB", "todo")
        .app_info(category_block(&["Unfiled"], 0))
        .record(0, cstr("not a memo"))
        .open();
    let err = file.read_database(&MemoConverter).unwrap_err();

    assert!(err.is_wrong_format(), "expected wrong format, got {}", err);
    assert!(!err.is_structural());
    match err {
        PdbError::WrongFormat { converter, name, creator } => {
            assert_eq!("Memo", converter);
            assert_eq!("ToDoDB", name);
            assert_eq!("todo", creator);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn unterminated_record_names_its_index() {
    let mut file = memo_db()
        .record(0, cstr("fine"))
        .record(0, b"no terminator".to_vec())
        .open();
    let err = file.read_database(&MemoConverter).unwrap_err();

    assert!(matches!(err, PdbError::Record { index: 1, .. }), "got {:?}", err);
    assert!(err.is_structural());
    assert!(matches!(err.root(), PdbError::Truncated { .. }));
}

#[test]
fn descending_offsets_are_invalid() {
    let mut bytes = memo_db().record(0, cstr("first")).record(0, cstr("second")).build();
    // swap the two offsets in the record table
    let (a, b) = (HEADER_SIZE, HEADER_SIZE + 8);
    let first: [u8; 4] = bytes[a..a + 4].try_into().unwrap();
    let second: [u8; 4] = bytes[b..b + 4].try_into().unwrap();
    bytes[a..a + 4].copy_from_slice(&second);
    bytes[b..b + 4].copy_from_slice(&first);

    let mut file = PdbFile::new(std::io::Cursor::new(bytes)).unwrap();
    let err = file.read_database(&MemoConverter).unwrap_err();
    assert!(matches!(err.root(), PdbError::InvalidFormat(_)), "got {:?}", err);
}

#[test]
fn special_characters_are_remapped() {
    let mut file = memo_db().record(0, vec![b'I', 0x92, b'm', 0x18, 0]).open();
    let db = file.read_database(&MemoConverter).unwrap();
    assert_eq!("I\u{2019}m\u{2026}", db.records[0].memo);

    let mut block = category_block(&["x"], 0);
    block[2..7].copy_from_slice(&[b'B', b'o', b'b', 0x92, b's']);
    let mut file = PdbBuilder::new("MemoDB", "memo").app_info(block).open();
    let db = file.read_database(&MemoConverter).unwrap();
    assert_eq!(Some("Bob\u{2019}s"), db.categories().unwrap().name(0), "fixed strings are remapped too");
}

#[test]
fn packed_dates_round_trip() {
    for year in 0u16..128 {
        for month in 1u16..=12 {
            for day in 1u16..=31 {
                let packed = (year << 9) | (month << 5) | day;
                let date = ShortDate::from_packed(packed);
                assert_eq!(packed, date.to_packed(), "round trip of {}", date);
            }
        }
    }
    assert_eq!(None, ShortDate::from_packed_opt(NO_DATE));
    assert_eq!(
        Some(ShortDate::new(2004, 7, 23)),
        ShortDate::from_packed_opt(common::packed_date(2004, 7, 23))
    );
}

#[test]
fn category_block_is_read() {
    let mut file = PdbBuilder::new("MemoDB", "memo")
        .app_info(category_block(&["Unfiled", "Business", "", "Personal"], 0b1010))
        .open();
    let db = file.read_database(&MemoConverter).unwrap();
    let categories = db.app_info.as_ref().unwrap();

    assert_eq!(3, categories.len(), "the empty slot is not a category");
    assert_eq!(None, categories.get(2));
    assert!(!categories.get(0).unwrap().renamed);
    assert!(categories.get(1).unwrap().renamed);
    assert!(categories.get(3).unwrap().renamed);
    assert_eq!(13, categories.get(3).unwrap().key);

    assert_eq!(Some(1), categories.find_by_name("BUSINESS"), "name lookup ignores case");
    assert_eq!(None, categories.find_by_name("Busi"));
    assert_eq!(Some(3), categories.find_by_key(13));
    assert_eq!(None, categories.find_by_key(12), "the key of an empty slot finds nothing");
    assert_eq!(Some("Personal"), categories.by_key(13).map(|c| c.name.as_str()));
}

#[test]
fn category_block_consumes_all_keys() {
    let mut bytes = category_block(&["Unfiled"], 0);
    bytes.extend_from_slice(&[0xAB, 0xCD]);
    let mut file = PdbFile::new(std::io::Cursor::new(bytes)).unwrap();

    let (categories, consumed) = appinfo::read_categories(&mut file).unwrap();
    assert_eq!(CATEGORY_BLOCK_SIZE, consumed);
    assert_eq!(1, categories.len());
    assert_eq!(0xABCD, file.read_u16().unwrap(), "cursor sits right after the block");
}

#[test]
fn raw_converter_keeps_spans() {
    let app_info = category_block(&["Unfiled"], 0);
    let mut file = PdbBuilder::new("Anything", "zzzz")
        .app_info(app_info.clone())
        .record(0, vec![1, 2, 3])
        .record(0, vec![4, 5])
        .open();
    let db = file.read_database(&RawConverter).unwrap();

    assert_eq!(app_info, db.app_info.unwrap().data, "app info spans up to the first record");
    assert_eq!(vec![1, 2, 3], db.records[0].data);
    assert_eq!(vec![4, 5], db.records[1].data);
}

#[test]
fn primitive_reads_report_truncation() {
    let mut file = PdbFile::new(std::io::Cursor::new(vec![0x12, 0x34, 0x56])).unwrap();
    assert_eq!(3, file.len());
    assert_eq!(0x1234, file.read_u16().unwrap());
    assert_eq!(1, file.remaining());

    let err = file.read_u32().unwrap_err();
    match err {
        PdbError::Truncated { context } => assert!(context.contains("offset 2"), "context was {}", context),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(file.skip(5).is_err());
}

/// Reads memos but leaves out secret ones, and only accepts databases
/// with a category table.
struct PublicMemos;

impl Converter for PublicMemos {
    const DEBUG_NAME: &'static str = "PublicMemos";
    type Record = MemoRecord;
    type AppInfo = CategoryAppInfo;

    fn is_acceptable(&self, _header: &DatabaseHeader, app_info: Option<&CategoryAppInfo>) -> bool {
        app_info.is_some_and(|info| !info.is_empty())
    }

    fn convert_app_info<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        size: u64,
        header: &DatabaseHeader,
    ) -> pdb_reader::Result<CategoryAppInfo> {
        MemoConverter.convert_app_info(file, size, header)
    }

    fn convert<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        context: &RecordContext<'_, CategoryAppInfo>,
    ) -> pdb_reader::Result<Option<MemoRecord>> {
        if context.attributes.is_secret() {
            return Ok(None);
        }
        MemoConverter.convert(file, context)
    }
}

#[test]
fn custom_converter_can_omit_records() {
    let mut file = memo_db()
        .record(0x10, cstr("hidden"))
        .record(0, cstr("shown"))
        .open();
    let db = file.read_database(&PublicMemos).unwrap();
    assert_eq!(1, db.len());
    assert_eq!("shown", db.records[0].memo);
}

#[test]
fn acceptance_sees_app_info() {
    let mut file = PdbBuilder::new("MemoDB", "memo").record(0, cstr("orphan")).open();
    let err = file.read_database(&PublicMemos).unwrap_err();
    assert!(err.is_wrong_format(), "no category table, got {}", err);
}

#[test]
fn reads_from_disk() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&memo_db().record(0, cstr("on disk")).build()).unwrap();
    tmp.flush().unwrap();

    let db = read_database(tmp.path(), &MemoConverter).unwrap();
    assert_eq!("on disk", db.records[0].memo);

    let missing = tmp.path().with_extension("missing");
    let err = read_database(&missing, &MemoConverter).unwrap_err();
    assert!(matches!(err, PdbError::Io(_)), "got {:?}", err);
}
