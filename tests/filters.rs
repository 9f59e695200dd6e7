use chrono::NaiveDate;
use pdb_reader::pdb::codec::date::ShortDate;
use pdb_reader::pdb::filter::{CategoryFilter, ChainedFilter, DateRangeFilter, RecordFilter};
use pdb_reader::pdb::types::models::db_attr;
use pdb_reader::pdb::types::records::{MemoRecord, ScheduleRecord, TodoRecord};
use pdb_reader::pdb::{AnyAppInfo, Category, CategoryAppInfo, PdbRecord, RecordAttributes};
use pdb_reader::{DatabaseHeader, PdbDatabase, PdbError, Record};

fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).unwrap()
}

fn header() -> DatabaseHeader {
    let stamp = day(2009, 7, 29).and_hms_opt(12, 0, 0).unwrap();
    DatabaseHeader {
        name: "Mixed".to_owned(),
        attributes: db_attr::BACKUP,
        version: 0,
        created: stamp,
        modified: stamp,
        backed_up: None,
        modification_number: 0,
        app_info_offset: 0,
        db_type: "DATA".to_owned(),
        creator: "test".to_owned(),
    }
}

fn categories() -> CategoryAppInfo {
    let mut categories = CategoryAppInfo::new();
    categories.set(0, Some(Category::new("Unfiled", 0, false)));
    categories.set(1, Some(Category::new("Business", 10, true)));
    categories.set(3, Some(Category::new("Personal", 12, false)));
    categories
}

fn event(category: u8, date: (u16, u8, u8)) -> Record {
    ScheduleRecord::new(RecordAttributes(category), ShortDate::new(date.0, date.1, date.2)).into()
}

fn memo(category: u8, text: &str) -> Record {
    MemoRecord {
        attributes: RecordAttributes(category),
        memo: text.to_owned(),
    }
    .into()
}

fn todo(category: u8, due: Option<(u16, u8, u8)>) -> Record {
    TodoRecord {
        attributes: RecordAttributes(category),
        due: due.map(|(y, m, d)| ShortDate::new(y, m, d)),
        priority: 1,
        completed: false,
        description: "task".to_owned(),
        note: None,
    }
    .into()
}

/// Two business events around August 2009, a personal one inside it, an
/// undated memo, an undated to-do and an event in an undefined slot.
fn database() -> PdbDatabase<Record, AnyAppInfo> {
    PdbDatabase {
        header: header(),
        app_info: Some(AnyAppInfo::Categories(categories())),
        records: vec![
            event(1, (2009, 7, 31)),
            event(1, (2009, 8, 1)),
            event(3, (2009, 8, 31)),
            memo(1, "notes"),
            todo(0, None),
            event(5, (2009, 9, 1)),
        ],
    }
}

fn selected<F: RecordFilter<Record>>(db: &PdbDatabase<Record, AnyAppInfo>, filter: &F) -> Vec<usize> {
    db.records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.accepts(r))
        .map(|(ix, _)| ix)
        .collect()
}

#[test]
fn category_by_name() {
    let db = database();
    let filter = CategoryFilter::by_name(db.categories().unwrap(), "business").unwrap();
    assert_eq!(1, filter.index());
    assert_eq!(vec![0, 1, 3], selected(&db, &filter));
    assert_eq!(3, db.filtered(&filter).count());
}

#[test]
fn category_by_key() {
    let db = database();
    let filter = CategoryFilter::by_key(db.categories().unwrap(), 12).unwrap();
    assert_eq!(3, filter.index());
    assert_eq!(vec![2], selected(&db, &filter));

    let err = CategoryFilter::by_key(db.categories().unwrap(), 11).unwrap_err();
    assert!(matches!(err, PdbError::NoSuchCategory(_)), "got {:?}", err);
}

#[test]
fn category_by_name_or_key() {
    let db = database();
    let categories = db.categories().unwrap();
    assert_eq!(3, CategoryFilter::by_name_or_key(categories, "personal").unwrap().index());
    assert_eq!(3, CategoryFilter::by_name_or_key(categories, "12").unwrap().index());
    assert_eq!(1, CategoryFilter::by_name_or_key(categories, "10").unwrap().index());

    let err = CategoryFilter::by_name_or_key(categories, "11").unwrap_err();
    assert!(matches!(err, PdbError::NoSuchCategory(_)), "got {:?}", err);
    let err = CategoryFilter::by_name_or_key(categories, "Travel").unwrap_err();
    assert!(matches!(&err, PdbError::NoSuchCategory(name) if name == "Travel"), "got {:?}", err);
}

#[test]
fn unknown_category_name() {
    let db = database();
    let err = CategoryFilter::by_name(db.categories().unwrap(), "Travel").unwrap_err();
    assert!(matches!(&err, PdbError::NoSuchCategory(name) if name == "Travel"), "got {:?}", err);
}

#[test]
fn date_range_must_be_usable() {
    assert!(matches!(DateRangeFilter::new(None, None), Err(PdbError::InvalidDateRange(_))));
    assert!(matches!(
        DateRangeFilter::new(Some(day(2009, 9, 1)), Some(day(2009, 8, 1))),
        Err(PdbError::InvalidDateRange(_))
    ));

    let empty = DateRangeFilter::new(Some(day(2009, 8, 1)), Some(day(2009, 8, 1))).unwrap();
    assert!(selected(&database(), &empty).is_empty(), "an empty range selects nothing");
}

#[test]
fn date_range_includes_start_and_excludes_end() {
    let db = database();
    let august = DateRangeFilter::new(Some(day(2009, 8, 1)), Some(day(2009, 9, 1))).unwrap();
    assert_eq!(Some(day(2009, 8, 1)), august.from());
    assert_eq!(Some(day(2009, 9, 1)), august.until());
    assert_eq!(vec![1, 2], selected(&db, &august), "undated records need an open end");
}

#[test]
fn open_ended_ranges() {
    let db = database();
    let since = DateRangeFilter::new(Some(day(2009, 8, 1)), None).unwrap();
    assert_eq!(vec![1, 2, 3, 4, 5], selected(&db, &since), "undated records pass without an end");

    let before = DateRangeFilter::new(None, Some(day(2009, 8, 1))).unwrap();
    assert_eq!(vec![0], selected(&db, &before));
}

#[test]
fn to_do_due_dates_are_filtered() {
    let records = vec![todo(0, Some((2009, 8, 15))), todo(0, Some((2010, 1, 1)))];
    let db = PdbDatabase {
        header: header(),
        app_info: None::<AnyAppInfo>,
        records,
    };
    let august = DateRangeFilter::new(Some(day(2009, 8, 1)), Some(day(2009, 9, 1))).unwrap();
    assert_eq!(vec![0], selected(&db, &august));
}

#[test]
fn chained_filters() {
    let db = database();
    let business = CategoryFilter::by_name(db.categories().unwrap(), "Business").unwrap();
    let august = DateRangeFilter::new(Some(day(2009, 8, 1)), Some(day(2009, 9, 1))).unwrap();

    let empty = ChainedFilter::<Record>::new();
    assert!(empty.is_empty());
    assert_eq!(db.len(), db.filtered(&empty).count(), "an empty chain accepts everything");

    let chain = ChainedFilter::new().with(business).with(august);
    assert_eq!(2, chain.len());
    assert_eq!(vec![1], selected(&db, &chain));

    let mut chain = ChainedFilter::default();
    chain.push(CategoryFilter::by_index(3));
    assert_eq!(vec![2], selected(&db, &chain));
}

#[test]
fn filters_work_on_single_schema_databases() {
    let records = vec![
        ScheduleRecord::new(RecordAttributes(0x11), ShortDate::new(2009, 8, 2)),
        ScheduleRecord::new(RecordAttributes(0x00), ShortDate::new(2009, 8, 3)),
    ];
    let db = PdbDatabase {
        header: header(),
        app_info: Some(categories()),
        records,
    };
    let business = CategoryFilter::by_name(db.categories().unwrap(), "BUSINESS").unwrap();
    let found: Vec<&ScheduleRecord> = db.filtered(&business).collect();
    assert_eq!(1, found.len());
    assert!(found[0].is_secret());
}

#[test]
fn split_by_category() {
    let db = database();
    let groups = db.split_by_category();

    let summary: Vec<(usize, &str, usize)> = groups
        .iter()
        .map(|g| (g.index, g.category.name.as_str(), g.records.len()))
        .collect();
    assert_eq!(vec![(0, "Unfiled", 1), (1, "Business", 3), (3, "Personal", 1)], summary);
    assert_eq!(
        5,
        groups.iter().map(|g| g.records.len()).sum::<usize>(),
        "the record in undefined slot 5 is in no group"
    );
    assert!(groups[1].category.renamed);
}

#[test]
fn split_without_categories() {
    let db = PdbDatabase {
        header: header(),
        app_info: None::<AnyAppInfo>,
        records: vec![memo(0, "loose")],
    };
    assert!(db.split_by_category().is_empty());
    assert!(db.header.has_attribute(db_attr::BACKUP));
    assert!(!db.header.has_attribute(db_attr::READONLY));
}
