use std::env;
use std::process;

use chrono::NaiveDate;
use pdb_reader::mdb::{CsvTables, ScheduleTableReader};
use pdb_reader::pdb::filter::{CategoryFilter, ChainedFilter, DateRangeFilter};
use pdb_reader::pdb::types::records::{AddressField, AnyAppInfo};
use pdb_reader::pdb::{AppInfo, PdbRecord};
use pdb_reader::{AnyConverter, PdbDatabase, PdbFile, Record, Schema};

const USAGE: &str = "Usage: pdb-reader <file> [--schema <name>] [--category <name|key>] \
                     [--from <YYYY-MM-DD>] [--until <YYYY-MM-DD>] [--mdb]";

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    path: String,
    schema: Option<Schema>,
    category: Option<String>,
    from: Option<NaiveDate>,
    until: Option<NaiveDate>,
    mdb: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {}", message);
    process::exit(1);
}

fn flag_value(args: &[String], ix: usize, flag: &str) -> String {
    match args.get(ix + 1) {
        Some(value) => value.clone(),
        None => fail(format!("{} flag requires an argument.", flag)),
    }
}

fn parse_date(value: &str, flag: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .unwrap_or_else(|e| fail(format!("Invalid {} date '{}': {}", flag, value, e)))
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options::default();
    let mut ix = 1;
    while ix < args.len() {
        match args[ix].as_str() {
            "--schema" => {
                let name = flag_value(args, ix, "--schema");
                options.schema = Some(name.parse().unwrap_or_else(|e| fail(e)));
                ix += 1;
            }
            "--category" => {
                options.category = Some(flag_value(args, ix, "--category"));
                ix += 1;
            }
            "--from" => {
                options.from = Some(parse_date(&flag_value(args, ix, "--from"), "--from"));
                ix += 1;
            }
            "--until" => {
                options.until = Some(parse_date(&flag_value(args, ix, "--until"), "--until"));
                ix += 1;
            }
            "--mdb" => options.mdb = true,
            flag if flag.starts_with("--") => fail(format!("Unknown option {}\n{}", flag, USAGE)),
            path => options.path = path.to_owned(),
        }
        ix += 1;
    }
    if options.path.is_empty() {
        eprintln!("{}", USAGE);
        process::exit(1);
    }
    options
}

fn read(options: &Options) -> pdb_reader::Result<PdbDatabase<Record, AnyAppInfo>> {
    if options.mdb {
        let db = ScheduleTableReader::new(CsvTables::open(&options.path)?).read()?;
        return Ok(PdbDatabase {
            header: db.header,
            app_info: db.app_info.map(AnyAppInfo::Categories),
            records: db.records.into_iter().map(Record::from).collect(),
        });
    }

    let converter = match options.schema {
        Some(schema) => AnyConverter::with_schema(schema),
        None => AnyConverter::new(),
    };
    PdbFile::open(&options.path)?.read_database(&converter)
}

fn build_filter(options: &Options, db: &PdbDatabase<Record, AnyAppInfo>) -> pdb_reader::Result<ChainedFilter<Record>> {
    let mut filter = ChainedFilter::new();
    if let Some(name) = &options.category {
        let categories = db
            .app_info
            .as_ref()
            .and_then(AppInfo::categories)
            .ok_or_else(|| pdb_reader::PdbError::NoSuchCategory(name.clone()))?;
        filter.push(CategoryFilter::by_name_or_key(categories, name)?);
    }
    if options.from.is_some() || options.until.is_some() {
        filter.push(DateRangeFilter::new(options.from, options.until)?);
    }
    Ok(filter)
}

fn describe(record: &Record) -> String {
    match record {
        Record::Address(r) => {
            let name: Vec<&str> = [AddressField::FirstName, AddressField::LastName, AddressField::Company]
                .into_iter()
                .filter_map(|f| r.field(f))
                .collect();
            format!("address: {}", name.join(" "))
        }
        Record::Memo(r) => format!("memo: {}", r.memo.lines().next().unwrap_or("")),
        Record::Todo(r) => format!(
            "todo: [{}] prio {} due {} {}",
            if r.completed { "x" } else { " " },
            r.priority,
            r.due.map(|d| d.to_string()).unwrap_or_else(|| "-".to_owned()),
            r.description
        ),
        Record::Notepad(r) => format!(
            "notepad: {} ({} image bytes)",
            r.title.as_deref().unwrap_or("<untitled>"),
            r.image.len()
        ),
        Record::Schedule(r) => {
            let time = match (r.start_time, r.end_time) {
                (Some(start), Some(end)) => format!("{}-{}", start, end),
                (Some(start), None) => start.to_string(),
                _ => "all day".to_owned(),
            };
            let mut line = format!("event: {} {} {}", r.date, time, r.description.as_deref().unwrap_or(""));
            for rule in r.rule_syntax() {
                line.push_str("\n      ");
                line.push_str(&rule);
            }
            line
        }
        Record::Raw(r) => format!("raw: {} bytes", r.data.len()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    let db = match read(&options) {
        Ok(db) => db,
        Err(e) if e.is_wrong_format() => fail(format!("{} does not match the requested schema\n  {}", options.path, e)),
        Err(e) => fail(format!("Failed to read {}\n  {}", options.path, e)),
    };
    let filter = build_filter(&options, &db).unwrap_or_else(|e| fail(e));

    let header = &db.header;
    println!("Database: {}", header.name);
    println!("  Type/Creator: {}/{}", header.db_type, header.creator);
    println!("  Version: {}", header.version);
    println!("  Created: {}", header.created);
    println!("  Modified: {}", header.modified);
    if let Some(backup) = header.backed_up {
        println!("  Backed up: {}", backup);
    }

    if let Some(categories) = db.categories() {
        println!("\nCategories:");
        for (ix, category) in categories.iter() {
            println!("  {:2}. {} (key {})", ix, category.name, category.key);
        }
    }

    println!("\nRecords:");
    let mut shown = 0;
    for (ix, record) in db.filtered(&filter).enumerate() {
        let secret = if record.is_secret() { " [secret]" } else { "" };
        println!("  {:4}. {}{}", ix + 1, describe(record), secret);
        shown += 1;
    }
    println!("\n{} of {} records shown", shown, db.len());
}
