//! Record selection: by category, by date range, or both.

use chrono::NaiveDate;
use log::debug;

use super::types::category::{AppInfo, Category, CategoryAppInfo};
use super::types::error::{PdbError, Result};
use super::types::models::{PdbDatabase, PdbRecord};
use super::types::records::DatedRecord;

/// Decides whether a record is selected.
pub trait RecordFilter<T> {
    fn accepts(&self, record: &T) -> bool;
}

/// Selects records of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    index: usize,
}

impl CategoryFilter {
    pub fn by_index(index: usize) -> Self {
        Self { index }
    }

    /// Looks up the category by name, ignoring case.
    ///
    /// # Errors
    /// [`PdbError::NoSuchCategory`] if no category has that name.
    pub fn by_name(categories: &CategoryAppInfo, name: &str) -> Result<Self> {
        let index = categories
            .find_by_name(name)
            .ok_or_else(|| PdbError::NoSuchCategory(name.to_owned()))?;
        debug!("Category filter '{}' -> index {}", name, index);
        Ok(Self { index })
    }

    /// Looks up the category by its stable key.
    ///
    /// # Errors
    /// [`PdbError::NoSuchCategory`] if no category has that key.
    pub fn by_key(categories: &CategoryAppInfo, key: u8) -> Result<Self> {
        let index = categories
            .find_by_key(key)
            .ok_or_else(|| PdbError::NoSuchCategory(format!("key {}", key)))?;
        Ok(Self { index })
    }

    /// Looks up the category by name, or by key if `input` is a number
    /// that names no category.
    ///
    /// # Errors
    /// [`PdbError::NoSuchCategory`] if neither lookup finds a category.
    pub fn by_name_or_key(categories: &CategoryAppInfo, input: &str) -> Result<Self> {
        match (Self::by_name(categories, input), input.trim().parse::<u8>()) {
            (Err(_), Ok(key)) => Self::by_key(categories, key),
            (found, _) => found,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T: PdbRecord> RecordFilter<T> for CategoryFilter {
    fn accepts(&self, record: &T) -> bool {
        record.category_index() == self.index
    }
}

/// Selects records dated within `[from, until)`.
///
/// Records without a date pass only if there is no end bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeFilter {
    from: Option<NaiveDate>,
    until: Option<NaiveDate>,
}

impl DateRangeFilter {
    /// # Errors
    /// [`PdbError::InvalidDateRange`] if both bounds are missing or the
    /// range ends before it starts.
    pub fn new(from: Option<NaiveDate>, until: Option<NaiveDate>) -> Result<Self> {
        match (from, until) {
            (None, None) => Err(PdbError::InvalidDateRange("no date range set".to_owned())),
            (Some(from), Some(until)) if until < from => Err(PdbError::InvalidDateRange(format!(
                "range ends ({}) before it starts ({})",
                until, from
            ))),
            _ => Ok(Self { from, until }),
        }
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn until(&self) -> Option<NaiveDate> {
        self.until
    }
}

impl<T: DatedRecord> RecordFilter<T> for DateRangeFilter {
    fn accepts(&self, record: &T) -> bool {
        let Some(date) = record.record_date() else {
            return self.until.is_none();
        };
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.until.is_some_and(|until| date >= until) {
            return false;
        }
        true
    }
}

/// Selects records every contained filter accepts.
///
/// An empty chain accepts everything.
pub struct ChainedFilter<T> {
    filters: Vec<Box<dyn RecordFilter<T>>>,
}

impl<T> ChainedFilter<T> {
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn with(mut self, filter: impl RecordFilter<T> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn push(&mut self, filter: impl RecordFilter<T> + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<T> Default for ChainedFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecordFilter<T> for ChainedFilter<T> {
    fn accepts(&self, record: &T) -> bool {
        self.filters.iter().all(|f| f.accepts(record))
    }
}

/// Records of one category, as produced by [`PdbDatabase::split_by_category`].
#[derive(Debug)]
pub struct CategoryGroup<'a, T> {
    pub index: usize,
    pub category: &'a Category,
    pub records: Vec<&'a T>,
}

impl<T, U> PdbDatabase<T, U> {
    /// Iterates over the records the filter accepts, in record order.
    pub fn filtered<'a, F>(&'a self, filter: &'a F) -> impl Iterator<Item = &'a T> + 'a
    where
        F: RecordFilter<T> + ?Sized,
    {
        self.records.iter().filter(move |r| filter.accepts(r))
    }
}

impl<T: PdbRecord, U: AppInfo> PdbDatabase<T, U> {
    /// Groups records by category, one group per defined category.
    ///
    /// Groups may be empty. Records of undefined categories are not part
    /// of any group. Without a category table the result is empty.
    pub fn split_by_category(&self) -> Vec<CategoryGroup<'_, T>> {
        let Some(categories) = self.categories() else {
            return Vec::new();
        };
        categories
            .iter()
            .map(|(index, category)| CategoryGroup {
                index,
                category,
                records: self
                    .records
                    .iter()
                    .filter(|r| r.category_index() == index)
                    .collect(),
            })
            .collect()
    }
}
