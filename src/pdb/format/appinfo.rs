//! The standard category block at the start of application info.

use std::io::{Read, Seek};

use log::debug;

use crate::pdb::reader::PdbFile;
use crate::pdb::types::category::{Category, CategoryAppInfo, NUM_CATEGORIES};
use crate::pdb::types::error::Result;

/// Length of one category name slot.
pub const CATEGORY_NAME_LENGTH: usize = 16;

/// Size of the category block: rename mask, 16 names and 16 keys.
pub const CATEGORY_BLOCK_SIZE: u64 = 2 + (NUM_CATEGORIES * CATEGORY_NAME_LENGTH) as u64 + NUM_CATEGORIES as u64;

/// Reads the category block at the current position.
///
/// # Structure
/// ```text
/// [2 bytes ] Renamed categories bitmask (bit i = slot i)
/// [16 x 16 ] Category names, zero-terminated
/// [16 x 1  ] Category keys
/// ```
///
/// Slots with an empty name stay empty. All 16 keys are read even for
/// empty slots so the position ends up right after the block.
///
/// Returns the table and the number of bytes consumed.
pub fn read_categories<R: Read + Seek>(file: &mut PdbFile<R>) -> Result<(CategoryAppInfo, u64)> {
    let start = file.position();
    let renamed = file.read_u16()?;

    let mut names = Vec::with_capacity(NUM_CATEGORIES);
    for _ in 0..NUM_CATEGORIES {
        names.push(file.read_terminated_fixed_string(CATEGORY_NAME_LENGTH)?);
    }

    let mut categories = CategoryAppInfo::new();
    for (ix, name) in names.into_iter().enumerate() {
        let key = file.read_u8()?;
        if !name.is_empty() {
            let is_renamed = renamed & (1 << ix) != 0;
            categories.set(ix, Some(Category::new(name, key, is_renamed)));
        }
    }

    let consumed = file.position() - start;
    debug!("Read {} categories ({} bytes)", categories.len(), consumed);
    Ok((categories, consumed))
}
