//! Category tables shared by all categorized schemas.

/// Number of category slots in a PalmOS category table.
pub const NUM_CATEGORIES: usize = 16;

/// A single category definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    /// Stable key of the category, independent of its slot.
    pub key: u8,
    /// The user renamed this category.
    pub renamed: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, key: u8, renamed: bool) -> Self {
        Self {
            name: name.into(),
            key,
            renamed,
        }
    }
}

/// The standard application info block: a table of 16 category slots.
///
/// The slot position is the category index referenced by record
/// attributes. Unused slots are `None`, so indexes stay stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryAppInfo {
    slots: [Option<Category>; NUM_CATEGORIES],
}

impl CategoryAppInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a category into a slot. Indexes of 16 and above are ignored.
    pub fn set(&mut self, index: usize, category: Option<Category>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = category;
        }
    }

    /// Gets the category at a slot, `None` for empty or out-of-range slots.
    pub fn get(&self, index: usize) -> Option<&Category> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Resolves a slot to its category name.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.get(index).map(|c| c.name.as_str())
    }

    /// Iterates over all defined categories with their slot index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Category)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(ix, slot)| slot.as_ref().map(|c| (ix, c)))
    }

    /// Number of defined categories.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the slot of a category by its name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.iter()
            .find(|(_, c)| c.name.to_lowercase() == wanted)
            .map(|(ix, _)| ix)
    }

    /// Finds the slot of a category by its key.
    pub fn find_by_key(&self, key: u8) -> Option<usize> {
        self.iter().find(|(_, c)| c.key == key).map(|(ix, _)| ix)
    }

    /// Gets a category by its key.
    pub fn by_key(&self, key: u8) -> Option<&Category> {
        self.find_by_key(key).and_then(|ix| self.get(ix))
    }
}

/// Access to the category table of any application info block.
///
/// Filters and the category split work on every database whose app info
/// carries categories.
pub trait AppInfo {
    fn categories(&self) -> Option<&CategoryAppInfo>;
}

impl AppInfo for CategoryAppInfo {
    fn categories(&self) -> Option<&CategoryAppInfo> {
        Some(self)
    }
}

impl AppInfo for () {
    fn categories(&self) -> Option<&CategoryAppInfo> {
        None
    }
}
