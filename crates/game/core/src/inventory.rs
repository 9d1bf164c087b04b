//! Weapon and magic inventories.
//!
//! Each inventory is a bounded insertion-ordered buffer: acquiring into a full
//! buffer evicts the oldest item. [`Arsenal`] pairs the two buffers with the
//! active mode that slot-selection keys address.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::item::{Item, ItemCategory};

/// One bounded inventory with an optional active slot.
///
/// `active` is `Some(i)` with `i < len` whenever the inventory is non-empty
/// and `None` when it is empty.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    items: ArrayVec<Item, { GameConfig::MAX_SLOTS }>,
    active: Option<usize>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item, evicting the oldest when full, and makes it active.
    ///
    /// Returns the evicted item, if any.
    pub fn acquire(&mut self, item: Item) -> Option<Item> {
        let evicted = if self.items.is_full() {
            self.active = self.active.map(|index| index.saturating_sub(1));
            Some(self.items.remove(0))
        } else {
            None
        };
        self.items.push(item);
        self.active = Some(self.items.len() - 1);
        evicted
    }

    /// Makes `index` active. Returns `false` (and changes nothing) when out of bounds.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Removes the item at `index`, keeping the active slot in range.
    pub fn consume(&mut self, index: usize) -> Option<Item> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.active = match (self.active, self.items.len()) {
            (_, 0) => None,
            (Some(active), _) if active > index => Some(active - 1),
            (Some(active), len) => Some(active.min(len - 1)),
            (None, len) => Some(len - 1),
        };
        Some(item)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_item(&self) -> Option<&Item> {
        self.active.and_then(|index| self.items.get(index))
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.active = None;
    }
}

/// Full inventory state handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySnapshot {
    pub weapons: Vec<Item>,
    pub magics: Vec<Item>,
    pub active_weapon: Option<usize>,
    pub active_magic: Option<usize>,
    pub active_mode: ItemCategory,
}

/// Both inventories plus the active mode.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arsenal {
    weapons: Inventory,
    magics: Inventory,
    active_mode: ItemCategory,
}

impl Arsenal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes the item by kind and switches the active mode to its inventory.
    pub fn acquire(&mut self, item: Item) -> Option<Item> {
        let category = item.category();
        self.active_mode = category;
        self.inventory_mut(category).acquire(item)
    }

    /// Selects a slot; out-of-bounds selections are ignored entirely.
    pub fn select(&mut self, category: ItemCategory, index: usize) -> bool {
        let selected = self.inventory_mut(category).select(index);
        if selected {
            self.active_mode = category;
        }
        selected
    }

    pub fn consume(&mut self, category: ItemCategory, index: usize) -> Option<Item> {
        self.inventory_mut(category).consume(index)
    }

    /// Active item of the active mode, `None` meaning bare hand.
    pub fn current(&self) -> Option<(usize, &Item)> {
        let inventory = self.inventory(self.active_mode);
        let index = inventory.active_index()?;
        inventory.get(index).map(|item| (index, item))
    }

    pub fn active_mode(&self) -> ItemCategory {
        self.active_mode
    }

    pub fn inventory(&self, category: ItemCategory) -> &Inventory {
        match category {
            ItemCategory::Weapon => &self.weapons,
            ItemCategory::Magic => &self.magics,
        }
    }

    fn inventory_mut(&mut self, category: ItemCategory) -> &mut Inventory {
        match category {
            ItemCategory::Weapon => &mut self.weapons,
            ItemCategory::Magic => &mut self.magics,
        }
    }

    pub fn weapons(&self) -> &Inventory {
        &self.weapons
    }

    pub fn magics(&self) -> &Inventory {
        &self.magics
    }

    pub fn clear(&mut self) {
        self.weapons.clear();
        self.magics.clear();
        self.active_mode = ItemCategory::Weapon;
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            weapons: self.weapons.items().to_vec(),
            magics: self.magics.items().to_vec(),
            active_weapon: self.weapons.active_index(),
            active_magic: self.magics.active_index(),
            active_mode: self.active_mode,
        }
    }
}
