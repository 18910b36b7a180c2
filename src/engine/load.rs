use serde::{Deserialize, Serialize};

/// A single appliance entry counted toward the total power draw.
///
/// Items are flat value records owned by the surrounding state layer.
/// Deselected items stay in the list but contribute zero watts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadItem {
    /// Creation-order identifier, unique within one `LoadBank`.
    pub id: u64,
    /// Non-empty display label.
    pub name: String,
    /// Power draw of one unit in watts (always > 0).
    pub wattage_w: f32,
    /// Number of units (always >= 1).
    pub quantity: u32,
    /// Whether this item counts toward the total draw.
    pub selected: bool,
}

impl LoadItem {
    /// Combined draw of all units of this item, ignoring selection.
    pub fn draw_w(&self) -> f32 {
        self.wattage_w * self.quantity as f32
    }
}

/// Ordered collection of load items with creation-order ids.
///
/// The bank owns all mutation (add, remove, quantity edits, selection
/// toggles); the pure computations in [`super::runtime`] only ever borrow
/// the item slice. Invalid entries are rejected at creation time — an item
/// can never exist with `wattage_w <= 0` or `quantity < 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBank {
    items: Vec<LoadItem>,
    next_id: u64,
}

impl LoadBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a bank from previously stored items.
    ///
    /// The id counter resumes past the highest stored id so new entries
    /// never collide with restored ones.
    pub fn from_items(items: Vec<LoadItem>) -> Self {
        let next_id = items.iter().map(|i| i.id + 1).max().unwrap_or(0);
        Self { items, next_id }
    }

    /// Adds a new item, selected by default, and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty, `wattage_w <= 0`, or `quantity < 1`.
    /// User text must pass through [`crate::input::NewLoad`] first; this
    /// method only accepts already-validated values.
    pub fn add(&mut self, name: impl Into<String>, wattage_w: f32, quantity: u32) -> u64 {
        let name = name.into();
        assert!(!name.trim().is_empty(), "load name must be non-empty");
        assert!(wattage_w > 0.0, "load wattage must be > 0");
        assert!(quantity >= 1, "load quantity must be >= 1");

        let id = self.next_id;
        self.next_id += 1;
        self.items.push(LoadItem {
            id,
            name,
            wattage_w,
            quantity,
            selected: true,
        });
        id
    }

    /// Removes the item with the given id. Unknown ids are ignored.
    pub fn remove(&mut self, id: u64) {
        self.items.retain(|i| i.id != id);
    }

    /// Sets an item's quantity, clamping requests below 1 up to 1.
    pub fn set_quantity(&mut self, id: u64, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity.max(1);
        }
    }

    /// Flips an item's selection state.
    pub fn toggle_selected(&mut self, id: u64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.selected = !item.selected;
        }
    }

    /// Borrow of the full item list in creation order.
    pub fn items(&self) -> &[LoadItem] {
        &self.items
    }

    /// Number of items currently selected.
    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|i| i.selected).count()
    }

    /// Total number of items, selected or not.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the bank holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Sum of `wattage_w * quantity` over selected items only.
pub fn total_wattage(items: &[LoadItem]) -> f32 {
    items
        .iter()
        .filter(|i| i.selected)
        .map(LoadItem::draw_w)
        .sum()
}
