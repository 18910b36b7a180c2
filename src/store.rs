//! JSON persistence adapter for user-edited form state.
//!
//! The local-storage analog of the calculator page: the capacity field and
//! load list round-trip through a small JSON file keyed by nothing but its
//! path. The engine never touches this module; the caller reads state,
//! validates it, and passes plain records in.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{LoadBank, LoadItem};

/// Persisted calculator state.
///
/// Missing fields take their defaults on load, so files written by older
/// versions keep working. In particular a stored load without a `selected`
/// flag is restored as selected, matching how entries predating the
/// selection feature behaved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    /// Battery capacity field (Wh).
    pub capacity_wh: f32,
    /// Stored load entries.
    pub loads: Vec<StoredLoad>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            capacity_wh: 500.0,
            loads: Vec::new(),
        }
    }
}

/// One persisted load entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLoad {
    /// Creation-order id from the bank that saved it.
    pub id: u64,
    /// Display label.
    pub name: String,
    /// Power draw of one unit (W).
    pub wattage_w: f32,
    /// Number of units.
    pub quantity: u32,
    /// Selection flag; absent in older files, defaults to on.
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl FormState {
    /// Captures the current capacity and load bank for saving.
    pub fn capture(capacity_wh: f32, bank: &LoadBank) -> Self {
        Self {
            capacity_wh,
            loads: bank
                .items()
                .iter()
                .map(|i| StoredLoad {
                    id: i.id,
                    name: i.name.clone(),
                    wattage_w: i.wattage_w,
                    quantity: i.quantity,
                    selected: i.selected,
                })
                .collect(),
        }
    }

    /// Rebuilds a load bank from the stored entries.
    pub fn load_bank(&self) -> LoadBank {
        LoadBank::from_items(
            self.loads
                .iter()
                .map(|s| LoadItem {
                    id: s.id,
                    name: s.name.clone(),
                    wattage_w: s.wattage_w,
                    quantity: s.quantity,
                    selected: s.selected,
                })
                .collect(),
        )
    }

    /// Parses stored state from a JSON string.
    ///
    /// Malformed JSON yields the default state rather than an error — a
    /// corrupt store must never take the calculator down with it.
    pub fn from_json_str(s: &str) -> Self {
        serde_json::from_str(s).unwrap_or_default()
    }

    /// Serializes this state as pretty-printed JSON.
    pub fn to_json_string(&self) -> String {
        // FormState contains nothing a serializer can reject
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Loads state from a file, falling back to defaults.
    ///
    /// A missing or unreadable file and malformed contents all yield the
    /// default state.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_json_str(&content),
            Err(_) => Self::default(),
        }
    }

    /// Writes state to a file as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if file creation or writing fails.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(self.to_json_string().as_bytes())?;
        file.flush()
    }
}
