//! Freeform moodboard canvas
//!
//! A flat scene of items ordered by `z_index`. The topmost item at a point wins
//! hit-testing; rotated items are tested in their own frame.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest width or height an item can be resized to
pub const MIN_ITEM_SIZE: f64 = 100.0;
/// Offset applied to duplicated items
pub const DUPLICATE_OFFSET: f64 = 30.0;

#[derive(Debug, Error, PartialEq)]
pub enum MoodboardError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Item is locked: {0}")]
    ItemLocked(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Material,
    Image,
    Swatch,
    Note,
}

impl ItemKind {
    fn default_size(self) -> (f64, f64) {
        match self {
            ItemKind::Note => (240.0, 160.0),
            _ => (280.0, 280.0),
        }
    }
}

/// Content of a new item; geometry is assigned by the board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodboardItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(flatten)]
    pub content: ItemContent,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, clockwise
    #[serde(default)]
    pub rotation: f64,
    pub z_index: i64,
    #[serde(default)]
    pub locked: bool,
}

impl MoodboardItem {
    /// Whether a canvas point falls inside the item
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let cx = self.x + self.width / 2.0;
        let cy = self.y + self.height / 2.0;

        // Undo the item's rotation around its center
        let theta = -self.rotation.to_radians();
        let (sin, cos) = theta.sin_cos();
        let dx = px - cx;
        let dy = py - cy;
        let lx = dx * cos - dy * sin;
        let ly = dx * sin + dy * cos;

        lx.abs() <= self.width / 2.0 && ly.abs() <= self.height / 2.0
    }
}

/// Partial update applied by `Board::update_item`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub locked: Option<bool>,
    pub content: Option<ItemContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<MoodboardItem>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip)]
    selected: Option<String>,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: format!("board-{}", uuid::Uuid::new_v4()),
            name: name.into(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    pub fn item(&self, id: &str) -> Option<&MoodboardItem> {
        self.items.iter().find(|i| i.id == id)
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut MoodboardItem, MoodboardError> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| MoodboardError::ItemNotFound(id.to_string()))
    }

    fn max_z(&self) -> i64 {
        self.items.iter().map(|i| i.z_index).max().unwrap_or(0)
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Place a new item on top of the stack and select it
    pub fn add_item(&mut self, kind: ItemKind, content: ItemContent, x: f64, y: f64) -> String {
        let (width, height) = kind.default_size();
        let item = MoodboardItem {
            id: format!("item-{}", uuid::Uuid::new_v4()),
            kind,
            content,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z_index: self.max_z() + 1,
            locked: false,
        };
        let id = item.id.clone();

        self.items.push(item);
        self.selected = Some(id.clone());
        self.touch();
        id
    }

    pub fn update_item(&mut self, id: &str, update: ItemUpdate) -> Result<(), MoodboardError> {
        let item = self.item_mut(id)?;

        if let Some(x) = update.x { item.x = x; }
        if let Some(y) = update.y { item.y = y; }
        if let Some(w) = update.width { item.width = w.max(MIN_ITEM_SIZE); }
        if let Some(h) = update.height { item.height = h.max(MIN_ITEM_SIZE); }
        if let Some(r) = update.rotation { item.rotation = r; }
        if let Some(l) = update.locked { item.locked = l; }
        if let Some(c) = update.content { item.content = c; }

        self.touch();
        Ok(())
    }

    /// Remove an item and clear the selection
    pub fn delete_item(&mut self, id: &str) -> Result<MoodboardItem, MoodboardError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| MoodboardError::ItemNotFound(id.to_string()))?;

        let removed = self.items.remove(pos);
        self.selected = None;
        self.touch();
        Ok(removed)
    }

    /// Copy an item with an offset, on top of the stack
    pub fn duplicate_item(&mut self, id: &str) -> Result<String, MoodboardError> {
        let source = self
            .item(id)
            .cloned()
            .ok_or_else(|| MoodboardError::ItemNotFound(id.to_string()))?;

        let copy = MoodboardItem {
            id: format!("item-{}", uuid::Uuid::new_v4()),
            x: source.x + DUPLICATE_OFFSET,
            y: source.y + DUPLICATE_OFFSET,
            z_index: self.max_z() + 1,
            locked: false,
            ..source
        };
        let new_id = copy.id.clone();

        self.items.push(copy);
        self.selected = Some(new_id.clone());
        self.touch();
        Ok(new_id)
    }

    pub fn bring_to_front(&mut self, id: &str) -> Result<(), MoodboardError> {
        let top = self.max_z();
        self.item_mut(id)?.z_index = top + 1;
        self.touch();
        Ok(())
    }

    /// Drag an item by a pointer delta
    pub fn move_by(&mut self, id: &str, dx: f64, dy: f64) -> Result<(), MoodboardError> {
        let item = self.item_mut(id)?;
        if item.locked {
            return Err(MoodboardError::ItemLocked(id.to_string()));
        }

        item.x += dx;
        item.y += dy;
        self.touch();
        Ok(())
    }

    /// Drag the bottom-right handle by a pointer delta
    pub fn resize_by(&mut self, id: &str, dw: f64, dh: f64) -> Result<(), MoodboardError> {
        let item = self.item_mut(id)?;
        if item.locked {
            return Err(MoodboardError::ItemLocked(id.to_string()));
        }

        item.width = (item.width + dw).max(MIN_ITEM_SIZE);
        item.height = (item.height + dh).max(MIN_ITEM_SIZE);
        self.touch();
        Ok(())
    }

    /// Topmost item under a canvas point
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&MoodboardItem> {
        self.items
            .iter()
            .filter(|i| i.contains(x, y))
            .max_by_key(|i| i.z_index)
    }

    /// Select whatever is under the pointer; empty canvas clears the selection
    pub fn click(&mut self, x: f64, y: f64) -> Option<&str> {
        self.selected = self.hit_test(x, y).map(|i| i.id.clone());
        self.selected.as_deref()
    }
}
