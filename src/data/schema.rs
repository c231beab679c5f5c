use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inventory::pocket::Pocket;

/// 物品编号，0 表示“无物品”
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u16);

impl ItemId {
    pub const NONE: ItemId = ItemId(0);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// items.ron 中的一条静态物品记录
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemEntry {
    pub id: ItemId,
    pub name: String,
    #[serde(default)] pub pocket: Option<Pocket>,
    #[serde(default)] pub price: u16,
    #[serde(default)] pub hold_effect: u8,
    #[serde(default)] pub hold_effect_param: u8,
    #[serde(default)] pub importance: u8,
    #[serde(default)] pub description: String,
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct ItemList {
    pub items: Vec<ItemEntry>,
}
