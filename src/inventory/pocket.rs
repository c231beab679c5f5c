use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::resources::GameMode;
use crate::data::catalog::ItemCatalog;
use crate::data::schema::ItemId;

/// 背包的五个口袋
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pocket {
    Items,
    KeyItems,
    PokeBalls,
    TmHm,
    Berries,
}

impl Pocket {
    pub const ALL: [Pocket; 5] = [
        Pocket::Items,
        Pocket::KeyItems,
        Pocket::PokeBalls,
        Pocket::TmHm,
        Pocket::Berries,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// 物品表里的口袋编号：1..=5，0 为无效
    pub fn from_code(code: u8) -> Option<Pocket> {
        match code {
            1..=5 => Some(Self::ALL[code as usize - 1]),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn parse(token: &str) -> Option<Pocket> {
        match token.to_ascii_lowercase().as_str() {
            "items" | "item" => Some(Pocket::Items),
            "key" | "keyitems" | "key_items" => Some(Pocket::KeyItems),
            "balls" | "pokeballs" | "poke_balls" => Some(Pocket::PokeBalls),
            "tm" | "tmhm" | "tm_hm" => Some(Pocket::TmHm),
            "berries" | "berry" => Some(Pocket::Berries),
            other => other.parse().ok().and_then(Self::from_code),
        }
    }
}

impl fmt::Display for Pocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pocket::Items => "Items",
            Pocket::KeyItems => "Key Items",
            Pocket::PokeBalls => "Poké Balls",
            Pocket::TmHm => "TMs & HMs",
            Pocket::Berries => "Berries",
        };
        f.write_str(name)
    }
}

/// 口袋的堆叠规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PocketPolicy {
    /// 单格上限
    pub ceiling: u16,
    /// 同一物品能否占用多格
    pub allows_duplicate_slots: bool,
}

impl PocketPolicy {
    pub fn stacking(ceiling: u16) -> Self {
        Self { ceiling, allows_duplicate_slots: true }
    }

    pub fn unique(ceiling: u16) -> Self {
        Self { ceiling, allows_duplicate_slots: false }
    }
}

/// 物品所属口袋；无效编号返回 None
pub fn pocket_of(catalog: &ItemCatalog, item: ItemId) -> Option<Pocket> {
    catalog.pocket(item)
}

/// 当前存取目标是否为金字塔背包
pub fn active_store_is_pyramid(mode: &GameMode) -> bool {
    mode.uses_pyramid_bag()
}
