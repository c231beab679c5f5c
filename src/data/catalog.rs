use bevy::prelude::*;

use super::schema::{ItemEntry, ItemId, ItemList};
use crate::inventory::pocket::Pocket;

/// 按编号索引的只读物品表
///
/// 越界编号一律当作 `ItemId::NONE` 处理，返回 0 号条目的数据。
#[derive(Resource, Debug, Clone)]
pub struct ItemCatalog {
    entries: Vec<ItemEntry>,
}

impl ItemCatalog {
    /// 编号可以稀疏，空洞用无口袋的占位条目补齐
    pub fn from_entries(items: impl IntoIterator<Item = ItemEntry>) -> Self {
        let mut entries: Vec<ItemEntry> = vec![ItemEntry::default()];
        for item in items {
            let idx = item.id.0 as usize;
            if idx >= entries.len() {
                entries.resize_with(idx + 1, ItemEntry::default);
            }
            if item.id.is_none() {
                warn!("忽略编号为 0 的物品 {}", item.name);
                continue;
            }
            entries[idx] = item;
        }
        // 占位条目自身的编号要和下标一致
        for (idx, entry) in entries.iter_mut().enumerate() {
            entry.id = ItemId(idx as u16);
        }
        Self { entries }
    }

    pub fn from_list(list: &ItemList) -> Self {
        Self::from_entries(list.items.iter().cloned())
    }

    /// 物品总数（含 0 号）
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    fn sanitize(&self, id: ItemId) -> ItemId {
        if id.0 as usize >= self.entries.len() {
            ItemId::NONE
        } else {
            id
        }
    }

    pub fn entry(&self, id: ItemId) -> &ItemEntry {
        &self.entries[self.sanitize(id).0 as usize]
    }

    pub fn pocket(&self, id: ItemId) -> Option<Pocket> {
        self.entry(id).pocket
    }

    pub fn name(&self, id: ItemId) -> &str {
        &self.entry(id).name
    }

    pub fn price(&self, id: ItemId) -> u16 {
        self.entry(id).price
    }

    pub fn hold_effect(&self, id: ItemId) -> u8 {
        self.entry(id).hold_effect
    }

    pub fn hold_effect_param(&self, id: ItemId) -> u8 {
        self.entry(id).hold_effect_param
    }

    pub fn importance(&self, id: ItemId) -> u8 {
        self.entry(id).importance
    }

    pub fn description(&self, id: ItemId) -> &str {
        &self.entry(id).description
    }

    /// 按名称（忽略大小写）或数字编号查找
    pub fn find(&self, token: &str) -> Option<ItemId> {
        if let Ok(n) = token.parse::<u16>() {
            let id = self.sanitize(ItemId(n));
            return (!id.is_none()).then_some(id);
        }
        self.entries
            .iter()
            .skip(1)
            .find(|e| e.name.eq_ignore_ascii_case(token))
            .map(|e| e.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemEntry> {
        self.entries.iter().skip(1).filter(|e| e.pocket.is_some())
    }

    /// 属于某个口袋的全部物品编号
    pub fn ids_in_pocket(&self, pocket: Pocket) -> impl Iterator<Item = ItemId> + '_ {
        self.iter().filter(move |e| e.pocket == Some(pocket)).map(|e| e.id)
    }
}
