use bevy::prelude::*;

use crate::data::schema::ItemId;

/// 一个等级模式下的金字塔背包：物品与数量两条平行数组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidStore {
    items: Vec<ItemId>,
    quantities: Vec<u16>,
    ceiling: u16,
}

impl PyramidStore {
    pub fn new(capacity: usize, ceiling: u16) -> Self {
        Self {
            items: vec![ItemId::NONE; capacity],
            quantities: vec![0; capacity],
            ceiling,
        }
    }

    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn quantities(&self) -> &[u16] {
        &self.quantities
    }

    pub fn has_item(&self, item: ItemId, count: u16) -> bool {
        let mut count = count;
        for (_, &quantity) in self.entries().filter(|(id, _)| *id == item) {
            if quantity >= count {
                return true;
            }
            count -= quantity;
        }
        false
    }

    /// 同类格与空格一起按顺序算余量
    pub fn has_space(&self, item: ItemId, count: u16) -> bool {
        let ceiling = u32::from(self.ceiling);
        let mut count = u32::from(count);
        for (_, &quantity) in self
            .entries()
            .filter(|(id, _)| *id == item || id.is_none())
        {
            let total = u32::from(quantity) + count;
            if total <= ceiling {
                return true;
            }
            count = total - ceiling;
        }
        false
    }

    /// 在副本上放入，全部放下才提交
    pub fn add(&mut self, item: ItemId, count: u16) -> bool {
        let ceiling = self.ceiling;
        let mut count = u32::from(count);
        let mut items = self.items.clone();
        let mut quantities = self.quantities.clone();

        for (id, quantity) in items.iter().zip(quantities.iter_mut()) {
            if *id == item && *quantity < ceiling {
                count = fill(quantity, count, ceiling);
                if count == 0 {
                    break;
                }
            }
        }

        if count > 0 {
            for (id, quantity) in items.iter_mut().zip(quantities.iter_mut()) {
                if id.is_none() {
                    *id = item;
                    *quantity = 0;
                    count = fill(quantity, count, ceiling);
                    if count == 0 {
                        break;
                    }
                }
            }
        }

        if count > 0 {
            debug!("金字塔背包放不下 {count} 个 {item}");
            return false;
        }
        self.items = items;
        self.quantities = quantities;
        true
    }

    /// 光标所在格正好够数时直接扣，否则整包扫描
    pub fn remove(&mut self, item: ItemId, count: u16, cursor: usize) -> bool {
        if cursor < self.capacity()
            && self.items[cursor] == item
            && self.quantities[cursor] >= count
        {
            self.quantities[cursor] -= count;
            if self.quantities[cursor] == 0 {
                self.items[cursor] = ItemId::NONE;
            }
            return true;
        }

        let mut count = count;
        let mut items = self.items.clone();
        let mut quantities = self.quantities.clone();
        for (id, quantity) in items.iter_mut().zip(quantities.iter_mut()) {
            if *id != item {
                continue;
            }
            if *quantity >= count {
                *quantity -= count;
                count = 0;
                if *quantity == 0 {
                    *id = ItemId::NONE;
                }
            } else {
                count -= *quantity;
                *quantity = 0;
                *id = ItemId::NONE;
            }
            if count == 0 {
                break;
            }
        }

        if count > 0 {
            return false;
        }
        self.items = items;
        self.quantities = quantities;
        true
    }

    pub fn clear(&mut self) {
        self.items.fill(ItemId::NONE);
        self.quantities.fill(0);
    }

    fn entries(&self) -> impl Iterator<Item = (ItemId, &u16)> {
        self.items.iter().copied().zip(self.quantities.iter())
    }
}

/// 往一格里加，返回溢出的数量
fn fill(quantity: &mut u16, count: u32, ceiling: u16) -> u32 {
    let total = u32::from(*quantity) + count;
    if total > u32::from(ceiling) {
        *quantity = ceiling;
        total - u32::from(ceiling)
    } else {
        *quantity = total as u16;
        0
    }
}

/// 全部等级模式的金字塔背包
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidBag {
    modes: Vec<PyramidStore>,
}

impl PyramidBag {
    pub fn new(modes: usize, capacity: usize, ceiling: u16) -> Self {
        Self {
            modes: vec![PyramidStore::new(capacity, ceiling); modes],
        }
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    pub fn store(&self, mode: usize) -> Option<&PyramidStore> {
        self.modes.get(mode)
    }

    pub fn store_mut(&mut self, mode: usize) -> Option<&mut PyramidStore> {
        self.modes.get_mut(mode)
    }

    pub fn has_item(&self, mode: usize, item: ItemId, count: u16) -> bool {
        self.store(mode).is_some_and(|s| s.has_item(item, count))
    }

    pub fn has_space(&self, mode: usize, item: ItemId, count: u16) -> bool {
        self.store(mode).is_some_and(|s| s.has_space(item, count))
    }

    pub fn add(&mut self, mode: usize, item: ItemId, count: u16) -> bool {
        self.store_mut(mode).is_some_and(|s| s.add(item, count))
    }

    pub fn remove(&mut self, mode: usize, item: ItemId, count: u16, cursor: usize) -> bool {
        self.store_mut(mode)
            .is_some_and(|s| s.remove(item, count, cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ANTIDOTE, POTION};

    #[test]
    fn cursor_fast_path_only_touches_that_slot() {
        let mut store = PyramidStore::new(4, 99);
        assert!(store.add(POTION, 99));
        assert!(store.add(ANTIDOTE, 1));
        assert!(store.add(POTION, 5));
        assert_eq!(store.items(), [POTION, ANTIDOTE, POTION, ItemId::NONE]);
        // 首格也满足条件，但光标指向 2 号格
        assert!(store.remove(POTION, 5, 2));
        assert_eq!(store.items()[2], ItemId::NONE);
        assert_eq!(store.quantities()[0], 99);
    }

    #[test]
    fn scan_when_cursor_slot_does_not_match() {
        let mut store = PyramidStore::new(3, 99);
        assert!(store.add(POTION, 3));
        assert!(store.add(ANTIDOTE, 1));
        assert!(store.remove(POTION, 2, 1));
        assert_eq!(store.quantities()[0], 1);
        assert!(store.remove(POTION, 1, 99));
        assert_eq!(store.items()[0], ItemId::NONE);
    }

    #[test]
    fn failed_scan_leaves_store_unchanged() {
        let mut store = PyramidStore::new(3, 99);
        assert!(store.add(POTION, 3));
        let before = store.clone();
        assert!(!store.remove(POTION, 4, 0));
        assert_eq!(store, before);
    }

    #[test]
    fn add_splits_and_rolls_back_when_full() {
        let mut store = PyramidStore::new(2, 99);
        assert!(store.add(POTION, 150));
        assert_eq!(store.quantities(), [99, 51]);
        let before = store.clone();
        assert!(!store.has_space(POTION, 49));
        assert!(!store.add(POTION, 49));
        assert_eq!(store, before);
        assert!(store.has_space(POTION, 48));
    }

    #[test]
    fn has_item_sums_slots() {
        let mut store = PyramidStore::new(3, 99);
        assert!(store.add(POTION, 120));
        assert!(store.has_item(POTION, 120));
        assert!(!store.has_item(POTION, 121));
    }

    #[test]
    fn modes_are_independent() {
        let mut bag = PyramidBag::new(2, 10, 99);
        assert!(bag.add(0, POTION, 1));
        assert!(bag.has_item(0, POTION, 1));
        assert!(!bag.has_item(1, POTION, 1));
        assert!(!bag.add(2, POTION, 1));
        assert!(!bag.remove(1, POTION, 1, 0));
    }
}
