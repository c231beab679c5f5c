use bevy::prelude::*;

use super::maintenance;
use super::slot::Slot;
use crate::data::schema::ItemId;

/// PC 物品仓库：不分口袋，数量明文，统一上限
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcStorage {
    slots: Vec<Slot>,
    ceiling: u16,
}

impl PcStorage {
    pub fn new(capacity: usize, ceiling: u16) -> Self {
        Self {
            slots: vec![Slot::default(); capacity],
            ceiling,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn ceiling(&self) -> u16 {
        self.ceiling
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }

    /// 只看单格：某一格的数量够 `count` 才算有
    pub fn has_item(&self, item: ItemId, count: u16) -> bool {
        self.slots
            .iter()
            .any(|s| s.item == item && s.quantity >= count)
    }

    pub fn has_space(&self, item: ItemId, count: u16) -> bool {
        let ceiling = u32::from(self.ceiling);
        let room: u32 = self
            .slots
            .iter()
            .map(|s| {
                if s.is_empty() {
                    ceiling
                } else if s.item == item {
                    ceiling.saturating_sub(u32::from(s.quantity))
                } else {
                    0
                }
            })
            .sum();
        room >= u32::from(count)
    }

    /// 先补满已有格，再占空格
    ///
    /// 放不下时已补上的部分保留，只丢掉找不到位置的余数。
    pub fn add(&mut self, item: ItemId, count: u16) -> bool {
        let ceiling = u32::from(self.ceiling);
        let mut count = u32::from(count);

        for slot in self.slots.iter_mut().filter(|s| s.item == item) {
            let owned = u32::from(slot.quantity);
            if owned + count <= ceiling {
                slot.quantity = (owned + count) as u16;
                return true;
            }
            count = owned + count - ceiling;
            slot.quantity = self.ceiling;
        }

        if count == 0 {
            return true;
        }

        for slot in self.slots.iter_mut().filter(|s| s.is_empty()) {
            let put = count.min(ceiling);
            *slot = Slot::new(item, put as u16);
            count -= put;
            if count == 0 {
                return true;
            }
        }

        debug!("PC 已满，{count} 个 {item} 没有放下");
        false
    }

    /// 按位置扣数量；扣空后清格并压缩
    pub fn remove(&mut self, index: usize, count: u16) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.is_empty() {
            return false;
        }
        slot.quantity = slot.quantity.saturating_sub(count);
        if slot.quantity == 0 {
            slot.item = ItemId::NONE;
            self.compact();
        }
        true
    }

    pub fn count_used_slots(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn compact(&mut self) {
        maintenance::compact_by(&mut self.slots, Slot::is_empty);
    }

    pub fn move_slot(&mut self, from: usize, to: usize) -> bool {
        maintenance::move_slot(&mut self.slots, from, to)
    }

    pub fn clear(&mut self) {
        self.slots.fill(Slot::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ANTIDOTE, POTION, SUPER_POTION};

    #[test]
    fn add_stacks_then_opens_slots() {
        let mut pc = PcStorage::new(3, 999);
        assert!(pc.add(POTION, 500));
        assert!(pc.add(POTION, 600));
        assert_eq!(pc.slot(0), Some(Slot::new(POTION, 999)));
        assert_eq!(pc.slot(1), Some(Slot::new(POTION, 101)));
        assert_eq!(pc.count_used_slots(), 2);
    }

    #[test]
    fn oversized_remainder_spans_empty_slots() {
        let mut pc = PcStorage::new(3, 10);
        assert!(pc.add(POTION, 25));
        let quantities: Vec<_> = pc.slots().iter().map(|s| s.quantity).collect();
        assert_eq!(quantities, [10, 10, 5]);
    }

    #[test]
    fn failed_add_keeps_partial_top_up() {
        let mut pc = PcStorage::new(2, 10);
        assert!(pc.add(POTION, 8));
        assert!(pc.add(ANTIDOTE, 1));
        assert!(!pc.has_space(POTION, 5));
        assert!(!pc.add(POTION, 5));
        assert_eq!(pc.slot(0), Some(Slot::new(POTION, 10)));
        assert_eq!(pc.slot(1), Some(Slot::new(ANTIDOTE, 1)));
    }

    #[test]
    fn has_item_is_per_slot() {
        let mut pc = PcStorage::new(3, 10);
        assert!(pc.add(POTION, 15));
        assert!(pc.has_item(POTION, 10));
        assert!(!pc.has_item(POTION, 15));
        assert!(!pc.has_item(ANTIDOTE, 1));
    }

    #[test]
    fn remove_by_index_compacts_when_emptied() {
        let mut pc = PcStorage::new(4, 999);
        assert!(pc.add(POTION, 3));
        assert!(pc.add(ANTIDOTE, 2));
        assert!(pc.add(SUPER_POTION, 1));
        assert!(pc.remove(0, 1));
        assert_eq!(pc.slot(0), Some(Slot::new(POTION, 2)));
        assert!(pc.remove(0, 2));
        assert_eq!(pc.slot(0), Some(Slot::new(ANTIDOTE, 2)));
        assert_eq!(pc.slot(1), Some(Slot::new(SUPER_POTION, 1)));
        assert_eq!(pc.count_used_slots(), 2);
    }

    #[test]
    fn remove_rejects_empty_or_missing_slot() {
        let mut pc = PcStorage::new(2, 999);
        assert!(!pc.remove(0, 1));
        assert!(!pc.remove(5, 1));
    }

    #[test]
    fn compact_keeps_items_in_front() {
        let mut pc = PcStorage::new(4, 999);
        for item in [POTION, ANTIDOTE, SUPER_POTION] {
            assert!(pc.add(item, 1));
        }
        assert!(pc.move_slot(0, 3));
        pc.compact();
        let items: Vec<_> = pc.slots().iter().map(|s| s.item).collect();
        assert_eq!(items, [ANTIDOTE, SUPER_POTION, POTION, ItemId::NONE]);
    }
}
