use bevy::prelude::*;

use super::codec::QuantityCodec;
use super::maintenance;
use super::pocket::{Pocket, PocketPolicy};
use super::slot::Slot;
use crate::core::resources::{BagConfig, SecretBaseTelemetry};
use crate::data::catalog::ItemCatalog;
use crate::data::schema::ItemId;

/// 单个口袋：固定格数，数量经过编码
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagPocket {
    pocket: Pocket,
    policy: PocketPolicy,
    slots: Vec<Slot>,
    /// 界面上最后操作的位置，`remove` 优先从这里扣
    list_position: usize,
}

impl BagPocket {
    pub fn new(pocket: Pocket, capacity: usize, policy: PocketPolicy, codec: &QuantityCodec) -> Self {
        Self {
            pocket,
            policy,
            slots: vec![Slot::new(ItemId::NONE, codec.encode(0)); capacity],
            list_position: 0,
        }
    }

    pub fn pocket(&self) -> Pocket {
        self.pocket
    }

    pub fn policy(&self) -> PocketPolicy {
        self.policy
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// 原始（编码后）格子
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn list_position(&self) -> usize {
        self.list_position
    }

    pub fn set_list_position(&mut self, position: usize) {
        self.list_position = position;
    }

    pub fn item_at(&self, index: usize) -> Option<ItemId> {
        self.slots.get(index).map(|s| s.item)
    }

    pub fn quantity_at(&self, codec: &QuantityCodec, index: usize) -> Option<u16> {
        self.slots.get(index).map(|s| codec.decode(s.quantity))
    }

    /// 解码后的 (物品, 数量) 列表，供显示
    pub fn decoded(&self, codec: &QuantityCodec) -> Vec<Slot> {
        self.slots
            .iter()
            .map(|s| Slot::new(s.item, codec.decode(s.quantity)))
            .collect()
    }

    pub fn is_non_empty(&self) -> bool {
        self.slots.iter().any(|s| !s.is_empty())
    }

    /// 按存储顺序累加，够数立即返回
    pub fn has_item(&self, codec: &QuantityCodec, item: ItemId, count: u16) -> bool {
        let mut count = count;
        for slot in self.slots.iter().filter(|s| s.item == item) {
            let quantity = codec.decode(slot.quantity);
            if quantity >= count {
                return true;
            }
            count -= quantity;
        }
        false
    }

    pub fn has_space(&self, codec: &QuantityCodec, item: ItemId, count: u16) -> bool {
        let ceiling = u32::from(self.policy.ceiling);
        let mut count = u32::from(count);

        // 先算已有同类格的余量
        for slot in self.slots.iter().filter(|s| s.item == item) {
            let owned = u32::from(codec.decode(slot.quantity));
            if owned + count <= ceiling {
                return true;
            }
            if !self.policy.allows_duplicate_slots {
                return false;
            }
            count = owned + count - ceiling;
        }

        // 再算空格，每格按满上限计
        for _ in self.slots.iter().filter(|s| s.is_empty()) {
            if count <= ceiling {
                return true;
            }
            if !self.policy.allows_duplicate_slots {
                return false;
            }
            count -= ceiling;
        }

        count == 0
    }

    /// 在副本上堆叠 / 开新格，全部放下才替换原口袋
    pub fn add(&mut self, codec: &QuantityCodec, item: ItemId, count: u16) -> bool {
        let ceiling = u32::from(self.policy.ceiling);
        let mut count = u32::from(count);
        let mut working = self.slots.clone();

        for slot in working.iter_mut().filter(|s| s.item == item) {
            let owned = u32::from(codec.decode(slot.quantity));
            if owned + count <= ceiling {
                slot.quantity = codec.encode((owned + count) as u16);
                count = 0;
                break;
            }
            if !self.policy.allows_duplicate_slots {
                debug!("{} 口袋不能重复放 {item}", self.pocket);
                return false;
            }
            count = owned + count - ceiling;
            slot.quantity = codec.encode(ceiling as u16);
        }

        if count > 0 {
            for slot in working.iter_mut().filter(|s| s.is_empty()) {
                slot.item = item;
                if count > ceiling {
                    if !self.policy.allows_duplicate_slots {
                        debug!("{} 口袋单格放不下 {count} 个 {item}", self.pocket);
                        return false;
                    }
                    count -= ceiling;
                    slot.quantity = codec.encode(ceiling as u16);
                } else {
                    slot.quantity = codec.encode(count as u16);
                    count = 0;
                    break;
                }
            }
            if count > 0 {
                debug!("{} 口袋已满，还差 {count} 个 {item}", self.pocket);
                return false;
            }
        }

        self.slots = working;
        true
    }

    pub fn count_total(&self, codec: &QuantityCodec, item: ItemId) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.item == item)
            .map(|s| u32::from(codec.decode(s.quantity)))
            .sum()
    }

    /// 数量不够时不改动
    pub fn remove(&mut self, codec: &QuantityCodec, item: ItemId, count: u16) -> bool {
        if item.is_none() || self.count_total(codec, item) < u32::from(count) {
            return false;
        }
        self.consume(codec, item, count);
        true
    }

    /// 先扣界面位置上的那格，再从左到右扣；调用方保证总量足够
    fn consume(&mut self, codec: &QuantityCodec, item: ItemId, count: u16) {
        let mut count = count;

        if let Some(slot) = self.slots.get_mut(self.list_position) {
            if slot.item == item {
                take_from(codec, slot, &mut count);
                if count == 0 {
                    return;
                }
            }
        }

        for slot in self.slots.iter_mut().filter(|s| s.item == item) {
            take_from(codec, slot, &mut count);
            if count == 0 {
                return;
            }
        }
    }

    /// 清空所有格，数量写入编码后的 0
    pub fn clear(&mut self, codec: &QuantityCodec) {
        for slot in &mut self.slots {
            *slot = Slot::new(ItemId::NONE, codec.encode(0));
        }
    }

    pub fn rekey(&mut self, old: &QuantityCodec, new: &QuantityCodec) {
        for slot in &mut self.slots {
            slot.quantity = old.rekey(slot.quantity, new);
        }
    }

    /// 数量为 0 的格视为空
    pub fn compact(&mut self, codec: &QuantityCodec) {
        maintenance::compact_by(&mut self.slots, |s| codec.decode(s.quantity) == 0);
    }

    pub fn sort_by_item(&mut self, codec: &QuantityCodec) {
        maintenance::sort_by_key(
            &mut self.slots,
            |s| codec.decode(s.quantity) == 0,
            |s| s.item,
        );
    }

    pub fn move_slot(&mut self, from: usize, to: usize) -> bool {
        maintenance::move_slot(&mut self.slots, from, to)
    }
}

fn take_from(codec: &QuantityCodec, slot: &mut Slot, count: &mut u16) {
    let owned = codec.decode(slot.quantity);
    if owned >= *count {
        slot.quantity = codec.encode(owned - *count);
        *count = 0;
    } else {
        *count -= owned;
        slot.quantity = codec.encode(0);
    }
    if codec.decode(slot.quantity) == 0 {
        slot.item = ItemId::NONE;
    }
}

/// 五个口袋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    pockets: Vec<BagPocket>,
}

impl Bag {
    pub fn new(config: &BagConfig, codec: &QuantityCodec) -> Self {
        let pockets = Pocket::ALL
            .iter()
            .map(|&p| BagPocket::new(p, config.capacity(p), config.policy(p), codec))
            .collect();
        Self { pockets }
    }

    pub fn pocket(&self, pocket: Pocket) -> &BagPocket {
        &self.pockets[pocket.index()]
    }

    pub fn pocket_mut(&mut self, pocket: Pocket) -> &mut BagPocket {
        &mut self.pockets[pocket.index()]
    }

    pub fn pockets(&self) -> impl Iterator<Item = &BagPocket> {
        self.pockets.iter()
    }

    pub fn has_item(&self, catalog: &ItemCatalog, codec: &QuantityCodec, item: ItemId, count: u16) -> bool {
        match catalog.pocket(item) {
            Some(p) => self.pocket(p).has_item(codec, item, count),
            None => false,
        }
    }

    pub fn has_space(&self, catalog: &ItemCatalog, codec: &QuantityCodec, item: ItemId, count: u16) -> bool {
        match catalog.pocket(item) {
            Some(p) => self.pocket(p).has_space(codec, item, count),
            None => false,
        }
    }

    pub fn add(&mut self, catalog: &ItemCatalog, codec: &QuantityCodec, item: ItemId, count: u16) -> bool {
        match catalog.pocket(item) {
            Some(p) => self.pocket_mut(p).add(codec, item, count),
            None => false,
        }
    }

    /// 成功扣除前，若在秘密基地内则记下用过的物品
    pub fn remove(
        &mut self,
        catalog: &ItemCatalog,
        codec: &QuantityCodec,
        item: ItemId,
        count: u16,
        telemetry: Option<&mut SecretBaseTelemetry>,
    ) -> bool {
        let Some(p) = catalog.pocket(item) else {
            return false;
        };
        if item.is_none() {
            return false;
        }
        let store = self.pocket_mut(p);
        if store.count_total(codec, item) < u32::from(count) {
            return false;
        }
        if let Some(telemetry) = telemetry {
            telemetry.record(item);
        }
        store.consume(codec, item, count);
        true
    }

    pub fn count_total(&self, catalog: &ItemCatalog, codec: &QuantityCodec, item: ItemId) -> u32 {
        match catalog.pocket(item) {
            Some(p) => self.pocket(p).count_total(codec, item),
            None => 0,
        }
    }

    pub fn slot_item(&self, pocket: Pocket, index: usize) -> Option<ItemId> {
        self.pocket(pocket).item_at(index)
    }

    pub fn slot_quantity(&self, codec: &QuantityCodec, pocket: Pocket, index: usize) -> Option<u16> {
        self.pocket(pocket).quantity_at(codec, index)
    }

    pub fn clear(&mut self, codec: &QuantityCodec) {
        for pocket in &mut self.pockets {
            pocket.clear(codec);
        }
    }

    /// 所有口袋的数量从旧密钥换到新密钥
    pub fn rekey(&mut self, old: &QuantityCodec, new: &QuantityCodec) {
        for pocket in &mut self.pockets {
            pocket.rekey(old, new);
        }
    }
}
