use bevy::prelude::*;
use serde::Serialize;

use super::bag::Bag;
use super::codec::QuantityCodec;
use super::pc::PcStorage;
use super::pocket::{Pocket, active_store_is_pyramid, pocket_of};
use super::pyramid::PyramidBag;
use super::slot::Slot;
use crate::core::resources::{BagConfig, GameMode, SecretBaseTelemetry};
use crate::data::catalog::ItemCatalog;
use crate::data::schema::ItemId;

/// “是否拿到过”标记，按物品编号逐位存放
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObtainedFlags {
    bits: Vec<u8>,
}

impl ObtainedFlags {
    pub fn is_obtained(&self, item: ItemId) -> bool {
        let (index, mask) = Self::locate(item);
        self.bits.get(index).is_some_and(|b| b & mask != 0)
    }

    /// 返回是否为首次获得
    pub fn mark_obtained(&mut self, item: ItemId) -> bool {
        let (index, mask) = Self::locate(item);
        if index >= self.bits.len() {
            self.bits.resize(index + 1, 0);
        }
        let first = self.bits[index] & mask == 0;
        self.bits[index] |= mask;
        first
    }

    fn locate(item: ItemId) -> (usize, u8) {
        (item.0 as usize / 8, 1 << (item.0 % 8))
    }
}

/// 玩家全部物品存储（挂在 Resource）
#[derive(Resource, Debug, Clone)]
pub struct Inventory {
    pub bag: Bag,
    pub pc: PcStorage,
    pub pyramid: PyramidBag,
    pub codec: QuantityCodec,
    pub registered_item: ItemId,
    pub obtained: ObtainedFlags,
}

/// 解码后的快照，用于 dump 输出
#[derive(Debug, Serialize)]
pub struct InventorySnapshot {
    pub pockets: Vec<(String, Vec<Slot>)>,
    pub pc: Vec<Slot>,
    pub pyramid: Vec<Vec<Slot>>,
    pub registered_item: ItemId,
}

impl Inventory {
    pub fn new(config: &BagConfig) -> Self {
        let codec = QuantityCodec::new(config.encryption_key);
        Self {
            bag: Bag::new(config, &codec),
            pc: PcStorage::new(config.pc_capacity, config.ceilings.pc),
            pyramid: PyramidBag::new(
                config.pyramid_modes,
                config.pyramid_capacity,
                config.ceilings.pyramid,
            ),
            codec,
            registered_item: ItemId::NONE,
            obtained: ObtainedFlags::default(),
        }
    }

    pub fn item_pocket(&self, catalog: &ItemCatalog, item: ItemId) -> Option<Pocket> {
        pocket_of(catalog, item)
    }

    // ---------------- 背包 / 金字塔背包统一入口 ----------------

    pub fn has_item(&self, catalog: &ItemCatalog, mode: &GameMode, item: ItemId, count: u16) -> bool {
        if pocket_of(catalog, item).is_none() {
            return false;
        }
        if active_store_is_pyramid(mode) {
            return self.pyramid.has_item(mode.lvl_mode, item, count);
        }
        self.bag.has_item(catalog, &self.codec, item, count)
    }

    pub fn has_space(&self, catalog: &ItemCatalog, mode: &GameMode, item: ItemId, count: u16) -> bool {
        if pocket_of(catalog, item).is_none() {
            return false;
        }
        if active_store_is_pyramid(mode) {
            return self.pyramid.has_space(mode.lvl_mode, item, count);
        }
        self.bag.has_space(catalog, &self.codec, item, count)
    }

    pub fn add_item(&mut self, catalog: &ItemCatalog, mode: &GameMode, item: ItemId, count: u16) -> bool {
        if pocket_of(catalog, item).is_none() {
            return false;
        }
        if active_store_is_pyramid(mode) {
            return self.pyramid.add(mode.lvl_mode, item, count);
        }
        self.bag.add(catalog, &self.codec, item, count)
    }

    /// 秘密基地内从背包扣除时会写入 `telemetry`
    pub fn remove_item(
        &mut self,
        catalog: &ItemCatalog,
        mode: &GameMode,
        telemetry: &mut SecretBaseTelemetry,
        item: ItemId,
        count: u16,
    ) -> bool {
        if pocket_of(catalog, item).is_none() || item.is_none() {
            return false;
        }
        if active_store_is_pyramid(mode) {
            return self
                .pyramid
                .remove(mode.lvl_mode, item, count, mode.pyramid_cursor);
        }
        let telemetry = mode.in_secret_base.then_some(telemetry);
        self.bag.remove(catalog, &self.codec, item, count, telemetry)
    }

    pub fn count_total(&self, catalog: &ItemCatalog, item: ItemId) -> u32 {
        self.bag.count_total(catalog, &self.codec, item)
    }

    pub fn slot_item(&self, pocket: Pocket, index: usize) -> Option<ItemId> {
        self.bag.slot_item(pocket, index)
    }

    pub fn slot_quantity(&self, pocket: Pocket, index: usize) -> Option<u16> {
        self.bag.slot_quantity(&self.codec, pocket, index)
    }

    pub fn is_pocket_non_empty(&self, pocket: Pocket) -> bool {
        self.bag.pocket(pocket).is_non_empty()
    }

    pub fn has_at_least_one_berry(&self, catalog: &ItemCatalog, mode: &GameMode) -> bool {
        catalog
            .ids_in_pocket(Pocket::Berries)
            .any(|berry| self.has_item(catalog, mode, berry, 1))
    }

    // ---------------- 整理 ----------------

    pub fn set_list_position(&mut self, pocket: Pocket, position: usize) {
        self.bag.pocket_mut(pocket).set_list_position(position);
    }

    pub fn compact_pocket(&mut self, pocket: Pocket) {
        self.bag.pocket_mut(pocket).compact(&self.codec);
    }

    /// 只有技能机和树果口袋可以排序
    pub fn sort_pocket(&mut self, pocket: Pocket) -> bool {
        if !matches!(pocket, Pocket::TmHm | Pocket::Berries) {
            return false;
        }
        self.bag.pocket_mut(pocket).sort_by_item(&self.codec);
        true
    }

    pub fn move_slot(&mut self, pocket: Pocket, from: usize, to: usize) -> bool {
        self.bag.pocket_mut(pocket).move_slot(from, to)
    }

    pub fn clear_bag(&mut self) {
        self.bag.clear(&self.codec);
    }

    /// 换密钥：所有背包数量重新编码，之后旧密钥作废
    pub fn rekey_all_bag_quantities(&mut self, new_key: u32) {
        let new = QuantityCodec::new(new_key);
        self.bag.rekey(&self.codec, &new);
        self.codec = new;
    }

    // ---------------- PC ----------------

    pub fn has_pc_item(&self, item: ItemId, count: u16) -> bool {
        self.pc.has_item(item, count)
    }

    pub fn add_pc_item(&mut self, item: ItemId, count: u16) -> bool {
        self.pc.add(item, count)
    }

    pub fn remove_pc_item(&mut self, index: usize, count: u16) -> bool {
        self.pc.remove(index, count)
    }

    pub fn count_used_pc_slots(&self) -> usize {
        self.pc.count_used_slots()
    }

    pub fn compact_pc(&mut self) {
        self.pc.compact();
    }

    /// 背包某格 → PC；PC 放不下时什么都不做
    pub fn deposit(&mut self, catalog: &ItemCatalog, pocket: Pocket, index: usize, count: u16) -> bool {
        let (Some(item), Some(owned)) = (self.slot_item(pocket, index), self.slot_quantity(pocket, index)) else {
            return false;
        };
        if item.is_none() || owned < count || !self.pc.has_space(item, count) {
            return false;
        }
        if !self.pc.add(item, count) {
            return false;
        }
        self.set_list_position(pocket, index);
        self.bag.remove(catalog, &self.codec, item, count, None)
    }

    /// PC 某格 → 背包；背包放不下时什么都不做
    pub fn withdraw(&mut self, catalog: &ItemCatalog, index: usize, count: u16) -> bool {
        let Some(slot) = self.pc.slot(index) else {
            return false;
        };
        if slot.is_empty() || slot.quantity < count {
            return false;
        }
        if !self.bag.add(catalog, &self.codec, slot.item, count) {
            return false;
        }
        self.pc.remove(index, count)
    }

    // ---------------- 其它 ----------------

    /// 登记的是其中一辆自行车时换成另一辆
    pub fn swap_registered_bike(&mut self, bikes: (ItemId, ItemId)) {
        let (mach, acro) = bikes;
        if self.registered_item == mach {
            self.registered_item = acro;
        } else if self.registered_item == acro {
            self.registered_item = mach;
        }
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            pockets: self
                .bag
                .pockets()
                .map(|p| (p.pocket().to_string(), p.decoded(&self.codec)))
                .collect(),
            pc: self.pc.slots().to_vec(),
            pyramid: (0..self.pyramid.mode_count())
                .filter_map(|m| self.pyramid.store(m))
                .map(|s| {
                    s.items()
                        .iter()
                        .zip(s.quantities())
                        .map(|(&item, &quantity)| Slot::new(item, quantity))
                        .collect()
                })
                .collect(),
            registered_item: self.registered_item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn inventory() -> Inventory {
        Inventory::new(&BagConfig {
            encryption_key: 0xC0FF_EE11,
            ..BagConfig::default()
        })
    }

    #[test]
    fn potion_scenario() {
        let catalog = catalog();
        let mode = GameMode::default();
        let mut inv = inventory();
        assert!(inv.add_item(&catalog, &mode, POTION, 150));
        assert_eq!(inv.slot_quantity(Pocket::Items, 0), Some(99));
        assert_eq!(inv.slot_quantity(Pocket::Items, 1), Some(51));
        assert_eq!(inv.count_total(&catalog, POTION), 150);
        assert!(inv.has_item(&catalog, &mode, POTION, 150));
    }

    #[test]
    fn pyramid_mode_routes_away_from_bag() {
        let catalog = catalog();
        let mode = GameMode { storing_in_pyramid_bag: true, lvl_mode: 1, ..default() };
        let mut inv = inventory();
        assert!(inv.add_item(&catalog, &mode, POTION, 5));
        assert_eq!(inv.count_total(&catalog, POTION), 0);
        assert!(inv.has_item(&catalog, &mode, POTION, 5));
        assert!(!inv.has_item(&catalog, &GameMode::default(), POTION, 1));
        assert_eq!(inv.pyramid.store(1).unwrap().quantities()[0], 5);
        // 金字塔背包不分口袋、不受技能机规则限制
        assert!(inv.add_item(&catalog, &mode, TM01, 99));
        assert!(inv.add_item(&catalog, &mode, TM01, 1));
    }

    #[test]
    fn pyramid_remove_uses_mode_cursor() {
        let catalog = catalog();
        let mut mode = GameMode { in_battle_pyramid: true, ..default() };
        let mut telemetry = SecretBaseTelemetry::default();
        let mut inv = inventory();
        assert!(inv.add_item(&catalog, &mode, POTION, 99));
        assert!(inv.add_item(&catalog, &mode, POTION, 5));
        mode.pyramid_cursor = 1;
        assert!(inv.remove_item(&catalog, &mode, &mut telemetry, POTION, 5));
        let store = inv.pyramid.store(0).unwrap();
        assert_eq!(store.items()[1], ItemId::NONE);
        assert_eq!(store.quantities()[0], 99);
    }

    #[test]
    fn unknown_items_fail_everywhere() {
        let catalog = catalog();
        let mode = GameMode { storing_in_pyramid_bag: true, ..default() };
        let mut telemetry = SecretBaseTelemetry::default();
        let mut inv = inventory();
        assert!(!inv.add_item(&catalog, &mode, ItemId(2), 1));
        assert!(!inv.has_space(&catalog, &mode, ItemId(2), 1));
        assert!(!inv.has_item(&catalog, &mode, ItemId(2), 0));
        assert!(!inv.remove_item(&catalog, &mode, &mut telemetry, ItemId(2), 0));
        assert_eq!(inv.item_pocket(&catalog, ItemId(2)), None);
    }

    #[test]
    fn secret_base_only_records_bag_removals() {
        let catalog = catalog();
        let mut mode = GameMode::default();
        let mut telemetry = SecretBaseTelemetry::default();
        let mut inv = inventory();
        assert!(inv.add_item(&catalog, &mode, POTION, 3));
        assert!(inv.remove_item(&catalog, &mode, &mut telemetry, POTION, 1));
        assert!(!telemetry.used_bag);
        mode.in_secret_base = true;
        assert!(inv.remove_item(&catalog, &mode, &mut telemetry, POTION, 1));
        assert_eq!(telemetry.last_item_used, POTION);
    }

    #[test]
    fn rekey_then_read_back() {
        let catalog = catalog();
        let mode = GameMode::default();
        let mut inv = inventory();
        assert!(inv.add_item(&catalog, &mode, CHERI_BERRY, 42));
        inv.rekey_all_bag_quantities(0x0BAD_F00D);
        assert_eq!(inv.codec.key(), 0x0BAD_F00D);
        assert_eq!(inv.count_total(&catalog, CHERI_BERRY), 42);
        assert!(inv.has_item(&catalog, &mode, CHERI_BERRY, 42));
    }

    #[test]
    fn berry_check_and_pocket_emptiness() {
        let catalog = catalog();
        let mode = GameMode::default();
        let mut inv = inventory();
        assert!(!inv.has_at_least_one_berry(&catalog, &mode));
        assert!(!inv.is_pocket_non_empty(Pocket::Berries));
        assert!(inv.add_item(&catalog, &mode, ORAN_BERRY, 1));
        assert!(inv.has_at_least_one_berry(&catalog, &mode));
        assert!(inv.is_pocket_non_empty(Pocket::Berries));
        inv.clear_bag();
        assert!(!inv.is_pocket_non_empty(Pocket::Berries));
    }

    #[test]
    fn sort_only_applies_to_tm_and_berries() {
        let catalog = catalog();
        let mode = GameMode::default();
        let mut inv = inventory();
        assert!(inv.add_item(&catalog, &mode, ORAN_BERRY, 1));
        assert!(inv.add_item(&catalog, &mode, CHERI_BERRY, 1));
        assert!(!inv.sort_pocket(Pocket::Items));
        assert!(inv.sort_pocket(Pocket::Berries));
        assert_eq!(inv.slot_item(Pocket::Berries, 0), Some(CHERI_BERRY));
        assert_eq!(inv.slot_item(Pocket::Berries, 1), Some(ORAN_BERRY));
    }

    #[test]
    fn deposit_and_withdraw_move_quantities() {
        let catalog = catalog();
        let mode = GameMode::default();
        let mut inv = inventory();
        assert!(inv.add_item(&catalog, &mode, POTION, 10));
        assert!(inv.deposit(&catalog, Pocket::Items, 0, 4));
        assert_eq!(inv.count_total(&catalog, POTION), 6);
        assert!(inv.has_pc_item(POTION, 4));
        assert!(!inv.deposit(&catalog, Pocket::Items, 0, 7));
        assert!(inv.withdraw(&catalog, 0, 4));
        assert_eq!(inv.count_total(&catalog, POTION), 10);
        assert_eq!(inv.count_used_pc_slots(), 0);
        assert!(!inv.withdraw(&catalog, 0, 1));
    }

    #[test]
    fn registered_bike_toggles() {
        let bikes = (MACH_BIKE, ACRO_BIKE);
        let mut inv = inventory();
        inv.registered_item = MACH_BIKE;
        inv.swap_registered_bike(bikes);
        assert_eq!(inv.registered_item, ACRO_BIKE);
        inv.swap_registered_bike(bikes);
        assert_eq!(inv.registered_item, MACH_BIKE);
        inv.registered_item = POTION;
        inv.swap_registered_bike(bikes);
        assert_eq!(inv.registered_item, POTION);
    }

    #[test]
    fn obtained_flags_report_first_time() {
        let mut flags = ObtainedFlags::default();
        assert!(!flags.is_obtained(POTION));
        assert!(flags.mark_obtained(POTION));
        assert!(!flags.mark_obtained(POTION));
        assert!(flags.is_obtained(POTION));
        assert!(!flags.is_obtained(ANTIDOTE));
    }

    #[test]
    fn snapshot_is_decoded() {
        let catalog = catalog();
        let mode = GameMode::default();
        let mut inv = inventory();
        assert!(inv.add_item(&catalog, &mode, POTION, 7));
        let snap = inv.snapshot();
        assert_eq!(snap.pockets[0].1[0], Slot::new(POTION, 7));
        assert_eq!(snap.pyramid.len(), 2);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"quantity\":7"));
    }
}
