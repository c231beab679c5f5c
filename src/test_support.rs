//! 测试用的小物品表

use crate::data::catalog::ItemCatalog;
use crate::data::schema::{ItemEntry, ItemId};
use crate::inventory::pocket::Pocket;

pub const POTION: ItemId = ItemId(13);
pub const ANTIDOTE: ItemId = ItemId(14);
pub const BURN_HEAL: ItemId = ItemId(15);
pub const SUPER_POTION: ItemId = ItemId(22);
pub const CHERI_BERRY: ItemId = ItemId(133);
pub const ORAN_BERRY: ItemId = ItemId(139);
pub const MACH_BIKE: ItemId = ItemId(259);
pub const ACRO_BIKE: ItemId = ItemId(272);
pub const TM01: ItemId = ItemId(289);
pub const TM02: ItemId = ItemId(290);
pub const TM03: ItemId = ItemId(291);

fn entry(id: ItemId, name: &str, pocket: Pocket) -> ItemEntry {
    ItemEntry {
        id,
        name: name.into(),
        pocket: Some(pocket),
        ..Default::default()
    }
}

pub fn catalog() -> ItemCatalog {
    ItemCatalog::from_entries([
        entry(ItemId(1), "Master Ball", Pocket::PokeBalls),
        entry(POTION, "Potion", Pocket::Items),
        entry(ANTIDOTE, "Antidote", Pocket::Items),
        entry(BURN_HEAL, "Burn Heal", Pocket::Items),
        entry(SUPER_POTION, "Super Potion", Pocket::Items),
        entry(CHERI_BERRY, "Cheri Berry", Pocket::Berries),
        entry(ORAN_BERRY, "Oran Berry", Pocket::Berries),
        entry(MACH_BIKE, "Mach Bike", Pocket::KeyItems),
        entry(ACRO_BIKE, "Acro Bike", Pocket::KeyItems),
        entry(TM01, "TM01", Pocket::TmHm),
        entry(TM02, "TM02", Pocket::TmHm),
        entry(TM03, "TM03", Pocket::TmHm),
    ])
}
