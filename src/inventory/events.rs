use bevy::prelude::*;

use super::pocket::Pocket;
use crate::data::schema::ItemId;

#[derive(Event)]
pub struct GiveItemEvent {
    pub item:  ItemId,
    pub count: u16,
}

#[derive(Event)]
pub struct TakeItemEvent {
    pub item:  ItemId,
    pub count: u16,
}

/// 背包某格存入 PC
#[derive(Event)]
pub struct DepositEvent {
    pub pocket: Pocket,
    pub index:  usize,
    pub count:  u16,
}

/// PC 某格取回背包
#[derive(Event)]
pub struct WithdrawEvent {
    pub index: usize,
    pub count: u16,
}

/// 直接丢弃 PC 里的物品
#[derive(Event)]
pub struct TossPcItemEvent {
    pub index: usize,
    pub count: u16,
}

#[derive(Event)]
pub struct SortPocketEvent(pub Pocket);

#[derive(Event)]
pub struct CompactPocketEvent(pub Pocket);

#[derive(Event)]
pub struct MoveSlotEvent {
    pub pocket: Pocket,
    pub from:   usize,
    pub to:     usize,
}

/// 菜单光标移动，`TakeItemEvent` 优先扣这一格
#[derive(Event)]
pub struct SetListPositionEvent {
    pub pocket:   Pocket,
    pub position: usize,
}

#[derive(Event)]
pub struct RekeyEvent {
    pub new_key: u32,
}

#[derive(Event)]
pub struct RegisterItemEvent(pub ItemId);

#[derive(Event)]
pub struct SwapBikeEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Bag,
    Pc,
    Pyramid,
}

/// 让 CLI 请求打印物品
#[derive(Event)]
pub struct ListInventoryEvent(pub ListTarget);
