use serde::Serialize;

use crate::data::schema::ItemId;

/// 一格：物品编号 + 数量
///
/// 背包口袋里的 `quantity` 是编码后的值，读之前要经过 [`QuantityCodec`]。
///
/// [`QuantityCodec`]: super::codec::QuantityCodec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub item: ItemId,
    pub quantity: u16,
}

impl Slot {
    pub fn new(item: ItemId, quantity: u16) -> Self {
        Self { item, quantity }
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }
}
