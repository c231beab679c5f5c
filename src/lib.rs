//! 背包核心：口袋 / PC 仓库 / 金字塔背包的物品存取、排序与数量加密

pub mod core;
pub mod data;
pub mod interface;
pub mod inventory;

#[cfg(test)]
pub(crate) mod test_support;
