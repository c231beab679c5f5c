use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::data::schema::ItemId;
use crate::inventory::pocket::{Pocket, PocketPolicy};

/// 默认配置文件位置（相对工作目录）
pub const CONFIG_PATH: &str = "assets/config/bag.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// 各口袋格子数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PocketCapacities {
    pub items: usize,
    pub key_items: usize,
    pub poke_balls: usize,
    pub tm_hm: usize,
    pub berries: usize,
}

impl Default for PocketCapacities {
    fn default() -> Self {
        Self {
            items: 30,
            key_items: 30,
            poke_balls: 16,
            tm_hm: 64,
            berries: 46,
        }
    }
}

/// 单格堆叠上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ceilings {
    pub default: u16,
    pub tm_hm: u16,
    pub berries: u16,
    pub pc: u16,
    pub pyramid: u16,
}

impl Default for Ceilings {
    fn default() -> Self {
        Self {
            default: 99,
            tm_hm: 99,
            berries: 999,
            pc: 999,
            pyramid: 99,
        }
    }
}

/// 背包系统配置（assets/config/bag.toml）
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BagConfig {
    pub pockets: PocketCapacities,
    pub ceilings: Ceilings,
    pub pc_capacity: usize,
    pub pyramid_capacity: usize,
    pub pyramid_modes: usize,
    pub encryption_key: u32,
    /// 可互换登记的两辆自行车
    pub bikes: Option<(ItemId, ItemId)>,
}

impl Default for BagConfig {
    fn default() -> Self {
        Self {
            pockets: PocketCapacities::default(),
            ceilings: Ceilings::default(),
            pc_capacity: 50,
            pyramid_capacity: 10,
            pyramid_modes: 2,
            encryption_key: 0,
            bikes: Some((ItemId(259), ItemId(272))),
        }
    }
}

impl BagConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// 读取失败时退回默认值，只打日志不中断
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!("配置文件 {} 不存在，使用默认配置", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => {
                info!("已载入配置 {}", path.display());
                cfg
            }
            Err(e) => {
                error!("配置文件 {} 无效: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn capacity(&self, pocket: Pocket) -> usize {
        match pocket {
            Pocket::Items => self.pockets.items,
            Pocket::KeyItems => self.pockets.key_items,
            Pocket::PokeBalls => self.pockets.poke_balls,
            Pocket::TmHm => self.pockets.tm_hm,
            Pocket::Berries => self.pockets.berries,
        }
    }

    pub fn policy(&self, pocket: Pocket) -> PocketPolicy {
        match pocket {
            Pocket::TmHm => PocketPolicy::unique(self.ceilings.tm_hm),
            Pocket::Berries => PocketPolicy::unique(self.ceilings.berries),
            _ => PocketPolicy::stacking(self.ceilings.default),
        }
    }
}

/// 外部游戏模式状态：决定走普通背包还是金字塔背包
#[derive(Resource, Debug, Clone, Default)]
pub struct GameMode {
    pub in_battle_pyramid: bool,
    pub storing_in_pyramid_bag: bool,
    /// 金字塔背包的等级模式（选择哪一组数组）
    pub lvl_mode: usize,
    /// 金字塔背包菜单的光标 + 滚动位置
    pub pyramid_cursor: usize,
    pub in_secret_base: bool,
}

impl GameMode {
    pub fn uses_pyramid_bag(&self) -> bool {
        self.in_battle_pyramid || self.storing_in_pyramid_bag
    }
}

/// 秘密基地里用过背包的记录（供电视节目使用）
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretBaseTelemetry {
    pub used_bag: bool,
    pub last_item_used: ItemId,
}

impl SecretBaseTelemetry {
    pub fn record(&mut self, item: ItemId) {
        self.used_bag = true;
        self.last_item_used = item;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = BagConfig::from_toml_str(
            r#"
            pc_capacity = 20

            [ceilings]
            berries = 50
            "#,
        )
        .unwrap();
        assert_eq!(cfg.pc_capacity, 20);
        assert_eq!(cfg.ceilings.berries, 50);
        assert_eq!(cfg.ceilings.default, 99);
        assert_eq!(cfg.pockets.tm_hm, 64);
    }

    #[test]
    fn bundled_config_matches_defaults() {
        let cfg = BagConfig::from_toml_str(include_str!("../../assets/config/bag.toml")).unwrap();
        let defaults = BagConfig::default();
        assert_eq!(cfg.pc_capacity, defaults.pc_capacity);
        assert_eq!(cfg.pockets.berries, defaults.pockets.berries);
        assert_eq!(cfg.ceilings.pc, defaults.ceilings.pc);
        assert_eq!(cfg.bikes, defaults.bikes);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            BagConfig::from_toml_str("pc_capacity = \"lots\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn policies_by_pocket() {
        let cfg = BagConfig::default();
        assert!(cfg.policy(Pocket::Items).allows_duplicate_slots);
        assert!(!cfg.policy(Pocket::TmHm).allows_duplicate_slots);
        assert!(!cfg.policy(Pocket::Berries).allows_duplicate_slots);
        assert_eq!(cfg.policy(Pocket::Berries).ceiling, 999);
    }

    #[test]
    fn pyramid_routing() {
        let mut mode = GameMode::default();
        assert!(!mode.uses_pyramid_bag());
        mode.storing_in_pyramid_bag = true;
        assert!(mode.uses_pyramid_bag());
        mode = GameMode { in_battle_pyramid: true, ..default() };
        assert!(mode.uses_pyramid_bag());
    }
}
