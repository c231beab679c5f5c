use bevy::prelude::*;

/// 应用阶段：物品表载入前不处理背包事件
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    /// 等待 items.ron 载入
    Loading,
    InGame,
}
