use bevy::prelude::*;

pub mod states;
pub mod events;
pub mod resources;

/// 核心插件：注册全局资源 / 事件 / 状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        // 配置先于其它插件插入，InventoryPlugin 依赖它
        app
            .init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .insert_resource(resources::BagConfig::load_or_default(resources::CONFIG_PATH))
            .init_resource::<resources::GameMode>()
            .init_resource::<resources::SecretBaseTelemetry>();
    }
}
