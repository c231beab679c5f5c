use bevy::prelude::*;

use pocket_bag::core::{CorePlugin, events::LogEvent, states::AppState};
use pocket_bag::data::DataPlugin;
use pocket_bag::interface::debug_cli::DebugCliPlugin;
use pocket_bag::inventory::InventoryPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                visible: false,
                ..default()
            }),   // 不显示窗口，只用终端
            ..default()
        }))
        // CorePlugin 负责插入配置，必须在 InventoryPlugin 之前
        .add_plugins(CorePlugin)
        .add_plugins(DataPlugin)
        .add_plugins(InventoryPlugin)
        .add_plugins(DebugCliPlugin)
        .add_systems(Update, forward_log_event)
        .add_systems(Startup, |mut next: ResMut<NextState<AppState>>| {
            next.set(AppState::Loading);
        })
        .run();
}

fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
