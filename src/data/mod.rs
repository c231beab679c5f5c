pub mod catalog;
pub mod loader;
pub mod schema;

use bevy::prelude::*;
use crate::core::states::AppState;
use catalog::ItemCatalog;
use schema::ItemList;

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct ItemAssets {
    handle: Option<Handle<ItemList>>,
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<ItemList>()
            .register_asset_loader(loader::RonItemLoader)
            .init_resource::<ItemAssets>()
            // Loading 流程
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(
                Update,
                check_loaded.run_if(in_state(AppState::Loading)),
            );
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut item_assets: ResMut<ItemAssets>,
    asset_server: Res<AssetServer>,
) {
    let handle: Handle<ItemList> = asset_server.load("data/items.ron");
    item_assets.handle = Some(handle);
}

/// 物品表就绪后建索引并进入游戏
fn check_loaded(
    mut commands: Commands,
    mut next: ResMut<NextState<AppState>>,
    item_assets: Res<ItemAssets>,
    lists: Res<Assets<ItemList>>,
) {
    if let Some(list) = item_assets.handle.as_ref().and_then(|h| lists.get(h)) {
        let catalog = ItemCatalog::from_list(list);
        info!("物品表已载入: {} 条", list.items.len());
        commands.insert_resource(catalog);
        next.set(AppState::InGame);
    }
}
