pub mod bag;
pub mod codec;
pub mod components;
pub mod events;
pub mod maintenance;
pub mod pc;
pub mod pocket;
pub mod pyramid;
pub mod slot;
mod systems;

use bevy::prelude::*;
use crate::core::resources::BagConfig;
use crate::core::states::AppState;
use components::*;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        // 口袋容量在会话开始时按配置定下，之后不再变化
        let config = app
            .world()
            .get_resource::<BagConfig>()
            .cloned()
            .unwrap_or_default();

        app
            .insert_resource(Inventory::new(&config))
            .add_event::<GiveItemEvent>()
            .add_event::<TakeItemEvent>()
            .add_event::<DepositEvent>()
            .add_event::<WithdrawEvent>()
            .add_event::<TossPcItemEvent>()
            .add_event::<SortPocketEvent>()
            .add_event::<CompactPocketEvent>()
            .add_event::<MoveSlotEvent>()
            .add_event::<SetListPositionEvent>()
            .add_event::<RekeyEvent>()
            .add_event::<RegisterItemEvent>()
            .add_event::<SwapBikeEvent>()
            .add_event::<ListInventoryEvent>()
            .add_systems(
                Update,
                (
                    organize_pockets,
                    give_item,
                    take_item,
                    transfer_pc_items,
                    maintain_inventory,
                    print_inventory,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::LogEvent;
    use crate::core::resources::{GameMode, SecretBaseTelemetry};
    use crate::test_support::*;
    use bevy::state::app::StatesPlugin;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(BagConfig::default())
            .init_resource::<GameMode>()
            .init_resource::<SecretBaseTelemetry>()
            .insert_resource(catalog())
            .add_event::<LogEvent>()
            .insert_state(AppState::InGame)
            .add_plugins(InventoryPlugin);
        app
    }

    fn total(app: &App, item: crate::data::schema::ItemId) -> u32 {
        let catalog = app.world().resource::<crate::data::catalog::ItemCatalog>();
        app.world().resource::<Inventory>().count_total(catalog, item)
    }

    #[test]
    fn give_and_take_through_events() {
        let mut app = app();
        app.world_mut().send_event(GiveItemEvent { item: POTION, count: 150 });
        app.update();
        assert_eq!(total(&app, POTION), 150);

        app.world_mut().send_event(TakeItemEvent { item: POTION, count: 60 });
        app.update();
        assert_eq!(total(&app, POTION), 90);
    }

    #[test]
    fn first_pickup_marks_item_obtained() {
        let mut app = app();
        app.world_mut().send_event(GiveItemEvent { item: ANTIDOTE, count: 1 });
        app.update();
        let inventory = app.world().resource::<Inventory>();
        assert!(inventory.obtained.is_obtained(ANTIDOTE));
        assert!(!inventory.obtained.is_obtained(POTION));
    }

    #[test]
    fn rekey_event_preserves_totals() {
        let mut app = app();
        app.world_mut().send_event(GiveItemEvent { item: CHERI_BERRY, count: 12 });
        app.update();
        app.world_mut().send_event(RekeyEvent { new_key: 0xFACE });
        app.update();
        assert_eq!(app.world().resource::<Inventory>().codec.key(), 0xFACE);
        assert_eq!(total(&app, CHERI_BERRY), 12);
    }

    #[test]
    fn secret_base_take_is_recorded() {
        let mut app = app();
        app.world_mut().resource_mut::<GameMode>().in_secret_base = true;
        app.world_mut().send_event(GiveItemEvent { item: POTION, count: 2 });
        app.update();
        app.world_mut().send_event(TakeItemEvent { item: POTION, count: 1 });
        app.update();
        let telemetry = app.world().resource::<SecretBaseTelemetry>();
        assert!(telemetry.used_bag);
        assert_eq!(telemetry.last_item_used, POTION);
    }
}
