use super::{components::*, events::*, pocket::Pocket};
use crate::core::events::LogEvent;
use crate::core::resources::{BagConfig, GameMode, SecretBaseTelemetry};
use crate::data::catalog::ItemCatalog;
use bevy::prelude::*;

/// 处理"give"：按当前模式放进背包或金字塔背包
pub fn give_item(
    mut ev_give: EventReader<GiveItemEvent>,
    mut inventory: ResMut<Inventory>,
    catalog: Res<ItemCatalog>,
    mode: Res<GameMode>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_give.read() {
        let name = catalog.name(ev.item).to_owned();
        if catalog.pocket(ev.item).is_none() {
            warn!("不存在物品 {}", ev.item);
            log.write(LogEvent(format!("不存在物品 {}", ev.item)));
            continue;
        }

        if !inventory.add_item(&catalog, &mode, ev.item, ev.count) {
            warn!("背包已满，无法获得 {name} ×{}", ev.count);
            log.write(LogEvent(format!("背包已满，无法获得 {name} ×{}", ev.count)));
            continue;
        }

        info!("获得 {name} ×{}", ev.count);
        log.write(LogEvent(format!("获得 {name} ×{}", ev.count)));
        if inventory.obtained.mark_obtained(ev.item) {
            // 第一次拿到时附带说明
            log.write(LogEvent(format!("[新物品] {name}: {}", catalog.description(ev.item))));
        }
    }
}

/// 处理"take"：按编号扣除
pub fn take_item(
    mut ev_take: EventReader<TakeItemEvent>,
    mut inventory: ResMut<Inventory>,
    catalog: Res<ItemCatalog>,
    mode: Res<GameMode>,
    mut telemetry: ResMut<SecretBaseTelemetry>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_take.read() {
        let name = catalog.name(ev.item).to_owned();
        if inventory.remove_item(&catalog, &mode, &mut telemetry, ev.item, ev.count) {
            info!("失去 {name} ×{}", ev.count);
            log.write(LogEvent(format!("失去 {name} ×{}", ev.count)));
        } else {
            log.write(LogEvent(format!("{name} 不足 {} 个", ev.count)));
        }
    }
}

/// 背包 ↔ PC
pub fn transfer_pc_items(
    mut ev_deposit: EventReader<DepositEvent>,
    mut ev_withdraw: EventReader<WithdrawEvent>,
    mut ev_toss: EventReader<TossPcItemEvent>,
    mut inventory: ResMut<Inventory>,
    catalog: Res<ItemCatalog>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_deposit.read() {
        let item = inventory.slot_item(ev.pocket, ev.index).unwrap_or_default();
        if inventory.deposit(&catalog, ev.pocket, ev.index, ev.count) {
            log.write(LogEvent(format!("存入 PC: {} ×{}", catalog.name(item), ev.count)));
        } else {
            log.write(LogEvent("无法存入 PC".into()));
        }
    }

    for ev in ev_withdraw.read() {
        let item = inventory.pc.slot(ev.index).map(|s| s.item).unwrap_or_default();
        if inventory.withdraw(&catalog, ev.index, ev.count) {
            log.write(LogEvent(format!("取出: {} ×{}", catalog.name(item), ev.count)));
        } else {
            log.write(LogEvent("无法从 PC 取出".into()));
        }
    }

    for ev in ev_toss.read() {
        if !inventory.remove_pc_item(ev.index, ev.count) {
            log.write(LogEvent("PC 该格为空".into()));
        }
    }
}

/// 排序 / 压缩 / 拖拽 / 光标
pub fn organize_pockets(
    mut ev_sort: EventReader<SortPocketEvent>,
    mut ev_compact: EventReader<CompactPocketEvent>,
    mut ev_move: EventReader<MoveSlotEvent>,
    mut ev_cursor: EventReader<SetListPositionEvent>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    for SortPocketEvent(pocket) in ev_sort.read() {
        if !inventory.sort_pocket(*pocket) {
            log.write(LogEvent(format!("{pocket} 口袋不支持排序")));
        }
    }
    for CompactPocketEvent(pocket) in ev_compact.read() {
        inventory.compact_pocket(*pocket);
    }
    for ev in ev_move.read() {
        if !inventory.move_slot(ev.pocket, ev.from, ev.to) {
            log.write(LogEvent("背包索引超出范围".into()));
        }
    }
    for ev in ev_cursor.read() {
        inventory.set_list_position(ev.pocket, ev.position);
    }
}

/// 换密钥 / 登记物品
pub fn maintain_inventory(
    mut ev_rekey: EventReader<RekeyEvent>,
    mut ev_register: EventReader<RegisterItemEvent>,
    mut ev_bike: EventReader<SwapBikeEvent>,
    mut inventory: ResMut<Inventory>,
    config: Res<BagConfig>,
) {
    for ev in ev_rekey.read() {
        inventory.rekey_all_bag_quantities(ev.new_key);
        debug!("背包数量已换用新密钥");
    }
    for RegisterItemEvent(item) in ev_register.read() {
        inventory.registered_item = *item;
    }
    if !ev_bike.is_empty() {
        ev_bike.clear();
        if let Some(bikes) = config.bikes {
            inventory.swap_registered_bike(bikes);
        }
    }
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    inventory: Res<Inventory>,
    catalog: Res<ItemCatalog>,
    mode: Res<GameMode>,
    mut log: EventWriter<LogEvent>,
) {
    for ListInventoryEvent(target) in ev_list.read() {
        let lines = match target {
            ListTarget::Bag => bag_lines(&inventory, &catalog),
            ListTarget::Pc => slot_lines(
                &catalog,
                inventory.pc.slots().iter().map(|s| (s.item, s.quantity)),
            ),
            ListTarget::Pyramid => match inventory.pyramid.store(mode.lvl_mode) {
                Some(store) => slot_lines(
                    &catalog,
                    store.items().iter().copied().zip(store.quantities().iter().copied()),
                ),
                None => vec![format!("没有等级模式 {}", mode.lvl_mode)],
            },
        };
        for line in lines {
            log.write(LogEvent(line));
        }
    }
}

fn bag_lines(inventory: &Inventory, catalog: &ItemCatalog) -> Vec<String> {
    let mut lines = Vec::new();
    for pocket in Pocket::ALL {
        let store = inventory.bag.pocket(pocket);
        lines.push(format!("== {pocket} ({}) ==", store.capacity()));
        let slots = store.decoded(&inventory.codec);
        lines.extend(slot_lines(catalog, slots.iter().map(|s| (s.item, s.quantity))));
    }
    lines
}

fn slot_lines(
    catalog: &ItemCatalog,
    slots: impl Iterator<Item = (crate::data::schema::ItemId, u16)>,
) -> Vec<String> {
    let lines: Vec<String> = slots
        .enumerate()
        .filter(|(_, (item, _))| !item.is_none())
        .map(|(idx, (item, count))| {
            format!("[{idx}] {} ×{count} (id={})", catalog.name(item), item.0)
        })
        .collect();
    if lines.is_empty() {
        vec!["  (empty)".into()]
    } else {
        lines
    }
}
