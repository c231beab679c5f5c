//! 文字 CLI：读取 stdin → 解析命令 → 执行并打印

use anyhow::{Context, anyhow, bail};
use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::num::NonZero;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::core::resources::GameMode;
use crate::core::{events::LogEvent, states::AppState};
use crate::data::catalog::ItemCatalog;
use crate::data::schema::ItemId;
use crate::inventory::components::Inventory;
use crate::inventory::events::*;
use crate::inventory::pocket::Pocket;

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

const HELP: &str = "命令列表:
  help                         查看帮助
  status                       查看当前状态
  exit / quit                  退出程序
  items [token]                列出物品 / 按 id 或名称查询
  give <item> [count]          获得物品
  take <item> [count]          扣除物品
  inv | pc | pyramid           查看背包 / PC / 金字塔背包
  deposit <pocket> <idx> [n]   背包格存入 PC
  withdraw <idx> [n]           PC 格取回背包
  toss <idx> [n]               丢弃 PC 物品
  sort | compact <pocket>      整理口袋
  move <pocket> <from> <to>    移动格子
  cursor <pocket> <pos>        设置菜单光标
  rekey <key>                  更换数量密钥
  mode <flag> <on|off>         flag: pyramid / arena / base
  lvl <n> | pcursor <n>        金字塔背包模式 / 光标
  register <item> | bike       登记物品 / 切换自行车
  dump                         以 JSON 输出全部存储
";

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Ok(mut buf) = buffer.lock() {
                        buf.push_back(line.to_string());
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands.run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>),
    Give { item: String, count: u16 },
    Take { item: String, count: u16 },
    List(ListTarget),
    Deposit { pocket: Pocket, index: usize, count: u16 },
    Withdraw { index: usize, count: u16 },
    Toss { index: usize, count: u16 },
    Sort(Pocket),
    Compact(Pocket),
    Move { pocket: Pocket, from: usize, to: usize },
    Cursor { pocket: Pocket, position: usize },
    Rekey(u32),
    Mode { flag: ModeFlag, on: bool },
    Lvl(usize),
    PyramidCursor(usize),
    Register(String),
    Bike,
    Dump,
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum ModeFlag {
    Pyramid,
    Arena,
    SecretBase,
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

#[derive(bevy::ecs::system::SystemParam)]
struct InventoryWriters<'w> {
    give: EventWriter<'w, GiveItemEvent>,
    take: EventWriter<'w, TakeItemEvent>,
    deposit: EventWriter<'w, DepositEvent>,
    withdraw: EventWriter<'w, WithdrawEvent>,
    toss: EventWriter<'w, TossPcItemEvent>,
    sort: EventWriter<'w, SortPocketEvent>,
    compact: EventWriter<'w, CompactPocketEvent>,
    moves: EventWriter<'w, MoveSlotEvent>,
    cursor: EventWriter<'w, SetListPositionEvent>,
    rekey: EventWriter<'w, RekeyEvent>,
    register: EventWriter<'w, RegisterItemEvent>,
    bike: EventWriter<'w, SwapBikeEvent>,
    list: EventWriter<'w, ListInventoryEvent>,
}

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    state: Res<State<AppState>>,
    catalog: Res<ItemCatalog>,
    inventory: Res<Inventory>,
    mut mode: ResMut<GameMode>,
    mut out: InventoryWriters,
) {
    for CliLine(input) in line_reader.read() {
        let command = match parse_command(input) {
            Ok(c) => c,
            Err(e) => {
                log.write(LogEvent(format!("{e:#}")));
                continue;
            }
        };

        match command {
            Command::Help => {
                log.write(LogEvent(HELP.into()));
            }

            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Items Loaded: {}, PC used: {}/{}, Mode: {:?}",
                    state.get(),
                    catalog.len().saturating_sub(1),
                    inventory.count_used_pc_slots(),
                    inventory.pc.capacity(),
                    *mode,
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Error(NonZero::<u8>::MIN));
            }

            Command::Items(None) => {
                for entry in catalog.iter() {
                    log.write(LogEvent(format!(
                        "{} | {} | {} | {:?}",
                        uuid_from_name(&entry.name),
                        entry.id.0,
                        entry.name,
                        entry.pocket,
                    )));
                }
            }

            Command::Items(Some(token)) => match catalog.find(&token) {
                Some(id) => {
                    let e = catalog.entry(id);
                    log.write(LogEvent(format!(
                        "==================================================
UUID   : {}
ID     : {}
Name   : {}
Pocket : {:?}
Price  : {}
Hold   : {} ({})
Key    : {}
Owned  : {}
Desc   : {}
==================================================",
                        uuid_from_name(&e.name),
                        e.id.0,
                        e.name,
                        e.pocket,
                        catalog.price(id),
                        catalog.hold_effect(id),
                        catalog.hold_effect_param(id),
                        catalog.importance(id) > 0,
                        inventory.count_total(&catalog, id),
                        e.description,
                    )));
                }
                None => {
                    log.write(LogEvent("未找到匹配物品".into()));
                }
            },

            Command::Give { item, count } => match resolve(&catalog, &item) {
                Ok(item) => {
                    out.give.write(GiveItemEvent { item, count });
                }
                Err(e) => {
                    log.write(LogEvent(e.to_string()));
                }
            },

            Command::Take { item, count } => match resolve(&catalog, &item) {
                Ok(item) => {
                    out.take.write(TakeItemEvent { item, count });
                }
                Err(e) => {
                    log.write(LogEvent(e.to_string()));
                }
            },

            Command::Register(item) => match resolve(&catalog, &item) {
                Ok(item) => {
                    out.register.write(RegisterItemEvent(item));
                }
                Err(e) => {
                    log.write(LogEvent(e.to_string()));
                }
            },

            Command::List(target) => {
                out.list.write(ListInventoryEvent(target));
            }
            Command::Deposit { pocket, index, count } => {
                out.deposit.write(DepositEvent { pocket, index, count });
            }
            Command::Withdraw { index, count } => {
                out.withdraw.write(WithdrawEvent { index, count });
            }
            Command::Toss { index, count } => {
                out.toss.write(TossPcItemEvent { index, count });
            }
            Command::Sort(pocket) => {
                out.sort.write(SortPocketEvent(pocket));
            }
            Command::Compact(pocket) => {
                out.compact.write(CompactPocketEvent(pocket));
            }
            Command::Move { pocket, from, to } => {
                out.moves.write(MoveSlotEvent { pocket, from, to });
            }
            Command::Cursor { pocket, position } => {
                out.cursor.write(SetListPositionEvent { pocket, position });
            }
            Command::Rekey(new_key) => {
                out.rekey.write(RekeyEvent { new_key });
            }
            Command::Bike => {
                out.bike.write(SwapBikeEvent);
            }

            Command::Mode { flag, on } => {
                match flag {
                    ModeFlag::Pyramid => mode.storing_in_pyramid_bag = on,
                    ModeFlag::Arena => mode.in_battle_pyramid = on,
                    ModeFlag::SecretBase => mode.in_secret_base = on,
                }
                log.write(LogEvent(format!("{flag:?} = {on}")));
            }
            Command::Lvl(lvl) => {
                mode.lvl_mode = lvl;
            }
            Command::PyramidCursor(pos) => {
                mode.pyramid_cursor = pos;
            }

            Command::Dump => match serde_json::to_string_pretty(&inventory.snapshot()) {
                Ok(json) => {
                    log.write(LogEvent(json));
                }
                Err(e) => {
                    error!("无法序列化: {e}");
                }
            },
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> anyhow::Result<Command> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let command = match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => Command::Items(parts.next().map(str::to_string)),
        "give" => Command::Give {
            item: required(parts.next(), "item")?.to_string(),
            count: number_or(parts.next(), 1)?,
        },
        "take" => Command::Take {
            item: required(parts.next(), "item")?.to_string(),
            count: number_or(parts.next(), 1)?,
        },
        "inventory" | "inv" | "bag" => Command::List(ListTarget::Bag),
        "pc" => Command::List(ListTarget::Pc),
        "pyramid" => Command::List(ListTarget::Pyramid),
        "deposit" => Command::Deposit {
            pocket: pocket(parts.next())?,
            index: number(parts.next(), "index")?,
            count: number_or(parts.next(), 1)?,
        },
        "withdraw" => Command::Withdraw {
            index: number(parts.next(), "index")?,
            count: number_or(parts.next(), 1)?,
        },
        "toss" => Command::Toss {
            index: number(parts.next(), "index")?,
            count: number_or(parts.next(), 1)?,
        },
        "sort" => Command::Sort(pocket(parts.next())?),
        "compact" => Command::Compact(pocket(parts.next())?),
        "move" => Command::Move {
            pocket: pocket(parts.next())?,
            from: number(parts.next(), "from")?,
            to: number(parts.next(), "to")?,
        },
        "cursor" => Command::Cursor {
            pocket: pocket(parts.next())?,
            position: number(parts.next(), "position")?,
        },
        "rekey" => Command::Rekey(parse_key(required(parts.next(), "key")?)?),
        "mode" => {
            let flag = match required(parts.next(), "flag")? {
                "pyramid" => ModeFlag::Pyramid,
                "arena" => ModeFlag::Arena,
                "base" => ModeFlag::SecretBase,
                other => bail!("未知模式: {other}"),
            };
            let on = match parts.next().unwrap_or("on") {
                "on" | "1" | "true" => true,
                "off" | "0" | "false" => false,
                other => bail!("无效开关: {other}"),
            };
            Command::Mode { flag, on }
        }
        "lvl" => Command::Lvl(number(parts.next(), "lvl")?),
        "pcursor" => Command::PyramidCursor(number(parts.next(), "cursor")?),
        "register" => Command::Register(required(parts.next(), "item")?.to_string()),
        "bike" => Command::Bike,
        "dump" => Command::Dump,
        other => bail!("不支持的命令: {other}"),
    };
    Ok(command)
}

fn required<'a>(token: Option<&'a str>, what: &str) -> anyhow::Result<&'a str> {
    token.ok_or_else(|| anyhow!("缺少参数 <{what}>"))
}

fn number<T: std::str::FromStr>(token: Option<&str>, what: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let token = required(token, what)?;
    token
        .parse()
        .with_context(|| format!("<{what}> 不是有效数字: {token}"))
}

fn number_or(token: Option<&str>, default: u16) -> anyhow::Result<u16> {
    match token {
        Some(_) => number(token, "count"),
        None => Ok(default),
    }
}

fn pocket(token: Option<&str>) -> anyhow::Result<Pocket> {
    let token = required(token, "pocket")?;
    Pocket::parse(token).ok_or_else(|| anyhow!("未知口袋: {token}"))
}

/// 支持十进制与 0x 前缀的十六进制
fn parse_key(token: &str) -> anyhow::Result<u32> {
    let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => token.parse(),
    };
    parsed.with_context(|| format!("无效密钥: {token}"))
}

fn resolve(catalog: &ItemCatalog, token: &str) -> anyhow::Result<ItemId> {
    catalog
        .find(token)
        .ok_or_else(|| anyhow!("不存在物品 {token}"))
}

fn uuid_from_name(name: &str) -> Uuid {
    // 用固定 namespace + 名称字节生成版本 5 UUID，保证可重复得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}
