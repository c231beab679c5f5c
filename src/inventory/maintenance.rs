//! 口袋整理：压缩空格、按编号排序、拖拽移动

/// 把空格往后挪
///
/// 逐对交换：对每个 i，只要 i 仍为空就与后面的每个 j 交换。
/// 界面依赖这个确切的结果顺序，不要换成别的分区算法。
pub fn compact_by<T>(slots: &mut [T], is_empty: impl Fn(&T) -> bool) {
    let len = slots.len();
    for i in 0..len.saturating_sub(1) {
        for j in i + 1..len {
            if is_empty(&slots[i]) {
                slots.swap(i, j);
            }
        }
    }
}

/// 非空格按键升序，空格排最后
pub fn sort_by_key<T, K: PartialOrd>(
    slots: &mut [T],
    is_empty: impl Fn(&T) -> bool,
    key: impl Fn(&T) -> K,
) {
    let len = slots.len();
    for i in 0..len.saturating_sub(1) {
        for j in i + 1..len {
            let in_order = !is_empty(&slots[i])
                && (is_empty(&slots[j]) || key(&slots[i]) <= key(&slots[j]));
            if !in_order {
                slots.swap(i, j);
            }
        }
    }
}

/// 把 `from` 处的元素移到下标 `to`，中间元素顺移一位
///
/// 越界时返回 false 且不改动。
pub fn move_slot<T>(slots: &mut [T], from: usize, to: usize) -> bool {
    if from >= slots.len() || to >= slots.len() {
        return false;
    }
    if from < to {
        slots[from..=to].rotate_left(1);
    } else if from > to {
        slots[to..=from].rotate_right(1);
    }
    true
}
