/// 背包数量的 XOR 混淆
///
/// 只作用于背包口袋里的数量；PC 仓库与金字塔背包存明文。
/// 密钥是 32 位，只有低 16 位会碰到数量。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantityCodec {
    key: u32,
}

impl QuantityCodec {
    pub fn new(key: u32) -> Self {
        Self { key }
    }

    pub fn key(&self) -> u32 {
        self.key
    }

    pub fn decode(&self, raw: u16) -> u16 {
        raw ^ self.key as u16
    }

    pub fn encode(&self, plain: u16) -> u16 {
        plain ^ self.key as u16
    }

    /// 把旧密钥下的存储值换成新密钥下的存储值，明文不变
    pub fn rekey(&self, raw: u16, new: &QuantityCodec) -> u16 {
        new.encode(self.decode(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_inverts_encode() {
        for key in [0u32, 1, 0xBEEF, 0xDEAD_BEEF, u32::MAX] {
            let codec = QuantityCodec::new(key);
            for q in [0u16, 1, 99, 999, 0x7FFF, u16::MAX] {
                assert_eq!(codec.decode(codec.encode(q)), q);
            }
        }
    }

    #[test]
    fn zero_key_is_identity() {
        let codec = QuantityCodec::default();
        assert_eq!(codec.encode(42), 42);
    }

    #[test]
    fn only_low_half_of_key_applies() {
        let a = QuantityCodec::new(0x1234_00FF);
        let b = QuantityCodec::new(0x0000_00FF);
        assert_eq!(a.encode(7), b.encode(7));
    }

    #[test]
    fn rekey_preserves_plain_value() {
        let old = QuantityCodec::new(0x1111);
        let new = QuantityCodec::new(0xA5A5);
        let raw = old.encode(150);
        assert_eq!(new.decode(old.rekey(raw, &new)), 150);
    }
}
