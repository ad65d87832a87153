//! 测试辅助函数

/// 确定性随机数生成器（用于可重复测试）
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1), // xorshift 状态不能为 0
        }
    }

    /// 生成下一个随机 u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// 生成 [min, max) 范围内的随机数
    pub fn next_range(&mut self, min: u64, max: u64) -> u64 {
        min + (self.next_u64() % (max - min))
    }

    /// 生成指定长度的随机字节串
    pub fn next_bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| (self.next_u64() & 0xff) as u8).collect()
    }

    /// 就地洗牌（Fisher-Yates）
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_range(0, (i + 1) as u64) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_rng() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = DeterministicRng::new(7);
        for _ in 0..1000 {
            let value = rng.next_range(3, 10);
            assert!((3..10).contains(&value));
        }
    }
}
