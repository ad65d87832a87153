//! Nibble key 抽象
//!
//! MPT 以半字节（nibble，4 bit）为单位寻址 key。`NibbleKey` 是字节缓冲区
//! 上的 nibble 序列视图，附带一个 terminator 标志（标记 leaf key）。
//!
//! # 表示
//!
//! `(bytes, offset)` 二元组：`bytes` 中每个字节按高-低顺序存放两个
//! nibble，`offset` 是视图起点的 nibble 偏移。`shift` 只推进 offset，
//! 与原视图共享同一缓冲区，不做任何拷贝。
//!
//! # Packed wire form（hex-prefix 编码）
//!
//! 序列化时首字节的高 nibble 存放两个标志位：
//! - bit 0 (`0x1`)：odd-offset，数据 nibble 从首字节的低 nibble 开始
//! - bit 1 (`0x2`)：terminator，该 key 属于 leaf 节点
//!
//! 偶数长度时首字节低 nibble 为 0，数据从第二个字节开始。

use std::sync::Arc;

use crate::error::{TrieError, TrieResult};

/// 字节缓冲区上的 nibble 序列视图
///
/// 不可变值类型：所有公开构造函数返回后缓冲区不再被写入，
/// `shift` 产生的视图可以安全共享同一缓冲区。
///
/// # 不变量
///
/// 1. `offset <= bytes.len() * 2`
/// 2. 空 key 在 API 边界上始终是 terminal（`is_terminal()` 返回 true），
///    与构造方式无关
#[derive(Clone)]
pub struct NibbleKey {
    /// 共享的字节缓冲区（高-低 nibble 顺序）
    bytes: Arc<[u8]>,
    /// 视图起点的 nibble 偏移
    offset: usize,
    /// terminator 标志（构造时记录；空 key 的对外语义见 `is_terminal`）
    terminal: bool,
}

impl NibbleKey {
    // ========================================================================
    // 构造函数
    // ========================================================================

    /// 从原始字节 key 构造（每字节两个 nibble，非 terminal）
    pub fn from_normal(bytes: &[u8]) -> Self {
        Self {
            bytes: Arc::from(bytes),
            offset: 0,
            terminal: false,
        }
    }

    /// 从 packed wire form 解析
    ///
    /// 首字节高 nibble 携带 odd-offset 和 terminator 标志；
    /// odd 时数据从首字节低 nibble 开始（offset = 1），
    /// 否则从第二个字节开始（offset = 2）。
    pub fn from_packed(packed: &[u8]) -> Self {
        if packed.is_empty() {
            return Self::empty();
        }

        let flags = packed[0] >> 4;
        let odd = flags & 0x1 != 0;
        let terminal = flags & 0x2 != 0;

        Self {
            bytes: Arc::from(packed),
            offset: if odd { 1 } else { 2 },
            terminal,
        }
    }

    /// 零长度 key（约定为 terminal）
    pub fn empty() -> Self {
        Self {
            bytes: Arc::from(Vec::new()),
            offset: 0,
            terminal: true,
        }
    }

    /// 单 nibble、非 terminal 的 key
    pub fn single_hex(hex: u8) -> Self {
        debug_assert!(hex < 16);
        Self {
            bytes: Arc::from(&[hex & 0x0f][..]),
            offset: 1,
            terminal: false,
        }
    }

    // ========================================================================
    // 基本访问器
    // ========================================================================

    /// nibble 数量
    #[inline]
    pub fn length(&self) -> usize {
        self.bytes.len() * 2 - self.offset
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// 是否为 terminal（leaf key）
    ///
    /// 空 key 无论如何构造都报告 terminal，与序列化约定保持一致
    /// （空 leaf key 的 packed form 固定为 `[0x20]`）。
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal || self.is_empty()
    }

    /// 取第 `i` 个 nibble（0..=15）
    #[inline]
    pub fn get_hex(&self, i: usize) -> u8 {
        let pos = self.offset + i;
        debug_assert!(pos < self.bytes.len() * 2);
        let byte = self.bytes[pos / 2];
        if pos % 2 == 0 {
            byte >> 4
        } else {
            byte & 0x0f
        }
    }

    // ========================================================================
    // 视图与组合操作
    // ========================================================================

    /// 前进 `n` 个 nibble 的视图（共享缓冲区，无分配）
    pub fn shift(&self, n: usize) -> Self {
        debug_assert!(n <= self.length());
        Self {
            bytes: Arc::clone(&self.bytes),
            offset: self.offset + n,
            terminal: self.terminal,
        }
    }

    /// 同一视图、terminator 置位的副本（共享缓冲区）
    ///
    /// 用于把插入路径上剩余的 key 转为 leaf key。
    pub fn as_terminal(&self) -> Self {
        Self {
            bytes: Arc::clone(&self.bytes),
            offset: self.offset,
            terminal: true,
        }
    }

    /// 若 `self` 以 `other` 的全部 nibble 开头，返回去掉该前缀的视图
    ///
    /// 两个操作数 offset 奇偶性一致时按整字节比较，否则逐 nibble 比较。
    pub fn match_and_shift(&self, other: &NibbleKey) -> Option<NibbleKey> {
        let n = other.length();
        if n > self.length() {
            return None;
        }

        if self.offset % 2 == other.offset % 2 {
            // 整字节快速路径：对齐后中段可以直接比较字节切片
            let mut i = 0;
            if self.offset % 2 == 1 && n > 0 {
                if self.get_hex(0) != other.get_hex(0) {
                    return None;
                }
                i = 1;
            }
            let full = (n - i) / 2;
            let a = (self.offset + i) / 2;
            let b = (other.offset + i) / 2;
            if self.bytes[a..a + full] != other.bytes[b..b + full] {
                return None;
            }
            for j in (i + full * 2)..n {
                if self.get_hex(j) != other.get_hex(j) {
                    return None;
                }
            }
        } else {
            for j in 0..n {
                if self.get_hex(j) != other.get_hex(j) {
                    return None;
                }
            }
        }

        Some(self.shift(n))
    }

    /// 拼接两个 key（分配新缓冲区）
    ///
    /// terminal key 不能再扩展，此时返回 `InvalidState`。
    /// 结果的 terminator 取 `other` 的对外值。
    pub fn concat(&self, other: &NibbleKey) -> TrieResult<NibbleKey> {
        if self.is_terminal() {
            return Err(TrieError::InvalidState("cannot concat onto a terminal key"));
        }

        let total = self.length() + other.length();
        let offset = total % 2;
        let mut buf = vec![0u8; (total + 1) / 2];

        for i in 0..self.length() {
            set_hex(&mut buf, offset + i, self.get_hex(i));
        }
        for i in 0..other.length() {
            set_hex(&mut buf, offset + self.length() + i, other.get_hex(i));
        }

        Ok(NibbleKey {
            bytes: Arc::from(buf),
            offset,
            terminal: other.is_terminal(),
        })
    }

    /// 最长公共 nibble 前缀（分配新缓冲区，非 terminal）
    pub fn common_prefix(&self, other: &NibbleKey) -> NibbleKey {
        let max = self.length().min(other.length());
        let mut n = 0;
        while n < max && self.get_hex(n) == other.get_hex(n) {
            n += 1;
        }

        let offset = n % 2;
        let mut buf = vec![0u8; (n + 1) / 2];
        for i in 0..n {
            set_hex(&mut buf, offset + i, self.get_hex(i));
        }

        NibbleKey {
            bytes: Arc::from(buf),
            offset,
            terminal: false,
        }
    }

    // ========================================================================
    // Packed wire form
    // ========================================================================

    /// 序列化为 packed wire form
    ///
    /// flags = `odd_offset | (is_terminal << 1)`，置于首字节高 nibble；
    /// 奇数长度时第一个数据 nibble 放进首字节低 nibble。
    pub fn to_packed(&self) -> Vec<u8> {
        let len = self.length();
        let odd = len % 2 == 1;
        let pad = if odd { 1 } else { 2 };

        let mut out = vec![0u8; len / 2 + 1];
        let flags = (odd as u8) | ((self.is_terminal() as u8) << 1);
        out[0] = flags << 4;

        for i in 0..len {
            set_hex(&mut out, pad + i, self.get_hex(i));
        }
        out
    }
}

/// 向缓冲区写入第 `pos` 个 nibble（仅在构造期间使用）
#[inline]
fn set_hex(buf: &mut [u8], pos: usize, nibble: u8) {
    if pos % 2 == 0 {
        buf[pos / 2] |= nibble << 4;
    } else {
        buf[pos / 2] |= nibble & 0x0f;
    }
}

impl PartialEq for NibbleKey {
    fn eq(&self, other: &Self) -> bool {
        if self.length() != other.length() || self.is_terminal() != other.is_terminal() {
            return false;
        }
        (0..self.length()).all(|i| self.get_hex(i) == other.get_hex(i))
    }
}

impl Eq for NibbleKey {}

// 基于内容的哈希：nibble 序列 + terminator 标志。
// 不同缓冲区上的相等 key 必须产生相同的哈希值。
impl std::hash::Hash for NibbleKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for i in 0..self.length() {
            state.write_u8(self.get_hex(i));
        }
        state.write_u8(self.is_terminal() as u8);
    }
}

impl std::fmt::Debug for NibbleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NibbleKey(")?;
        for i in 0..self.length() {
            write!(f, "{:x}", self.get_hex(i))?;
        }
        if self.is_terminal() {
            write!(f, ", T")?;
        }
        write!(f, ")")
    }
}
