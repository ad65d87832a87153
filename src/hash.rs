//! Hash 函数抽象层
//!
//! 提供模块化的 Hash 支持，便于在 keccak256 和 blake3 之间切换。
//! MPT 的根哈希由这里选择的算法决定：需要与以太坊工具链对比根哈希时
//! 必须使用 Keccak256，纯性能测评时可以切换到 Blake3。

/// 32 字节哈希输出类型
pub type HashOutput = [u8; 32];

/// Hash 函数 trait
///
/// 所有实现必须满足：
/// 1. 确定性：相同输入产生相同输出
/// 2. 抗碰撞：不同输入极难产生相同输出
/// 3. 输出固定 32 字节
///
/// 节点编码依赖 32 字节的输出长度来区分"哈希引用"与"inline 编码"，
/// 因此输出长度不可配置。
pub trait Hasher {
    /// 计算输入数据的哈希值
    fn hash(data: &[u8]) -> HashOutput;

    /// 返回算法名称（用于日志和调试）
    fn name() -> &'static str;
}

/// Keccak256 哈希实现
///
/// 以太坊生态标准。MPT 的 wire format 兼容性以 Keccak256 为基准，
/// 因此它是 `MptTree` 的默认哈希算法。
pub struct Keccak256Hasher;

impl Hasher for Keccak256Hasher {
    fn hash(data: &[u8]) -> HashOutput {
        use tiny_keccak::{Hasher as TinyHasher, Keccak};

        let mut output = [0u8; 32];
        let mut hasher = Keccak::v256();
        hasher.update(data);
        hasher.finalize(&mut output);
        output
    }

    fn name() -> &'static str {
        "keccak256"
    }
}

/// Blake3 哈希实现
///
/// 比 keccak256 快约 5x，支持 SIMD 并行计算。
/// 推荐用于不需要以太坊兼容性的性能敏感场景。
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn hash(data: &[u8]) -> HashOutput {
        blake3::hash(data).into()
    }

    fn name() -> &'static str {
        "blake3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_determinism() {
        let data = b"persistent-mpt-test-data";

        let hash1 = Keccak256Hasher::hash(data);
        let hash2 = Keccak256Hasher::hash(data);

        assert_eq!(hash1, hash2, "Keccak256 should be deterministic");
    }

    #[test]
    fn test_blake3_determinism() {
        let data = b"persistent-mpt-test-data";

        let hash1 = Blake3Hasher::hash(data);
        let hash2 = Blake3Hasher::hash(data);

        assert_eq!(hash1, hash2, "Blake3 should be deterministic");
    }

    #[test]
    fn test_keccak256_known_vectors() {
        // keccak256("") 的标准测试向量
        let empty = Keccak256Hasher::hash(b"");
        assert_eq!(
            hex::encode(empty),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );

        // keccak256(rlp("")) = keccak256(0x80)：空 trie 的根哈希
        let empty_rlp = Keccak256Hasher::hash(&rlp::NULL_RLP);
        assert_eq!(
            hex::encode(empty_rlp),
            "56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421"
        );
    }

    #[test]
    fn test_different_hashers_produce_different_output() {
        let data = b"test-input";

        let keccak_hash = Keccak256Hasher::hash(data);
        let blake3_hash = Blake3Hasher::hash(data);

        assert_ne!(
            keccak_hash, blake3_hash,
            "Different hash algorithms should produce different outputs"
        );
    }

    #[test]
    fn test_different_inputs_produce_different_output() {
        let data1 = b"input-one";
        let data2 = b"input-two";

        assert_ne!(
            Keccak256Hasher::hash(data1),
            Keccak256Hasher::hash(data2),
            "Different inputs should produce different hashes"
        );

        assert_ne!(
            Blake3Hasher::hash(data1),
            Blake3Hasher::hash(data2),
            "Different inputs should produce different hashes"
        );
    }

    #[test]
    fn test_hasher_names() {
        assert_eq!(Keccak256Hasher::name(), "keccak256");
        assert_eq!(Blake3Hasher::name(), "blake3");
    }
}
