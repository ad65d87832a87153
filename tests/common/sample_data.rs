//! 测试样本数据

use std::collections::BTreeSet;

use super::test_helpers::DeterministicRng;

/// 生成顺序整数键（大端 8 字节）
pub fn get_sequential_keys(count: usize) -> Vec<Vec<u8>> {
    (0..count as u64).map(|i| i.to_be_bytes().to_vec()).collect()
}

/// 生成互不相同的随机键
///
/// 长度在 1..=16 字节之间变化，保证 trie 同时出现
/// branch、extension、leaf 与 branch value 槽位。
pub fn get_random_keys(count: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = DeterministicRng::new(seed);
    let mut seen = BTreeSet::new();
    let mut keys = Vec::with_capacity(count);

    while keys.len() < count {
        let len = rng.next_range(1, 17) as usize;
        let key = rng.next_bytes(len);
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }
    keys
}

/// 按序号生成 value（非空，长度跨越 inline 阈值两侧）
pub fn value_for(index: usize) -> Vec<u8> {
    let base = format!("value_{}", index).into_bytes();
    if index % 3 == 0 {
        // 每三个里放一个大 value，强制按哈希存储
        let mut long = base;
        long.resize(40, 0x5a);
        long
    } else {
        base
    }
}

/// 长字符串测试数据（URL 格式，含共享前缀与大小写变体）
pub fn get_long_strings() -> Vec<String> {
    vec![
        "http://www.2001aSpaceOdyssey.com/HAL.html".to_string(),
        "http://www.2001aspaceodyssey.com/hal.html".to_string(),
        "http://www.AliceInWonderland.com/WhiteRabbit.html".to_string(),
        "http://www.Alien.com/Xenomorph.html".to_string(),
        "http://www.BladeRunner.com/Replicant.html".to_string(),
        "http://www.BraveNewWorld.com/Soma.html".to_string(),
        "http://www.Catch22.com/Yossarian.html".to_string(),
        "http://www.Clockwork.com/Alex.html".to_string(),
        "http://www.Contact.com/Ellie.html".to_string(),
        "http://www.Dune.com/Arrakis.html".to_string(),
        "http://www.EndersGame.com/BattleRoom.html".to_string(),
        "http://www.Fahrenheit451.com/Montag.html".to_string(),
        "http://www.Foundation.com/Seldon.html".to_string(),
        "http://www.Frankenstein.com/Monster.html".to_string(),
        "http://www.Gravity.com/Ryan.html".to_string(),
        "http://www.Gravity.com/ryan.html".to_string(),
        "http://www.Hitchhikers.com/42.html".to_string(),
        "http://www.Inception.com/Totem.html".to_string(),
        "http://www.Interstellar.com/Tesseract.html".to_string(),
        "http://www.JurassicPark.com/TRex.html".to_string(),
        "http://www.LordOfTheRings.com/OneRing.html".to_string(),
        "http://www.Matrix.com/RedPill.html".to_string(),
        "http://www.Neuromancer.com/Wintermute.html".to_string(),
        "http://www.Solaris.com/Ocean.html".to_string(),
        "http://www.WarOfTheWorlds.com/Tripod.html".to_string(),
    ]
}
