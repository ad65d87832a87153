//! 持久化与根生命周期测试

use persistent_mpt::{CachedStore, MemoryStore, MptTree};

mod common;

use common::sample_data::{get_random_keys, value_for};

fn create_tree() -> MptTree<MemoryStore> {
    MptTree::new(MemoryStore::new())
}

/// 测试：flush 后在同一存储上按根哈希重建
#[test]
fn test_persistence_cycle() {
    let mut tree = create_tree();
    let keys = get_random_keys(200, 424242);

    for (i, key) in keys.iter().enumerate() {
        tree.put(key, value_for(i)).unwrap();
    }
    tree.flush().unwrap();
    let root = tree.root_hash().unwrap();

    // 同一存储、新实例
    let store = tree.store().clone();
    let mut reloaded: MptTree<MemoryStore> = MptTree::with_root(store, root);

    for (i, key) in keys.iter().enumerate() {
        assert_eq!(
            reloaded.get(key).unwrap(),
            Some(value_for(i)),
            "key {} must survive the persistence cycle",
            i
        );
    }
    assert_eq!(reloaded.root_hash().unwrap(), root);
}

/// 测试：重建后的树可以继续变更
#[test]
fn test_mutation_after_reload() {
    let mut tree = create_tree();
    tree.put(b"alpha", b"1".to_vec()).unwrap();
    tree.put(b"beta", b"2".to_vec()).unwrap();
    tree.flush().unwrap();
    let root = tree.root_hash().unwrap();

    let mut reloaded: MptTree<MemoryStore> = MptTree::with_root(tree.store().clone(), root);
    reloaded.put(b"gamma", b"3".to_vec()).unwrap();
    reloaded.delete(b"alpha").unwrap();

    assert_eq!(reloaded.get(b"alpha").unwrap(), None);
    assert_eq!(reloaded.get(b"beta").unwrap(), Some(b"2".to_vec()));
    assert_eq!(reloaded.get(b"gamma").unwrap(), Some(b"3".to_vec()));

    // 原根在存储中依然可用（历史快照）……
    // 注意：dispose 会清理被替换的节点，因此这里只验证新根自洽
    let new_root = reloaded.root_hash().unwrap();
    let mut third: MptTree<MemoryStore> = MptTree::with_root(reloaded.store().clone(), new_root);
    assert_eq!(third.get(b"gamma").unwrap(), Some(b"3".to_vec()));
}

/// 测试：空 trie 哈希在三种路径下一致
#[test]
fn test_empty_root_hash_stability() {
    // 1. 新建的空树
    let mut fresh = create_tree();
    let empty_hash = fresh.root_hash().unwrap();

    // 2. 插入后删除回到空
    let mut churned = create_tree();
    churned.put(b"key", b"value".to_vec()).unwrap();
    churned.delete(b"key").unwrap();
    assert_eq!(churned.root_hash().unwrap(), empty_hash);

    // 3. set_root 到哨兵哈希
    let mut reset = create_tree();
    reset.put(b"key", b"value".to_vec()).unwrap();
    let sentinel = reset.empty_root_hash();
    reset.set_root(sentinel);
    assert_eq!(reset.root_hash().unwrap(), empty_hash);
}

/// 测试：CachedStore 包装下的完整生命周期
#[test]
fn test_cached_store_lifecycle() {
    let backing = MemoryStore::new();
    let backing_handle = backing.clone();

    let mut tree: MptTree<CachedStore<MemoryStore>> =
        MptTree::new(CachedStore::new(backing));
    let keys = get_random_keys(100, 777);

    for (i, key) in keys.iter().enumerate() {
        tree.put(key, value_for(i)).unwrap();
    }
    // root_hash 只写缓存，flush 才落底层
    let root = tree.root_hash().unwrap();
    assert!(backing_handle.is_empty(), "write-back cache defers all writes");

    tree.flush().unwrap();
    assert!(!backing_handle.is_empty());

    // 直接在底层存储上重建
    let mut reloaded: MptTree<MemoryStore> = MptTree::with_root(backing_handle, root);
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(reloaded.get(key).unwrap(), Some(value_for(i)));
    }
}

/// 测试：flush 之间根哈希保持稳定
#[test]
fn test_root_hash_stable_across_flushes() {
    let mut tree = create_tree();
    let keys = get_random_keys(50, 888);

    for (i, key) in keys.iter().enumerate() {
        tree.put(key, value_for(i)).unwrap();
    }

    let before = tree.root_hash().unwrap();
    tree.flush().unwrap();
    let after = tree.root_hash().unwrap();
    assert_eq!(before, after, "flush must not change the logical state");

    // 读一遍再看根哈希
    for key in &keys {
        tree.get(key).unwrap();
    }
    assert_eq!(tree.root_hash().unwrap(), after);
}
