//! 顺序键测试

use persistent_mpt::{MemoryStore, MptTree};

mod common;

use common::sample_data::{get_sequential_keys, value_for};

fn create_tree() -> MptTree<MemoryStore> {
    MptTree::new(MemoryStore::new())
}

/// 测试：顺序插入 1000 个键
#[test]
fn test_sequential_insert_1000() {
    let mut tree = create_tree();
    let keys = get_sequential_keys(1000);

    for (i, key) in keys.iter().enumerate() {
        tree.put(key, value_for(i)).unwrap();
    }

    for (i, key) in keys.iter().enumerate() {
        assert_eq!(tree.get(key).unwrap(), Some(value_for(i)));
    }
}

/// 测试：顺序插入与逆序插入的根哈希一致
#[test]
fn test_sequential_vs_reverse_root() {
    let keys = get_sequential_keys(500);

    let mut forward = create_tree();
    for (i, key) in keys.iter().enumerate() {
        forward.put(key, value_for(i)).unwrap();
    }

    let mut backward = create_tree();
    for (i, key) in keys.iter().enumerate().rev() {
        backward.put(key, value_for(i)).unwrap();
    }

    assert_eq!(forward.root_hash().unwrap(), backward.root_hash().unwrap());
}

/// 测试：顺序删除前半部分
#[test]
fn test_sequential_delete_first_half() {
    let mut tree = create_tree();
    let keys = get_sequential_keys(200);

    for (i, key) in keys.iter().enumerate() {
        tree.put(key, value_for(i)).unwrap();
    }
    for key in keys.iter().take(100) {
        tree.delete(key).unwrap();
    }

    for (i, key) in keys.iter().enumerate() {
        let expected = if i < 100 { None } else { Some(value_for(i)) };
        assert_eq!(tree.get(key).unwrap(), expected);
    }

    // 与只插入后半部分的树一致
    let mut rebuilt = create_tree();
    for (i, key) in keys.iter().enumerate().skip(100) {
        rebuilt.put(key, value_for(i)).unwrap();
    }
    assert_eq!(tree.root_hash().unwrap(), rebuilt.root_hash().unwrap());
}

/// 测试：全部删除后回到空树
#[test]
fn test_sequential_delete_all() {
    let mut tree = create_tree();
    let keys = get_sequential_keys(300);

    for (i, key) in keys.iter().enumerate() {
        tree.put(key, value_for(i)).unwrap();
    }
    for key in &keys {
        tree.delete(key).unwrap();
    }

    assert!(tree.is_empty());
    assert_eq!(tree.root_hash().unwrap(), tree.empty_root_hash());
}

/// 测试：穿插 flush 不影响语义
#[test]
fn test_interleaved_flush() {
    let mut tree = create_tree();
    let keys = get_sequential_keys(100);

    for (i, key) in keys.iter().enumerate() {
        tree.put(key, value_for(i)).unwrap();
        if i % 10 == 9 {
            tree.flush().unwrap();
        }
    }

    for (i, key) in keys.iter().enumerate() {
        assert_eq!(tree.get(key).unwrap(), Some(value_for(i)));
    }

    // 与一次性构建的树根哈希一致
    let mut oneshot = create_tree();
    for (i, key) in keys.iter().enumerate() {
        oneshot.put(key, value_for(i)).unwrap();
    }
    assert_eq!(tree.root_hash().unwrap(), oneshot.root_hash().unwrap());
}
