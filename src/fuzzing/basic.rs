use std::collections::HashMap;

use super::*;
use itertools::Itertools;

qc!(new, _new);
fn _new(list: Vec<(TestPrefix, i32)>) -> bool {
    let mut trie = PrefixTrie::new();
    let mut hmap = HashMap::new();

    for (p, t) in list {
        trie.insert(p, t).unwrap();
        hmap.insert(p, t);
    }

    // assert that the iterator of both is the same
    trie.iter()
        .map(|(p, t)| (p, *t))
        .eq(hmap.into_iter().sorted())
}

qc!(new_mods, _new_mods);
fn _new_mods(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let (trie, hmap) = build(&list);

    trie.len() == hmap.len()
        && trie
            .iter()
            .map(|(p, t)| (p, *t))
            .eq(hmap.into_iter().sorted())
}

qc!(get_exact, _get_exact);
fn _get_exact(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let (trie, hmap) = build(&list);

    list.iter().all(|op| {
        let p = match op {
            Operation::Add(p, _) | Operation::Remove(p) => p,
        };
        trie.get(p) == hmap.get(p) && trie.contains_key(p) == hmap.contains_key(p)
    })
}

qc!(equality, _equality);
fn _equality(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let (trie, hmap) = build(&list);

    let rebuilt = PrefixTrie::try_from_iter(hmap.into_iter().sorted()).unwrap();
    trie == rebuilt && trie.clone() == trie
}

qc!(idempotent_insert, _idempotent_insert);
fn _idempotent_insert(list: Vec<(TestPrefix, i32)>) -> bool {
    let once = PrefixTrie::try_from_iter(list.iter().copied()).unwrap();
    let twice = PrefixTrie::try_from_iter(list.iter().chain(list.iter()).copied()).unwrap();
    once == twice && once.node_count() == twice.node_count()
}

qc!(removal_prunes, _removal_prunes);
fn _removal_prunes(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let (trie, hmap) = build(&list);

    // a trie that never saw the removed prefixes has exactly the same nodes
    let fresh = PrefixTrie::try_from_iter(hmap).unwrap();
    trie.node_count() == fresh.node_count()
}

qc!(remove_children, _remove_children);
fn _remove_children((list, root): (Vec<(TestPrefix, i32)>, TestPrefix)) -> bool {
    let mut trie = PrefixTrie::try_from_iter(list.iter().copied()).unwrap();
    let mut hmap: HashMap<_, _> = list.into_iter().collect();

    trie.remove_children(&root);
    hmap.retain(|p, _| !root.contains(p));

    let fresh = PrefixTrie::try_from_iter(hmap.iter().map(|(p, t)| (*p, *t))).unwrap();
    trie.len() == hmap.len()
        && trie.node_count() == fresh.node_count()
        && trie
            .iter()
            .map(|(p, t)| (p, *t))
            .eq(hmap.into_iter().sorted())
}

qc!(children, _children);
fn _children((list, root): (Vec<(TestPrefix, i32)>, TestPrefix)) -> bool {
    let trie = PrefixTrie::try_from_iter(list.iter().copied()).unwrap();
    let hmap: HashMap<_, _> = list.into_iter().collect();

    let want = hmap
        .into_iter()
        .filter(|(p, _)| root.contains(p))
        .sorted()
        .collect::<Vec<_>>();
    let got = trie
        .children(&root)
        .map(|(p, t)| (p, *t))
        .collect::<Vec<_>>();
    got == want
}

qc!(get_lpm, _get_lpm);
fn _get_lpm((list, query): (Vec<Operation<TestPrefix, i32>>, TestPrefix)) -> bool {
    let (trie, hmap) = build(&list);

    let want = hmap
        .iter()
        .filter(|(p, _)| p.contains(&query))
        .max_by_key(|(p, _)| p.1)
        .map(|(p, t)| (*p, t));
    trie.get_lpm(&query) == want
}
