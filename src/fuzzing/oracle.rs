//! Compare the trie against the linear scan.

use super::*;

qc!(same_as_linear, _same_as_linear);
fn _same_as_linear((list, extra): (Vec<(TestPrefix, i32)>, Vec<u32>)) -> bool {
    let mut trie = PrefixTrie::new();
    let mut linear = LinearPrefixSet::new();
    for (p, t) in list.iter().copied() {
        trie.insert(p, t).unwrap();
        linear.insert(p, t).unwrap();
    }

    let ops = list
        .iter()
        .map(|(p, t)| Operation::Add(*p, *t))
        .collect::<Vec<_>>();
    interesting_addrs(&ops, &extra).into_iter().all(|addr| {
        trie.longest_match(&addr) == linear.longest_match(&addr)
            && trie.longest_match_entry(&addr) == linear.longest_match_entry(&addr)
    })
}

qc!(same_as_linear_after_removal, _same_as_linear_after_removal);
fn _same_as_linear_after_removal(
    (list, extra): (Vec<Operation<TestPrefix, i32>>, Vec<u32>),
) -> bool {
    let (trie, hmap) = build(&list);
    let mut linear = LinearPrefixSet::new();
    for (p, t) in hmap {
        linear.insert(p, t).unwrap();
    }

    interesting_addrs(&list, &extra)
        .into_iter()
        .all(|addr| trie.longest_match(&addr) == linear.longest_match(&addr))
}

qc!(matches_are_ordered, _matches_are_ordered);
fn _matches_are_ordered((list, extra): (Vec<Operation<TestPrefix, i32>>, Vec<u32>)) -> bool {
    let (trie, hmap) = build(&list);

    interesting_addrs(&list, &extra).into_iter().all(|addr| {
        let mut want = hmap
            .iter()
            .filter(|(p, _)| p.covers(addr))
            .map(|(p, t)| (*p, t))
            .collect::<Vec<_>>();
        want.sort_by_key(|(p, _)| p.1);
        let got = trie.matches(&addr).collect::<Vec<_>>();
        got.last().map(|(_, t)| *t) == trie.longest_match(&addr) && got == want
    })
}
