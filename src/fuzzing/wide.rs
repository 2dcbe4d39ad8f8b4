//! Compare the trie against the linear scan with raw `(R, u8)` prefixes, using every length from
//! `/0` up to the full width of `R`.

use std::collections::HashMap;
use std::hash::Hash;

use num_traits::{CheckedShr, PrimInt, Unsigned};

use super::*;
use crate::prefix::{mask_from_prefix_len, single_bit};

trait Repr: Unsigned + PrimInt + CheckedShr + Arbitrary + Hash + Debug {}

impl<R> Repr for R where R: Unsigned + PrimInt + CheckedShr + Arbitrary + Hash + Debug {}

/// A prefix with any length between `/0` and `/W`, whose host bits are left as generated.
#[derive(Debug, PartialEq, Clone, Copy)]
struct WidePrefix<R>(R, u8);

impl<R: Repr> WidePrefix<R> {
    fn raw(&self) -> (R, u8) {
        (self.0, self.1)
    }

    /// The prefix with its host bits cleared.
    fn key(&self) -> (R, u8) {
        (self.0 & mask_from_prefix_len(self.1), self.1)
    }

    /// The prefix of half the length, so that every generated prefix has a covering one.
    fn parent(&self) -> Self {
        Self(self.0, self.1 / 2)
    }

    /// First and last address, the generated address itself, and the first address of the
    /// sibling prefix (which differs only in the last significant bit).
    fn addrs(&self) -> [R; 4] {
        let (first, len) = self.key();
        let last = first | !mask_from_prefix_len::<R>(len);
        let sibling = if len == 0 {
            first
        } else {
            first ^ single_bit::<R>(len - 1)
        };
        [first, last, self.0, sibling]
    }
}

impl<R: Repr> Arbitrary for WidePrefix<R> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let width = <(R, u8)>::max_len() as u16;
        let len = (u16::arbitrary(g) % (width + 1)) as u8;
        Self(R::arbitrary(g), len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.1 == 0 {
            quickcheck::empty_shrinker()
        } else {
            quickcheck::single_shrinker(Self(self.0, self.1 - 1))
        }
    }
}

fn agrees<R: Repr>(
    trie: &PrefixTrie<(R, u8), i32>,
    hmap: &HashMap<(R, u8), i32>,
    addrs: &[R],
) -> bool {
    let mut linear = LinearPrefixSet::new();
    for (p, t) in hmap {
        linear.insert(*p, *t).unwrap();
    }
    trie.len() == hmap.len()
        && addrs.iter().all(|addr| {
            let want = linear.longest_match_entry(addr);
            trie.longest_match(addr) == want.map(|(_, t)| t)
                && trie.longest_match_entry(addr) == want
        })
}

fn _same_as_linear<R: Repr>((list, extra): (Vec<(WidePrefix<R>, i32)>, Vec<R>)) -> bool {
    let mut trie = PrefixTrie::new();
    let mut hmap = HashMap::new();
    for (p, t) in &list {
        for q in [p.parent(), *p] {
            trie.insert(q.raw(), *t).unwrap();
            hmap.insert(q.key(), *t);
        }
    }

    let addrs = list
        .iter()
        .flat_map(|(p, _)| p.addrs())
        .chain(extra.iter().copied())
        .collect::<Vec<_>>();
    if !agrees(&trie, &hmap, &addrs) {
        return false;
    }

    for (p, _) in list.iter().step_by(3) {
        trie.remove(&p.raw());
        hmap.remove(&p.key());
    }
    agrees(&trie, &hmap, &addrs)
}

#[generic_tests::define]
mod t {
    use super::*;

    #[test]
    fn same_as_linear<R: Repr>() {
        proptest_runner(_same_as_linear::<R>)
    }

    #[instantiate_tests(<u32>)]
    mod u32_keys {}

    #[instantiate_tests(<u128>)]
    mod u128_keys {}
}
