//! Module that contains the implementation for the iterators

use num_traits::Zero;

use crate::prefix::{bit_at, mask_from_prefix_len, single_bit};
use crate::Prefix;

use super::PrefixTrie;

/// An iterator over all entries of a [`PrefixTrie`] in lexicographic order. Prefixes are
/// reconstructed from the path through the trie, so they are yielded by value and with all host
/// bits cleared.
pub struct Iter<'a, P: Prefix, T> {
    trie: &'a PrefixTrie<P, T>,
    nodes: Vec<(usize, P::R, u8)>,
}

impl<P: Prefix, T> Clone for Iter<'_, P, T> {
    fn clone(&self) -> Self {
        Self {
            trie: self.trie,
            nodes: self.nodes.clone(),
        }
    }
}

impl<'a, P: Prefix, T> Iterator for Iter<'a, P, T> {
    type Item = (P, &'a T);

    fn next(&mut self) -> Option<(P, &'a T)> {
        while let Some((cur, repr, depth)) = self.nodes.pop() {
            let node = &self.trie.table[cur];
            if let Some(right) = node.children[1] {
                self.nodes
                    .push((right, repr | single_bit::<P::R>(depth), depth + 1));
            }
            if let Some(left) = node.children[0] {
                self.nodes.push((left, repr, depth + 1));
            }
            if let Some(v) = &node.value {
                return Some((P::from_repr_len(repr, depth), v));
            }
        }
        None
    }
}

/// An iterator over all prefixes of a [`PrefixTrie`] in lexicographic order.
pub struct Keys<'a, P: Prefix, T> {
    inner: Iter<'a, P, T>,
}

impl<P: Prefix, T> Iterator for Keys<'_, P, T> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over all values of a [`PrefixTrie`] in lexicographic order of their associated
/// prefixes.
pub struct Values<'a, P: Prefix, T> {
    inner: Iter<'a, P, T>,
}

impl<'a, P: Prefix, T> Iterator for Values<'a, P, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An iterator over all entries that cover a given address, ordered from the least to the most
/// specific prefix. Created by [`PrefixTrie::matches`].
pub struct Matches<'a, P: Prefix, T> {
    pub(super) trie: &'a PrefixTrie<P, T>,
    pub(super) repr: P::R,
    pub(super) idx: Option<usize>,
    pub(super) depth: u8,
}

impl<'a, P: Prefix, T> Iterator for Matches<'a, P, T> {
    type Item = (P, &'a T);

    fn next(&mut self) -> Option<(P, &'a T)> {
        loop {
            let cur = self.idx?;
            let depth = self.depth;
            let node = &self.trie.table[cur];
            self.idx = if depth < P::max_len() {
                node.children[bit_at(self.repr, depth) as usize]
            } else {
                None
            };
            self.depth = depth.saturating_add(1);
            if let Some(v) = &node.value {
                let prefix = P::from_repr_len(self.repr & mask_from_prefix_len(depth), depth);
                return Some((prefix, v));
            }
        }
    }
}

impl<'a, P: Prefix, T> IntoIterator for &'a PrefixTrie<P, T> {
    type Item = (P, &'a T);

    type IntoIter = Iter<'a, P, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<P: Prefix, T> PrefixTrie<P, T> {
    /// An iterator visiting all key-value pairs in lexicographic order: shorter prefixes come
    /// before the more specific prefixes they cover, and a `0` bit sorts before a `1` bit.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// trie.insert("192.168.1.0/24".parse()?, 3)?;
    /// trie.insert("192.168.0.0/24".parse()?, 2)?;
    /// trie.insert("192.168.0.0/20".parse()?, 1)?;
    /// assert_eq!(
    ///     trie.iter().collect::<Vec<_>>(),
    ///     vec![
    ///         ("192.168.0.0/20".parse()?, &1),
    ///         ("192.168.0.0/24".parse()?, &2),
    ///         ("192.168.1.0/24".parse()?, &3),
    ///     ]
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_, P, T> {
        Iter {
            trie: self,
            nodes: vec![(0, P::R::zero(), 0)],
        }
    }

    /// An iterator visiting all prefixes in lexicographic order.
    pub fn keys(&self) -> Keys<'_, P, T> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in lexicographic order of their prefixes.
    pub fn values(&self) -> Values<'_, P, T> {
        Values { inner: self.iter() }
    }

    /// An iterator over all entries covered by `prefix` (including `prefix` itself), in
    /// lexicographic order.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// trie.insert("10.0.0.0/8".parse()?, 1)?;
    /// trie.insert("10.1.0.0/16".parse()?, 2)?;
    /// trie.insert("10.1.2.0/24".parse()?, 3)?;
    /// trie.insert("10.2.0.0/16".parse()?, 4)?;
    /// assert_eq!(
    ///     trie.children(&"10.1.0.0/16".parse()?).map(|(_, v)| *v).collect::<Vec<_>>(),
    ///     vec![2, 3]
    /// );
    /// assert_eq!(trie.children(&"10.3.0.0/16".parse()?).count(), 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn children(&self, prefix: &P) -> Iter<'_, P, T> {
        let repr = prefix.mask();
        let len = prefix.prefix_len();
        let nodes = match self.find(repr, len) {
            Some(idx) => vec![(idx, repr, len)],
            None => Vec::new(),
        };
        Iter { trie: self, nodes }
    }
}
