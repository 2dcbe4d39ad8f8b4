//! Implementation of the bitwise prefix trie.

use std::marker::PhantomData;

use log::{debug, trace};

use crate::prefix::{bit_at, mask_from_prefix_len};
use crate::{Error, Prefix};

mod iter;

pub use iter::*;

/// Binary prefix trie that answers longest-prefix-match queries. Each node consumes one bit of
/// the key, starting at the most significant one. A node carries a value iff a prefix whose
/// length equals the depth of that node was inserted.
pub struct PrefixTrie<P, T> {
    pub(crate) table: Vec<Node<T>>,
    free: Vec<usize>,
    count: usize,
    marker: PhantomData<fn() -> P>,
}

impl<P, T> Default for PrefixTrie<P, T>
where
    P: Prefix,
{
    fn default() -> Self {
        Self {
            table: vec![Node::empty()],
            free: Vec::new(),
            count: 0,
            marker: PhantomData,
        }
    }
}

impl<P, T: Clone> Clone for PrefixTrie<P, T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            free: self.free.clone(),
            count: self.count,
            marker: PhantomData,
        }
    }
}

impl<P, T> PrefixTrie<P, T>
where
    P: Prefix,
{
    /// Create an empty prefix trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trie from a sequence of entries. Later entries override earlier entries with the
    /// same prefix. Fails on the first prefix whose length exceeds the address width.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// let trie = PrefixTrie::try_from_iter([((0x0a000000u32, 8u8), 1), ((0x0a000000, 8), 2)]);
    /// assert_eq!(trie.unwrap().get(&(0x0a000000, 8)), Some(&2));
    ///
    /// let trie = PrefixTrie::try_from_iter([((0x0a000000u32, 8u8), 1), ((0, 33), 2)]);
    /// assert_eq!(trie.err(), Some(Error::InvalidPrefixLength { len: 33, max: 32 }));
    /// ```
    pub fn try_from_iter<I>(iter: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (P, T)>,
    {
        let mut trie = Self::new();
        for (prefix, value) in iter {
            trie.insert(prefix, value)?;
        }
        Ok(trie)
    }

    /// Returns the number of prefixes stored in the trie.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// trie.insert("10.0.0.0/8".parse()?, 1)?;
    /// trie.insert("10.1.0.0/16".parse()?, 2)?;
    /// trie.insert("10.1.0.0/16".parse()?, 3)?;
    /// assert_eq!(trie.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the trie contains no prefixes.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of nodes allocated in the trie, including the root and all intermediate nodes that
    /// do not carry a value.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// assert_eq!(trie.node_count(), 1);
    /// trie.insert("10.0.0.0/8".parse()?, 1)?;
    /// assert_eq!(trie.node_count(), 9);
    /// trie.insert("10.0.0.0/9".parse()?, 2)?;
    /// assert_eq!(trie.node_count(), 10);
    /// # Ok(())
    /// # }
    /// ```
    pub fn node_count(&self) -> usize {
        self.table.len() - self.free.len()
    }

    /// Insert a new item into the trie, returning the value that was previously stored for the
    /// same prefix. Bits beyond the prefix length are ignored. A prefix of length 0 is stored on
    /// the root and matches every address.
    ///
    /// Prefixes longer than the address width are rejected and leave the trie untouched.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// assert_eq!(trie.insert("192.168.0.0/23".parse()?, 1)?, None);
    /// assert_eq!(trie.insert("192.168.1.0/24".parse()?, 2)?, None);
    /// assert_eq!(trie.insert("192.168.1.77/24".parse()?, 3)?, Some(2));
    ///
    /// let mut raw: PrefixTrie<(u32, u8), _> = PrefixTrie::new();
    /// assert_eq!(
    ///     raw.insert((0, 33), "x"),
    ///     Err(Error::InvalidPrefixLength { len: 33, max: 32 })
    /// );
    /// assert!(raw.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, prefix: P, value: T) -> Result<Option<T>, Error> {
        if let Err(e) = prefix.validate() {
            debug!("rejected insert: {e}");
            return Err(e);
        }
        let repr = prefix.mask();
        let len = prefix.prefix_len();
        let mut idx = 0;
        let mut allocated = 0;
        for i in 0..len {
            let bit = bit_at(repr, i) as usize;
            idx = match self.table[idx].children[bit] {
                Some(next) => next,
                None => {
                    let next = self.new_node();
                    self.table[idx].children[bit] = Some(next);
                    allocated += 1;
                    next
                }
            };
        }
        if allocated > 0 {
            trace!("allocated {allocated} nodes for a prefix of length {len}");
        }
        let old = self.table[idx].value.replace(value);
        if old.is_none() {
            self.count += 1;
        }
        Ok(old)
    }

    /// Get the value of an element by matching exactly on the prefix.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// trie.insert("192.168.1.0/24".parse()?, 1)?;
    /// assert_eq!(trie.get(&"192.168.1.0/24".parse()?), Some(&1));
    /// assert_eq!(trie.get(&"192.168.2.0/24".parse()?), None);
    /// assert_eq!(trie.get(&"192.168.0.0/23".parse()?), None);
    /// assert_eq!(trie.get(&"192.168.1.128/25".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, prefix: &P) -> Option<&T> {
        let idx = self.find(prefix.mask(), prefix.prefix_len())?;
        self.table[idx].value.as_ref()
    }

    /// Get a mutable reference to a value of an element by matching exactly on the prefix.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// let prefix = "192.168.1.0/24".parse()?;
    /// trie.insert(prefix, 1)?;
    /// *trie.get_mut(&prefix).unwrap() += 1;
    /// assert_eq!(trie.get(&prefix), Some(&2));
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_mut(&mut self, prefix: &P) -> Option<&mut T> {
        let idx = self.find(prefix.mask(), prefix.prefix_len())?;
        self.table[idx].value.as_mut()
    }

    /// Check if a prefix is present in the trie, without using longest prefix match.
    pub fn contains_key(&self, prefix: &P) -> bool {
        self.get(prefix).is_some()
    }

    /// Get the value of the most specific prefix that covers `addr`. Returns `None` if no stored
    /// prefix covers the address, which is different from matching the default route `0/0`.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// trie.insert("10.0.0.0/8".parse()?, "A")?;
    /// trie.insert("10.1.0.0/16".parse()?, "B")?;
    /// assert_eq!(trie.longest_match(&"10.1.2.3".parse()?), Some(&"B"));
    /// assert_eq!(trie.longest_match(&"10.2.2.3".parse()?), Some(&"A"));
    /// assert_eq!(trie.longest_match(&"192.168.0.1".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn longest_match(&self, addr: &P::Addr) -> Option<&T> {
        self.longest_match_repr(P::addr_repr(addr))
    }

    /// Same as [`Self::longest_match`], but takes the raw integer representation of the address.
    pub fn longest_match_repr(&self, addr: P::R) -> Option<&T> {
        let (idx, _) = self.lpm_node(addr, P::max_len())?;
        self.table[idx].value.as_ref()
    }

    /// Get the most specific prefix that covers `addr`, together with its value.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv6Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv6Net, _> = PrefixTrie::new();
    /// trie.insert("2001:db8::/32".parse()?, "X")?;
    /// trie.insert("2001:db8:1234::/48".parse()?, "Y")?;
    /// assert_eq!(
    ///     trie.longest_match_entry(&"2001:db8:1234:5678::1".parse()?),
    ///     Some(("2001:db8:1234::/48".parse()?, &"Y"))
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn longest_match_entry(&self, addr: &P::Addr) -> Option<(P, &T)> {
        self.entry_at(P::addr_repr(addr), P::max_len())
    }

    /// Get the most specific stored prefix that covers `prefix` (or is equal to it), together
    /// with its value.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// trie.insert("192.168.1.0/24".parse()?, 1)?;
    /// trie.insert("192.168.0.0/23".parse()?, 2)?;
    /// assert_eq!(trie.get_lpm(&"192.168.1.1/32".parse()?), Some(("192.168.1.0/24".parse()?, &1)));
    /// assert_eq!(trie.get_lpm(&"192.168.1.0/24".parse()?), Some(("192.168.1.0/24".parse()?, &1)));
    /// assert_eq!(trie.get_lpm(&"192.168.0.0/24".parse()?), Some(("192.168.0.0/23".parse()?, &2)));
    /// assert_eq!(trie.get_lpm(&"192.168.0.0/22".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_lpm(&self, prefix: &P) -> Option<(P, &T)> {
        self.entry_at(prefix.mask(), prefix.prefix_len())
    }

    /// Iterate over all stored prefixes that cover `addr`, from the least to the most specific
    /// one. The last element is the longest prefix match.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// trie.insert("0.0.0.0/0".parse()?, 0)?;
    /// trie.insert("10.0.0.0/8".parse()?, 1)?;
    /// trie.insert("10.1.0.0/16".parse()?, 2)?;
    /// trie.insert("10.2.0.0/16".parse()?, 3)?;
    /// assert_eq!(
    ///     trie.matches(&"10.1.2.3".parse()?).map(|(_, v)| *v).collect::<Vec<_>>(),
    ///     vec![0, 1, 2]
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn matches(&self, addr: &P::Addr) -> Matches<'_, P, T> {
        Matches {
            trie: self,
            repr: P::addr_repr(addr),
            idx: Some(0),
            depth: 0,
        }
    }

    /// Removes a prefix from the trie, returning its value if it was present. Intermediate nodes
    /// that no longer lead to any value are released, so the trie looks as if the prefix was
    /// never inserted. More specific prefixes stay untouched.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// trie.insert("10.0.0.0/8".parse()?, 1)?;
    /// trie.insert("10.1.0.0/16".parse()?, 2)?;
    /// assert_eq!(trie.remove(&"10.0.0.0/8".parse()?), Some(1));
    /// assert_eq!(trie.remove(&"10.0.0.0/8".parse()?), None);
    /// assert_eq!(trie.longest_match(&"10.1.0.1".parse()?), Some(&2));
    /// assert_eq!(trie.longest_match(&"10.2.0.1".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove(&mut self, prefix: &P) -> Option<T> {
        let (idx, path) = self.find_with_path(prefix.mask(), prefix.prefix_len())?;
        let value = self.table[idx].value.take()?;
        self.count -= 1;
        self.prune(idx, path);
        Some(value)
    }

    /// Remove all entries that are covered by `prefix`, including `prefix` itself. This
    /// operation is `O(n)` in the size of the removed sub-trie.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
    /// trie.insert("192.168.0.0/22".parse()?, 1)?;
    /// trie.insert("192.168.0.0/23".parse()?, 2)?;
    /// trie.insert("192.168.0.0/24".parse()?, 3)?;
    /// trie.insert("192.168.2.0/23".parse()?, 4)?;
    /// trie.remove_children(&"192.168.0.0/23".parse()?);
    /// assert_eq!(trie.get(&"192.168.0.0/22".parse()?), Some(&1));
    /// assert_eq!(trie.get(&"192.168.0.0/23".parse()?), None);
    /// assert_eq!(trie.get(&"192.168.0.0/24".parse()?), None);
    /// assert_eq!(trie.get(&"192.168.2.0/23".parse()?), Some(&4));
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove_children(&mut self, prefix: &P) {
        let len = prefix.prefix_len();
        if len == 0 {
            return self.clear();
        } else if len > P::max_len() {
            return;
        }
        let repr = prefix.mask();
        let Some((parent, path)) = self.find_with_path(repr, len - 1) else {
            return;
        };
        let bit = bit_at(repr, len - 1) as usize;
        let Some(child) = self.table[parent].children[bit].take() else {
            return;
        };
        let mut to_free = vec![child];
        while let Some(idx) = to_free.pop() {
            let node = &mut self.table[idx];
            if node.value.take().is_some() {
                self.count -= 1;
            }
            to_free.extend(node.children.iter_mut().filter_map(Option::take));
            self.free.push(idx);
        }
        self.prune(parent, path);
    }

    /// Clear the trie but keep the allocated memory.
    pub fn clear(&mut self) {
        self.table.clear();
        self.free.clear();
        self.count = 0;
        self.table.push(Node::empty());
    }
}

/// Private function implementations
impl<P, T> PrefixTrie<P, T>
where
    P: Prefix,
{
    /// insert a new empty node into the table and return its index.
    #[inline(always)]
    fn new_node(&mut self) -> usize {
        if let Some(idx) = self.free.pop() {
            self.table[idx] = Node::empty();
            idx
        } else {
            self.table.push(Node::empty());
            self.table.len() - 1
        }
    }

    /// Get the node that represents `(repr, len)` exactly.
    fn find(&self, repr: P::R, len: u8) -> Option<usize> {
        if len > P::max_len() {
            return None;
        }
        let mut idx = 0;
        for i in 0..len {
            idx = self.table[idx].children[bit_at(repr, i) as usize]?;
        }
        Some(idx)
    }

    /// Like `find`, but also returns every `(parent, bit)` pair along the way.
    fn find_with_path(&self, repr: P::R, len: u8) -> Option<(usize, Vec<(usize, usize)>)> {
        if len > P::max_len() {
            return None;
        }
        let mut path = Vec::with_capacity(len as usize);
        let mut idx = 0;
        for i in 0..len {
            let bit = bit_at(repr, i) as usize;
            let next = self.table[idx].children[bit]?;
            path.push((idx, bit));
            idx = next;
        }
        Some((idx, path))
    }

    /// Descend at most `len` bits along `repr` and return the deepest node that carries a value,
    /// together with its depth.
    #[inline(always)]
    fn lpm_node(&self, repr: P::R, len: u8) -> Option<(usize, u8)> {
        let mut idx = 0;
        let mut best = self.table[0].value.as_ref().map(|_| (0, 0));
        for i in 0..len.min(P::max_len()) {
            match self.table[idx].children[bit_at(repr, i) as usize] {
                Some(next) => idx = next,
                None => break,
            }
            if self.table[idx].value.is_some() {
                best = Some((idx, i + 1));
            }
        }
        best
    }

    fn entry_at(&self, repr: P::R, len: u8) -> Option<(P, &T)> {
        let (idx, depth) = self.lpm_node(repr, len)?;
        let value = self.table[idx].value.as_ref()?;
        let prefix = P::from_repr_len(repr & mask_from_prefix_len(depth), depth);
        Some((prefix, value))
    }

    /// Walk back up `path`, releasing every node that carries no value and has no children. The
    /// root is never released.
    fn prune(&mut self, mut idx: usize, mut path: Vec<(usize, usize)>) {
        let mut pruned = 0;
        while let Some((parent, bit)) = path.pop() {
            if !self.table[idx].is_empty() {
                break;
            }
            self.table[parent].children[bit] = None;
            self.free.push(idx);
            pruned += 1;
            idx = parent;
        }
        if pruned > 0 {
            debug!("pruned {pruned} empty nodes");
        }
    }
}

impl<P, T> PartialEq for PrefixTrie<P, T>
where
    P: Prefix,
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((pa, va), (pb, vb))| Prefix::eq(&pa, &pb) && va == vb)
    }
}

impl<P, T> Eq for PrefixTrie<P, T>
where
    P: Prefix,
    T: Eq,
{
}

/// A node in the trie. Children are indexed by the value of the next bit.
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: Option<T>,
    pub(crate) children: [Option<usize>; 2],
}

impl<T> Node<T> {
    fn empty() -> Self {
        Self {
            value: None,
            children: [None, None],
        }
    }

    /// The node neither carries a value nor leads to one.
    fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.iter().all(Option::is_none)
    }
}
