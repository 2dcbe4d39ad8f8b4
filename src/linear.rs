//! Linear-scan reference implementation of longest-prefix matching.

use log::debug;

use crate::{Error, Prefix};

/// Prefix table that stores entries in insertion order and answers longest-prefix-match queries
/// by scanning all of them. Lookups take `O(n)` time. This type is meant as a baseline for
/// [`crate::PrefixTrie`], both for checking results and for timing comparisons.
#[derive(Clone)]
pub struct LinearPrefixSet<P, T> {
    pub(crate) entries: Vec<(P, T)>,
}

impl<P, T> Default for LinearPrefixSet<P, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<P: Prefix, T> LinearPrefixSet<P, T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Duplicates are kept; the most recently inserted one wins on lookup.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// let mut set: LinearPrefixSet<(u32, u8), _> = LinearPrefixSet::new();
    /// set.insert((0x0a000000, 8), 1)?;
    /// set.insert((0x0a000000, 8), 2)?;
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.longest_match(&0x0a000001), Some(&2));
    /// assert!(set.insert((0, 33), 3).is_err());
    /// # Ok::<(), Error>(())
    /// ```
    pub fn insert(&mut self, prefix: P, value: T) -> Result<(), Error> {
        if let Err(e) = prefix.validate() {
            debug!("rejected insert: {e}");
            return Err(e);
        }
        self.entries.push((prefix, value));
        Ok(())
    }

    /// Number of stored entries, including duplicates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entry was inserted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scan all entries and return the value of the longest prefix that covers `addr`.
    pub fn longest_match(&self, addr: &P::Addr) -> Option<&T> {
        self.longest_match_entry(addr).map(|(_, t)| t)
    }

    /// Scan all entries and return the longest prefix that covers `addr`, together with its
    /// value. The prefix is returned with its host bits cleared, the same way
    /// [`crate::PrefixTrie::longest_match_entry`] returns it.
    ///
    /// ```
    /// # use lpm_trie::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut set: LinearPrefixSet<Ipv4Net, _> = LinearPrefixSet::new();
    /// set.insert("10.1.0.0/16".parse()?, "B")?;
    /// set.insert("10.0.0.0/8".parse()?, "A")?;
    /// assert_eq!(
    ///     set.longest_match_entry(&"10.1.2.3".parse()?),
    ///     Some(("10.1.0.0/16".parse()?, &"B"))
    /// );
    /// set.insert("192.168.1.1/24".parse()?, "C")?;
    /// assert_eq!(
    ///     set.longest_match_entry(&"192.168.1.77".parse()?),
    ///     Some(("192.168.1.0/24".parse()?, &"C"))
    /// );
    /// assert_eq!(set.longest_match_entry(&"192.168.0.1".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn longest_match_entry(&self, addr: &P::Addr) -> Option<(P, &T)> {
        let addr = P::addr_repr(addr);
        let mut best: Option<&(P, T)> = None;
        for entry in &self.entries {
            if !entry.0.covers(addr) {
                continue;
            }
            match best {
                Some((p, _)) if p.prefix_len() > entry.0.prefix_len() => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(p, t)| (P::from_repr_len(p.mask(), p.prefix_len()), t))
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (P, T)> {
        self.entries.iter()
    }
}

impl<'a, P, T> IntoIterator for &'a LinearPrefixSet<P, T> {
    type Item = &'a (P, T);

    type IntoIter = std::slice::Iter<'a, (P, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
