//! Module that defines a joint (dual-stack) prefix trie. It keeps one trie per address family and
//! forwards every operation to the trie that matches the family of the prefix or address.
//!
//! A joint trie always returns owned instances of the (joint) prefix. This is no problem for IPv4
//! and IPv6 prefixes, as they implement `Copy`.

use either::Either;

use crate::{Error, Prefix, PrefixTrie};

macro_rules! fork_ref {
    ($self:ident, $prefix:ident, $func:ident) => {
        match $prefix.p1_or_p2_ref() {
            Either::Left(p) => $self.t1.$func(p),
            Either::Right(p) => $self.t2.$func(p),
        }
    };
}

/// Trait that defines a joint prefix, for instance, one that describes either a IPv4 or IPv6
/// prefix.
pub trait JointPrefix: Sized {
    /// The first prefix type, e.g., IPv4
    type P1: Prefix;
    /// The second prefix type, e.g., IPv6
    type P2: Prefix;
    /// The joint address type, e.g., `IpAddr`.
    type Addr;

    /// Get either the first or the second variant.
    fn p1_or_p2(self) -> Either<Self::P1, Self::P2>;

    /// Get either the first or the second variant, as a reference.
    fn p1_or_p2_ref(&self) -> Either<&Self::P1, &Self::P2>;

    /// Split an address into the address of the first or the second variant.
    fn addr_p1_or_p2(
        addr: &Self::Addr,
    ) -> Either<<Self::P1 as Prefix>::Addr, <Self::P2 as Prefix>::Addr>;

    /// Construct a prefix from the first variant.
    fn from_p1(p: Self::P1) -> Self;

    /// Construct a prefix from the second variant.
    fn from_p2(p: Self::P2) -> Self;
}

#[cfg(feature = "ipnet")]
impl JointPrefix for ipnet::IpNet {
    type P1 = ipnet::Ipv4Net;
    type P2 = ipnet::Ipv6Net;
    type Addr = std::net::IpAddr;

    fn p1_or_p2(self) -> Either<ipnet::Ipv4Net, ipnet::Ipv6Net> {
        match self {
            ipnet::IpNet::V4(p) => Either::Left(p),
            ipnet::IpNet::V6(p) => Either::Right(p),
        }
    }

    fn p1_or_p2_ref(&self) -> Either<&ipnet::Ipv4Net, &ipnet::Ipv6Net> {
        match self {
            ipnet::IpNet::V4(p) => Either::Left(p),
            ipnet::IpNet::V6(p) => Either::Right(p),
        }
    }

    fn addr_p1_or_p2(addr: &std::net::IpAddr) -> Either<std::net::Ipv4Addr, std::net::Ipv6Addr> {
        match addr {
            std::net::IpAddr::V4(a) => Either::Left(*a),
            std::net::IpAddr::V6(a) => Either::Right(*a),
        }
    }

    fn from_p1(p: Self::P1) -> Self {
        ipnet::IpNet::V4(p)
    }

    fn from_p2(p: Self::P2) -> Self {
        ipnet::IpNet::V6(p)
    }
}

#[cfg(feature = "ipnetwork")]
impl JointPrefix for ipnetwork::IpNetwork {
    type P1 = ipnetwork::Ipv4Network;
    type P2 = ipnetwork::Ipv6Network;
    type Addr = std::net::IpAddr;

    fn p1_or_p2(self) -> Either<ipnetwork::Ipv4Network, ipnetwork::Ipv6Network> {
        match self {
            ipnetwork::IpNetwork::V4(p) => Either::Left(p),
            ipnetwork::IpNetwork::V6(p) => Either::Right(p),
        }
    }

    fn p1_or_p2_ref(&self) -> Either<&ipnetwork::Ipv4Network, &ipnetwork::Ipv6Network> {
        match self {
            ipnetwork::IpNetwork::V4(p) => Either::Left(p),
            ipnetwork::IpNetwork::V6(p) => Either::Right(p),
        }
    }

    fn addr_p1_or_p2(addr: &std::net::IpAddr) -> Either<std::net::Ipv4Addr, std::net::Ipv6Addr> {
        match addr {
            std::net::IpAddr::V4(a) => Either::Left(*a),
            std::net::IpAddr::V6(a) => Either::Right(*a),
        }
    }

    fn from_p1(p: Self::P1) -> Self {
        ipnetwork::IpNetwork::V4(p)
    }

    fn from_p2(p: Self::P2) -> Self {
        ipnetwork::IpNetwork::V6(p)
    }
}

/// A joint prefix trie, implemented as two separate prefix tries. Addresses of one family never
/// match prefixes of the other family, not even the default route.
pub struct JointPrefixTrie<P, T>
where
    P: JointPrefix,
{
    /// PrefixTrie that corresponds to the first prefix type
    pub t1: PrefixTrie<P::P1, T>,
    /// PrefixTrie that corresponds to the second prefix type
    pub t2: PrefixTrie<P::P2, T>,
}

impl<P: JointPrefix, T: Clone> Clone for JointPrefixTrie<P, T> {
    fn clone(&self) -> Self {
        Self {
            t1: self.t1.clone(),
            t2: self.t2.clone(),
        }
    }
}

impl<P, T> Default for JointPrefixTrie<P, T>
where
    P: JointPrefix,
{
    fn default() -> Self {
        Self {
            t1: Default::default(),
            t2: Default::default(),
        }
    }
}

impl<P: JointPrefix, T> JointPrefixTrie<P, T> {
    /// Create an empty joint trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of prefixes stored in both tries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    /// Returns `true` if the trie contains no prefixes.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new item into the trie of its address family, returning the value previously
    /// stored for the same prefix.
    ///
    /// ```
    /// # use lpm_trie::joint::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: JointPrefixTrie<ipnet::IpNet, _> = JointPrefixTrie::new();
    /// assert_eq!(trie.insert("192.168.1.0/24".parse()?, 1)?, None);
    /// assert_eq!(trie.insert("2001:db8::/32".parse()?, 2)?, None);
    /// assert_eq!(trie.insert("192.168.1.0/24".parse()?, 3)?, Some(1));
    /// assert_eq!(trie.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, prefix: P, value: T) -> Result<Option<T>, Error> {
        match prefix.p1_or_p2() {
            Either::Left(p) => self.t1.insert(p, value),
            Either::Right(p) => self.t2.insert(p, value),
        }
    }

    /// Get the value of an element by matching exactly on the prefix.
    pub fn get(&self, prefix: &P) -> Option<&T> {
        fork_ref!(self, prefix, get)
    }

    /// Get a mutable reference to a value of an element by matching exactly on the prefix.
    pub fn get_mut(&mut self, prefix: &P) -> Option<&mut T> {
        fork_ref!(self, prefix, get_mut)
    }

    /// Check if a prefix is present, without using longest prefix match.
    pub fn contains_key(&self, prefix: &P) -> bool {
        fork_ref!(self, prefix, contains_key)
    }

    /// Remove a prefix, returning its value if it was present.
    pub fn remove(&mut self, prefix: &P) -> Option<T> {
        fork_ref!(self, prefix, remove)
    }

    /// Get the value of the most specific prefix of the same address family that covers `addr`.
    ///
    /// ```
    /// # use lpm_trie::joint::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: JointPrefixTrie<ipnet::IpNet, _> = JointPrefixTrie::new();
    /// trie.insert("10.0.0.0/8".parse()?, "A")?;
    /// trie.insert("::/0".parse()?, "v6 default")?;
    /// assert_eq!(trie.longest_match(&"10.1.2.3".parse()?), Some(&"A"));
    /// assert_eq!(trie.longest_match(&"2001:db8::1".parse()?), Some(&"v6 default"));
    /// assert_eq!(trie.longest_match(&"192.168.0.1".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn longest_match(&self, addr: &P::Addr) -> Option<&T> {
        match P::addr_p1_or_p2(addr) {
            Either::Left(a) => self.t1.longest_match(&a),
            Either::Right(a) => self.t2.longest_match(&a),
        }
    }

    /// Get the most specific prefix of the same address family that covers `addr`, together with
    /// its value.
    pub fn longest_match_entry(&self, addr: &P::Addr) -> Option<(P, &T)> {
        match P::addr_p1_or_p2(addr) {
            Either::Left(a) => self
                .t1
                .longest_match_entry(&a)
                .map(|(p, t)| (P::from_p1(p), t)),
            Either::Right(a) => self
                .t2
                .longest_match_entry(&a)
                .map(|(p, t)| (P::from_p2(p), t)),
        }
    }

    /// Iterate over all entries, first those of the first family and then those of the second
    /// one, each in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (P, &T)> {
        self.t1
            .iter()
            .map(|(p, t)| (P::from_p1(p), t))
            .chain(self.t2.iter().map(|(p, t)| (P::from_p2(p), t)))
    }

    /// Remove all entries of both tries.
    pub fn clear(&mut self) {
        self.t1.clear();
        self.t2.clear();
    }
}
