//! This crate provides a bitwise prefix trie for longest-prefix match (LPM) over IPv4 and IPv6
//! prefixes. It supports the prefix types of [ipnet](https://docs.rs/ipnet/2.10.0) and
//! [ipnetwork](https://crates.io/crates/ipnetwork), and any tuple `(R, u8)`, where `R` is an
//! unsigned primitive integer (`u8`, `u16`, `u32`, `u64`, or `u128`).
//!
//! Given a set of prefixes with associated values, [`PrefixTrie::longest_match`] returns the value
//! of the most specific prefix that covers a given address, or `None` if no prefix covers it. Next
//! to the trie, the crate ships a [`LinearPrefixSet`] that answers the same queries by scanning all
//! entries. It serves as a reference for correctness and as a baseline for timing.
//!
//! ```
//! # use lpm_trie::*;
//! # use ipnet::Ipv4Net;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut trie: PrefixTrie<Ipv4Net, _> = PrefixTrie::new();
//! trie.insert(Ipv4Net::parse_prefix("10.0.0.0/8")?, "A")?;
//! trie.insert(Ipv4Net::parse_prefix("10.1.0.0/16")?, "B")?;
//! assert_eq!(trie.longest_match(&"10.1.2.3".parse()?), Some(&"B"));
//! assert_eq!(trie.longest_match(&"10.2.3.4".parse()?), Some(&"A"));
//! assert_eq!(trie.longest_match(&"192.168.0.1".parse()?), None);
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! The trie is a binary tree in which each level consumes one bit of the key, starting with the
//! most significant bit. A `0` bit leads to the left child, a `1` bit to the right child. A prefix
//! of length `len` is stored on the node at depth `len`. Bits beyond the prefix length are never
//! inspected, so host bits in an inserted prefix are ignored. The root represents the default
//! route `0/0`. A lookup walks down along the bits of the address and remembers the deepest node
//! that carries a value.
//!
//! Nodes are stored in a single table and refer to their children by index. Removing a prefix
//! releases all nodes that no longer lead to any value, and the released slots are reused by
//! later inserts.
//!
//! # Dual-stack tables
//!
//! A [`JointPrefixTrie`] stores IPv4 and IPv6 prefixes in two separate tries. Addresses are always
//! matched against the trie of their own family.
//!
//! # Operations on the tree
//!
//! The following are the computational complexities of the functions, where `W` is the bit width
//! of the address family (32 or 128) and `n` is the number of entries.
//!
//! | Operation                                   | Complexity |
//! |---------------------------------------------|------------|
//! | `insert`, `remove`                          | `O(W)`     |
//! | `get`, `get_mut`, `longest_match`, `get_lpm`| `O(W)`     |
//! | `remove_children`, `iter`, `children`       | `O(n)`     |
//! | `LinearPrefixSet::longest_match`            | `O(n)`     |
//! | `len` and `is_empty`                        | `O(1)`     |
//!
//! # Concurrency
//!
//! A [`PrefixTrie`] is `Send` and `Sync` whenever its prefixes and values are. Lookups only need a
//! shared reference, so concurrent readers are fine. Writers must be serialized externally, for
//! instance with an `RwLock`.

#![deny(missing_docs)]

mod error;
mod fmt;
mod linear;
mod parse;
mod prefix;
#[cfg(feature = "serde")]
mod serde;
pub mod joint;
pub mod trie;

#[cfg(test)]
mod fuzzing;

pub use error::Error;
pub use joint::{JointPrefix, JointPrefixTrie};
pub use linear::LinearPrefixSet;
pub use parse::ParsePrefix;
pub use prefix::Prefix;
pub use trie::PrefixTrie;
