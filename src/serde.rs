use std::marker::PhantomData;

use ::serde::de::{Error as _, MapAccess, Visitor};
use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::*;

impl<P: Prefix + Serialize, T: Serialize> Serialize for PrefixTrie<P, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

/// Inserts entries in document order, so a later entry for the same (masked) prefix overrides an
/// earlier one.
struct TrieVisitor<P, T>(PhantomData<(P, T)>);

impl<'de, P, T> Visitor<'de> for TrieVisitor<P, T>
where
    P: Prefix + Deserialize<'de>,
    T: Deserialize<'de>,
{
    type Value = PrefixTrie<P, T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map from prefixes to values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut trie = PrefixTrie::new();
        while let Some((p, t)) = map.next_entry::<P, T>()? {
            trie.insert(p, t).map_err(A::Error::custom)?;
        }
        Ok(trie)
    }

}

impl<'de, P, T> Deserialize<'de> for PrefixTrie<P, T>
where
    P: Prefix + Deserialize<'de>,
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TrieVisitor(PhantomData))
    }
}
