//! Formatting implementation for the tries and the linear set

use std::fmt::{Debug, Formatter, Result};

use either::Either;

use super::*;

impl<P: Prefix + Debug, T: Debug> Debug for PrefixTrie<P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<P: Debug, T: Debug> Debug for LinearPrefixSet<P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<P, T> Debug for JointPrefixTrie<P, T>
where
    P: JointPrefix,
    P::P1: Debug,
    P::P2: Debug,
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_map()
            .entries(self.t1.iter().map(|(p, t)| (Either::<_, P::P2>::Left(p), t)))
            .entries(self.t2.iter().map(|(p, t)| (Either::<P::P1, _>::Right(p), t)))
            .finish()
    }
}
