//! Description of the generic type `Prefix`.

#[cfg(feature = "ipnet")]
use ipnet::{Ipv4Net, Ipv6Net};
#[cfg(feature = "ipnetwork")]
use ipnetwork::{Ipv4Network, Ipv6Network};
#[cfg(any(feature = "ipnet", feature = "ipnetwork"))]
use std::net::{Ipv4Addr, Ipv6Addr};

use num_traits::{CheckedShr, PrimInt, Unsigned, Zero};

use crate::Error;

/// Trait for defining prefixes over fixed-width binary keys.
pub trait Prefix: Sized {
    /// How can the prefix be represented. This must be one of `u8`, `u16`, `u32`, `u64`, or `u128`.
    /// The bit width of this type is the width `W` of the address family.
    type R: Unsigned + PrimInt + Zero + CheckedShr;

    /// The fully specified address type that is matched against prefixes, e.g., `Ipv4Addr` for
    /// IPv4 prefixes.
    type Addr;

    /// Get raw representation of the address, ignoring the prefix length. The low bits beyond the
    /// prefix length may be set.
    fn repr(&self) -> Self::R;

    /// Prefix length
    fn prefix_len(&self) -> u8;

    /// Create a new prefix from the representation and the prefix length. `len` is never larger
    /// than [`Prefix::max_len`].
    fn from_repr_len(repr: Self::R, len: u8) -> Self;

    /// Get the raw representation of a full-width address.
    fn addr_repr(addr: &Self::Addr) -> Self::R;

    /// Number of bits of the address family (32 for IPv4, 128 for IPv6).
    fn max_len() -> u8 {
        Self::R::zero().count_zeros() as u8
    }

    /// Check that the prefix length fits into the address width.
    fn validate(&self) -> Result<(), Error> {
        let max = Self::max_len();
        let len = self.prefix_len();
        if len > max {
            Err(Error::InvalidPrefixLength { len, max })
        } else {
            Ok(())
        }
    }

    /// mask `self.repr()` using `self.len()`. If you can guarantee that `repr` is already masked,
    /// them simply re-implement this function for your type.
    fn mask(&self) -> Self::R {
        self.repr() & mask_from_prefix_len(self.prefix_len())
    }

    /// Check if `self` covers `other`, i.e., `other` is at least as specific and agrees on all
    /// significant bits of `self`. This function also returns `True` if `self` is identical to
    /// `other`.
    fn contains(&self, other: &Self) -> bool {
        if self.prefix_len() > other.prefix_len() {
            return false;
        }
        other.repr() & mask_from_prefix_len(self.prefix_len()) == self.mask()
    }

    /// Check if `self` covers the address with the raw representation `addr`.
    fn covers(&self, addr: Self::R) -> bool {
        self.prefix_len() <= Self::max_len()
            && addr & mask_from_prefix_len(self.prefix_len()) == self.mask()
    }

    /// Compare two prefixes together
    fn eq(&self, other: &Self) -> bool {
        self.mask() == other.mask() && self.prefix_len() == other.prefix_len()
    }
}

/// Mask with the `len` most significant bits set. Lengths beyond the width select all bits.
pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 >= R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

/// Mask with only bit `bit` set, counted from the most significant end. Zero if `bit` is out of
/// range.
#[inline(always)]
pub(crate) fn single_bit<R>(bit: u8) -> R
where
    R: PrimInt + Zero + CheckedShr,
{
    (!R::zero())
        .checked_shr(bit as u32)
        .unwrap_or_else(R::zero)
        ^ (!R::zero())
            .checked_shr(1u32 + bit as u32)
            .unwrap_or_else(R::zero)
}

/// Value of bit `bit` of `repr`, counted from the most significant end.
#[inline(always)]
pub(crate) fn bit_at<R>(repr: R, bit: u8) -> bool
where
    R: PrimInt + Zero + CheckedShr,
{
    single_bit::<R>(bit) & repr != R::zero()
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv4Net {
    type R = u32;
    type Addr = Ipv4Addr;

    fn repr(&self) -> u32 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn from_repr_len(repr: u32, len: u8) -> Self {
        Ipv4Net::new(repr.into(), len).expect("prefix length is bounded by 32")
    }

    fn addr_repr(addr: &Ipv4Addr) -> u32 {
        (*addr).into()
    }

    fn eq(&self, other: &Self) -> bool {
        self.trunc() == other.trunc()
    }

    fn mask(&self) -> u32 {
        self.network().into()
    }

    fn contains(&self, other: &Self) -> bool {
        self.contains(other)
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv6Net {
    type R = u128;
    type Addr = Ipv6Addr;

    fn repr(&self) -> u128 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn from_repr_len(repr: u128, len: u8) -> Self {
        Ipv6Net::new(repr.into(), len).expect("prefix length is bounded by 128")
    }

    fn addr_repr(addr: &Ipv6Addr) -> u128 {
        (*addr).into()
    }

    fn eq(&self, other: &Self) -> bool {
        self.trunc() == other.trunc()
    }

    fn mask(&self) -> u128 {
        self.network().into()
    }

    fn contains(&self, other: &Self) -> bool {
        self.contains(other)
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv4Network {
    type R = u32;
    type Addr = Ipv4Addr;

    fn repr(&self) -> u32 {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }

    fn from_repr_len(repr: u32, len: u8) -> Self {
        Ipv4Network::new(repr.into(), len).expect("prefix length is bounded by 32")
    }

    fn addr_repr(addr: &Ipv4Addr) -> u32 {
        (*addr).into()
    }

    fn mask(&self) -> u32 {
        self.network().into()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv6Network {
    type R = u128;
    type Addr = Ipv6Addr;

    fn repr(&self) -> u128 {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }

    fn from_repr_len(repr: u128, len: u8) -> Self {
        Ipv6Network::new(repr.into(), len).expect("prefix length is bounded by 128")
    }

    fn addr_repr(addr: &Ipv6Addr) -> u128 {
        (*addr).into()
    }

    fn mask(&self) -> u128 {
        self.network().into()
    }
}

impl<R> Prefix for (R, u8)
where
    R: Unsigned + PrimInt + Zero + CheckedShr,
{
    type R = R;
    type Addr = R;

    fn repr(&self) -> R {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }

    fn from_repr_len(repr: R, len: u8) -> Self {
        (repr, len)
    }

    fn addr_repr(addr: &R) -> R {
        *addr
    }
}
