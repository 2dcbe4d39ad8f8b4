//! Parsing textual prefixes, as they appear in routing tables and block lists.
//!
//! The accepted format is either `addr/len` or a bare address, which is read as a host prefix
//! (`addr/32` or `addr/128`). Host bits beyond the prefix length are allowed; they are ignored
//! once the prefix is inserted into a trie.

#[cfg(feature = "ipnet")]
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use log::debug;
#[cfg(feature = "ipnet")]
use std::net::IpAddr;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::Error;

/// Parse a prefix from text, reporting failures as [`Error`].
///
/// ```
/// # use lpm_trie::*;
/// # use ipnet::Ipv4Net;
/// let p = Ipv4Net::parse_prefix(" 10.1.2.3/16 ")?;
/// assert_eq!(p.to_string(), "10.1.2.3/16");
/// assert_eq!(<(u32, u8)>::parse_prefix("192.168.0.1")?, (0xc0a80001, 32));
/// assert_eq!(
///     Ipv4Net::parse_prefix("10.0.0.0/33"),
///     Err(Error::InvalidPrefixLength { len: 33, max: 32 })
/// );
/// assert!(matches!(Ipv4Net::parse_prefix("10.0.0/8"), Err(Error::Parse { .. })));
/// # Ok::<(), Error>(())
/// ```
pub trait ParsePrefix: Sized {
    /// Parse `input` as `addr/len` or as a bare address.
    fn parse_prefix(input: &str) -> Result<Self, Error>;
}

/// Split the trimmed input into the address part and the optional length. The length must be a
/// plain decimal number that fits into `u8`.
fn split(input: &str) -> Result<(&str, Option<u8>), Error> {
    let s = input.trim();
    let Some((addr, len)) = s.split_once('/') else {
        return Ok((s, None));
    };
    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::parse(input));
    }
    let len = len.parse::<u8>().map_err(|_| Error::parse(input))?;
    Ok((addr, Some(len)))
}

/// Parse the address part and resolve the length, defaulting to a host prefix.
fn parse_parts<A: FromStr>(input: &str, max: impl Fn(&A) -> u8) -> Result<(A, u8), Error> {
    let (addr, len) = split(input)?;
    let addr = addr.parse::<A>().map_err(|_| Error::parse(input))?;
    let max = max(&addr);
    let len = len.unwrap_or(max);
    if len > max {
        return Err(Error::InvalidPrefixLength { len, max });
    }
    Ok((addr, len))
}

/// Log rejected inputs before handing the error to the caller.
fn logged<P>(input: &str, result: Result<P, Error>) -> Result<P, Error> {
    if let Err(e) = &result {
        debug!("rejected prefix {input:?}: {e}");
    }
    result
}

impl ParsePrefix for (u32, u8) {
    fn parse_prefix(input: &str) -> Result<Self, Error> {
        let result = parse_parts::<Ipv4Addr>(input, |_| 32).map(|(a, len)| (a.into(), len));
        logged(input, result)
    }
}

impl ParsePrefix for (u128, u8) {
    fn parse_prefix(input: &str) -> Result<Self, Error> {
        let result = parse_parts::<Ipv6Addr>(input, |_| 128).map(|(a, len)| (a.into(), len));
        logged(input, result)
    }
}

#[cfg(feature = "ipnet")]
impl ParsePrefix for Ipv4Net {
    fn parse_prefix(input: &str) -> Result<Self, Error> {
        let result = parse_parts::<Ipv4Addr>(input, |_| 32).and_then(|(a, len)| {
            Ipv4Net::new(a, len).map_err(|_| Error::InvalidPrefixLength { len, max: 32 })
        });
        logged(input, result)
    }
}

#[cfg(feature = "ipnet")]
impl ParsePrefix for Ipv6Net {
    fn parse_prefix(input: &str) -> Result<Self, Error> {
        let result = parse_parts::<Ipv6Addr>(input, |_| 128).and_then(|(a, len)| {
            Ipv6Net::new(a, len).map_err(|_| Error::InvalidPrefixLength { len, max: 128 })
        });
        logged(input, result)
    }
}

#[cfg(feature = "ipnet")]
impl ParsePrefix for IpNet {
    fn parse_prefix(input: &str) -> Result<Self, Error> {
        let max = |a: &IpAddr| -> u8 {
            if a.is_ipv4() {
                32
            } else {
                128
            }
        };
        let result = parse_parts::<IpAddr>(input, max).and_then(|(a, len)| {
            IpNet::new(a, len).map_err(|_| Error::InvalidPrefixLength { len, max: max(&a) })
        });
        logged(input, result)
    }
}
