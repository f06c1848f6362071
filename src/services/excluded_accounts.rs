use std::collections::HashSet;

/// Owners whose balances are never part of circulating supply.
pub const BURN_ADDRESSES: &[&str] = &[
    "1nc1nerator11111111111111111111111111111111", // Incinerator
    "11111111111111111111111111111111",            // System program
    "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", // SPL Token
    "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb", // Token-2022
    "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL", // Associated Token Account program
];

/// Read-only set of owner addresses excluded from holder statistics.
///
/// Built once at start-up and shared by every request; different networks
/// can supply their own list through configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedAddresses {
    addresses: HashSet<String>,
}

impl ExcludedAddresses {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a comma separated list, ignoring blanks and surrounding whitespace.
    pub fn from_csv(list: &str) -> Self {
        Self::new(split_csv(list))
    }

    pub fn extend_csv(&mut self, list: &str) {
        self.addresses.extend(split_csv(list).map(str::to_string));
    }

    pub fn contains(&self, owner: &str) -> bool {
        self.addresses.contains(owner)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }
}

impl Default for ExcludedAddresses {
    fn default() -> Self {
        Self::new(BURN_ADDRESSES.iter().copied())
    }
}

fn split_csv(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}
