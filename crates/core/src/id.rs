//! Strongly-typed numeric identifiers.
//!
//! Ids are assigned by an [`IdSequence`] owned by the component that creates the
//! record. They start at 1 and are never reused, even when the record is later
//! removed or an open document is discarded.

use core::marker::PhantomData;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::WarehouseError;

/// Identifier of a catalog product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

/// Identifier of a receipt document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(u32);

/// Identifier of an expenditure document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenditureId(u32);

/// Identifier of an inventory check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckId(u32);

/// Numeric id newtype.
pub trait NumericId: Copy + From<u32> {
    fn get(self) -> u32;
}

macro_rules! impl_numeric_id {
    ($t:ident, $name:literal) => {
        impl $t {
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl NumericId for $t {
            fn get(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u32> for $t {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u32 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = WarehouseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| WarehouseError::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_numeric_id!(ProductId, "ProductId");
impl_numeric_id!(ReceiptId, "ReceiptId");
impl_numeric_id!(ExpenditureId, "ExpenditureId");
impl_numeric_id!(CheckId, "CheckId");

/// Monotonic id generator.
#[derive(Debug, Clone)]
pub struct IdSequence<T> {
    next: u32,
    _marker: PhantomData<T>,
}

impl<T: NumericId> IdSequence<T> {
    pub fn new() -> Self {
        Self {
            next: 1,
            _marker: PhantomData,
        }
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> T {
        let id = T::from(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`IdSequence::next_id`] will return.
    pub fn peek(&self) -> T {
        T::from(self.next)
    }
}

impl<T: NumericId> Default for IdSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_starts_at_one_and_never_repeats() {
        let mut seq: IdSequence<ProductId> = IdSequence::new();
        assert_eq!(seq.peek(), ProductId::new(1));
        let a = seq.next_id();
        let b = seq.next_id();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(seq.peek(), ProductId::new(3));
    }

    #[test]
    fn ids_parse_from_trimmed_input() {
        let id: ReceiptId = " 42 ".parse().unwrap();
        assert_eq!(id, ReceiptId::new(42));
        assert!(matches!(
            "x".parse::<CheckId>(),
            Err(WarehouseError::Validation(_))
        ));
    }
}
