//! Property-based test data generators

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money};

/// Strategy for positive amounts in minor units
pub fn positive_minor_units() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for a positive IDR Money value
pub fn idr_money() -> impl Strategy<Value = Money> {
    positive_minor_units().prop_map(|minor| Money::from_minor(minor, Currency::IDR))
}

/// Strategy for a list of positive amounts usable as mirrored
/// debit/credit pairs
pub fn balanced_amounts() -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(
        positive_minor_units().prop_map(|minor| Decimal::new(minor, 0)),
        1..6,
    )
}

/// Strategy over the supported currencies
pub fn any_currency() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::IDR),
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::JPY),
        Just(Currency::SGD),
    ]
}
