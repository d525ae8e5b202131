//! Tests for Money, Currency and ExchangeRate

use core_kernel::{Currency, ExchangeRate, Money, MoneyError};
use rust_decimal_macros::dec;

mod arithmetic {
    use super::*;

    #[test]
    fn add_and_sub_preserve_currency() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(40.50), Currency::USD);

        assert_eq!((a + b).amount(), dec!(140.50));
        assert_eq!((a - b).amount(), dec!(59.50));
        assert_eq!((a - b).currency(), Currency::USD);
    }

    #[test]
    fn negation_flips_sign() {
        let m = Money::new(dec!(25), Currency::IDR);
        assert_eq!((-m).amount(), dec!(-25));
        assert!((-m).is_negative());
    }

    #[test]
    fn checked_ops_surface_mismatch() {
        let idr = Money::new(dec!(1000), Currency::IDR);
        let usd = Money::new(dec!(10), Currency::USD);

        let err = idr.checked_sub(&usd).unwrap_err();
        assert!(matches!(err, MoneyError::CurrencyMismatch(_, _)));
    }
}

mod minor_units {
    use super::*;

    #[test]
    fn equality_is_exact_on_minor_units() {
        // 0.1 + 0.2 is exactly 0.3 in decimal arithmetic
        let sum = Money::new(dec!(0.1), Currency::USD) + Money::new(dec!(0.2), Currency::USD);
        assert_eq!(sum.minor_units(), Money::new(dec!(0.3), Currency::USD).minor_units());
    }

    #[test]
    fn sub_minor_precision_rounds_at_currency_scale() {
        let m = Money::new(dec!(1.2345), Currency::USD);
        assert_eq!(m.minor_units(), 123);
        assert_eq!(m.round_to_currency().amount(), dec!(1.23));
    }
}

mod conversion {
    use super::*;

    #[test]
    fn converts_transaction_amount_to_base() {
        let rate = ExchangeRate::new(dec!(15750)).unwrap();
        let usd = Money::new(dec!(2.50), Currency::USD);

        let base = rate.to_base(&usd, Currency::IDR);
        assert_eq!(base.amount(), dec!(39375));
        assert_eq!(base.currency(), Currency::IDR);
    }

    #[test]
    fn conversion_is_stateless_and_repeatable() {
        let rate = ExchangeRate::new(dec!(1.1)).unwrap();
        let eur = Money::new(dec!(100), Currency::EUR);

        let first = rate.to_base(&eur, Currency::USD);
        let second = rate.to_base(&eur, Currency::USD);
        assert_eq!(first, second);
        // source amount untouched
        assert_eq!(eur.amount(), dec!(100));
    }

    #[test]
    fn default_rate_is_unity() {
        assert_eq!(ExchangeRate::default().as_decimal(), dec!(1));
    }
}
