//! Property-based tests for validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::*;

proptest! {
    #[test]
    fn prop_routing_number_accepts_nine_digits(number in "[0-9]{9}") {
        prop_assert!(validate_routing_number(&number).is_ok());
    }

    #[test]
    fn prop_routing_number_rejects_other_lengths(number in "[0-9]{0,8}|[0-9]{10,15}") {
        prop_assert!(validate_routing_number(&number).is_err());
    }

    #[test]
    fn prop_account_number_length_rule(number in "[0-9A-Z]{1,20}") {
        let ok = (ACCOUNT_NUMBER_MIN_LEN..=ACCOUNT_NUMBER_MAX_LEN).contains(&number.len());
        prop_assert_eq!(validate_account_number(&number).is_ok(), ok);
    }

    #[test]
    fn prop_percentage_in_range_accepted(hundredths in 0i64..=10_000) {
        prop_assert!(validate_percentage(Decimal::new(hundredths, 2)).is_ok());
    }

    #[test]
    fn prop_percentage_with_sub_cent_part_rejected(thousandths in 0i64..=100_000) {
        let percentage = Decimal::new(thousandths, 3);
        prop_assert_eq!(validate_percentage(percentage).is_ok(), thousandths % 10 == 0);
    }

    #[test]
    fn prop_percentage_total_never_exceeds_hundred(
        parts in prop::collection::vec(0i64..=10_000, 0..6),
        candidate in 0i64..=10_000,
    ) {
        let others: Vec<Decimal> = parts.iter().map(|p| Decimal::new(*p, 2)).collect();
        match validate_percentage_total(others, Decimal::new(candidate, 2)) {
            Ok(total) => prop_assert!(total <= Decimal::ONE_HUNDRED),
            Err(ValidationError::PercentageTotal(total)) => prop_assert!(total > Decimal::ONE_HUNDRED),
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    #[test]
    fn prop_deposit_amount_sign(mantissa in any::<i64>(), scale in 0u32..=4) {
        let amount = Decimal::new(mantissa, scale);
        prop_assert_eq!(validate_deposit_amount(amount).is_ok(), mantissa > 0);
    }
}
