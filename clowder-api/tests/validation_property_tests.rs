//! Property-Based Tests for Boundary Validation
//!
//! **Property: request-shape validation is total and consistent**
//!
//! For any input, the validation traits SHALL either accept it or reject
//! it with the matching error code - never panic - and the acceptance
//! decision SHALL agree with the documented bounds (1-100 characters for
//! names, 1-3 targets per mission, non-negative numerics).

use clowder_api::constants::{
    MAX_NAME_LENGTH, MAX_TARGETS_PER_MISSION, MIN_TARGETS_PER_MISSION,
};
use clowder_api::error::ErrorCode;
use clowder_api::types::ListParams;
use clowder_api::validation::{ValidateLength, ValidateNonEmpty, ValidateRange};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_non_empty_accepts_exactly_non_whitespace(s in ".{0,200}") {
        let result = s.validate_non_empty("field");
        prop_assert_eq!(result.is_ok(), !s.trim().is_empty());
        if let Err(err) = s.validate_non_empty("field") {
            prop_assert_eq!(err.code, ErrorCode::MissingField);
        }
    }

    #[test]
    fn prop_length_bound_agrees_with_char_count(s in "\\PC{0,150}") {
        let result = s.validate_length("name", 1, MAX_NAME_LENGTH);
        let chars = s.chars().count();
        prop_assert_eq!(result.is_ok(), (1..=MAX_NAME_LENGTH).contains(&chars));
        if let Err(err) = s.validate_length("name", 1, MAX_NAME_LENGTH) {
            prop_assert_eq!(err.code, ErrorCode::InvalidRange);
        }
    }

    #[test]
    fn prop_target_count_bound(count in 0i64..10) {
        let result = count.validate_range(
            "targets",
            MIN_TARGETS_PER_MISSION as i64,
            MAX_TARGETS_PER_MISSION as i64,
        );
        prop_assert_eq!(result.is_ok(), (1..=3).contains(&count));
    }

    #[test]
    fn prop_non_negative_numerics(years in i32::MIN..i32::MAX, salary in -1.0e9f64..1.0e9) {
        prop_assert_eq!(
            years.validate_non_negative("years_of_experience").is_ok(),
            years >= 0
        );
        prop_assert_eq!(
            salary.validate_non_negative("salary").is_ok(),
            salary >= 0.0
        );
    }

    #[test]
    fn prop_list_params_never_go_negative(skip in any::<Option<i64>>(), limit in any::<Option<i64>>()) {
        let params = ListParams { skip, limit };
        prop_assert!(params.skip() >= 0);
        prop_assert!(params.limit() >= 0);
        // Omitted values fall back to the documented defaults.
        if skip.is_none() {
            prop_assert_eq!(params.skip(), 0);
        }
        if limit.is_none() {
            prop_assert_eq!(params.limit(), 100);
        }
    }
}
