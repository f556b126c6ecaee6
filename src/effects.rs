//! Error-accumulating validation.
//!
//! Validation of signal records and configuration must report *every*
//! problem in one pass, not just the first. These helpers wrap stillwater's
//! `Validation` so call sites can build per-item validations and combine
//! them without hand-written accumulation loops.
//!
//! ```rust
//! use riskmap::effects::{combine_validations, validation_failure, validation_success, Validated};
//!
//! fn non_empty(name: &str) -> Validated<String, String> {
//!     if name.is_empty() {
//!         validation_failure("name cannot be empty".to_string())
//!     } else {
//!         validation_success(name.to_string())
//!     }
//! }
//!
//! let combined = combine_validations(vec![non_empty("a"), non_empty(""), non_empty("")]);
//! assert!(combined.is_failure());
//! ```

use stillwater::{NonEmptyVec, Validation};

/// Validation result carrying every accumulated error of type `E`.
pub type Validated<T, E> = Validation<T, NonEmptyVec<E>>;

pub fn validation_success<T, E>(value: T) -> Validated<T, E> {
    Validation::Success(value)
}

pub fn validation_failure<T, E>(error: E) -> Validated<T, E> {
    Validation::Failure(NonEmptyVec::new(error, Vec::new()))
}

/// Failure with several errors; success when `errors` is empty.
pub fn validation_from_errors<T, E>(value: T, errors: Vec<E>) -> Validated<T, E> {
    let mut errors = errors.into_iter();
    match errors.next() {
        Some(head) => Validation::Failure(NonEmptyVec::new(head, errors.collect())),
        None => Validation::Success(value),
    }
}

/// Combine validations, keeping all successes or all errors.
pub fn combine_validations<T, E>(validations: Vec<Validated<T, E>>) -> Validated<Vec<T>, E> {
    let mut successes = Vec::with_capacity(validations.len());
    let mut failures: Vec<E> = Vec::new();

    for v in validations {
        match v {
            Validation::Success(value) => successes.push(value),
            Validation::Failure(errors) => failures.extend(errors),
        }
    }

    validation_from_errors(successes, failures)
}

/// Convert to a fail-fast `Result`, mapping the accumulated errors at once.
pub fn run_validation<T, E, X>(
    validation: Validated<T, E>,
    on_failure: impl FnOnce(Vec<E>) -> X,
) -> Result<T, X> {
    match validation {
        Validation::Success(value) => Ok(value),
        Validation::Failure(errors) => Err(on_failure(errors.into_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive(n: i32) -> Validated<i32, String> {
        if n > 0 {
            validation_success(n)
        } else {
            validation_failure(format!("{n} is not positive"))
        }
    }

    #[test]
    fn test_combine_keeps_all_successes() {
        let result = run_validation(
            combine_validations(vec![positive(1), positive(2), positive(3)]),
            |errors| errors,
        );
        assert_eq!(result, Ok(vec![1, 2, 3]));
    }

    #[test]
    fn test_combine_accumulates_every_error() {
        let result = run_validation(
            combine_validations(vec![positive(1), positive(-1), positive(0)]),
            |errors| errors,
        );
        assert_eq!(
            result,
            Err(vec![
                "-1 is not positive".to_string(),
                "0 is not positive".to_string()
            ])
        );
    }

    #[test]
    fn test_from_errors_empty_is_success() {
        let v: Validated<&str, String> = validation_from_errors("ok", Vec::new());
        assert!(v.is_success());
    }
}
