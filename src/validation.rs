// ABOUTME: Request field validation helpers for ranges, lengths, and list limits
// ABOUTME: Every failure maps to a 400 with the offending field named in the message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use crate::constants::auth::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::constants::limits::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use crate::errors::{AppError, AppResult};
use std::fmt::Display;
use std::ops::RangeInclusive;

/// Request bodies that check their own field bounds
pub trait Validate {
    /// Check every provided field against its bounds
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error naming the first offending field
    fn validate(&self) -> AppResult<()>;
}

/// Require `value` to lie within `range`
///
/// # Errors
///
/// Returns a value-out-of-range error naming `field`
pub fn check_range<T>(field: &str, value: T, range: &RangeInclusive<T>) -> AppResult<()>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(AppError::out_of_range(field, range.start(), range.end()))
    }
}

/// Like [`check_range`], skipping absent values
///
/// # Errors
///
/// Returns a value-out-of-range error naming `field`
pub fn check_optional_range<T>(
    field: &str,
    value: Option<T>,
    range: &RangeInclusive<T>,
) -> AppResult<()>
where
    T: PartialOrd + Display,
{
    value.map_or(Ok(()), |value| check_range(field, value, range))
}

/// Require a string's character count to lie within `range`
///
/// # Errors
///
/// Returns an invalid-input error naming `field`
pub fn check_len(field: &str, value: &str, range: &RangeInclusive<usize>) -> AppResult<()> {
    let len = value.trim().chars().count();
    if range.contains(&len) {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "{field} must be between {} and {} characters",
            range.start(),
            range.end()
        )))
    }
}

/// Cap an optional string's character count
///
/// # Errors
///
/// Returns an invalid-input error naming `field`
pub fn check_max_len(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(value) if value.chars().count() > max => Err(AppError::invalid_input(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// Resolve a list endpoint's `limit` query parameter
///
/// # Errors
///
/// Returns a value-out-of-range error when the limit is outside `1..=500`
pub fn resolve_limit(limit: Option<u32>) -> AppResult<u32> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    check_range("limit", limit, &(1..=MAX_LIST_LIMIT))?;
    Ok(limit)
}

/// Minimal structural email check: non-empty local part and a dotted domain
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.len() <= 5 || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Password length rule
///
/// # Errors
///
/// Returns an invalid-input error when the password is too short or too long
pub fn check_password(password: &str) -> AppResult<()> {
    let len = password.chars().count();
    if (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "Password must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters"
        )))
    }
}
