//! # Warnings and the `Warned` result
//!
//! Every Cloud Controller response may carry free-text warnings (deprecations, quota
//! notices). They must reach the user even when the operation that produced them fails,
//! so an operation's outcome is a *pair*: its `Result` plus every warning gathered on the
//! way, in call order.
//!
//! [`Warned`] is that pair. Inside an operation, [`Warned::collect`] hands out a
//! `&mut Warnings` accumulator and lets the body use `?` freely:
//!
//! ```rust
//! use cf::warnings::{Warned, Warnings};
//! use cf::api::CcError;
//!
//! fn lookup(warnings: &[&str], fail: bool) -> Warned<u32, CcError> {
//!     let warnings = Warnings::from_strs(warnings);
//!     if fail {
//!         Warned::err(CcError::ResourceNotFound { message: "gone".into() }, warnings)
//!     } else {
//!         Warned::ok(7, warnings)
//!     }
//! }
//!
//! let out: Warned<u32, CcError> = Warned::collect(|warnings| {
//!     let a = lookup(&["first"], false).merge_into(warnings)?;
//!     let b = lookup(&["second"], true).merge_into(warnings)?;
//!     Ok(a + b)
//! });
//!
//! assert!(out.result.is_err());
//! assert_eq!(out.warnings.as_strs(), vec!["first", "second"]);
//! ```

use std::ops::Deref;

/// Ordered, never-deduplicated warning text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_strs(warnings: &[&str]) -> Self {
        Self(warnings.iter().map(|w| w.to_string()).collect())
    }

    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    pub fn append(&mut self, other: Warnings) {
        self.0.extend(other.0);
    }

    pub fn as_strs(&self) -> Vec<&str> {
        self.0.iter().map(String::as_str).collect()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Warnings {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Warnings {
    fn from(warnings: Vec<String>) -> Self {
        Self(warnings)
    }
}

impl Extend<String> for Warnings {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Warnings {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The outcome of an operation together with the warnings it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Warned<T, E = crate::error::Error> {
    pub result: Result<T, E>,
    pub warnings: Warnings,
}

impl<T: Default, E> Default for Warned<T, E> {
    fn default() -> Self {
        Self::ok(T::default(), Warnings::new())
    }
}

impl<T, E> Warned<T, E> {
    pub fn ok(value: T, warnings: Warnings) -> Self {
        Self {
            result: Ok(value),
            warnings,
        }
    }

    pub fn err(error: impl Into<E>, warnings: Warnings) -> Self {
        Self {
            result: Err(error.into()),
            warnings,
        }
    }

    /// Runs `body` with a fresh accumulator and pairs its result with what it gathered.
    pub fn collect<F>(body: F) -> Self
    where
        F: FnOnce(&mut Warnings) -> Result<T, E>,
    {
        let mut warnings = Warnings::new();
        let result = body(&mut warnings);
        Self { result, warnings }
    }

    /// Appends this call's warnings to `acc` (whatever the outcome) and returns the result.
    pub fn merge_into(self, acc: &mut Warnings) -> Result<T, E> {
        acc.append(self.warnings);
        self.result
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Warned<U, E> {
        Warned {
            result: self.result.map(f),
            warnings: self.warnings,
        }
    }

    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Warned<T, F> {
        Warned {
            result: self.result.map_err(f),
            warnings: self.warnings,
        }
    }

    /// Widens the error type, e.g. `CcError` into the crate-level `Error`.
    pub fn err_into<F>(self) -> Warned<T, F>
    where
        E: Into<F>,
    {
        self.map_err(Into::into)
    }

    pub fn into_parts(self) -> (Result<T, E>, Warnings) {
        (self.result, self.warnings)
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CcError;

    fn not_found() -> CcError {
        CcError::ResourceNotFound {
            message: "nope".into(),
        }
    }

    #[test]
    fn collect_keeps_warnings_from_failed_calls() {
        let out: Warned<(), CcError> = Warned::collect(|warnings| {
            Warned::<(), CcError>::ok((), Warnings::from_strs(&["a"])).merge_into(warnings)?;
            Warned::<(), CcError>::err(not_found(), Warnings::from_strs(&["b", "c"]))
                .merge_into(warnings)?;
            Warned::<(), CcError>::ok((), Warnings::from_strs(&["never"])).merge_into(warnings)?;
            Ok(())
        });

        assert_eq!(out.result, Err(not_found()));
        assert_eq!(out.warnings.as_strs(), vec!["a", "b", "c"]);
    }

    #[test]
    fn warnings_are_never_deduplicated() {
        let mut warnings = Warnings::from_strs(&["same"]);
        warnings.push("same");
        warnings.append(Warnings::from_strs(&["same"]));
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn default_is_zero_value_without_warnings() {
        let out: Warned<Vec<String>, CcError> = Warned::default();
        assert_eq!(out.result, Ok(vec![]));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn err_into_widens_the_error() {
        let out: Warned<(), crate::error::Error> =
            Warned::<(), CcError>::err(not_found(), Warnings::new()).err_into();
        assert!(out.result.unwrap_err().is_not_found());
    }
}
