//! Error accumulation.
//!
//! Two shapes are used throughout the crate and kept deliberately apart:
//!
//! - [`Validation`] for independent checks inside one stage. Combining two
//!   failures concatenates their messages, so nothing is lost.
//! - `Result<T, Errors>` for dependent stages. `?` stops at the first stage
//!   that fails and carries that stage's messages out unchanged.

/// Human-readable error messages, in the order they were produced.
pub type Errors = Vec<String>;

/// Outcome of an accumulating check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T> {
    Success(T),
    Failure(Errors),
}

impl<T> Validation<T> {
    pub fn success(value: T) -> Self {
        Validation::Success(value)
    }

    /// A failure carrying a single message.
    pub fn failure(message: impl Into<String>) -> Self {
        Validation::Failure(vec![message.into()])
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validation<U> {
        match self {
            Validation::Success(value) => Validation::Success(f(value)),
            Validation::Failure(errors) => Validation::Failure(errors),
        }
    }

    /// Combine two independent checks, keeping the errors of both.
    pub fn zip<U>(self, other: Validation<U>) -> Validation<(T, U)> {
        match (self, other) {
            (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
            (Validation::Failure(a), Validation::Success(_)) => Validation::Failure(a),
            (Validation::Success(_), Validation::Failure(b)) => Validation::Failure(b),
            (Validation::Failure(mut a), Validation::Failure(b)) => {
                a.extend(b);
                Validation::Failure(a)
            }
        }
    }

    /// Switch to fail-fast sequencing.
    pub fn into_result(self) -> Result<T, Errors> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(errors) => Err(errors),
        }
    }
}

impl<T> From<Result<T, Errors>> for Validation<T> {
    fn from(result: Result<T, Errors>) -> Self {
        match result {
            Ok(value) => Validation::Success(value),
            Err(errors) => Validation::Failure(errors),
        }
    }
}

/// Collect every item, accumulating all failures instead of stopping at the first.
impl<T> FromIterator<Validation<T>> for Validation<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Validation<T>>>(iter: I) -> Self {
        let mut values = Vec::new();
        let mut errors = Vec::new();
        for item in iter {
            match item {
                Validation::Success(value) => values.push(value),
                Validation::Failure(e) => errors.extend(e),
            }
        }
        if errors.is_empty() {
            Validation::Success(values)
        } else {
            Validation::Failure(errors)
        }
    }
}
