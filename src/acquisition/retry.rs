//! Bounded retry with URL fallback
//!
//! ```text
//! Attempt(ApiZipball, 1) --fail--> Attempt(WebArchive, 2) --fail--> Fail(attempts = 2)
//!          |                               |
//!          +--ok--> Success                +--ok--> Success
//! ```

use super::urls::Endpoint;

/// Maximum number of download attempts per install
pub const MAX_ATTEMPTS: u32 = 2;

/// One download attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub endpoint: Endpoint,
    /// 1-based attempt number
    pub number: u32,
}

/// What happens after an attempt completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T, E> {
    /// Attempt succeeded
    Success(T),
    /// Attempt failed; try again with the next attempt
    Retry { next: Attempt, error: E },
    /// Attempt failed and the budget is spent
    Fail { attempts: u32, error: E },
}

impl Attempt {
    /// The first attempt always uses the primary endpoint
    pub fn first() -> Self {
        Self {
            endpoint: Endpoint::ApiZipball,
            number: 1,
        }
    }

    /// Transition on the outcome of this attempt
    pub fn step<T, E>(self, outcome: Result<T, E>) -> Step<T, E> {
        match outcome {
            Ok(value) => Step::Success(value),
            Err(error) if self.number >= MAX_ATTEMPTS => Step::Fail {
                attempts: self.number,
                error,
            },
            Err(error) => Step::Retry {
                next: Attempt {
                    endpoint: Endpoint::WebArchive,
                    number: self.number + 1,
                },
                error,
            },
        }
    }
}

/// Every attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhausted<E> {
    /// The attempt that failed last
    pub last: Attempt,
    pub attempts: u32,
    pub error: E,
}

/// Run `op` under the retry policy.
///
/// Returns the value from the first successful attempt, or the last attempt,
/// its error and the attempt count reported by the final step.
pub fn run<T, E>(mut op: impl FnMut(Attempt) -> Result<T, E>) -> Result<T, Exhausted<E>> {
    let mut attempt = Attempt::first();
    loop {
        match attempt.step(op(attempt)) {
            Step::Success(value) => return Ok(value),
            Step::Retry { next, error: _ } => attempt = next,
            Step::Fail { attempts, error } => {
                return Err(Exhausted {
                    last: attempt,
                    attempts,
                    error,
                });
            }
        }
    }
}
