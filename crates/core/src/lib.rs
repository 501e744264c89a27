#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod validator;

pub use model::{Challenge, ChallengeId};
pub use validator::{Validator, ValidationError, Verdict};
