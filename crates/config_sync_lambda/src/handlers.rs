//! One module per Lambda entry point.
//!
//! Each handler takes the raw event plus its collaborators and always returns a
//! `HandlerResponse`; failures never escape as Lambda errors.

pub mod direct_deploy;
pub mod parameter;
pub mod sync;
pub mod training;
