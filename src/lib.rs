#![no_std]

pub mod config;
pub mod display;
pub mod endpoint;
pub mod error;
pub mod payload;
pub mod schedule;
#[cfg(feature = "firmware")]
pub mod sleep;
