#![allow(dead_code, unused_imports)]

pub mod fakes;
pub mod strategies;

pub use fakes::*;
pub use strategies::*;
