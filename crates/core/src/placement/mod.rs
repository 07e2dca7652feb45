#![forbid(unsafe_code)]

mod grid;
mod planner;

pub use grid::*;
pub use planner::*;

#[cfg(test)]
mod tests;
