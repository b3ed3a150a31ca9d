pub mod access;
pub mod catalog;
pub mod cli;
pub mod expression;
pub mod session;
