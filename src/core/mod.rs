pub mod catalog;
pub mod chain;
pub mod selector;
pub mod theme;
