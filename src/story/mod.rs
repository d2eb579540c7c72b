pub mod narrator;
pub mod options;
pub mod presentation;
pub mod prompt;
pub mod session;
pub mod transcript;
