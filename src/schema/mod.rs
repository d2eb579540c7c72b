pub mod quote;
pub mod scene;
