pub mod json;

pub use json::{JsonBodyRejection, LenientJson};
