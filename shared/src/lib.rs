pub mod dictionary;
pub mod pattern;
pub mod term;
pub mod triple;
pub mod vocab;
