pub mod dream;
pub mod interpretation;
pub mod symbol_dictionary;
