pub mod form;
pub mod identity;
pub mod verification;
