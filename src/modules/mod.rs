pub mod collect;
pub mod probe;
