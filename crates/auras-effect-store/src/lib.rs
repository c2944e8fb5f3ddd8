//! Effect storage for token auras.

pub mod memory_effect_repository;
pub mod origin_index;
