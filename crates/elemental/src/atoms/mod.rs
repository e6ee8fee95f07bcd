pub mod atomic_database;
mod chemical_composition;
mod element;
mod elemental_composition;
pub mod errors;
mod mass;
mod offset_kind;
