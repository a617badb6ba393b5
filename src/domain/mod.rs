/// Domain layer: validated value types and the deployer configuration
pub mod entities;
pub mod value_objects;
