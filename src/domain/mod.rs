//! Domain: bodies, constraints and the composite tree that owns them

pub mod body;
pub mod composite;
pub mod constraint;
pub mod world;
