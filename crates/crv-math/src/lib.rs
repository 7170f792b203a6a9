pub mod aabb;
pub mod vector;

pub use glam::{dvec2, DVec2};
pub use aabb::Aabb2;
pub use vector::{angle_between, are_parallel, points_eq};

pub type Point2 = DVec2;
pub type Vector2 = DVec2;
