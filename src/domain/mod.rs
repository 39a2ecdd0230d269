pub mod camera;
pub mod entity;
pub mod physics;
pub mod rect;
pub mod tile;
