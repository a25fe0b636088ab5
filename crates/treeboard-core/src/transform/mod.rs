//! Pure geometry transforms driven by pointer movement.
//!
//! Every function here takes an immutable node and pointer input and returns
//! new geometry; applying the result to a store is the caller's job.

mod endpoint;
mod resize;
mod rotate;

pub use endpoint::{line_between, resize_line};
pub use resize::{ResizeOptions, resize_box, scale_points};
pub use rotate::RotationDrag;
