pub mod cube;
pub mod sphere;
pub mod triangle;

pub use cube::Cube;
pub use sphere::Sphere;
pub use triangle::Triangle;
