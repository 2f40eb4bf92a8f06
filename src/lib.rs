pub mod accelerators;
pub mod core;
pub mod shapes;

cfg_if::cfg_if! {
   if #[cfg(feature = "float64")] {
        pub type Float = f64;
        pub const PI: f64 = std::f64::consts::PI;
   } else {
        pub type Float = f32;
        pub const PI: f32 = std::f32::consts::PI;
   }
}

pub const ONE_MINUS_EPSILON: Float = 1.0 - Float::EPSILON;
