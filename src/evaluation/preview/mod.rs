mod density_curve;

pub use density_curve::{CurveFormat, DensityCurve, DensityRow};
