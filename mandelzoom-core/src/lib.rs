pub mod bigfloat;
pub mod config;
pub mod error;
pub mod extended_complex;
pub mod extended_value;
pub mod pixel_rect;
pub mod precision;
pub mod view_state;

pub use bigfloat::BigFloat;
pub use config::{suggested_iterations, SessionConfig};
pub use error::CoreError;
pub use extended_complex::ExtendedComplex;
pub use extended_value::ExtendedValue;
pub use pixel_rect::PixelRect;
pub use precision::required_precision_bits;
pub use view_state::ViewState;
