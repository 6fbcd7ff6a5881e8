//! geonodes-api-core: typed values and the implicit conversion table (core, geometry-agnostic)

pub mod conversion;
pub mod json;
pub mod value;

pub use conversion::{implicit_conversions, ConversionError, ConversionRegistry};
pub use value::{DataType, Value, ValueKind};
