pub mod error;
pub mod loader;
pub mod types;

pub use error::LoadError;
pub use loader::{
    describe_load_failure, load_builtin_reference_data, load_reference_data, DataSource,
};
pub use types::{Dimension, DimensionProfile, ParseDimensionError, Question, ReferenceData};
