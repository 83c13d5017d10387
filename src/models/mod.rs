// Re-export API model types for ease of use

pub mod upload;

pub use upload::*;
