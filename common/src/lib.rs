#[macro_use]
pub mod macros;
pub mod json;
pub mod log_setup;
pub mod normalize_string;
pub mod output_stream;
pub mod test_utils;

pub use output_stream::OutputStream;
