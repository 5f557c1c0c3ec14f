//! Key and value encoding.
//!
//! - `key`: composite keys that realize one total order per index.
//! - `value`: the checksummed quad payload stored under every key.

pub mod key;
pub mod value;

pub use key::{DEFAULT_BOUNDARY, DEFAULT_SEPARATOR, EncodingError, KeyCodec, Violation};
pub use value::{ValueError, decode_value, encode_value};
