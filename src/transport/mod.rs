//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod config;
mod push;

pub use config::decode_config_json;
pub use push::{decode_push_json_response, encode_push_form};
