//! Cache Module
//!
//! Instrumented key-value cache: stores values under random keys, counts
//! and records every `store` call, and replays the recorded history.

mod history;
mod instrumented;
mod payload;


// Re-export public types
pub use history::{inputs_key, outputs_key, CallEntry, CallRecorder, Replay};
pub use instrumented::{
    decode_float, decode_integer, decode_text, InstrumentedCache, STORE_OPERATION,
};
pub use payload::Payload;
