//! WebAssembly binary-module envelope writer (stub): magic, version, and
//! section framing only. Out of scope per spec: actual section payload
//! encoding (types, functions, code bodies) from an IR `Module`.

pub mod error;
pub mod module;

pub use error::WasmError;
pub use module::{write_envelope, uleb128, Section, SectionId, MAGIC, VERSION};
