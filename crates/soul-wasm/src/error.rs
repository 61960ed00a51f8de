use crate::SectionId;

#[derive(Debug, thiserror::Error)]
pub enum WasmError {
    /// Section records must appear in monotonically-increasing
    /// section-type order, per the WebAssembly binary format.
    #[error("sections out of order: {prev:?} must come before {next:?}")]
    OutOfOrderSection { prev: SectionId, next: SectionId },
}
