use thiserror::Error;

/// Recoverable conditions reported by [`crate::editor::BlockEditor`]. Unknown
/// ids and kind misuse are not errors; the mutators report them by returning
/// `false`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("No text to convert into paragraphs")]
    EmptyInput,

    #[error("No paragraphs selected")]
    NothingSelected,
}
