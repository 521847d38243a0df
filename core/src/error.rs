use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum GameError {
    #[error("Unknown board form code {0}")]
    UnknownForm(u8),
    #[error("Number of fields must be positive")]
    InvalidFieldCount,
    #[error("Ratio of mines must lie strictly between 0 and 1, got {0}")]
    InvalidMineRatio(f64),
    #[error("Numeral value must lie in [-3999, 3999], got {0}")]
    NumeralOutOfRange(i32),
}

pub type Result<T> = std::result::Result<T, GameError>;
