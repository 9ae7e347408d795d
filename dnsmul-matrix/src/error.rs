use dnsmul_core::common::runtime::JoinError;
use dnsmul_core::communicator::CommunicationError;
use std::error;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Illegal process count or matrix size. Every process detects it on its own from the same
/// input, before any message is exchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigurationError {
    UnsupportedProcessCount {
        process_count: usize,
        supported: Vec<usize>,
    },
    IndivisibleMatrixSize {
        matrix_size: usize,
        side: usize,
    },
    UnknownRank {
        rank: usize,
        process_count: usize,
    },
}

impl error::Error for ConfigurationError {}

impl Display for ConfigurationError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Self::UnsupportedProcessCount {
                process_count,
                supported,
            } => {
                write!(formatter, "Wrong number of processes: {process_count}, expected one of")?;

                for (index, count) in supported.iter().enumerate() {
                    if index == 0 {
                        write!(formatter, " {count}")?;
                    } else {
                        write!(formatter, ", {count}")?;
                    }
                }

                Ok(())
            }
            Self::IndivisibleMatrixSize { matrix_size, side } => write!(
                formatter,
                "Matrix size {matrix_size} is not divisible by grid side {side}"
            ),
            Self::UnknownRank {
                rank,
                process_count,
            } => write!(
                formatter,
                "Rank {rank} is outside of {process_count} processes"
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Missing, unreadable or malformed matrix source. Rows are counted from zero.
#[derive(Debug)]
pub enum SourceError {
    Open { path: PathBuf, error: io::Error },
    Read(io::Error),
    Empty,
    EmptyRow { row: usize },
    InvalidToken { row: usize, token: String },
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    RowCount { expected: usize, actual: usize },
    SizeMismatch { left: usize, right: usize },
}

impl error::Error for SourceError {}

impl Display for SourceError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Self::Open { path, error } => {
                write!(formatter, "Cannot open {}: {}", path.display(), error)
            }
            Self::Read(error) => Display::fmt(error, formatter),
            Self::Empty => write!(formatter, "Matrix source is empty"),
            Self::EmptyRow { row } => write!(formatter, "Row {row} is empty"),
            Self::InvalidToken { row, token } => {
                write!(formatter, "Row {row} contains invalid integer {token:?}")
            }
            Self::RowLength {
                row,
                expected,
                actual,
            } => write!(
                formatter,
                "Row {row} has {actual} elements, expected {expected}"
            ),
            Self::RowCount { expected, actual } => {
                write!(formatter, "Matrix has {actual} rows, expected {expected}")
            }
            Self::SizeMismatch { left, right } => write!(
                formatter,
                "Left matrix has size {left}, right matrix has size {right}"
            ),
        }
    }
}

impl From<io::Error> for SourceError {
    fn from(error: io::Error) -> Self {
        Self::Read(error)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum RunError {
    Configuration(ConfigurationError),
    Source(SourceError),
    Communication(CommunicationError),
    Output(io::Error),
    Join(JoinError),
}

impl error::Error for RunError {}

impl Display for RunError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Self::Configuration(error) => Display::fmt(error, formatter),
            Self::Source(error) => Display::fmt(error, formatter),
            Self::Communication(error) => Display::fmt(error, formatter),
            Self::Output(error) => Display::fmt(error, formatter),
            Self::Join(error) => Display::fmt(error, formatter),
        }
    }
}

impl From<ConfigurationError> for RunError {
    fn from(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }
}

impl From<SourceError> for RunError {
    fn from(error: SourceError) -> Self {
        Self::Source(error)
    }
}

impl From<CommunicationError> for RunError {
    fn from(error: CommunicationError) -> Self {
        Self::Communication(error)
    }
}

impl From<io::Error> for RunError {
    fn from(error: io::Error) -> Self {
        Self::Output(error)
    }
}

impl From<JoinError> for RunError {
    fn from(error: JoinError) -> Self {
        Self::Join(error)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
