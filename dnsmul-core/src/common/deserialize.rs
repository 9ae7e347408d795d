use postcard::take_from_bytes;
use serde::de::DeserializeOwned;
use std::error;
use std::fmt::{self, Debug, Display, Formatter};

////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct DeserializeError(postcard::Error);

impl Debug for DeserializeError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.0, formatter)
    }
}

impl Display for DeserializeError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, formatter)
    }
}

impl error::Error for DeserializeError {}

impl From<postcard::Error> for DeserializeError {
    fn from(error: postcard::Error) -> Self {
        Self::new(error)
    }
}

impl DeserializeError {
    pub fn new(error: postcard::Error) -> Self {
        Self(error)
    }

    /// The input ended before a complete value was decoded.
    pub fn is_unexpected_end(&self) -> bool {
        matches!(self.0, postcard::Error::DeserializeUnexpectedEnd)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Decodes one value from the front of `bytes` and returns it with the number of bytes read.
pub fn deserialize_from_slice<T>(bytes: &[u8]) -> Result<(T, usize), DeserializeError>
where
    T: DeserializeOwned,
{
    let (value, remaining) = take_from_bytes::<T>(bytes)?;

    Ok((value, bytes.len() - remaining.len()))
}
