use bytes::{BufMut, BytesMut};
use postcard::serialize_with_flavor;
use serde::Serialize;
use std::error;
use std::fmt::{self, Debug, Display, Formatter};

////////////////////////////////////////////////////////////////////////////////////////////////////

struct BytesMutFlavor(BytesMut);

impl postcard::ser_flavors::Flavor for BytesMutFlavor {
    type Output = BytesMut;

    fn try_push(&mut self, data: u8) -> postcard::Result<()> {
        self.0.put_u8(data);

        Ok(())
    }

    fn finalize(self) -> postcard::Result<Self::Output> {
        Ok(self.0)
    }

    fn try_extend(&mut self, data: &[u8]) -> postcard::Result<()> {
        self.0.extend_from_slice(data);

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SerializeError(postcard::Error);

impl Debug for SerializeError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.0, formatter)
    }
}

impl Display for SerializeError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, formatter)
    }
}

impl error::Error for SerializeError {}

impl From<postcard::Error> for SerializeError {
    fn from(error: postcard::Error) -> Self {
        Self::new(error)
    }
}

impl SerializeError {
    pub fn new(error: postcard::Error) -> Self {
        Self(error)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn serialize_to_bytes<T>(value: &T) -> Result<BytesMut, SerializeError>
where
    T: Serialize,
{
    Ok(serialize_with_flavor(
        value,
        BytesMutFlavor(BytesMut::new()),
    )?)
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::deserialize::deserialize_from_slice;

    #[test]
    fn serialize_matches_postcard() {
        let value = (7usize, vec![1i64, -2, 3]);

        assert_eq!(
            serialize_to_bytes(&value).unwrap().as_ref(),
            postcard::to_allocvec(&value).unwrap().as_slice()
        );
    }

    #[test]
    fn deserialize_reports_consumed_length() {
        let mut bytes = serialize_to_bytes(&vec![5i64, 6]).unwrap();
        bytes.extend_from_slice(&[0xff, 0xff]);

        let (value, read) = deserialize_from_slice::<Vec<i64>>(&bytes).unwrap();

        assert_eq!(value, vec![5, 6]);
        assert_eq!(read, bytes.len() - 2);
    }
}
