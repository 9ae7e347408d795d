use crate::common::deserialize::deserialize_from_slice;
use crate::common::future::SinkExt;
use crate::common::serialize::serialize_to_bytes;
use crate::message::MessageError;
use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use std::marker::PhantomData;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_stream::StreamExt;
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Largest frame a four byte length prefix can describe.
const MAXIMUM_FRAME_LENGTH: usize = u32::MAX as usize;

fn frame_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .max_frame_length(MAXIMUM_FRAME_LENGTH)
        .new_codec()
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Writes every message as one length-prefixed frame.
#[derive(Debug)]
pub struct MessageSocketSender<T>
where
    T: Serialize,
{
    writer: FramedWrite<OwnedWriteHalf, LengthDelimitedCodec>,
    r#type: PhantomData<T>,
}

impl<T> MessageSocketSender<T>
where
    T: Serialize,
{
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self {
            writer: FramedWrite::new(writer, frame_codec()),
            r#type: PhantomData::<T>,
        }
    }

    /// Writes one message and flushes it to the peer before returning.
    pub async fn send<M>(&mut self, message: M) -> Result<(), MessageError>
    where
        T: From<M>,
    {
        let bytes = serialize_to_bytes(&T::from(message))?;
        self.writer.send(bytes.freeze()).await?;

        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), MessageError> {
        SinkExt::<bytes::Bytes>::close(&mut self.writer).await?;

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Decodes a message only once its whole frame has arrived.
#[derive(Debug)]
pub struct MessageSocketReceiver<T>
where
    T: DeserializeOwned,
{
    reader: FramedRead<OwnedReadHalf, LengthDelimitedCodec>,
    r#type: PhantomData<T>,
}

impl<T> MessageSocketReceiver<T>
where
    T: DeserializeOwned,
{
    pub fn new(reader: OwnedReadHalf) -> Self {
        Self {
            reader: FramedRead::new(reader, frame_codec()),
            r#type: PhantomData::<T>,
        }
    }

    /// Returns `None` once the peer closed the connection between two messages.
    pub async fn receive(&mut self) -> Result<Option<T>, MessageError> {
        let frame = match self.reader.next().await {
            None => return Ok(None),
            Some(frame) => frame?,
        };

        let (message, read) = deserialize_from_slice::<T>(&frame)?;

        if read != frame.len() {
            return Err(MessageError::TrailingBytes(frame.len() - read));
        }

        Ok(Some(message))
    }

    pub async fn do_receive(&mut self) -> Result<T, MessageError> {
        self.receive().await?.ok_or(MessageError::ExpectedMessage)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use crate::message::{Envelope, HelloMessage, PeerMessage, Tag};
    use bytes::{BufMut, Bytes};
    use tokio::net::{TcpListener, TcpStream};

    async fn stream_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let connected = TcpStream::connect(listener.local_addr().unwrap())
            .await
            .unwrap();
        let (accepted, _) = listener.accept().await.unwrap();

        (connected, accepted)
    }

    #[tokio::test]
    async fn receive_in_send_order() {
        let (connected, accepted) = stream_pair().await;
        let (_, writer) = connected.into_split();
        let (reader, _) = accepted.into_split();

        let mut sender = MessageSocketSender::<PeerMessage>::new(writer);
        let mut receiver = MessageSocketReceiver::<PeerMessage>::new(reader);

        sender.send(HelloMessage::new(3)).await.unwrap();
        sender
            .send(Envelope::new(3, Tag::RESULT_ROW, vec![1, -2]))
            .await
            .unwrap();
        sender.shutdown().await.unwrap();

        assert!(matches!(
            receiver.do_receive().await.unwrap(),
            PeerMessage::Hello(message) if message.rank() == 3
        ));
        assert!(matches!(
            receiver.do_receive().await.unwrap(),
            PeerMessage::Envelope(envelope) if envelope.payload() == [1, -2]
        ));
        assert!(receiver.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn receive_rejects_trailing_bytes() {
        let (connected, accepted) = stream_pair().await;
        let (_, writer) = connected.into_split();
        let (reader, _) = accepted.into_split();

        let mut frame = serialize_to_bytes(&PeerMessage::from(HelloMessage::new(1))).unwrap();
        frame.put_u8(0);

        let mut writer = FramedWrite::new(writer, frame_codec());
        writer.send(Bytes::from(frame)).await.unwrap();

        let mut receiver = MessageSocketReceiver::<PeerMessage>::new(reader);

        assert!(matches!(
            receiver.receive().await,
            Err(MessageError::TrailingBytes(1))
        ));
    }
}
