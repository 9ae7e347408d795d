use crate::message::MessageError;
use std::fmt::Debug;
use tokio::sync::mpsc;

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct MessageQueueSender<T>
where
    T: Debug + Send,
{
    sender: mpsc::Sender<T>,
}

impl<T> MessageQueueSender<T>
where
    T: Debug + Send,
{
    fn new(sender: mpsc::Sender<T>) -> Self {
        Self { sender }
    }

    /// Waits until the queue has room for `message`. Fails once the receiving side is gone.
    pub async fn send<M>(&self, message: M) -> Result<(), MessageError>
    where
        T: From<M>,
    {
        self.sender
            .send(T::from(message))
            .await
            .map_err(|_| MessageError::Closed)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct MessageQueueReceiver<T>
where
    T: Debug + Send,
{
    receiver: mpsc::Receiver<T>,
}

impl<T> MessageQueueReceiver<T>
where
    T: Debug + Send,
{
    fn new(receiver: mpsc::Receiver<T>) -> Self {
        Self { receiver }
    }

    /// Returns `None` once every sender is gone and the queue is drained.
    pub async fn receive(&mut self) -> Option<T> {
        self.receiver.recv().await
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn message_queue<T>(capacity: usize) -> (MessageQueueSender<T>, MessageQueueReceiver<T>)
where
    T: Debug + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(capacity);

    (
        MessageQueueSender::new(sender),
        MessageQueueReceiver::new(receiver),
    )
}

////////////////////////////////////////////////////////////////////////////////////////////////////
