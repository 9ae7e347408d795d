use crate::common::async_trait;
use crate::communicator::{check_rank, open_envelope, CommunicationError, Communicator};
use crate::element::Element;
use crate::message::{
    Envelope, HelloMessage, MessageError, MessageSocketReceiver, MessageSocketSender, PeerMessage,
    Tag,
};
use crate::rank::Rank;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;
use tracing::{debug, trace};

////////////////////////////////////////////////////////////////////////////////////////////////////

const CONNECT_ATTEMPTS: usize = 200;
const CONNECT_DELAY: Duration = Duration::from_millis(25);

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
struct SocketPeer {
    sender: MessageSocketSender<PeerMessage>,
    receiver: MessageSocketReceiver<PeerMessage>,
}

impl SocketPeer {
    fn new(stream: TcpStream) -> Result<Self, CommunicationError> {
        stream.set_nodelay(true)?;

        let (reader, writer) = stream.into_split();

        Ok(Self {
            sender: MessageSocketSender::new(writer),
            receiver: MessageSocketReceiver::new(reader),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Communicator over one TCP connection per pair of processes.
///
/// Every process listens on its own address, connects to every lower rank and accepts every
/// higher rank. Each connection starts with a hello message naming the connecting rank.
#[derive(Debug)]
pub struct SocketCommunicator {
    rank: Rank,
    peers: Vec<Option<SocketPeer>>,
    loopback: VecDeque<Envelope>,
}

#[async_trait]
impl Communicator for SocketCommunicator {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    async fn send(
        &mut self,
        destination: Rank,
        tag: Tag,
        payload: Vec<Element>,
    ) -> Result<(), CommunicationError> {
        check_rank(destination, self.size())?;

        let envelope = Envelope::new(self.rank, tag, payload);

        if destination == self.rank {
            self.loopback.push_back(envelope);
            return Ok(());
        }

        trace!(
            "{} -> {} tag {} with {} elements",
            self.rank,
            destination,
            tag,
            envelope.payload().len()
        );

        self.peer(destination)?.sender.send(envelope).await?;

        Ok(())
    }

    async fn receive(
        &mut self,
        source: Rank,
        tag: Tag,
        length: usize,
    ) -> Result<Vec<Element>, CommunicationError> {
        check_rank(source, self.size())?;

        let envelope = if source == self.rank {
            self.loopback
                .pop_front()
                .ok_or(CommunicationError::Message(MessageError::ExpectedMessage))?
        } else {
            match self.peer(source)?.receiver.receive().await? {
                None => return Err(CommunicationError::Closed(source)),
                Some(PeerMessage::Envelope(envelope)) => envelope,
                Some(PeerMessage::Hello(_)) => {
                    return Err(MessageError::UnexpectedMessage.into())
                }
            }
        };

        trace!("{} <- {} tag {}", self.rank, source, envelope.tag());

        open_envelope(envelope, source, tag, length)
    }

    async fn finalize(mut self) -> Result<(), CommunicationError>
    where
        Self: Sized,
    {
        for (rank, peer) in self.peers.iter_mut().enumerate() {
            if let Some(peer) = peer {
                if let Err(error) = peer.sender.shutdown().await {
                    debug!("Shutdown of connection to rank {} failed: {}", rank, error);
                }
            }
        }

        trace!("{} finalized", self.rank);

        Ok(())
    }
}

impl SocketCommunicator {
    /// Binds `addresses[rank]` and connects to every other address.
    pub async fn connect(rank: Rank, addresses: &[SocketAddr]) -> Result<Self, CommunicationError> {
        check_rank(rank, addresses.len())?;

        let listener = TcpListener::bind(addresses[rank]).await?;

        Self::from_listener(rank, listener, addresses).await
    }

    /// Connects using an already bound listener for `rank`.
    pub async fn from_listener(
        rank: Rank,
        listener: TcpListener,
        addresses: &[SocketAddr],
    ) -> Result<Self, CommunicationError> {
        let size = addresses.len();
        check_rank(rank, size)?;

        let mut peers = (0..size).map(|_| None).collect::<Vec<Option<SocketPeer>>>();

        for (peer_rank, address) in addresses.iter().enumerate().take(rank) {
            let mut peer = SocketPeer::new(connect(*address).await?)?;
            peer.sender.send(HelloMessage::new(rank)).await?;

            debug!("Connected to rank {} at {}", peer_rank, address);

            peers[peer_rank] = Some(peer);
        }

        for _ in rank + 1..size {
            let (stream, address) = listener.accept().await?;
            let mut peer = SocketPeer::new(stream)?;

            let peer_rank = match peer.receiver.do_receive().await? {
                PeerMessage::Hello(message) => message.rank(),
                PeerMessage::Envelope(_) => return Err(MessageError::UnexpectedMessage.into()),
            };

            check_rank(peer_rank, size)?;

            if peer_rank <= rank || peers[peer_rank].is_some() {
                return Err(CommunicationError::DuplicatePeer(peer_rank));
            }

            debug!("Accepted rank {} from {}", peer_rank, address);

            peers[peer_rank] = Some(peer);
        }

        Ok(Self {
            rank,
            peers,
            loopback: VecDeque::default(),
        })
    }

    fn peer(&mut self, rank: Rank) -> Result<&mut SocketPeer, CommunicationError> {
        let size = self.size();

        self.peers
            .get_mut(rank)
            .and_then(Option::as_mut)
            .ok_or(CommunicationError::UnknownRank { rank, size })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

// Peers start in any order, so a refused connection only means the peer has not bound yet.
async fn connect(address: SocketAddr) -> Result<TcpStream, io::Error> {
    let mut attempt = 1;

    loop {
        match TcpStream::connect(address).await {
            Ok(stream) => return Ok(stream),
            Err(error)
                if error.kind() == io::ErrorKind::ConnectionRefused
                    && attempt < CONNECT_ATTEMPTS =>
            {
                attempt += 1;
                sleep(CONNECT_DELAY).await;
            }
            Err(error) => return Err(error),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
