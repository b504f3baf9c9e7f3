use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use decaygen_core::errors::{DecayError, ErrorInfo};

use crate::accumulate::combine;

/// Collective elementwise sum across a fixed group of participants.
pub trait Reducer {
    /// Index of this participant within the group.
    fn rank(&self) -> usize;

    /// Number of participants in the group.
    fn size(&self) -> usize;

    /// Contributes `local` and returns the sum over every participant.
    ///
    /// Every participant must call this the same number of times.
    fn all_reduce_sum(&self, local: [f64; 2]) -> Result<[f64; 2], DecayError>;
}

/// Group of one: the reduction is the identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalReducer;

impl Reducer for LocalReducer {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn all_reduce_sum(&self, local: [f64; 2]) -> Result<[f64; 2], DecayError> {
        Ok(local)
    }
}

#[derive(Debug, Clone, Copy)]
struct Contribution {
    round: u64,
    rank: usize,
    value: [f64; 2],
}

#[derive(Debug)]
struct Inbox {
    receiver: Receiver<Contribution>,
    /// Senders to every other member.
    peers: Vec<Sender<Contribution>>,
    /// Contributions from peers already in a later round.
    pending: Vec<Contribution>,
    round: u64,
}

/// In-process participant of a message-passing all-reduce group.
///
/// Each participant broadcasts its contribution to every member and sums the
/// contributions it receives in rank order, so all members obtain
/// bit-identical results.
#[derive(Debug)]
pub struct ChannelReducer {
    rank: usize,
    size: usize,
    inbox: Mutex<Inbox>,
}

impl ChannelReducer {
    /// Creates a connected group of `size` participants, indexed by rank.
    pub fn group(size: usize) -> Vec<ChannelReducer> {
        let size = size.max(1);
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..size).map(|_| mpsc::channel()).unzip();
        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, receiver)| ChannelReducer {
                rank,
                size,
                inbox: Mutex::new(Inbox {
                    receiver,
                    peers: senders
                        .iter()
                        .enumerate()
                        .filter(|(peer, _)| *peer != rank)
                        .map(|(_, sender)| sender.clone())
                        .collect(),
                    pending: Vec::new(),
                    round: 0,
                }),
            })
            .collect()
    }
}

fn reduction_error(code: &str, message: &str, rank: usize) -> DecayError {
    DecayError::Reduction(ErrorInfo::new(code, message).with_context("rank", rank.to_string()))
}

fn disconnected(rank: usize) -> DecayError {
    reduction_error(
        "peer-disconnected",
        "a group member left before the reduction",
        rank,
    )
}

impl Reducer for ChannelReducer {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn all_reduce_sum(&self, local: [f64; 2]) -> Result<[f64; 2], DecayError> {
        let mut inbox = self.inbox.lock().map_err(|_| {
            reduction_error("inbox-poisoned", "reducer inbox lock is poisoned", self.rank)
        })?;
        let round = inbox.round;
        let outgoing = Contribution {
            round,
            rank: self.rank,
            value: local,
        };
        for peer in &inbox.peers {
            peer.send(outgoing).map_err(|_| disconnected(self.rank))?;
        }

        let mut received: Vec<Option<[f64; 2]>> = vec![None; self.size];
        received[self.rank] = Some(local);
        let mut missing = self.size - 1;
        let (current, later): (Vec<_>, Vec<_>) =
            inbox.pending.drain(..).partition(|message| message.round == round);
        inbox.pending = later;
        for message in current {
            if received[message.rank].replace(message.value).is_none() {
                missing -= 1;
            }
        }
        while missing > 0 {
            let message = inbox.receiver.recv().map_err(|_| disconnected(self.rank))?;
            if message.round != round {
                inbox.pending.push(message);
                continue;
            }
            if received[message.rank].replace(message.value).is_none() {
                missing -= 1;
            }
        }
        inbox.round += 1;

        Ok(received.into_iter().flatten().fold([0.0; 2], combine))
    }
}
