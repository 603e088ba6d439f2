//! Participant identity and collective reduction.
//!
//! The control layer runs identically on every participant of a distributed
//! run. The only collective it performs is a sum reduction; everything else
//! that touches files is gated on [`Communicator::is_root`].

/// Rank that owns logs, summaries and checkpoints.
pub const ROOT_RANK: usize = 0;

pub trait Communicator {
    /// Rank of this participant, `0..size()`.
    fn rank(&self) -> usize;

    /// Number of participants.
    fn size(&self) -> usize;

    /// Sum `local` over all participants and return the total on every one.
    ///
    /// Every participant must call this in the same order each step.
    fn all_reduce_sum(&self, local: f64) -> f64;

    fn is_root(&self) -> bool {
        self.rank() == ROOT_RANK
    }
}

/// Single-process communicator: the reduction is the identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialComm;

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        ROOT_RANK
    }

    fn size(&self) -> usize {
        1
    }

    fn all_reduce_sum(&self, local: f64) -> f64 {
        local
    }
}

impl<C: Communicator + ?Sized> Communicator for &C {
    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn all_reduce_sum(&self, local: f64) -> f64 {
        (**self).all_reduce_sum(local)
    }
}
