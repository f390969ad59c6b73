//! The replay engine: applies a channel's message log to its opening state.
//!
//! Replay is a single left-to-right pass. Each message is checked against
//! the state built so far and only then applied; the first violation
//! aborts the run. A [`Replayer`] is consumed by every step, so a run that
//! failed leaves no state behind to inspect.

use chanreplay_core::{
    funding_delta, initial_funding, AnchorOffer, ChannelState, CommitSignature, Direction,
    Ed25519Signature, FundingError, Htlc, OpenAnchor, OpenChannel, Party, Pkt,
    RevocationTracker, Sha256Digest, TransitionError, MSAT_PER_SAT,
};
use serde::{Deserialize, Serialize};

use crate::config::ReplayConfig;
use crate::error::{ReplayError, Result};

/// Everything fixed at channel open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelParams {
    /// Our open offer.
    pub local: OpenChannel,
    /// Their open offer.
    pub remote: OpenChannel,
    pub anchor: OpenAnchor,
    /// Commitment fee in satoshi.
    pub fee_satoshis: u64,
}

/// The state a complete log replays to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub state: ChannelState,
    /// Counted updates (accepts excluded).
    pub update_count: u64,
    pub local_revocation_hash: Sha256Digest,
    pub remote_revocation_hash: Sha256Digest,
    /// Counterparty's latest commit signature, when requested.
    pub commit_sig: Option<Ed25519Signature>,
}

/// How a removed HTLC's amount is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settlement {
    /// Back to the side that offered it.
    Refund,
    /// To the side that revealed the preimage.
    Fulfill,
}

/// In-progress replay of one log.
#[derive(Debug)]
pub struct Replayer {
    config: ReplayConfig,
    local_funder: bool,
    remote_funder: bool,
    anchor_satoshis: u64,
    state: ChannelState,
    revocation: RevocationTracker,
    latest_sig: Option<CommitSignature>,
    applied: usize,
}

impl Replayer {
    /// Build the opening state.
    pub fn new(params: &ChannelParams, config: ReplayConfig) -> Result<Self> {
        let local_funder = params.local.is_funder();
        let remote_funder = params.remote.is_funder();
        if local_funder == remote_funder {
            return Err(ReplayError::FunderConflict {
                local: local_funder,
                remote: remote_funder,
            });
        }

        let state = initial_funding(local_funder, params.anchor.amount, params.fee_satoshis)
            .map_err(ReplayError::InitialFunding)?;
        debug_assert!(state.a.htlcs.is_empty() && state.b.htlcs.is_empty());

        // If they created the anchor, it carries their signature on our
        // first commitment.
        let latest_sig = match params.remote.anchor {
            AnchorOffer::WillCreateAnchor => params.anchor.commit_sig.clone(),
            AnchorOffer::WontCreateAnchor => None,
        };

        Ok(Self {
            config,
            local_funder,
            remote_funder,
            anchor_satoshis: params.anchor.amount,
            state,
            revocation: RevocationTracker::new(
                params.local.revocation_hash,
                params.remote.revocation_hash,
            ),
            latest_sig,
            applied: 0,
        })
    }

    /// Apply the next message of the log.
    pub fn apply(mut self, direction: Direction, pkt: &Pkt) -> Result<Self> {
        let index = self.applied;
        let kind = pkt.kind();

        self.transition(direction, pkt)
            .map_err(|source| ReplayError::Transition {
                index,
                direction,
                kind,
                source,
            })?;

        if self.config.check_each_step {
            self.check_conservation(Some(index))?;
        }

        tracing::debug!(
            index,
            %direction,
            %kind,
            updates = self.revocation.update_count,
            "applied message"
        );
        self.applied += 1;
        Ok(self)
    }

    /// Finish the run: check the final signature if requested, then the
    /// conservation of funds.
    pub fn finish(self) -> Result<ReplayOutcome> {
        let commit_sig = if self.config.want_commit_sig {
            let sig = self.latest_sig.as_ref().ok_or(ReplayError::MissingSignature)?;
            Some(sig.decode().map_err(ReplayError::InvalidSignature)?)
        } else {
            None
        };

        self.check_conservation(None)?;

        tracing::info!(
            messages = self.applied,
            updates = self.revocation.update_count,
            "replay complete"
        );

        Ok(ReplayOutcome {
            state: self.state,
            update_count: self.revocation.update_count,
            local_revocation_hash: self.revocation.local.current,
            remote_revocation_hash: self.revocation.remote.current,
            commit_sig,
        })
    }

    fn is_funder(&self, party: Party) -> bool {
        match party {
            Party::Local => self.local_funder,
            Party::Remote => self.remote_funder,
        }
    }

    fn check_conservation(&self, after_message: Option<usize>) -> Result<()> {
        let expected = self.anchor_satoshis * MSAT_PER_SAT;
        let actual = self.state.total_msat();
        if actual != expected {
            return Err(ReplayError::LedgerImbalance {
                expected,
                actual,
                after_message,
            });
        }
        Ok(())
    }

    fn transition(&mut self, direction: Direction, pkt: &Pkt) -> std::result::Result<(), TransitionError> {
        let sender = direction.sender();

        match pkt {
            Pkt::OpenCommitSig(m) => {
                if direction.is_received() {
                    self.latest_sig = Some(m.sig.clone());
                }
            }

            Pkt::UpdateAddHtlc(m) => {
                self.offer_htlc(sender, m.amount_msat, Htlc {
                    amount_msat: m.amount_msat,
                    expiry: m.expiry,
                    r_hash: m.r_hash,
                })?;
                self.revocation.advance(sender, m.revocation_hash, true);
            }

            // The originator withdraws its own HTLC.
            Pkt::UpdateTimedoutHtlc(m) => {
                self.settle_htlc(sender, &m.r_hash, Settlement::Refund)?;
                self.revocation.advance(sender, m.revocation_hash, true);
            }

            // The acceptor hands the HTLC back to the originator.
            Pkt::UpdateRoutefailHtlc(m) => {
                self.settle_htlc(sender.counterparty(), &m.r_hash, Settlement::Refund)?;
                self.revocation.advance(sender, m.revocation_hash, true);
            }

            // The acceptor reveals R and collects.
            Pkt::UpdateFulfillHtlc(m) => {
                self.settle_htlc(sender.counterparty(), &m.r.digest(), Settlement::Fulfill)?;
                self.revocation.advance(sender, m.revocation_hash, true);
            }

            Pkt::Update(m) => {
                let delta = match direction {
                    Direction::Sent => m.delta_msat,
                    Direction::Received => m.delta_msat.checked_neg().ok_or(
                        TransitionError::Infeasible {
                            amount_msat: m.delta_msat.into(),
                            source: FundingError::AmountOverflow,
                        },
                    )?,
                };
                let anchor = self.anchor_satoshis;
                let local_funder = self.local_funder;
                let (a, b) = self.state.sides_mut(Party::Local);
                funding_delta(local_funder, anchor, delta, 0, a, b).map_err(|source| {
                    TransitionError::Infeasible {
                        amount_msat: delta.into(),
                        source,
                    }
                })?;
                self.revocation.advance(sender, m.revocation_hash, true);
            }

            Pkt::UpdateAccept(m) => {
                if direction.is_received() {
                    self.latest_sig = Some(m.sig.clone());
                }
                // Finalises the update already counted.
                self.revocation.advance(sender, m.revocation_hash, false);
            }

            Pkt::UpdateSignature(m) => {
                self.revocation.verify_preimage(sender, &m.revocation_preimage)?;
                if direction.is_received() {
                    self.latest_sig = Some(m.sig.clone());
                }
            }

            Pkt::UpdateComplete(m) => {
                self.revocation.verify_preimage(sender, &m.revocation_preimage)?;
            }

            other => return Err(TransitionError::UnexpectedMessage(other.kind())),
        }

        Ok(())
    }

    /// Lock `amount_msat` of `owner`'s funds into a new HTLC.
    fn offer_htlc(
        &mut self,
        owner: Party,
        amount_msat: u64,
        htlc: Htlc,
    ) -> std::result::Result<(), TransitionError> {
        let anchor = self.anchor_satoshis;
        let funder = self.is_funder(owner);
        let (ours, theirs) = self.state.sides_mut(owner);

        if ours.find_htlc(&htlc.r_hash).is_some() {
            return Err(TransitionError::DuplicateHash(htlc.r_hash));
        }

        let amount = msat_delta(amount_msat)?;
        funding_delta(funder, anchor, 0, amount, ours, theirs).map_err(|source| {
            TransitionError::Infeasible {
                amount_msat: amount.into(),
                source,
            }
        })?;
        ours.add_htlc(htlc)
    }

    /// Remove one of `owner`'s HTLCs and settle its amount.
    fn settle_htlc(
        &mut self,
        owner: Party,
        r_hash: &Sha256Digest,
        settlement: Settlement,
    ) -> std::result::Result<(), TransitionError> {
        let anchor = self.anchor_satoshis;
        let funder = self.is_funder(owner);
        let (ours, theirs) = self.state.sides_mut(owner);

        let index = ours
            .find_htlc(r_hash)
            .ok_or(TransitionError::UnknownHash(*r_hash))?;
        let amount = msat_delta(ours.htlcs[index].amount_msat)?;

        let delta_ours = match settlement {
            Settlement::Refund => 0,
            Settlement::Fulfill => -amount,
        };
        funding_delta(funder, anchor, delta_ours, -amount, ours, theirs).map_err(|source| {
            TransitionError::Infeasible {
                amount_msat: amount.into(),
                source,
            }
        })?;

        ours.remove_htlc(index);
        Ok(())
    }
}

fn msat_delta(amount_msat: u64) -> std::result::Result<i64, TransitionError> {
    i64::try_from(amount_msat).map_err(|_| TransitionError::Infeasible {
        amount_msat: amount_msat.into(),
        source: FundingError::AmountOverflow,
    })
}

/// Replay a whole log.
pub fn replay<'m, I>(params: &ChannelParams, config: ReplayConfig, messages: I) -> Result<ReplayOutcome>
where
    I: IntoIterator<Item = (Direction, &'m Pkt)>,
{
    messages
        .into_iter()
        .try_fold(Replayer::new(params, config)?, |replayer, (direction, pkt)| {
            replayer.apply(direction, pkt)
        })?
        .finish()
}
