//! Protocol messages exchanged between the two channel parties.
//!
//! Each message is immutable once captured. The replay engine only ever
//! reads them; the codec in [`crate::codec`] turns them into bytes and back.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{CommitSignature, Ed25519PublicKey, Preimage, Sha256Digest};
use crate::types::{AbsLocktime, RelLocktime};

/// Whether the sender of an open offer will create the anchor transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorOffer {
    WillCreateAnchor,
    WontCreateAnchor,
}

/// Opening offer from one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenChannel {
    /// Hash that the first commitment's revocation preimage must open.
    pub revocation_hash: Sha256Digest,
    /// Key the party signs commitments with.
    pub commit_key: Ed25519PublicKey,
    /// Key for the party's final output.
    pub final_key: Ed25519PublicKey,
    /// Delay before the party can spend its own commitment output.
    pub delay: RelLocktime,
    /// Confirmations required on the anchor.
    pub min_depth: u32,
    pub anchor: AnchorOffer,
}

impl OpenChannel {
    /// The funder is whoever creates (and so pays into) the anchor.
    pub fn is_funder(&self) -> bool {
        self.anchor == AnchorOffer::WillCreateAnchor
    }
}

/// Description of the anchor transaction, sent by the funder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAnchor {
    pub txid: Sha256Digest,
    pub output_index: u32,
    /// Satoshis locked in the anchor output.
    pub amount: u64,
    /// Funder's signature on the counterparty's first commitment.
    pub commit_sig: Option<CommitSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenCommitSig {
    pub sig: CommitSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenComplete {
    pub blockid: Option<Sha256Digest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAddHtlc {
    /// Sender's next revocation hash.
    pub revocation_hash: Sha256Digest,
    pub amount_msat: u64,
    pub r_hash: Sha256Digest,
    pub expiry: AbsLocktime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFulfillHtlc {
    pub revocation_hash: Sha256Digest,
    /// The payment preimage whose digest names the HTLC.
    pub r: Preimage,
}

/// Sent by the HTLC originator once the HTLC has expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTimedoutHtlc {
    pub revocation_hash: Sha256Digest,
    pub r_hash: Sha256Digest,
}

/// Sent by the HTLC acceptor back to the originator when routing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRoutefailHtlc {
    pub revocation_hash: Sha256Digest,
    pub r_hash: Sha256Digest,
}

/// A plain balance update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub revocation_hash: Sha256Digest,
    /// Positive values move funds towards the sender.
    pub delta_msat: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAccept {
    pub sig: CommitSignature,
    pub revocation_hash: Sha256Digest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSignature {
    pub sig: CommitSignature,
    pub revocation_preimage: Preimage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateComplete {
    pub revocation_preimage: Preimage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseChannel {
    pub sig: CommitSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseChannelComplete {
    pub sig: CommitSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPkt {
    pub problem: String,
}

/// Any protocol message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pkt {
    Open(OpenChannel),
    OpenAnchor(OpenAnchor),
    OpenCommitSig(OpenCommitSig),
    OpenComplete(OpenComplete),
    UpdateAddHtlc(UpdateAddHtlc),
    UpdateFulfillHtlc(UpdateFulfillHtlc),
    UpdateTimedoutHtlc(UpdateTimedoutHtlc),
    UpdateRoutefailHtlc(UpdateRoutefailHtlc),
    Update(Update),
    UpdateAccept(UpdateAccept),
    UpdateSignature(UpdateSignature),
    UpdateComplete(UpdateComplete),
    CloseChannel(CloseChannel),
    CloseChannelComplete(CloseChannelComplete),
    CloseChannelAck,
    Error(ErrorPkt),
}

impl Pkt {
    /// The message type, for diagnostics.
    pub fn kind(&self) -> MessageKind {
        match self {
            Pkt::Open(_) => MessageKind::Open,
            Pkt::OpenAnchor(_) => MessageKind::OpenAnchor,
            Pkt::OpenCommitSig(_) => MessageKind::OpenCommitSig,
            Pkt::OpenComplete(_) => MessageKind::OpenComplete,
            Pkt::UpdateAddHtlc(_) => MessageKind::UpdateAddHtlc,
            Pkt::UpdateFulfillHtlc(_) => MessageKind::UpdateFulfillHtlc,
            Pkt::UpdateTimedoutHtlc(_) => MessageKind::UpdateTimedoutHtlc,
            Pkt::UpdateRoutefailHtlc(_) => MessageKind::UpdateRoutefailHtlc,
            Pkt::Update(_) => MessageKind::Update,
            Pkt::UpdateAccept(_) => MessageKind::UpdateAccept,
            Pkt::UpdateSignature(_) => MessageKind::UpdateSignature,
            Pkt::UpdateComplete(_) => MessageKind::UpdateComplete,
            Pkt::CloseChannel(_) => MessageKind::CloseChannel,
            Pkt::CloseChannelComplete(_) => MessageKind::CloseChannelComplete,
            Pkt::CloseChannelAck => MessageKind::CloseChannelAck,
            Pkt::Error(_) => MessageKind::Error,
        }
    }
}

/// Discriminator for [`Pkt`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Open,
    OpenAnchor,
    OpenCommitSig,
    OpenComplete,
    UpdateAddHtlc,
    UpdateFulfillHtlc,
    UpdateTimedoutHtlc,
    UpdateRoutefailHtlc,
    Update,
    UpdateAccept,
    UpdateSignature,
    UpdateComplete,
    CloseChannel,
    CloseChannelComplete,
    CloseChannelAck,
    Error,
}

impl MessageKind {
    /// Wire-style snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Open => "open",
            MessageKind::OpenAnchor => "open_anchor",
            MessageKind::OpenCommitSig => "open_commit_sig",
            MessageKind::OpenComplete => "open_complete",
            MessageKind::UpdateAddHtlc => "update_add_htlc",
            MessageKind::UpdateFulfillHtlc => "update_fulfill_htlc",
            MessageKind::UpdateTimedoutHtlc => "update_timedout_htlc",
            MessageKind::UpdateRoutefailHtlc => "update_routefail_htlc",
            MessageKind::Update => "update",
            MessageKind::UpdateAccept => "update_accept",
            MessageKind::UpdateSignature => "update_signature",
            MessageKind::UpdateComplete => "update_complete",
            MessageKind::CloseChannel => "close_channel",
            MessageKind::CloseChannelComplete => "close_channel_complete",
            MessageKind::CloseChannelAck => "close_channel_ack",
            MessageKind::Error => "error",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
