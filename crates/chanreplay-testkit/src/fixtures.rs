//! Test fixtures and helpers.
//!
//! A [`ChannelFixture`] plays both sides of a channel and records the log
//! as seen from the local party, so tests can build valid histories and
//! then tamper with them.

use std::path::Path;

use chanreplay::log::MemorySource;
use chanreplay::{replay, ChannelParams, ReplayConfig, ReplayOutcome};
use chanreplay_core::{
    encode_pkt, AbsLocktime, AnchorOffer, CommitSignature, Direction, Keypair, OpenAnchor,
    OpenChannel, Party, Pkt, Preimage, RelLocktime, Seed, Sha256Digest, Update, UpdateAccept,
    UpdateAddHtlc, UpdateComplete, UpdateFulfillHtlc, UpdateRoutefailHtlc, UpdateSignature,
    UpdateTimedoutHtlc,
};

/// Default HTLC expiry used by the fixture.
pub const DEFAULT_EXPIRY: AbsLocktime = AbsLocktime::Blocks(500_000);

/// One side of a fixture channel.
pub struct PartyFixture {
    pub seed: Seed,
    pub keypair: Keypair,
    /// Index of the party's current revocation hash.
    pub index: u64,
}

impl PartyFixture {
    /// Create a party with seeds derived from `tag`.
    pub fn with_tag(tag: u8) -> Self {
        Self {
            seed: Seed([tag; 32]),
            keypair: Keypair::from_seed(&[tag.wrapping_add(0x80); 32]),
            index: 0,
        }
    }

    /// The revocation hash currently in force.
    pub fn current_hash(&self) -> Sha256Digest {
        self.seed.revocation_hash(self.index)
    }

    /// Move to the next revocation hash and return it.
    fn next_hash(&mut self) -> Sha256Digest {
        self.index += 1;
        self.current_hash()
    }

    /// Preimage of the hash that was current before the last advance.
    fn previous_preimage(&self) -> Preimage {
        self.seed.preimage(self.index.saturating_sub(1))
    }

    /// A well-formed commit signature over `hash`.
    pub fn commit_sig(&self, hash: &Sha256Digest) -> CommitSignature {
        CommitSignature::from_signature(&self.keypair.sign(hash.as_bytes()))
    }
}

/// The change an update dance carries.
#[derive(Debug, Clone)]
pub enum UpdateBody {
    /// Funds the initiator gains (negative: the initiator pays).
    Delta(i64),
    AddHtlc { amount_msat: u64, r_hash: Sha256Digest },
    Fulfill(Preimage),
    Timeout(Sha256Digest),
    RouteFail(Sha256Digest),
}

/// Both parties of a channel and the log recorded so far.
pub struct ChannelFixture {
    pub local: PartyFixture,
    pub remote: PartyFixture,
    pub anchor_satoshis: u64,
    pub fee_satoshis: u64,
    /// Which party creates the anchor.
    pub funder: Party,
    log: Vec<(Direction, Pkt)>,
}

impl ChannelFixture {
    /// A channel funded by the local party.
    pub fn new(anchor_satoshis: u64, fee_satoshis: u64) -> Self {
        Self {
            local: PartyFixture::with_tag(0x11),
            remote: PartyFixture::with_tag(0x22),
            anchor_satoshis,
            fee_satoshis,
            funder: Party::Local,
            log: Vec::new(),
        }
    }

    /// The same channel funded by the remote party instead.
    pub fn remote_funded(mut self) -> Self {
        self.funder = Party::Remote;
        self
    }

    pub fn party(&self, party: Party) -> &PartyFixture {
        match party {
            Party::Local => &self.local,
            Party::Remote => &self.remote,
        }
    }

    fn party_mut(&mut self, party: Party) -> &mut PartyFixture {
        match party {
            Party::Local => &mut self.local,
            Party::Remote => &mut self.remote,
        }
    }

    /// The opening offer `party` sent. Always built from its first hash.
    pub fn open(&self, party: Party) -> OpenChannel {
        let fixture = self.party(party);
        OpenChannel {
            revocation_hash: fixture.seed.revocation_hash(0),
            commit_key: fixture.keypair.public_key(),
            final_key: fixture.keypair.public_key(),
            delay: RelLocktime::Blocks(144),
            min_depth: 3,
            anchor: if party == self.funder {
                AnchorOffer::WillCreateAnchor
            } else {
                AnchorOffer::WontCreateAnchor
            },
        }
    }

    /// The anchor, signed by the funder over the other side's first commitment.
    pub fn anchor(&self) -> OpenAnchor {
        let funder = self.party(self.funder);
        let other = self.party(self.funder.counterparty());
        OpenAnchor {
            txid: Sha256Digest::hash(b"fixture anchor"),
            output_index: 0,
            amount: self.anchor_satoshis,
            commit_sig: Some(funder.commit_sig(&other.seed.revocation_hash(0))),
        }
    }

    pub fn params(&self) -> ChannelParams {
        ChannelParams {
            local: self.open(Party::Local),
            remote: self.open(Party::Remote),
            anchor: self.anchor(),
            fee_satoshis: self.fee_satoshis,
        }
    }

    /// Messages recorded so far, as seen by the local party.
    pub fn log(&self) -> &[(Direction, Pkt)] {
        &self.log
    }

    /// Mutable access for tests that tamper with the log.
    pub fn log_mut(&mut self) -> &mut Vec<(Direction, Pkt)> {
        &mut self.log
    }

    /// Record a single message sent by `from`.
    pub fn push(&mut self, from: Party, pkt: Pkt) -> &mut Self {
        let direction = match from {
            Party::Local => Direction::Sent,
            Party::Remote => Direction::Received,
        };
        self.log.push((direction, pkt));
        self
    }

    /// Record a full four-message update started by `initiator`.
    pub fn update(&mut self, initiator: Party, body: UpdateBody) -> &mut Self {
        let acceptor = initiator.counterparty();

        let hash = self.party_mut(initiator).next_hash();
        let first = match body {
            UpdateBody::Delta(delta_msat) => Pkt::Update(Update {
                revocation_hash: hash,
                delta_msat,
            }),
            UpdateBody::AddHtlc {
                amount_msat,
                r_hash,
            } => Pkt::UpdateAddHtlc(UpdateAddHtlc {
                revocation_hash: hash,
                amount_msat,
                r_hash,
                expiry: DEFAULT_EXPIRY,
            }),
            UpdateBody::Fulfill(r) => Pkt::UpdateFulfillHtlc(UpdateFulfillHtlc {
                revocation_hash: hash,
                r,
            }),
            UpdateBody::Timeout(r_hash) => Pkt::UpdateTimedoutHtlc(UpdateTimedoutHtlc {
                revocation_hash: hash,
                r_hash,
            }),
            UpdateBody::RouteFail(r_hash) => Pkt::UpdateRoutefailHtlc(UpdateRoutefailHtlc {
                revocation_hash: hash,
                r_hash,
            }),
        };
        self.push(initiator, first);

        let accept_hash = self.party_mut(acceptor).next_hash();
        let accept_sig = self.party(acceptor).commit_sig(&hash);
        self.push(
            acceptor,
            Pkt::UpdateAccept(UpdateAccept {
                sig: accept_sig,
                revocation_hash: accept_hash,
            }),
        );

        let signer = self.party(initiator);
        let signature = Pkt::UpdateSignature(UpdateSignature {
            sig: signer.commit_sig(&accept_hash),
            revocation_preimage: signer.previous_preimage(),
        });
        self.push(initiator, signature);

        let revocation_preimage = self.party(acceptor).previous_preimage();
        self.push(
            acceptor,
            Pkt::UpdateComplete(UpdateComplete {
                revocation_preimage,
            }),
        )
    }

    /// `from` pays `amount_msat` to the other side.
    pub fn pay(&mut self, from: Party, amount_msat: u64) -> &mut Self {
        self.update(from, UpdateBody::Delta(-(amount_msat as i64)))
    }

    /// `from` offers an HTLC locked to `r`.
    pub fn add_htlc(&mut self, from: Party, amount_msat: u64, r: &Preimage) -> &mut Self {
        self.update(
            from,
            UpdateBody::AddHtlc {
                amount_msat,
                r_hash: r.digest(),
            },
        )
    }

    /// `from` reveals `r` to collect an HTLC the other side offered.
    pub fn fulfill(&mut self, from: Party, r: &Preimage) -> &mut Self {
        self.update(from, UpdateBody::Fulfill(*r))
    }

    /// `from` withdraws one of its own HTLCs.
    pub fn timeout(&mut self, from: Party, r: &Preimage) -> &mut Self {
        self.update(from, UpdateBody::Timeout(r.digest()))
    }

    /// `from` hands back an HTLC the other side offered.
    pub fn routefail(&mut self, from: Party, r: &Preimage) -> &mut Self {
        self.update(from, UpdateBody::RouteFail(r.digest()))
    }

    /// Replay the recorded log.
    pub fn replay(&self, config: ReplayConfig) -> chanreplay::Result<ReplayOutcome> {
        replay(&self.params(), config, self.log.iter().map(|(d, p)| (*d, p)))
    }

    /// Encode everything into a memory source, returning the log entries.
    pub fn to_source(&self) -> (MemorySource, Vec<String>) {
        let mut source = MemorySource::new();
        for (name, pkt) in self.opening_packets() {
            source.insert(name, &pkt).expect("encode opening packet");
        }

        let entries = self
            .log
            .iter()
            .enumerate()
            .map(|(i, (direction, pkt))| {
                let path = entry_path(i, pkt);
                source.insert(&path, pkt).expect("encode log packet");
                format!("{}{}", direction.marker(), path)
            })
            .collect();

        (source, entries)
    }

    /// Write every packet under `dir`, returning the log entries.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<Vec<String>> {
        for (name, pkt) in self.opening_packets() {
            std::fs::write(dir.join(name), encode_pkt(&pkt).expect("encode opening packet"))?;
        }

        self.log
            .iter()
            .enumerate()
            .map(|(i, (direction, pkt))| {
                let path = entry_path(i, pkt);
                std::fs::write(dir.join(&path), encode_pkt(pkt).expect("encode log packet"))?;
                Ok(format!("{}{}", direction.marker(), path))
            })
            .collect()
    }

    fn opening_packets(&self) -> [(&'static str, Pkt); 3] {
        [
            (LOCAL_OPEN, Pkt::Open(self.open(Party::Local))),
            (REMOTE_OPEN, Pkt::Open(self.open(Party::Remote))),
            (ANCHOR, Pkt::OpenAnchor(self.anchor())),
        ]
    }
}

/// Names the opening packets are stored under.
pub const LOCAL_OPEN: &str = "open-local.pkt";
pub const REMOTE_OPEN: &str = "open-remote.pkt";
pub const ANCHOR: &str = "anchor.pkt";

fn entry_path(index: usize, pkt: &Pkt) -> String {
    format!("{index:03}-{}.pkt", pkt.kind())
}

/// A deterministic preimage for tests.
pub fn preimage(tag: u8) -> Preimage {
    Preimage::from_bytes([tag; 32])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanreplay_core::MessageKind;

    #[test]
    fn test_update_dance_shape() {
        let mut fixture = ChannelFixture::new(10_000, 1_000);
        fixture.pay(Party::Local, 1_000);

        let kinds: Vec<_> = fixture
            .log()
            .iter()
            .map(|(d, p)| (*d, p.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (Direction::Sent, MessageKind::Update),
                (Direction::Received, MessageKind::UpdateAccept),
                (Direction::Sent, MessageKind::UpdateSignature),
                (Direction::Received, MessageKind::UpdateComplete),
            ]
        );
        assert_eq!(fixture.local.index, 1);
        assert_eq!(fixture.remote.index, 1);
    }

    #[test]
    fn test_signature_reveals_previous_hash() {
        let mut fixture = ChannelFixture::new(10_000, 1_000);
        let first = fixture.local.current_hash();
        fixture.pay(Party::Local, 1_000);

        match &fixture.log()[2].1 {
            Pkt::UpdateSignature(m) => assert!(m.revocation_preimage.opens(&first)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_funder_flags() {
        let fixture = ChannelFixture::new(10_000, 1_000).remote_funded();
        assert!(!fixture.open(Party::Local).is_funder());
        assert!(fixture.open(Party::Remote).is_funder());
    }

    #[test]
    fn test_to_source_names_every_entry() {
        let mut fixture = ChannelFixture::new(10_000, 1_000);
        fixture.pay(Party::Remote, 500);
        let (source, entries) = fixture.to_source();

        assert_eq!(entries.len(), 4);
        assert!(entries[0].starts_with("-000-update"));
        assert_eq!(source.len(), 3 + 4);
    }
}
