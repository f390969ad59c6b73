//! Proptest generators for property-based testing.

use proptest::prelude::*;

use chanreplay_core::{Direction, Party, Preimage, Seed, Sha256Digest};

use crate::fixtures::{preimage, ChannelFixture};

/// Generate a random preimage.
pub fn preimage_bytes() -> impl Strategy<Value = Preimage> {
    any::<[u8; 32]>().prop_map(Preimage::from_bytes)
}

/// Generate a random digest.
pub fn digest() -> impl Strategy<Value = Sha256Digest> {
    any::<[u8; 32]>().prop_map(Sha256Digest::from_bytes)
}

pub fn seed() -> impl Strategy<Value = Seed> {
    any::<[u8; 32]>().prop_map(Seed)
}

pub fn party() -> impl Strategy<Value = Party> {
    prop_oneof![Just(Party::Local), Just(Party::Remote)]
}

pub fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Sent), Just(Direction::Received)]
}

/// Anchor and fee in satoshi, with the fee never above the anchor.
pub fn anchor_and_fee() -> impl Strategy<Value = (u64, u64)> {
    (1u64..=10_000_000).prop_flat_map(|anchor| (Just(anchor), 0..=anchor))
}

/// One update in a generated history.
///
/// HTLCs are named by a small tag so that later operations can refer to
/// earlier ones, sometimes wrongly.
#[derive(Debug, Clone)]
pub enum HistoryOp {
    Pay { from: Party, amount_msat: u64 },
    AddHtlc { from: Party, amount_msat: u64, tag: u8 },
    Fulfill { from: Party, tag: u8 },
    Timeout { from: Party, tag: u8 },
    RouteFail { from: Party, tag: u8 },
}

/// Generate an operation with amounts up to `max_msat`.
pub fn history_op(max_msat: u64) -> impl Strategy<Value = HistoryOp> {
    let tag = 0u8..4;
    prop_oneof![
        (party(), 1..=max_msat).prop_map(|(from, amount_msat)| HistoryOp::Pay { from, amount_msat }),
        (party(), 1..=max_msat, tag.clone()).prop_map(|(from, amount_msat, tag)| {
            HistoryOp::AddHtlc {
                from,
                amount_msat,
                tag,
            }
        }),
        (party(), tag.clone()).prop_map(|(from, tag)| HistoryOp::Fulfill { from, tag }),
        (party(), tag.clone()).prop_map(|(from, tag)| HistoryOp::Timeout { from, tag }),
        (party(), tag).prop_map(|(from, tag)| HistoryOp::RouteFail { from, tag }),
    ]
}

/// Parameters for a generated channel history.
#[derive(Debug, Clone)]
pub struct HistoryParams {
    pub anchor_satoshis: u64,
    pub fee_satoshis: u64,
    pub remote_funded: bool,
    pub ops: Vec<HistoryOp>,
}

impl Arbitrary for HistoryParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (1_000u64..=1_000_000)
            .prop_flat_map(|anchor| {
                (
                    Just(anchor),
                    0..=anchor / 10,
                    any::<bool>(),
                    prop::collection::vec(history_op(anchor * 1_000 / 4), 0..12),
                )
            })
            .prop_map(|(anchor_satoshis, fee_satoshis, remote_funded, ops)| HistoryParams {
                anchor_satoshis,
                fee_satoshis,
                remote_funded,
                ops,
            })
            .boxed()
    }
}

/// Build the fixture a set of history parameters describes.
pub fn fixture_from_params(params: &HistoryParams) -> ChannelFixture {
    let mut fixture = ChannelFixture::new(params.anchor_satoshis, params.fee_satoshis);
    if params.remote_funded {
        fixture = fixture.remote_funded();
    }

    for op in &params.ops {
        match *op {
            HistoryOp::Pay { from, amount_msat } => fixture.pay(from, amount_msat),
            HistoryOp::AddHtlc {
                from,
                amount_msat,
                tag,
            } => fixture.add_htlc(from, amount_msat, &preimage(tag)),
            HistoryOp::Fulfill { from, tag } => fixture.fulfill(from, &preimage(tag)),
            HistoryOp::Timeout { from, tag } => fixture.timeout(from, &preimage(tag)),
            HistoryOp::RouteFail { from, tag } => fixture.routefail(from, &preimage(tag)),
        };
    }
    fixture
}
