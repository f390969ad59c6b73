//! End-to-end replay of recorded channel histories.

use chanreplay::core::{
    AnchorOffer, CommitSignature, FundingError, FundingSide, MessageKind, OpenCommitSig, Pkt,
    Preimage, TransitionError,
};
use chanreplay::{replay, Direction, ErrorClass, Party, ReplayConfig, ReplayError, Replayer};
use chanreplay_testkit::{fixture_from_params, preimage, ChannelFixture, HistoryParams};
use proptest::prelude::*;

const ANCHOR: u64 = 100_000;

fn transition_source(err: &ReplayError) -> &TransitionError {
    match err {
        ReplayError::Transition { source, .. } => source,
        other => panic!("expected a transition error, got {other}"),
    }
}

#[test]
fn test_htlc_fulfilled_by_counterparty_moves_to_their_balance() {
    let r = preimage(7);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.add_htlc(Party::Local, 10_000_000, &r);
    fixture.fulfill(Party::Remote, &r);

    let outcome = fixture.replay(ReplayConfig::default().checked()).unwrap();

    assert_eq!(outcome.state.a.pay_msat, 90_000_000);
    assert_eq!(outcome.state.b.pay_msat, 10_000_000);
    assert!(outcome.state.a.htlcs.is_empty());
    assert!(outcome.state.b.htlcs.is_empty());
    assert_eq!(outcome.state.total_msat(), ANCHOR * 1000);
    assert_eq!(outcome.update_count, 2);
}

#[test]
fn test_htlc_is_held_until_settled() {
    let r = preimage(1);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.add_htlc(Party::Local, 2_500_000, &r);

    let outcome = fixture.replay(ReplayConfig::default()).unwrap();
    assert_eq!(outcome.state.a.pay_msat, 97_500_000);
    assert_eq!(outcome.state.a.htlcs.len(), 1);
    assert_eq!(outcome.state.a.htlcs[0].r_hash, r.digest());
    assert_eq!(outcome.state.total_msat(), ANCHOR * 1000);
}

#[test]
fn test_timeout_and_routefail_refund_the_offerer() {
    let (r1, r2) = (preimage(1), preimage(2));
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.add_htlc(Party::Local, 1_000_000, &r1);
    fixture.add_htlc(Party::Local, 2_000_000, &r2);
    fixture.timeout(Party::Local, &r1);
    fixture.routefail(Party::Remote, &r2);

    let outcome = fixture.replay(ReplayConfig::default().checked()).unwrap();
    assert_eq!(outcome.state.a.pay_msat, ANCHOR * 1000);
    assert_eq!(outcome.state.b.pay_msat, 0);
    assert!(outcome.state.a.htlcs.is_empty());
    assert_eq!(outcome.update_count, 4);
}

#[test]
fn test_remote_timeout_refunds_their_own_htlc() {
    let r = preimage(3);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 5_000_000);
    fixture.add_htlc(Party::Remote, 2_000_000, &r);

    let held = fixture.replay(ReplayConfig::default()).unwrap();
    assert_eq!(held.state.b.pay_msat, 3_000_000);
    assert_eq!(held.state.b.htlcs.len(), 1);

    fixture.timeout(Party::Remote, &r);
    let outcome = fixture.replay(ReplayConfig::default().checked()).unwrap();
    assert_eq!(outcome.state.a.pay_msat, 95_000_000);
    assert_eq!(outcome.state.b.pay_msat, 5_000_000);
    assert!(outcome.state.a.htlcs.is_empty());
    assert!(outcome.state.b.htlcs.is_empty());
    assert_eq!(outcome.update_count, 3);
}

#[test]
fn test_local_routefail_hands_back_their_htlc() {
    let r = preimage(4);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 5_000_000);
    fixture.add_htlc(Party::Remote, 1_000_000, &r);
    fixture.routefail(Party::Local, &r);

    let outcome = fixture.replay(ReplayConfig::default().checked()).unwrap();
    assert_eq!(outcome.state.a.pay_msat, 95_000_000);
    assert_eq!(outcome.state.b.pay_msat, 5_000_000);
    assert!(outcome.state.a.htlcs.is_empty());
    assert!(outcome.state.b.htlcs.is_empty());
    assert_eq!(outcome.update_count, 3);
}

#[test]
fn test_remote_htlc_lives_on_their_side() {
    let r = preimage(9);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 5_000_000);
    fixture.add_htlc(Party::Remote, 1_000_000, &r);
    fixture.fulfill(Party::Local, &r);

    let outcome = fixture.replay(ReplayConfig::default().checked()).unwrap();
    assert_eq!(outcome.state.a.pay_msat, 96_000_000);
    assert_eq!(outcome.state.b.pay_msat, 4_000_000);
}

#[test]
fn test_payment_splits_fee_with_non_funder() {
    let mut fixture = ChannelFixture::new(10_000, 1_000);
    fixture.pay(Party::Local, 2_000_000);

    let outcome = fixture.replay(ReplayConfig::default()).unwrap();
    assert_eq!(outcome.state.a.fee_msat, 500_000);
    assert_eq!(outcome.state.b.fee_msat, 500_000);
    assert_eq!(outcome.state.a.pay_msat, 7_500_000);
    assert_eq!(outcome.state.b.pay_msat, 1_500_000);
}

#[test]
fn test_remote_funded_channel_starts_on_their_side() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0).remote_funded();
    fixture.pay(Party::Remote, 1_000);

    let outcome = fixture.replay(ReplayConfig::default()).unwrap();
    assert_eq!(outcome.state.a.pay_msat, 1_000);
    assert_eq!(outcome.state.b.pay_msat, ANCHOR * 1000 - 1_000);
}

#[test]
fn test_accepts_advance_the_chain_but_are_not_counted() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 1_000);
    fixture.pay(Party::Remote, 500);
    fixture.pay(Party::Local, 1_000);

    let outcome = fixture.replay(ReplayConfig::default()).unwrap();
    assert_eq!(outcome.update_count, 3);
    assert_eq!(outcome.local_revocation_hash, fixture.local.current_hash());
    assert_eq!(outcome.remote_revocation_hash, fixture.remote.current_hash());
}

#[test]
fn test_wrong_revocation_preimage_is_rejected() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 1_000);
    match &mut fixture.log_mut()[3].1 {
        Pkt::UpdateComplete(m) => m.revocation_preimage = Preimage::from_bytes([0xaa; 32]),
        other => panic!("unexpected {other:?}"),
    }

    let err = fixture.replay(ReplayConfig::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Cryptographic);
    assert_eq!(err.message_index(), Some(3));
    assert_eq!(
        transition_source(&err),
        &TransitionError::InvalidPreimage {
            party: Party::Remote
        }
    );
}

#[test]
fn test_revealing_the_current_hash_instead_of_the_previous_fails() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 1_000);
    let current = fixture.local.seed.preimage(fixture.local.index);
    match &mut fixture.log_mut()[2].1 {
        Pkt::UpdateSignature(m) => m.revocation_preimage = current,
        other => panic!("unexpected {other:?}"),
    }

    let err = fixture.replay(ReplayConfig::default()).unwrap_err();
    assert_eq!(
        transition_source(&err),
        &TransitionError::InvalidPreimage { party: Party::Local }
    );
}

#[test]
fn test_duplicate_htlc_hash_is_rejected() {
    let r = preimage(3);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.add_htlc(Party::Local, 1_000, &r);
    fixture.add_htlc(Party::Local, 2_000, &r);

    let err = fixture.replay(ReplayConfig::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Structural);
    assert_eq!(err.message_index(), Some(4));
    assert_eq!(
        transition_source(&err),
        &TransitionError::DuplicateHash(r.digest())
    );
}

#[test]
fn test_same_hash_on_both_sides_is_allowed() {
    let r = preimage(3);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 10_000);
    fixture.add_htlc(Party::Local, 1_000, &r);
    fixture.add_htlc(Party::Remote, 1_000, &r);

    let outcome = fixture.replay(ReplayConfig::default()).unwrap();
    assert_eq!(outcome.state.a.htlcs.len(), 1);
    assert_eq!(outcome.state.b.htlcs.len(), 1);
}

#[test]
fn test_settling_unknown_htlc_is_rejected() {
    let r = preimage(4);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.fulfill(Party::Remote, &r);

    let err = fixture.replay(ReplayConfig::default()).unwrap_err();
    assert_eq!(err.message_index(), Some(0));
    assert_eq!(
        transition_source(&err),
        &TransitionError::UnknownHash(r.digest())
    );
}

#[test]
fn test_timeout_from_the_wrong_side_is_unknown() {
    let r = preimage(5);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.add_htlc(Party::Local, 1_000, &r);
    // Only the offerer can time out its HTLC.
    fixture.timeout(Party::Remote, &r);

    let err = fixture.replay(ReplayConfig::default()).unwrap_err();
    assert!(matches!(
        transition_source(&err),
        TransitionError::UnknownHash(_)
    ));
}

#[test]
fn test_overspend_is_infeasible() {
    let mut fixture = ChannelFixture::new(10_000, 1_000);
    fixture.pay(Party::Local, 10_500_000);

    let err = fixture.replay(ReplayConfig::default().checked()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Arithmetic);
    assert!(matches!(
        transition_source(&err),
        TransitionError::Infeasible {
            source: FundingError::InsufficientFunds {
                side: FundingSide::A,
                ..
            },
            ..
        }
    ));
}

#[test]
fn test_oversized_htlc_reports_the_offered_amount() {
    let r = preimage(5);
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.add_htlc(Party::Local, u64::MAX, &r);

    let err = fixture.replay(ReplayConfig::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Arithmetic);
    assert_eq!(
        transition_source(&err),
        &TransitionError::Infeasible {
            amount_msat: i128::from(u64::MAX),
            source: FundingError::AmountOverflow,
        }
    );
    assert!(err.to_string().contains(&u64::MAX.to_string()));
}

#[test]
fn test_non_funder_without_fee_share_cannot_pay() {
    let mut fixture = ChannelFixture::new(10_000, 1_000);
    fixture.pay(Party::Local, 100_000);
    fixture.pay(Party::Remote, 1_000);

    let err = fixture.replay(ReplayConfig::default()).unwrap_err();
    assert_eq!(err.message_index(), Some(4));
    assert!(matches!(
        transition_source(&err),
        TransitionError::Infeasible {
            source: FundingError::NonFunderCannotCoverFee { .. },
            ..
        }
    ));
}

#[test]
fn test_rejected_message_leaves_prior_replay_reproducible() {
    let mut fixture = ChannelFixture::new(10_000, 1_000);
    fixture.pay(Party::Local, 1_000_000);
    let good = fixture.replay(ReplayConfig::default()).unwrap();

    fixture.pay(Party::Local, 50_000_000);
    assert!(fixture.replay(ReplayConfig::default()).is_err());

    fixture.log_mut().truncate(4);
    assert_eq!(fixture.replay(ReplayConfig::default()).unwrap(), good);
}

#[test]
fn test_unexpected_message_is_structural() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.push(Party::Remote, Pkt::CloseChannelAck);

    let err = fixture.replay(ReplayConfig::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Structural);
    assert_eq!(
        transition_source(&err),
        &TransitionError::UnexpectedMessage(MessageKind::CloseChannelAck)
    );
}

#[test]
fn test_exactly_one_funder_is_required() {
    let fixture = ChannelFixture::new(ANCHOR, 0);
    let mut params = fixture.params();
    params.remote.anchor = AnchorOffer::WillCreateAnchor;

    let err = Replayer::new(&params, ReplayConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ReplayError::FunderConflict {
            local: true,
            remote: true
        }
    ));
    assert_eq!(err.class(), ErrorClass::Configuration);

    params.local.anchor = AnchorOffer::WontCreateAnchor;
    params.remote.anchor = AnchorOffer::WontCreateAnchor;
    assert!(Replayer::new(&params, ReplayConfig::default()).is_err());
}

#[test]
fn test_fee_above_anchor_is_rejected() {
    let fixture = ChannelFixture::new(1_000, 1_001);
    let err = Replayer::new(&fixture.params(), ReplayConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ReplayError::InitialFunding(FundingError::FeeExceedsAnchor { .. })
    ));
}

#[test]
fn test_commit_signature_is_the_last_one_received() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 1_000);

    let expected = match &fixture.log()[1].1 {
        Pkt::UpdateAccept(m) => m.sig.decode().unwrap(),
        other => panic!("unexpected {other:?}"),
    };
    let outcome = fixture
        .replay(ReplayConfig::default().with_commit_sig())
        .unwrap();
    assert_eq!(outcome.commit_sig, Some(expected));

    fixture.pay(Party::Remote, 500);
    let expected = match &fixture.log()[6].1 {
        Pkt::UpdateSignature(m) => m.sig.decode().unwrap(),
        other => panic!("unexpected {other:?}"),
    };
    let outcome = fixture
        .replay(ReplayConfig::default().with_commit_sig())
        .unwrap();
    assert_eq!(outcome.commit_sig, Some(expected));
}

#[test]
fn test_commit_signature_is_only_returned_on_request() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 1_000);
    assert_eq!(fixture.replay(ReplayConfig::default()).unwrap().commit_sig, None);
}

#[test]
fn test_anchor_signature_seeds_only_when_they_fund() {
    let local_funded = ChannelFixture::new(ANCHOR, 0);
    let err = local_funded
        .replay(ReplayConfig::default().with_commit_sig())
        .unwrap_err();
    assert!(matches!(err, ReplayError::MissingSignature));
    assert_eq!(err.class(), ErrorClass::Cryptographic);

    let remote_funded = ChannelFixture::new(ANCHOR, 0).remote_funded();
    let anchor_sig = remote_funded.anchor().commit_sig.unwrap().decode().unwrap();
    let outcome = remote_funded
        .replay(ReplayConfig::default().with_commit_sig())
        .unwrap();
    assert_eq!(outcome.commit_sig, Some(anchor_sig));
}

#[test]
fn test_sent_commit_sig_is_not_theirs() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    let sig = fixture.local.commit_sig(&fixture.remote.current_hash());
    fixture.push(Party::Local, Pkt::OpenCommitSig(OpenCommitSig { sig }));

    let err = fixture
        .replay(ReplayConfig::default().with_commit_sig())
        .unwrap_err();
    assert!(matches!(err, ReplayError::MissingSignature));
}

#[test]
fn test_malformed_commit_signature_is_rejected() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.push(
        Party::Remote,
        Pkt::OpenCommitSig(OpenCommitSig {
            sig: CommitSignature(vec![0u8; 63]),
        }),
    );

    // Not decoded unless asked for.
    assert!(fixture.replay(ReplayConfig::default()).is_ok());

    let err = fixture
        .replay(ReplayConfig::default().with_commit_sig())
        .unwrap_err();
    assert!(matches!(err, ReplayError::InvalidSignature(_)));
}

#[test]
fn test_replayer_applies_incrementally() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 1_000);
    fixture.pay(Party::Remote, 1_000);
    let params = fixture.params();

    let mut replayer = Replayer::new(&params, ReplayConfig::default()).unwrap();
    for (direction, pkt) in fixture.log() {
        replayer = replayer.apply(*direction, pkt).unwrap();
    }
    let incremental = replayer.finish().unwrap();

    let folded = replay(
        &params,
        ReplayConfig::default(),
        fixture.log().iter().map(|(d, p)| (*d, p)),
    )
    .unwrap();
    assert_eq!(incremental, folded);
}

#[test]
fn test_direction_flip_changes_who_pays() {
    let mut fixture = ChannelFixture::new(ANCHOR, 0);
    fixture.pay(Party::Local, 1_000);
    // The same update, but claimed as received: the remote side would pay.
    fixture.log_mut()[0].0 = Direction::Received;

    let err = fixture.replay(ReplayConfig::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Arithmetic);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_conservation_holds_at_every_step(params in any::<HistoryParams>()) {
        let fixture = fixture_from_params(&params);
        match fixture.replay(ReplayConfig::default().checked()) {
            Ok(outcome) => {
                prop_assert_eq!(outcome.state.total_msat(), params.anchor_satoshis * 1000);
            }
            Err(err) => prop_assert_ne!(err.class(), ErrorClass::Invariant),
        }
    }

    #[test]
    fn prop_replay_is_deterministic(params in any::<HistoryParams>()) {
        let fixture = fixture_from_params(&params);
        let first = fixture.replay(ReplayConfig::default());
        let second = fixture.replay(ReplayConfig::default());
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "replays disagree"),
        }
    }

    #[test]
    fn prop_forged_preimage_is_rejected(
        payments in prop::collection::vec(1u64..1_000, 1..6),
        forged in any::<[u8; 32]>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut fixture = ChannelFixture::new(ANCHOR, 0);
        fixture.pay(Party::Local, 1_000_000);
        for amount in &payments {
            fixture.pay(Party::Remote, *amount);
        }

        let reveals: Vec<usize> = fixture
            .log()
            .iter()
            .enumerate()
            .filter(|(_, (_, p))| matches!(p, Pkt::UpdateSignature(_) | Pkt::UpdateComplete(_)))
            .map(|(i, _)| i)
            .collect();
        let target = reveals[pick.index(reveals.len())];

        let forged = Preimage::from_bytes(forged);
        let genuine = match &mut fixture.log_mut()[target].1 {
            Pkt::UpdateSignature(m) => std::mem::replace(&mut m.revocation_preimage, forged),
            Pkt::UpdateComplete(m) => std::mem::replace(&mut m.revocation_preimage, forged),
            _ => unreachable!(),
        };
        prop_assume!(genuine != forged);

        let err = fixture.replay(ReplayConfig::default()).unwrap_err();
        prop_assert_eq!(err.class(), ErrorClass::Cryptographic);
        prop_assert_eq!(err.message_index(), Some(target));
    }

    #[test]
    fn prop_update_count_matches_dances(
        ops in prop::collection::vec((any::<bool>(), 1u64..10_000), 0..20),
    ) {
        let mut fixture = ChannelFixture::new(ANCHOR, 0);
        fixture.pay(Party::Local, 10_000_000);
        for (local, amount) in &ops {
            let from = if *local { Party::Local } else { Party::Remote };
            fixture.pay(from, *amount);
        }

        let outcome = fixture.replay(ReplayConfig::default()).unwrap();
        prop_assert_eq!(outcome.update_count, ops.len() as u64 + 1);
        prop_assert_eq!(outcome.local_revocation_hash, fixture.local.current_hash());
        prop_assert_eq!(outcome.remote_revocation_hash, fixture.remote.current_hash());
    }
}
