//! Funding arithmetic: legal balance splits between the two ledger sides.
//!
//! The funder created the anchor and always owes the commitment fee. The
//! non-funder contributes half the fee once it holds enough to do so, and
//! the funder keeps the rounding millisatoshi.
//!
//! Both sides are passed as explicit `&mut` parameters and are written only
//! after every check has passed, so a rejected delta leaves them untouched.

use serde::{Deserialize, Serialize};

use crate::error::{FundingError, FundingSide};
use crate::htlc::Htlc;
use crate::types::{Party, MSAT_PER_SAT};

/// One party's share of the channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSide {
    /// Spendable balance.
    pub pay_msat: u64,
    /// This side's contribution to the commitment fee.
    pub fee_msat: u64,
    /// HTLCs this side has offered and that are still pending.
    pub htlcs: Vec<Htlc>,
}

impl LedgerSide {
    /// Balance plus fee share, excluding HTLCs.
    pub fn funds_msat(&self) -> u64 {
        self.pay_msat + self.fee_msat
    }

    /// Everything this side holds, HTLCs included.
    pub fn total_msat(&self) -> u64 {
        self.funds_msat() + self.htlcs_total_msat()
    }
}

/// Both sides of the channel. `a` is the local party, `b` the remote one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelState {
    pub a: LedgerSide,
    pub b: LedgerSide,
}

impl ChannelState {
    /// Swap the two sides.
    pub fn invert(&mut self) {
        std::mem::swap(&mut self.a, &mut self.b);
    }

    /// Borrow `party`'s side and the counterparty's side mutably, in that order.
    pub fn sides_mut(&mut self, party: Party) -> (&mut LedgerSide, &mut LedgerSide) {
        match party {
            Party::Local => (&mut self.a, &mut self.b),
            Party::Remote => (&mut self.b, &mut self.a),
        }
    }

    /// Sum of pay, fees and HTLCs over both sides.
    pub fn total_msat(&self) -> u64 {
        self.a.total_msat() + self.b.total_msat()
    }
}

/// Convert an anchor amount to millisatoshis.
pub fn anchor_msat(anchor_satoshis: u64) -> Result<u64, FundingError> {
    anchor_satoshis
        .checked_mul(MSAT_PER_SAT)
        .ok_or(FundingError::AmountOverflow)
}

/// Build the opening state: everything belongs to the funder, who also
/// carries the whole fee.
pub fn initial_funding(
    am_funder: bool,
    anchor_satoshis: u64,
    fee_satoshis: u64,
) -> Result<ChannelState, FundingError> {
    if fee_satoshis > anchor_satoshis {
        return Err(FundingError::FeeExceedsAnchor {
            fee: fee_satoshis,
            anchor: anchor_satoshis,
        });
    }

    let total = anchor_msat(anchor_satoshis)?;
    let fee = fee_satoshis * MSAT_PER_SAT;

    let mut state = ChannelState {
        a: LedgerSide {
            pay_msat: total - fee,
            fee_msat: fee,
            htlcs: Vec::new(),
        },
        b: LedgerSide::default(),
    };

    if !am_funder {
        state.invert();
    }
    Ok(state)
}

/// Move funds between two sides and re-split the fee.
///
/// `delta_a_msat` is what side `a` gains from `b` (negative: `a` pays).
/// `htlc_msat` is what `a` additionally locks into an HTLC it offers
/// (negative: an HTLC of `a` is being removed). The caller adds or removes
/// the HTLC entry itself; this function only moves balances.
pub fn funding_delta(
    a_is_funder: bool,
    anchor_satoshis: u64,
    delta_a_msat: i64,
    htlc_msat: i64,
    a_side: &mut LedgerSide,
    b_side: &mut LedgerSide,
) -> Result<(), FundingError> {
    let expected = anchor_msat(anchor_satoshis)?;
    let actual = a_side.total_msat() + b_side.total_msat();
    if actual != expected {
        return Err(FundingError::Unbalanced { expected, actual });
    }

    let fee = a_side.fee_msat + b_side.fee_msat;

    // Only one side can lose funds.
    let delta_b = -i128::from(delta_a_msat);
    let delta_a = i128::from(delta_a_msat) - i128::from(htlc_msat);

    let a = apply(a_side.funds_msat(), delta_a, FundingSide::A)?;
    let b = apply(b_side.funds_msat(), delta_b, FundingSide::B)?;

    let (a, b, a_fee, b_fee) = if a_is_funder {
        let split = subtract_fees(a, b, delta_b < 0, fee)?;
        (split.funder, split.non_funder, split.funder_fee, split.non_funder_fee)
    } else {
        let split = subtract_fees(b, a, delta_a < 0, fee)?;
        (split.non_funder, split.funder, split.non_funder_fee, split.funder_fee)
    };

    a_side.pay_msat = a;
    a_side.fee_msat = a_fee;
    b_side.pay_msat = b;
    b_side.fee_msat = b_fee;
    Ok(())
}

fn apply(funds: u64, delta: i128, side: FundingSide) -> Result<u64, FundingError> {
    let result = i128::from(funds) + delta;
    if result < 0 {
        return Err(FundingError::InsufficientFunds {
            side,
            needed: u64::try_from(-delta).unwrap_or(u64::MAX),
            available: funds,
        });
    }
    u64::try_from(result).map_err(|_| FundingError::AmountOverflow)
}

struct FeeSplit {
    funder: u64,
    non_funder: u64,
    funder_fee: u64,
    non_funder_fee: u64,
}

fn subtract_fees(
    funder: u64,
    non_funder: u64,
    non_funder_paying: bool,
    fee: u64,
) -> Result<FeeSplit, FundingError> {
    // Funder gets the odd millisatoshi.
    let mut non_funder_fee = fee - fee / 2;

    if non_funder < non_funder_fee {
        // Normal right after opening, when the funder holds everything.
        // A non-funder that cannot cover its share may not pay out, though.
        if non_funder_paying {
            return Err(FundingError::NonFunderCannotCoverFee { fee: non_funder_fee });
        }
        non_funder_fee = non_funder;
    }

    let funder_fee = fee - non_funder_fee;
    if funder < funder_fee {
        return Err(FundingError::FunderCannotCoverFee { fee: funder_fee });
    }

    Ok(FeeSplit {
        funder: funder - funder_fee,
        non_funder: non_funder - non_funder_fee,
        funder_fee,
        non_funder_fee,
    })
}
