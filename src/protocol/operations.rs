//! # Ledger Operations
//!
//! One struct per operation kind, each with a fixed canonical field order:
//! the fee (an [`AssetAmount`]) is always the first field and the extension
//! set is always the last, present even when empty. Between them come the
//! principal fields in their declared order. Memo fields are optional-encoded.
//!
//! Structures are plain owned records built fresh per encode call and
//! immutable once encoding starts; the assembler exclusively owns nested
//! sub-structures for the duration of one call. Identical logical input
//! always yields identical bytes — the encoding is what gets signed, so any
//! non-determinism here would be a protocol-breaking defect.
//!
//! Operation kinds map to small integer tags carried as a varint ahead of the
//! body. The mapping is an explicit exhaustive `match`, resolved at compile
//! time; there is no runtime type inspection anywhere in the dispatch.

use crate::core::{ByteReader, ByteWriter, PointInTime};
use crate::error::{CodecError, Result};
use crate::protocol::asset::{AssetAmount, ASSET_SPACE, ASSET_TYPE};
use crate::protocol::extensions::{Extension, ExtensionSchema};
use crate::protocol::memo::{Memo, PUBLIC_KEY_LEN};
use crate::protocol::object_id::{self, ObjectId};
use crate::protocol::selector::CompiledSelector;
use serde::{Deserialize, Serialize};

// Object spaces/types referenced by operation fields. Space 1 is the chain's
// object space; the type index identifies the object class.
pub const ACCOUNT_SPACE: u8 = 1;
pub const ACCOUNT_TYPE: u8 = 2;
pub const LIMIT_ORDER_TYPE: u8 = 4;
pub const CALL_ORDER_TYPE: u8 = 5;
pub const PROPOSAL_TYPE: u8 = 6;
pub const EXCHANGE_TYPE: u8 = 8;
pub const BALANCE_TYPE: u8 = 9;
pub const DICE_BET_TYPE: u8 = 10;
pub const NFT_SERIES_TYPE: u8 = 11;
pub const NFT_SELL_ORDER_TYPE: u8 = 12;

/// Every operation kind the codec understands, with its wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OperationKind {
    Transfer = 0,
    OverrideTransfer = 1,
    AssetIssue = 2,
    LimitOrderCreate = 3,
    LimitOrderCancel = 4,
    CancelAll = 5,
    ProposalDelete = 6,
    DiceBetPlace = 7,
    DiceBetResolve = 8,
    ExchangeCreate = 9,
    ExchangeUpdate = 10,
    ExchangeDeposit = 11,
    ExchangeWithdraw = 12,
    ExchangeRemove = 13,
    ExchangeParticipate = 14,
    NftCreate = 15,
    NftUpdate = 16,
    NftIssue = 17,
    NftTransfer = 18,
    NftReserve = 19,
    NftSell = 20,
    NftBuy = 21,
    NftCancelSell = 22,
    NftOverrideTransfer = 23,
    AssetClaimFees = 24,
    BalanceClaim = 25,
    Custom = 26,
    AccountWhitelist = 27,
    CallOrderUpdate = 28,
}

/// All kinds in tag order, for table construction and exhaustive tests.
pub const ALL_KINDS: [OperationKind; 29] = [
    OperationKind::Transfer,
    OperationKind::OverrideTransfer,
    OperationKind::AssetIssue,
    OperationKind::LimitOrderCreate,
    OperationKind::LimitOrderCancel,
    OperationKind::CancelAll,
    OperationKind::ProposalDelete,
    OperationKind::DiceBetPlace,
    OperationKind::DiceBetResolve,
    OperationKind::ExchangeCreate,
    OperationKind::ExchangeUpdate,
    OperationKind::ExchangeDeposit,
    OperationKind::ExchangeWithdraw,
    OperationKind::ExchangeRemove,
    OperationKind::ExchangeParticipate,
    OperationKind::NftCreate,
    OperationKind::NftUpdate,
    OperationKind::NftIssue,
    OperationKind::NftTransfer,
    OperationKind::NftReserve,
    OperationKind::NftSell,
    OperationKind::NftBuy,
    OperationKind::NftCancelSell,
    OperationKind::NftOverrideTransfer,
    OperationKind::AssetClaimFees,
    OperationKind::BalanceClaim,
    OperationKind::Custom,
    OperationKind::AccountWhitelist,
    OperationKind::CallOrderUpdate,
];

impl OperationKind {
    /// Wire tag for this kind.
    pub fn tag(self) -> u64 {
        self as u64
    }

    pub fn from_tag(tag: u64) -> Result<Self> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|k| k.tag() == tag)
            .ok_or(CodecError::UnknownOperation(tag))
    }

    /// Stable snake_case name, used in error messages and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Transfer => "transfer",
            OperationKind::OverrideTransfer => "override_transfer",
            OperationKind::AssetIssue => "asset_issue",
            OperationKind::LimitOrderCreate => "limit_order_create",
            OperationKind::LimitOrderCancel => "limit_order_cancel",
            OperationKind::CancelAll => "cancel_all",
            OperationKind::ProposalDelete => "proposal_delete",
            OperationKind::DiceBetPlace => "dice_bet_place",
            OperationKind::DiceBetResolve => "dice_bet_resolve",
            OperationKind::ExchangeCreate => "exchange_create",
            OperationKind::ExchangeUpdate => "exchange_update",
            OperationKind::ExchangeDeposit => "exchange_deposit",
            OperationKind::ExchangeWithdraw => "exchange_withdraw",
            OperationKind::ExchangeRemove => "exchange_remove",
            OperationKind::ExchangeParticipate => "exchange_participate",
            OperationKind::NftCreate => "nft_create",
            OperationKind::NftUpdate => "nft_update",
            OperationKind::NftIssue => "nft_issue",
            OperationKind::NftTransfer => "nft_transfer",
            OperationKind::NftReserve => "nft_reserve",
            OperationKind::NftSell => "nft_sell",
            OperationKind::NftBuy => "nft_buy",
            OperationKind::NftCancelSell => "nft_cancel_sell",
            OperationKind::NftOverrideTransfer => "nft_override_transfer",
            OperationKind::AssetClaimFees => "asset_claim_fees",
            OperationKind::BalanceClaim => "balance_claim",
            OperationKind::Custom => "custom",
            OperationKind::AccountWhitelist => "account_whitelist",
            OperationKind::CallOrderUpdate => "call_order_update",
        }
    }
}

fn write_account(w: &mut ByteWriter, id: ObjectId) {
    id.write(w);
}

fn read_account(r: &mut ByteReader<'_>) -> Result<ObjectId> {
    ObjectId::read(r, ACCOUNT_SPACE, ACCOUNT_TYPE)
}

fn read_object(r: &mut ByteReader<'_>, ty: u8) -> Result<ObjectId> {
    ObjectId::read(r, ACCOUNT_SPACE, ty)
}

fn write_memo_field(w: &mut ByteWriter, memo: &Option<Memo>) -> Result<()> {
    w.write_optional(memo.as_ref(), |w, m| m.write(w))
}

fn read_memo_field(r: &mut ByteReader<'_>) -> Result<Option<Memo>> {
    r.read_optional(Memo::read)
}

// ---------------------------------------------------------------------------
// Operation bodies
// ---------------------------------------------------------------------------

/// Move an amount of an asset between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub fee: AssetAmount,
    pub from: ObjectId,
    pub to: ObjectId,
    pub amount: AssetAmount,
    pub memo: Option<Memo>,
    pub extensions: Vec<Extension>,
}

/// Issuer-forced transfer between two accounts of an asset it controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideTransfer {
    pub fee: AssetAmount,
    pub issuer: ObjectId,
    pub from: ObjectId,
    pub to: ObjectId,
    pub amount: AssetAmount,
    pub memo: Option<Memo>,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIssue {
    pub fee: AssetAmount,
    pub issuer: ObjectId,
    pub asset_to_issue: AssetAmount,
    pub issue_to_account: ObjectId,
    pub memo: Option<Memo>,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderCreate {
    pub fee: AssetAmount,
    pub seller: ObjectId,
    pub amount_to_sell: AssetAmount,
    pub min_to_receive: AssetAmount,
    pub expiration: PointInTime,
    pub fill_or_kill: bool,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderCancel {
    pub fee: AssetAmount,
    pub fee_paying_account: ObjectId,
    pub order: ObjectId,
    pub extensions: Vec<Extension>,
}

/// Cancel every open order of one account in a trading pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAll {
    pub fee: AssetAmount,
    pub seller: ObjectId,
    pub sell_asset: ObjectId,
    pub receive_asset: ObjectId,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDelete {
    pub fee: AssetAmount,
    pub fee_paying_account: ObjectId,
    pub using_owner_authority: bool,
    pub proposal: ObjectId,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceBetPlace {
    pub fee: AssetAmount,
    pub bettor: ObjectId,
    pub stake: AssetAmount,
    pub roll_under: u8,
    pub seed: u64,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceBetResolve {
    pub fee: AssetAmount,
    pub resolver: ObjectId,
    pub bet: ObjectId,
    pub reveal: u64,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeCreate {
    pub fee: AssetAmount,
    pub owner: ObjectId,
    pub amount_a: AssetAmount,
    pub amount_b: AssetAmount,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeUpdate {
    pub fee: AssetAmount,
    pub owner: ObjectId,
    pub exchange: ObjectId,
    pub taker_fee_percent: u16,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeDeposit {
    pub fee: AssetAmount,
    pub depositor: ObjectId,
    pub exchange: ObjectId,
    pub amount_a: AssetAmount,
    pub amount_b: AssetAmount,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeWithdraw {
    pub fee: AssetAmount,
    pub withdrawer: ObjectId,
    pub exchange: ObjectId,
    pub share_amount: AssetAmount,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRemove {
    pub fee: AssetAmount,
    pub owner: ObjectId,
    pub exchange: ObjectId,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeParticipate {
    pub fee: AssetAmount,
    pub account: ObjectId,
    pub exchange: ObjectId,
    pub amount_to_sell: AssetAmount,
    pub min_to_receive: AssetAmount,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftCreate {
    pub fee: AssetAmount,
    pub issuer: ObjectId,
    pub symbol: String,
    pub base_uri: String,
    pub max_supply: u64,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftUpdate {
    pub fee: AssetAmount,
    pub issuer: ObjectId,
    pub series: ObjectId,
    pub base_uri: String,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftIssue {
    pub fee: AssetAmount,
    pub issuer: ObjectId,
    pub to: ObjectId,
    pub series: ObjectId,
    pub token_uri: String,
    pub memo: Option<Memo>,
    pub extensions: Vec<Extension>,
}

/// Transfer tokens chosen by a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTransfer {
    pub fee: AssetAmount,
    pub from: ObjectId,
    pub to: ObjectId,
    pub tokens: CompiledSelector,
    pub memo: Option<Memo>,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftReserve {
    pub fee: AssetAmount,
    pub owner: ObjectId,
    pub tokens: CompiledSelector,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftSell {
    pub fee: AssetAmount,
    pub seller: ObjectId,
    pub tokens: CompiledSelector,
    pub price: AssetAmount,
    pub expiration: PointInTime,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftBuy {
    pub fee: AssetAmount,
    pub buyer: ObjectId,
    pub sell_order: ObjectId,
    pub price: AssetAmount,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftCancelSell {
    pub fee: AssetAmount,
    pub seller: ObjectId,
    pub sell_order: ObjectId,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftOverrideTransfer {
    pub fee: AssetAmount,
    pub issuer: ObjectId,
    pub from: ObjectId,
    pub to: ObjectId,
    pub tokens: CompiledSelector,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetClaimFees {
    pub fee: AssetAmount,
    pub issuer: ObjectId,
    pub amount_to_claim: AssetAmount,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceClaim {
    pub fee: AssetAmount,
    pub deposit_to_account: ObjectId,
    pub balance_to_claim: ObjectId,
    #[serde(with = "crate::protocol::memo::serde_key")]
    pub balance_owner_key: [u8; PUBLIC_KEY_LEN],
    pub total_claimed: AssetAmount,
    pub extensions: Vec<Extension>,
}

/// Opaque application-defined payload; required auths travel as a flat set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Custom {
    pub fee: AssetAmount,
    pub payer: ObjectId,
    pub required_auths: Vec<ObjectId>,
    pub id: u16,
    pub data: Vec<u8>,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWhitelist {
    pub fee: AssetAmount,
    pub authorizing_account: ObjectId,
    pub account_to_list: ObjectId,
    pub new_listing: u8,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOrderUpdate {
    pub fee: AssetAmount,
    pub funding_account: ObjectId,
    pub delta_collateral: AssetAmount,
    pub delta_debt: AssetAmount,
    pub extensions: Vec<Extension>,
}

// ---------------------------------------------------------------------------
// The operation sum type
// ---------------------------------------------------------------------------

/// One typed, fee-bearing instruction in a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Transfer(Transfer),
    OverrideTransfer(OverrideTransfer),
    AssetIssue(AssetIssue),
    LimitOrderCreate(LimitOrderCreate),
    LimitOrderCancel(LimitOrderCancel),
    CancelAll(CancelAll),
    ProposalDelete(ProposalDelete),
    DiceBetPlace(DiceBetPlace),
    DiceBetResolve(DiceBetResolve),
    ExchangeCreate(ExchangeCreate),
    ExchangeUpdate(ExchangeUpdate),
    ExchangeDeposit(ExchangeDeposit),
    ExchangeWithdraw(ExchangeWithdraw),
    ExchangeRemove(ExchangeRemove),
    ExchangeParticipate(ExchangeParticipate),
    NftCreate(NftCreate),
    NftUpdate(NftUpdate),
    NftIssue(NftIssue),
    NftTransfer(NftTransfer),
    NftReserve(NftReserve),
    NftSell(NftSell),
    NftBuy(NftBuy),
    NftCancelSell(NftCancelSell),
    NftOverrideTransfer(NftOverrideTransfer),
    AssetClaimFees(AssetClaimFees),
    BalanceClaim(BalanceClaim),
    Custom(Custom),
    AccountWhitelist(AccountWhitelist),
    CallOrderUpdate(CallOrderUpdate),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Transfer(_) => OperationKind::Transfer,
            Operation::OverrideTransfer(_) => OperationKind::OverrideTransfer,
            Operation::AssetIssue(_) => OperationKind::AssetIssue,
            Operation::LimitOrderCreate(_) => OperationKind::LimitOrderCreate,
            Operation::LimitOrderCancel(_) => OperationKind::LimitOrderCancel,
            Operation::CancelAll(_) => OperationKind::CancelAll,
            Operation::ProposalDelete(_) => OperationKind::ProposalDelete,
            Operation::DiceBetPlace(_) => OperationKind::DiceBetPlace,
            Operation::DiceBetResolve(_) => OperationKind::DiceBetResolve,
            Operation::ExchangeCreate(_) => OperationKind::ExchangeCreate,
            Operation::ExchangeUpdate(_) => OperationKind::ExchangeUpdate,
            Operation::ExchangeDeposit(_) => OperationKind::ExchangeDeposit,
            Operation::ExchangeWithdraw(_) => OperationKind::ExchangeWithdraw,
            Operation::ExchangeRemove(_) => OperationKind::ExchangeRemove,
            Operation::ExchangeParticipate(_) => OperationKind::ExchangeParticipate,
            Operation::NftCreate(_) => OperationKind::NftCreate,
            Operation::NftUpdate(_) => OperationKind::NftUpdate,
            Operation::NftIssue(_) => OperationKind::NftIssue,
            Operation::NftTransfer(_) => OperationKind::NftTransfer,
            Operation::NftReserve(_) => OperationKind::NftReserve,
            Operation::NftSell(_) => OperationKind::NftSell,
            Operation::NftBuy(_) => OperationKind::NftBuy,
            Operation::NftCancelSell(_) => OperationKind::NftCancelSell,
            Operation::NftOverrideTransfer(_) => OperationKind::NftOverrideTransfer,
            Operation::AssetClaimFees(_) => OperationKind::AssetClaimFees,
            Operation::BalanceClaim(_) => OperationKind::BalanceClaim,
            Operation::Custom(_) => OperationKind::Custom,
            Operation::AccountWhitelist(_) => OperationKind::AccountWhitelist,
            Operation::CallOrderUpdate(_) => OperationKind::CallOrderUpdate,
        }
    }

    /// Fee of this operation, always the first encoded field.
    pub fn fee(&self) -> AssetAmount {
        match self {
            Operation::Transfer(op) => op.fee,
            Operation::OverrideTransfer(op) => op.fee,
            Operation::AssetIssue(op) => op.fee,
            Operation::LimitOrderCreate(op) => op.fee,
            Operation::LimitOrderCancel(op) => op.fee,
            Operation::CancelAll(op) => op.fee,
            Operation::ProposalDelete(op) => op.fee,
            Operation::DiceBetPlace(op) => op.fee,
            Operation::DiceBetResolve(op) => op.fee,
            Operation::ExchangeCreate(op) => op.fee,
            Operation::ExchangeUpdate(op) => op.fee,
            Operation::ExchangeDeposit(op) => op.fee,
            Operation::ExchangeWithdraw(op) => op.fee,
            Operation::ExchangeRemove(op) => op.fee,
            Operation::ExchangeParticipate(op) => op.fee,
            Operation::NftCreate(op) => op.fee,
            Operation::NftUpdate(op) => op.fee,
            Operation::NftIssue(op) => op.fee,
            Operation::NftTransfer(op) => op.fee,
            Operation::NftReserve(op) => op.fee,
            Operation::NftSell(op) => op.fee,
            Operation::NftBuy(op) => op.fee,
            Operation::NftCancelSell(op) => op.fee,
            Operation::NftOverrideTransfer(op) => op.fee,
            Operation::AssetClaimFees(op) => op.fee,
            Operation::BalanceClaim(op) => op.fee,
            Operation::Custom(op) => op.fee,
            Operation::AccountWhitelist(op) => op.fee,
            Operation::CallOrderUpdate(op) => op.fee,
        }
    }

    /// Encode the body (everything after the kind tag) in canonical order.
    pub fn write_body(&self, w: &mut ByteWriter, schema: &ExtensionSchema) -> Result<()> {
        match self {
            Operation::Transfer(op) => {
                op.fee.write(w);
                write_account(w, op.from);
                write_account(w, op.to);
                op.amount.write(w);
                write_memo_field(w, &op.memo)?;
                schema.write_set(w, &op.extensions)
            }
            Operation::OverrideTransfer(op) => {
                op.fee.write(w);
                write_account(w, op.issuer);
                write_account(w, op.from);
                write_account(w, op.to);
                op.amount.write(w);
                write_memo_field(w, &op.memo)?;
                schema.write_set(w, &op.extensions)
            }
            Operation::AssetIssue(op) => {
                op.fee.write(w);
                write_account(w, op.issuer);
                op.asset_to_issue.write(w);
                write_account(w, op.issue_to_account);
                write_memo_field(w, &op.memo)?;
                schema.write_set(w, &op.extensions)
            }
            Operation::LimitOrderCreate(op) => {
                op.fee.write(w);
                write_account(w, op.seller);
                op.amount_to_sell.write(w);
                op.min_to_receive.write(w);
                w.write_point_in_time(op.expiration);
                w.write_bool(op.fill_or_kill);
                schema.write_set(w, &op.extensions)
            }
            Operation::LimitOrderCancel(op) => {
                op.fee.write(w);
                write_account(w, op.fee_paying_account);
                op.order.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::CancelAll(op) => {
                op.fee.write(w);
                write_account(w, op.seller);
                op.sell_asset.write(w);
                op.receive_asset.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::ProposalDelete(op) => {
                op.fee.write(w);
                write_account(w, op.fee_paying_account);
                w.write_bool(op.using_owner_authority);
                op.proposal.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::DiceBetPlace(op) => {
                op.fee.write(w);
                write_account(w, op.bettor);
                op.stake.write(w);
                w.write_u8(op.roll_under);
                w.write_u64(op.seed);
                schema.write_set(w, &op.extensions)
            }
            Operation::DiceBetResolve(op) => {
                op.fee.write(w);
                write_account(w, op.resolver);
                op.bet.write(w);
                w.write_u64(op.reveal);
                schema.write_set(w, &op.extensions)
            }
            Operation::ExchangeCreate(op) => {
                op.fee.write(w);
                write_account(w, op.owner);
                op.amount_a.write(w);
                op.amount_b.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::ExchangeUpdate(op) => {
                op.fee.write(w);
                write_account(w, op.owner);
                op.exchange.write(w);
                w.write_u16(op.taker_fee_percent);
                schema.write_set(w, &op.extensions)
            }
            Operation::ExchangeDeposit(op) => {
                op.fee.write(w);
                write_account(w, op.depositor);
                op.exchange.write(w);
                op.amount_a.write(w);
                op.amount_b.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::ExchangeWithdraw(op) => {
                op.fee.write(w);
                write_account(w, op.withdrawer);
                op.exchange.write(w);
                op.share_amount.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::ExchangeRemove(op) => {
                op.fee.write(w);
                write_account(w, op.owner);
                op.exchange.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::ExchangeParticipate(op) => {
                op.fee.write(w);
                write_account(w, op.account);
                op.exchange.write(w);
                op.amount_to_sell.write(w);
                op.min_to_receive.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::NftCreate(op) => {
                op.fee.write(w);
                write_account(w, op.issuer);
                w.write_string(&op.symbol);
                w.write_string(&op.base_uri);
                w.write_u64(op.max_supply);
                schema.write_set(w, &op.extensions)
            }
            Operation::NftUpdate(op) => {
                op.fee.write(w);
                write_account(w, op.issuer);
                op.series.write(w);
                w.write_string(&op.base_uri);
                schema.write_set(w, &op.extensions)
            }
            Operation::NftIssue(op) => {
                op.fee.write(w);
                write_account(w, op.issuer);
                write_account(w, op.to);
                op.series.write(w);
                w.write_string(&op.token_uri);
                write_memo_field(w, &op.memo)?;
                schema.write_set(w, &op.extensions)
            }
            Operation::NftTransfer(op) => {
                op.fee.write(w);
                write_account(w, op.from);
                write_account(w, op.to);
                op.tokens.write(w)?;
                write_memo_field(w, &op.memo)?;
                schema.write_set(w, &op.extensions)
            }
            Operation::NftReserve(op) => {
                op.fee.write(w);
                write_account(w, op.owner);
                op.tokens.write(w)?;
                schema.write_set(w, &op.extensions)
            }
            Operation::NftSell(op) => {
                op.fee.write(w);
                write_account(w, op.seller);
                op.tokens.write(w)?;
                op.price.write(w);
                w.write_point_in_time(op.expiration);
                schema.write_set(w, &op.extensions)
            }
            Operation::NftBuy(op) => {
                op.fee.write(w);
                write_account(w, op.buyer);
                op.sell_order.write(w);
                op.price.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::NftCancelSell(op) => {
                op.fee.write(w);
                write_account(w, op.seller);
                op.sell_order.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::NftOverrideTransfer(op) => {
                op.fee.write(w);
                write_account(w, op.issuer);
                write_account(w, op.from);
                write_account(w, op.to);
                op.tokens.write(w)?;
                schema.write_set(w, &op.extensions)
            }
            Operation::AssetClaimFees(op) => {
                op.fee.write(w);
                write_account(w, op.issuer);
                op.amount_to_claim.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::BalanceClaim(op) => {
                op.fee.write(w);
                write_account(w, op.deposit_to_account);
                op.balance_to_claim.write(w);
                w.write_raw(&op.balance_owner_key);
                op.total_claimed.write(w);
                schema.write_set(w, &op.extensions)
            }
            Operation::Custom(op) => {
                op.fee.write(w);
                write_account(w, op.payer);
                object_id::write_flat_set(w, &op.required_auths);
                w.write_u16(op.id);
                w.write_bytes(&op.data);
                schema.write_set(w, &op.extensions)
            }
            Operation::AccountWhitelist(op) => {
                op.fee.write(w);
                write_account(w, op.authorizing_account);
                write_account(w, op.account_to_list);
                w.write_u8(op.new_listing);
                schema.write_set(w, &op.extensions)
            }
            Operation::CallOrderUpdate(op) => {
                op.fee.write(w);
                write_account(w, op.funding_account);
                op.delta_collateral.write(w);
                op.delta_debt.write(w);
                schema.write_set(w, &op.extensions)
            }
        }
    }

    /// Decode the body for a known kind, mirroring [`Self::write_body`].
    pub fn read_body(
        kind: OperationKind,
        r: &mut ByteReader<'_>,
        schema: &ExtensionSchema,
    ) -> Result<Self> {
        Ok(match kind {
            OperationKind::Transfer => Operation::Transfer(Transfer {
                fee: AssetAmount::read(r)?,
                from: read_account(r)?,
                to: read_account(r)?,
                amount: AssetAmount::read(r)?,
                memo: read_memo_field(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::OverrideTransfer => Operation::OverrideTransfer(OverrideTransfer {
                fee: AssetAmount::read(r)?,
                issuer: read_account(r)?,
                from: read_account(r)?,
                to: read_account(r)?,
                amount: AssetAmount::read(r)?,
                memo: read_memo_field(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::AssetIssue => Operation::AssetIssue(AssetIssue {
                fee: AssetAmount::read(r)?,
                issuer: read_account(r)?,
                asset_to_issue: AssetAmount::read(r)?,
                issue_to_account: read_account(r)?,
                memo: read_memo_field(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::LimitOrderCreate => Operation::LimitOrderCreate(LimitOrderCreate {
                fee: AssetAmount::read(r)?,
                seller: read_account(r)?,
                amount_to_sell: AssetAmount::read(r)?,
                min_to_receive: AssetAmount::read(r)?,
                expiration: r.read_point_in_time()?,
                fill_or_kill: r.read_bool()?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::LimitOrderCancel => Operation::LimitOrderCancel(LimitOrderCancel {
                fee: AssetAmount::read(r)?,
                fee_paying_account: read_account(r)?,
                order: read_object(r, LIMIT_ORDER_TYPE)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::CancelAll => Operation::CancelAll(CancelAll {
                fee: AssetAmount::read(r)?,
                seller: read_account(r)?,
                sell_asset: ObjectId::read(r, ASSET_SPACE, ASSET_TYPE)?,
                receive_asset: ObjectId::read(r, ASSET_SPACE, ASSET_TYPE)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::ProposalDelete => Operation::ProposalDelete(ProposalDelete {
                fee: AssetAmount::read(r)?,
                fee_paying_account: read_account(r)?,
                using_owner_authority: r.read_bool()?,
                proposal: read_object(r, PROPOSAL_TYPE)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::DiceBetPlace => Operation::DiceBetPlace(DiceBetPlace {
                fee: AssetAmount::read(r)?,
                bettor: read_account(r)?,
                stake: AssetAmount::read(r)?,
                roll_under: r.read_u8()?,
                seed: r.read_u64()?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::DiceBetResolve => Operation::DiceBetResolve(DiceBetResolve {
                fee: AssetAmount::read(r)?,
                resolver: read_account(r)?,
                bet: read_object(r, DICE_BET_TYPE)?,
                reveal: r.read_u64()?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::ExchangeCreate => Operation::ExchangeCreate(ExchangeCreate {
                fee: AssetAmount::read(r)?,
                owner: read_account(r)?,
                amount_a: AssetAmount::read(r)?,
                amount_b: AssetAmount::read(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::ExchangeUpdate => Operation::ExchangeUpdate(ExchangeUpdate {
                fee: AssetAmount::read(r)?,
                owner: read_account(r)?,
                exchange: read_object(r, EXCHANGE_TYPE)?,
                taker_fee_percent: r.read_u16()?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::ExchangeDeposit => Operation::ExchangeDeposit(ExchangeDeposit {
                fee: AssetAmount::read(r)?,
                depositor: read_account(r)?,
                exchange: read_object(r, EXCHANGE_TYPE)?,
                amount_a: AssetAmount::read(r)?,
                amount_b: AssetAmount::read(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::ExchangeWithdraw => Operation::ExchangeWithdraw(ExchangeWithdraw {
                fee: AssetAmount::read(r)?,
                withdrawer: read_account(r)?,
                exchange: read_object(r, EXCHANGE_TYPE)?,
                share_amount: AssetAmount::read(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::ExchangeRemove => Operation::ExchangeRemove(ExchangeRemove {
                fee: AssetAmount::read(r)?,
                owner: read_account(r)?,
                exchange: read_object(r, EXCHANGE_TYPE)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::ExchangeParticipate => {
                Operation::ExchangeParticipate(ExchangeParticipate {
                    fee: AssetAmount::read(r)?,
                    account: read_account(r)?,
                    exchange: read_object(r, EXCHANGE_TYPE)?,
                    amount_to_sell: AssetAmount::read(r)?,
                    min_to_receive: AssetAmount::read(r)?,
                    extensions: schema.read_set(r)?,
                })
            }
            OperationKind::NftCreate => Operation::NftCreate(NftCreate {
                fee: AssetAmount::read(r)?,
                issuer: read_account(r)?,
                symbol: r.read_string()?,
                base_uri: r.read_string()?,
                max_supply: r.read_u64()?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::NftUpdate => Operation::NftUpdate(NftUpdate {
                fee: AssetAmount::read(r)?,
                issuer: read_account(r)?,
                series: read_object(r, NFT_SERIES_TYPE)?,
                base_uri: r.read_string()?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::NftIssue => Operation::NftIssue(NftIssue {
                fee: AssetAmount::read(r)?,
                issuer: read_account(r)?,
                to: read_account(r)?,
                series: read_object(r, NFT_SERIES_TYPE)?,
                token_uri: r.read_string()?,
                memo: read_memo_field(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::NftTransfer => Operation::NftTransfer(NftTransfer {
                fee: AssetAmount::read(r)?,
                from: read_account(r)?,
                to: read_account(r)?,
                tokens: CompiledSelector::read(r)?,
                memo: read_memo_field(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::NftReserve => Operation::NftReserve(NftReserve {
                fee: AssetAmount::read(r)?,
                owner: read_account(r)?,
                tokens: CompiledSelector::read(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::NftSell => Operation::NftSell(NftSell {
                fee: AssetAmount::read(r)?,
                seller: read_account(r)?,
                tokens: CompiledSelector::read(r)?,
                price: AssetAmount::read(r)?,
                expiration: r.read_point_in_time()?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::NftBuy => Operation::NftBuy(NftBuy {
                fee: AssetAmount::read(r)?,
                buyer: read_account(r)?,
                sell_order: read_object(r, NFT_SELL_ORDER_TYPE)?,
                price: AssetAmount::read(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::NftCancelSell => Operation::NftCancelSell(NftCancelSell {
                fee: AssetAmount::read(r)?,
                seller: read_account(r)?,
                sell_order: read_object(r, NFT_SELL_ORDER_TYPE)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::NftOverrideTransfer => {
                Operation::NftOverrideTransfer(NftOverrideTransfer {
                    fee: AssetAmount::read(r)?,
                    issuer: read_account(r)?,
                    from: read_account(r)?,
                    to: read_account(r)?,
                    tokens: CompiledSelector::read(r)?,
                    extensions: schema.read_set(r)?,
                })
            }
            OperationKind::AssetClaimFees => Operation::AssetClaimFees(AssetClaimFees {
                fee: AssetAmount::read(r)?,
                issuer: read_account(r)?,
                amount_to_claim: AssetAmount::read(r)?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::BalanceClaim => {
                let fee = AssetAmount::read(r)?;
                let deposit_to_account = read_account(r)?;
                let balance_to_claim = read_object(r, BALANCE_TYPE)?;
                let mut balance_owner_key = [0u8; PUBLIC_KEY_LEN];
                balance_owner_key.copy_from_slice(r.take(PUBLIC_KEY_LEN)?);
                Operation::BalanceClaim(BalanceClaim {
                    fee,
                    deposit_to_account,
                    balance_to_claim,
                    balance_owner_key,
                    total_claimed: AssetAmount::read(r)?,
                    extensions: schema.read_set(r)?,
                })
            }
            OperationKind::Custom => Operation::Custom(Custom {
                fee: AssetAmount::read(r)?,
                payer: read_account(r)?,
                required_auths: object_id::read_flat_set(r, ACCOUNT_SPACE, ACCOUNT_TYPE)?,
                id: r.read_u16()?,
                data: r.read_bytes()?.to_vec(),
                extensions: schema.read_set(r)?,
            }),
            OperationKind::AccountWhitelist => Operation::AccountWhitelist(AccountWhitelist {
                fee: AssetAmount::read(r)?,
                authorizing_account: read_account(r)?,
                account_to_list: read_account(r)?,
                new_listing: r.read_u8()?,
                extensions: schema.read_set(r)?,
            }),
            OperationKind::CallOrderUpdate => Operation::CallOrderUpdate(CallOrderUpdate {
                fee: AssetAmount::read(r)?,
                funding_account: read_account(r)?,
                delta_collateral: AssetAmount::read(r)?,
                delta_debt: AssetAmount::read(r)?,
                extensions: schema.read_set(r)?,
            }),
        })
    }
}

/// Staged construction for transfers. Every required field must be supplied
/// before `build`; the first one missing is reported by name. This replaces
/// any argument-shape dispatch: there is exactly one way to construct a
/// transfer, and cloning an existing one is spelled `.clone()`.
#[derive(Debug, Clone, Default)]
pub struct TransferBuilder {
    fee: Option<AssetAmount>,
    from: Option<ObjectId>,
    to: Option<ObjectId>,
    amount: Option<AssetAmount>,
    memo: Option<Memo>,
    extensions: Vec<Extension>,
}

impl TransferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fee(mut self, fee: AssetAmount) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn from(mut self, from: ObjectId) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: ObjectId) -> Self {
        self.to = Some(to);
        self
    }

    pub fn amount(mut self, amount: AssetAmount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = Some(memo);
        self
    }

    pub fn extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn build(self) -> Result<Transfer> {
        Ok(Transfer {
            fee: self.fee.ok_or(CodecError::MissingField("fee"))?,
            from: self.from.ok_or(CodecError::MissingField("from"))?,
            to: self.to.ok_or(CodecError::MissingField("to"))?,
            amount: self.amount.ok_or(CodecError::MissingField("amount"))?,
            memo: self.memo,
            extensions: self.extensions,
        })
    }
}
