// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Metanest World Contract Engine - Block Sequencer

//! The collaborator that sequences calls: transactions are grouped into
//! blocks and applied strictly in order, one at a time, each independently.
//! A failed transaction leaves no trace in the ledger and does not affect
//! the others in its block.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::contract::{Call, CallResult, MetanestWorld, Value};
use crate::core_types::Principal;
use crate::error::ContractError;

/// Names of the accounts every fresh chain starts with.
pub const ACCOUNT_NAMES: [&str; 9] = [
    "deployer", "wallet_1", "wallet_2", "wallet_3", "wallet_4",
    "wallet_5", "wallet_6", "wallet_7", "wallet_8",
];

// ─── Tx ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tx {
    pub sender: Principal,
    pub call: Call,
}

impl Tx {
    pub fn contract_call(call: Call, sender: impl Into<Principal>) -> Self {
        Self { sender: sender.into(), call }
    }
}

// ─── Receipt ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    #[error("expected {expected}, got {actual:?}")]
    Unexpected { expected: &'static str, actual: CallResult },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub function: &'static str,
    pub sender: Principal,
    pub result: CallResult,
}

impl Receipt {
    fn unexpected(&self, expected: &'static str) -> ReceiptError {
        ReceiptError::Unexpected { expected, actual: self.result.clone() }
    }

    pub fn expect_ok(&self) -> Result<&Value, ReceiptError> {
        match &self.result {
            CallResult::Ok(v) => Ok(v),
            _ => Err(self.unexpected("(ok ..)")),
        }
    }

    pub fn expect_err(&self) -> Result<ContractError, ReceiptError> {
        match &self.result {
            CallResult::Err(e) => Ok(*e),
            _ => Err(self.unexpected("(err ..)")),
        }
    }

    pub fn expect_some(&self) -> Result<&Value, ReceiptError> {
        match &self.result {
            CallResult::Some(v) => Ok(v),
            _ => Err(self.unexpected("(some ..)")),
        }
    }

    pub fn expect_none(&self) -> Result<(), ReceiptError> {
        match &self.result {
            CallResult::None => Ok(()),
            _ => Err(self.unexpected("none")),
        }
    }
}

// ─── Block ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub height: u64,
    /// Transactions that called a mutating function, successful or not.
    pub writes: usize,
    pub receipts: Vec<Receipt>,
}

impl Block {
    pub fn ok_count(&self) -> usize {
        self.receipts.iter().filter(|r| !matches!(r.result, CallResult::Err(_))).count()
    }
}

// ─── Chain ───────────────────────────────────────────────────────────────────

/// Single sequencing point in front of one contract instance.
#[derive(Debug, Clone)]
pub struct Chain {
    contract: MetanestWorld,
    block_height: u64,
    accounts: BTreeMap<&'static str, Principal>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    pub fn new() -> Self {
        Self::with_contract(MetanestWorld::new())
    }

    pub fn with_contract(contract: MetanestWorld) -> Self {
        let accounts = ACCOUNT_NAMES
            .iter()
            .map(|&name| (name, Principal::from(name)))
            .collect();
        Self { contract, block_height: 0, accounts }
    }

    pub fn account(&self, name: &str) -> Option<&Principal> {
        self.accounts.get(name)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Principal> {
        self.accounts.values()
    }

    pub fn deployer(&self) -> Principal {
        Principal::from(ACCOUNT_NAMES[0])
    }

    /// Height of the last mined block, 0 before the first.
    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    pub fn contract(&self) -> &MetanestWorld {
        &self.contract
    }

    /// Apply `txs` in order as the next block.
    pub fn mine_block(&mut self, txs: Vec<Tx>) -> Block {
        self.block_height += 1;
        let height = self.block_height;
        let span = tracing::info_span!("block", height);
        let _enter = span.enter();

        let writes = txs.iter().filter(|tx| !tx.call.is_read_only()).count();
        let receipts: Vec<Receipt> = txs
            .into_iter()
            .map(|tx| {
                let function = tx.call.function_name();
                let result = self.contract.call(&tx.sender, tx.call);
                Receipt { function, sender: tx.sender, result }
            })
            .collect();

        let block = Block { height, writes, receipts };
        tracing::info!(
            txs = block.receipts.len(),
            writes,
            ok = block.ok_count(),
            "block mined"
        );
        block
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
