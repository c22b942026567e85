//! Balance and code lookups backed by a revm [`Database`].

use core::fmt::Display;

use alloy_primitives::{Address, U256};
use revm::{primitives::KECCAK_EMPTY, state::AccountInfo, Database};

use crate::{AccountClassifier, BalanceLedger, HostError, SafeCallError};

/// Checks that `account` holds at least `needed`, returning the observed balance.
pub fn ensure_balance<L>(
    ledger: &mut L,
    account: Address,
    needed: U256,
) -> Result<U256, SafeCallError>
where
    L: BalanceLedger + ?Sized,
{
    let balance = ledger.balance_of(account)?;
    if balance < needed {
        return Err(SafeCallError::InsufficientBalance { balance, needed });
    }
    Ok(balance)
}

/// A [`BalanceLedger`] and [`AccountClassifier`] reading accounts from a revm database.
#[derive(Debug, Clone, Default, derive_more::Deref, derive_more::DerefMut)]
pub struct DatabaseLedger<DB> {
    #[deref]
    #[deref_mut]
    db: DB,
}

impl<DB> DatabaseLedger<DB> {
    /// Wraps a database.
    pub const fn new(db: DB) -> Self {
        Self { db }
    }

    /// Returns the wrapped database.
    pub fn into_inner(self) -> DB {
        self.db
    }
}

impl<DB> DatabaseLedger<DB>
where
    DB: Database,
    DB::Error: Display,
{
    fn account(&mut self, address: Address) -> Result<Option<AccountInfo>, HostError> {
        self.db.basic(address).map_err(|e| HostError::new(e.to_string()))
    }
}

impl<DB> BalanceLedger for DatabaseLedger<DB>
where
    DB: Database,
    DB::Error: Display,
{
    fn balance_of(&mut self, account: Address) -> Result<U256, HostError> {
        Ok(self.account(account)?.map(|info| info.balance).unwrap_or_default())
    }
}

impl<DB> AccountClassifier for DatabaseLedger<DB>
where
    DB: Database,
    DB::Error: Display,
{
    fn code_size(&mut self, account: Address) -> Result<usize, HostError> {
        let Some(info) = self.account(account)? else {
            return Ok(0);
        };
        if let Some(code) = info.code.as_ref().filter(|code| !code.is_empty()) {
            return Ok(code.len());
        }
        if info.code_hash == KECCAK_EMPTY || info.code_hash.is_zero() {
            return Ok(0);
        }
        // Code is not inlined in the account, load it by hash.
        let code =
            self.db.code_by_hash(info.code_hash).map_err(|e| HostError::new(e.to_string()))?;
        Ok(code.len())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, bytes, B256};
    use revm::{
        database::{CacheDB, EmptyDB},
        state::Bytecode,
    };

    type StorageKey = U256;
    type StorageValue = U256;

    use super::*;

    const ACCOUNT: Address = address!("0000000000000000000000000000000000100001");

    /// Serves accounts without inline code, so that code has to be loaded by hash.
    #[derive(Debug, Default)]
    struct DetachedCodeDb {
        db: CacheDB<EmptyDB>,
        zero_code_hash: bool,
    }

    impl Database for DetachedCodeDb {
        type Error = <CacheDB<EmptyDB> as Database>::Error;

        fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
            Ok(self.db.basic(address)?.map(|mut info| {
                info.code = None;
                if self.zero_code_hash {
                    info.code_hash = B256::ZERO;
                }
                info
            }))
        }

        fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error> {
            self.db.code_by_hash(code_hash)
        }

        fn storage(
            &mut self,
            address: Address,
            index: StorageKey,
        ) -> Result<StorageValue, Self::Error> {
            self.db.storage(address, index)
        }

        fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
            self.db.block_hash(number)
        }
    }

    fn contract_info(code: Bytecode) -> AccountInfo {
        let mut info = AccountInfo::from_balance(U256::from(42));
        info.code_hash = code.hash_slow();
        info.code = Some(code);
        info
    }

    #[test]
    fn test_code_not_inlined_is_loaded_by_hash() {
        let mut db = DetachedCodeDb::default();
        let code = Bytecode::new_legacy(bytes!("600160005500"));
        db.db.insert_account_info(ACCOUNT, contract_info(code));
        let mut ledger = DatabaseLedger::new(db);

        assert_eq!(ledger.code_size(ACCOUNT).unwrap(), 6);
        assert!(ledger.is_executable(ACCOUNT).unwrap());
    }

    #[test]
    fn test_zero_code_hash_means_no_code() {
        let mut db = DetachedCodeDb { zero_code_hash: true, ..Default::default() };
        let code = Bytecode::new_legacy(bytes!("600160005500"));
        db.db.insert_account_info(ACCOUNT, contract_info(code));
        let mut ledger = DatabaseLedger::new(db);

        assert_eq!(ledger.code_size(ACCOUNT).unwrap(), 0);
        assert_eq!(ledger.balance_of(ACCOUNT).unwrap(), U256::from(42));
    }

    #[test]
    fn test_unknown_account_has_no_balance_and_no_code() {
        let mut ledger = DatabaseLedger::new(CacheDB::<EmptyDB>::default());
        let account = address!("0000000000000000000000000000000000100001");
        assert_eq!(ledger.balance_of(account).unwrap(), U256::ZERO);
        assert_eq!(ledger.code_size(account).unwrap(), 0);
        assert!(!ledger.is_executable(account).unwrap());
    }

    #[test]
    fn test_account_with_code_is_executable() {
        let account = address!("0000000000000000000000000000000000100001");
        let bytecode = Bytecode::new_legacy(bytes!("600160005500"));
        let mut info = AccountInfo::from_balance(U256::from(42));
        info.code_hash = bytecode.hash_slow();
        info.code = Some(bytecode);

        let mut db = CacheDB::<EmptyDB>::default();
        db.insert_account_info(account, info);
        let mut ledger = DatabaseLedger::new(db);

        assert_eq!(ledger.balance_of(account).unwrap(), U256::from(42));
        assert!(ledger.is_executable(account).unwrap());
    }

    #[test]
    fn test_ensure_balance_reports_observed_balance() {
        let account = address!("0000000000000000000000000000000000100001");
        let mut db = CacheDB::<EmptyDB>::default();
        db.insert_account_info(account, AccountInfo::from_balance(U256::from(100)));
        let mut ledger = DatabaseLedger::new(db);

        assert_eq!(ensure_balance(&mut ledger, account, U256::from(100)).unwrap(), U256::from(100));
        assert_eq!(
            ensure_balance(&mut ledger, account, U256::from(150)),
            Err(SafeCallError::InsufficientBalance {
                balance: U256::from(100),
                needed: U256::from(150),
            })
        );
    }
}
