//! Group-expense ledger and debt-settlement engine.
//!
//! The [`Ledger`] owns the collection of groups (members + expenses) and
//! exposes the mutation and query operations a UI layer drives. Balances and
//! settlement plans are derived on demand by the pure functions
//! [`compute_balances`] and [`simplify`]; nothing derived is ever stored.
//!
//! Every mutation is a complete read-modify-write: the next state is built as
//! a fresh structure, persisted through the [`SnapshotStore`], and only then
//! swapped into memory. Readers holding a previously returned group snapshot
//! keep seeing a consistent, unchanging view, and a failed persist leaves the
//! in-memory state untouched.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

pub use balance::{Balances, compute_balances};
pub use currency::Currency;
pub use error::LedgerError;
pub use expenses::Expense;
pub use groups::Group;
pub use members::Member;
pub use money::MoneyCents;
pub use settlement::{Transfer, simplify};
pub use storage::{FileStore, MemoryStore, SNAPSHOT_KEY, SnapshotStore, StorageError};

mod balance;
mod currency;
mod error;
mod expenses;
mod groups;
mod members;
mod money;
mod settlement;
mod storage;

type ResultLedger<T> = Result<T, LedgerError>;

/// Display name used for the injected current-user member when the builder
/// is not given one.
const DEFAULT_USER_NAME: &str = "You";

#[derive(Debug)]
pub struct Ledger<S> {
    groups: HashMap<String, Group>,
    selected: Option<String>,
    user_name: String,
    storage: S,
}

impl<S: SnapshotStore> Ledger<S> {
    /// Return a builder for `Ledger` over the given snapshot store.
    pub fn builder(storage: S) -> LedgerBuilder<S> {
        LedgerBuilder {
            storage,
            user_name: DEFAULT_USER_NAME.to_string(),
        }
    }

    fn group_ref(&self, group_id: &str) -> ResultLedger<&Group> {
        self.groups
            .get(group_id)
            .ok_or_else(|| LedgerError::KeyNotFound(group_id.to_string()))
    }

    async fn persist(&self, groups: &HashMap<String, Group>) -> ResultLedger<()> {
        let bytes = storage::encode_snapshot(groups)?;
        self.storage.set(SNAPSHOT_KEY, &bytes).await?;
        Ok(())
    }

    /// Creates a group with fresh ids for itself and each named member.
    ///
    /// When no name matches the configured current-user name
    /// (case-insensitive), the current user is injected as the first member,
    /// so a group never starts without its creator.
    pub async fn create_group(
        &mut self,
        name: &str,
        member_names: &[String],
        currency: Option<Currency>,
    ) -> ResultLedger<String> {
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidName(
                "group name must not be empty".to_string(),
            ));
        }

        let mut group = Group::new(name.to_string(), currency.unwrap_or_default());
        let has_user = member_names
            .iter()
            .any(|member_name| member_name.eq_ignore_ascii_case(&self.user_name));
        if !has_user {
            group.add_member(self.user_name.clone())?;
        }
        for member_name in member_names {
            group.add_member(member_name.clone())?;
        }

        let group_id = group.id.clone();
        let mut next = self.groups.clone();
        next.insert(group_id.clone(), group);
        self.persist(&next).await?;
        self.groups = next;
        Ok(group_id)
    }

    /// Marks a group as the current one for the caller's contextual
    /// operations.
    pub fn select_group(&mut self, group_id: &str) -> ResultLedger<&Group> {
        if !self.groups.contains_key(group_id) {
            return Err(LedgerError::KeyNotFound(group_id.to_string()));
        }
        self.selected = Some(group_id.to_string());
        self.group_ref(group_id)
    }

    /// The currently selected group, if any. Deleting the selected group
    /// clears the selection.
    pub fn selected_group(&self) -> Option<&Group> {
        self.selected.as_deref().and_then(|id| self.groups.get(id))
    }

    /// Appends an expense to the group.
    ///
    /// The payer and every participant must be current members; the payer
    /// need not appear among the participants. Nothing is mutated when
    /// validation fails.
    pub async fn add_expense(
        &mut self,
        group_id: &str,
        description: &str,
        amount: MoneyCents,
        paid_by: Uuid,
        split_between: Vec<Uuid>,
    ) -> ResultLedger<Uuid> {
        let group = self.group_ref(group_id)?;
        if !group.is_member(paid_by) {
            return Err(LedgerError::KeyNotFound(format!(
                "payer {paid_by} is not a member"
            )));
        }

        let expense = Expense::new(
            description.to_string(),
            amount,
            paid_by,
            split_between,
            Utc::now(),
        )?;
        for participant in &expense.split_between {
            if !group.is_member(*participant) {
                return Err(LedgerError::KeyNotFound(format!(
                    "participant {participant} is not a member"
                )));
            }
        }

        let expense_id = expense.id;
        let mut next = self.groups.clone();
        match next.get_mut(group_id) {
            Some(group) => group.expenses.push(expense),
            None => return Err(LedgerError::KeyNotFound(group_id.to_string())),
        }
        self.persist(&next).await?;
        self.groups = next;
        Ok(expense_id)
    }

    pub async fn delete_expense(
        &mut self,
        group_id: &str,
        expense_id: Uuid,
    ) -> ResultLedger<()> {
        let mut next = self.groups.clone();
        match next.get_mut(group_id) {
            Some(group) => group.delete_expense(expense_id)?,
            None => return Err(LedgerError::KeyNotFound(group_id.to_string())),
        }
        self.persist(&next).await?;
        self.groups = next;
        Ok(())
    }

    pub async fn add_member(&mut self, group_id: &str, name: &str) -> ResultLedger<Uuid> {
        let mut next = self.groups.clone();
        let member_id = match next.get_mut(group_id) {
            Some(group) => group.add_member(name.to_string())?,
            None => return Err(LedgerError::KeyNotFound(group_id.to_string())),
        };
        self.persist(&next).await?;
        self.groups = next;
        Ok(member_id)
    }

    /// Removes a member from the roster.
    ///
    /// Historical expenses referencing the id are not rewritten; the member
    /// can keep a nonzero balance after leaving (see `compute_balances`).
    pub async fn remove_member(&mut self, group_id: &str, member_id: Uuid) -> ResultLedger<()> {
        let mut next = self.groups.clone();
        match next.get_mut(group_id) {
            Some(group) => group.remove_member(member_id)?,
            None => return Err(LedgerError::KeyNotFound(group_id.to_string())),
        }
        self.persist(&next).await?;
        self.groups = next;
        Ok(())
    }

    /// "Settle up": everyone has paid each other in real life, so the group's
    /// open ledger resets.
    ///
    /// Clears the entire expense list; afterwards every balance is zero. No
    /// settlement history is kept. Idempotent.
    pub async fn settle_up(&mut self, group_id: &str) -> ResultLedger<()> {
        let mut next = self.groups.clone();
        match next.get_mut(group_id) {
            Some(group) => group.expenses.clear(),
            None => return Err(LedgerError::KeyNotFound(group_id.to_string())),
        }
        self.persist(&next).await?;
        self.groups = next;
        Ok(())
    }

    pub async fn delete_group(&mut self, group_id: &str) -> ResultLedger<()> {
        let mut next = self.groups.clone();
        if next.remove(group_id).is_none() {
            return Err(LedgerError::KeyNotFound(group_id.to_string()));
        }
        self.persist(&next).await?;
        self.groups = next;
        if self.selected.as_deref() == Some(group_id) {
            self.selected = None;
        }
        Ok(())
    }

    /// Return a [`Group`].
    pub fn group(&self, group_id: &str) -> ResultLedger<&Group> {
        self.group_ref(group_id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Each member's net balance, derived fresh from the current expense
    /// list. Synchronous and side-effect free; safe to call on every render.
    pub fn balances(&self, group_id: &str) -> ResultLedger<Balances> {
        let group = self.group_ref(group_id)?;
        Ok(compute_balances(&group.members, &group.expenses))
    }

    /// The settling transfer plan for a group, derived from its balances.
    pub fn debts(&self, group_id: &str) -> ResultLedger<Vec<Transfer>> {
        Ok(simplify(&self.balances(group_id)?))
    }
}

/// The builder for `Ledger`.
pub struct LedgerBuilder<S> {
    storage: S,
    user_name: String,
}

impl<S: SnapshotStore> LedgerBuilder<S> {
    /// Display name of the current user, injected into groups created
    /// without one.
    pub fn user_name(mut self, name: &str) -> LedgerBuilder<S> {
        self.user_name = name.to_string();
        self
    }

    /// Construct `Ledger`, loading the persisted snapshot (an absent blob
    /// means an empty collection).
    pub async fn build(self) -> ResultLedger<Ledger<S>> {
        let mut groups = HashMap::new();
        if let Some(bytes) = self.storage.get(SNAPSHOT_KEY).await? {
            for group in storage::decode_snapshot(&bytes)? {
                groups.insert(group.id.clone(), group);
            }
        }

        Ok(Ledger {
            groups,
            selected: None,
            user_name: self.user_name,
            storage: self.storage,
        })
    }
}
