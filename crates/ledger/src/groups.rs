//! The `Group` holds the members splitting costs together and their open
//! expenses. A user can belong to multiple groups.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, ResultLedger, error::LedgerError, expenses::Expense, members::Member,
};

/// Holds members and open expenses.
///
/// Both collections preserve insertion order: members for display, expenses
/// for "most recent first" listings. Order carries no ledger semantics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub currency: Currency,
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
}

impl Group {
    pub fn new(name: String, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            currency,
            members: Vec::new(),
            expenses: Vec::new(),
        }
    }

    pub fn member(&self, member_id: Uuid) -> Option<&Member> {
        self.members.iter().find(|member| member.id == member_id)
    }

    /// Case-insensitive lookup by display name.
    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|member| member.name.eq_ignore_ascii_case(name))
    }

    pub fn is_member(&self, member_id: Uuid) -> bool {
        self.member(member_id).is_some()
    }

    /// Appends a member with a fresh id.
    ///
    /// Names are unique per group (case-insensitive) so callers can resolve
    /// members by name unambiguously.
    pub fn add_member(&mut self, name: String) -> ResultLedger<Uuid> {
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidName(
                "member name must not be empty".to_string(),
            ));
        }
        if self.member_by_name(&name).is_some() {
            return Err(LedgerError::ExistingKey(name));
        }
        let member = Member::new(name);
        let member_id = member.id;
        self.members.push(member);
        Ok(member_id)
    }

    /// Removes the member from the roster.
    ///
    /// Existing expenses that reference the id as payer or participant are
    /// left untouched: the balance calculator keeps counting them, so a
    /// departed member can still carry a nonzero balance.
    pub fn remove_member(&mut self, member_id: Uuid) -> ResultLedger<()> {
        let before = self.members.len();
        self.members.retain(|member| member.id != member_id);
        if self.members.len() == before {
            return Err(LedgerError::KeyNotFound(member_id.to_string()));
        }
        Ok(())
    }

    pub fn expense(&self, expense_id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == expense_id)
    }

    pub fn delete_expense(&mut self, expense_id: Uuid) -> ResultLedger<()> {
        let before = self.expenses.len();
        self.expenses.retain(|expense| expense.id != expense_id);
        if self.expenses.len() == before {
            return Err(LedgerError::KeyNotFound(expense_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> (Uuid, Group) {
        let mut group = Group::new(String::from("Trip"), Currency::Eur);
        let member_id = group.add_member(String::from("Anna")).unwrap();
        (member_id, group)
    }

    #[test]
    fn new_members() {
        let mut group = Group::new(String::from("Trip"), Currency::Eur);

        group.add_member(String::from("Anna")).unwrap();
        group.add_member(String::from("Bruno")).unwrap();

        assert_eq!(group.members.len(), 2);
    }

    #[test]
    #[should_panic(expected = "ExistingKey(\"anna\")")]
    fn fail_add_same_member_name() {
        let (_, mut group) = group();
        group.add_member(String::from("anna")).unwrap();
    }

    #[test]
    #[should_panic(expected = "InvalidName")]
    fn fail_add_blank_member_name() {
        let (_, mut group) = group();
        group.add_member(String::from("   ")).unwrap();
    }

    #[test]
    fn remove_member() {
        let (member_id, mut group) = group();
        group.remove_member(member_id).unwrap();
        assert!(group.members.is_empty());
    }

    #[test]
    fn fail_remove_unknown_member() {
        let (_, mut group) = group();
        let err = group.remove_member(Uuid::from_u128(99)).unwrap_err();
        assert!(matches!(err, LedgerError::KeyNotFound(_)));
    }

    #[test]
    fn member_lookup_is_case_insensitive() {
        let (member_id, group) = group();
        assert_eq!(group.member_by_name("ANNA").map(|m| m.id), Some(member_id));
        assert!(group.member_by_name("Bruno").is_none());
    }
}
