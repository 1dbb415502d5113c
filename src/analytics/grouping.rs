//! Grouping aggregator
//!
//! Groups records by a key function and reduces each group to a sum (and
//! optionally a count). Every report is built on these.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::Datelike;
use serde::{Serialize, Serializer};

use crate::models::{CategoryId, Money, Transaction, TransactionType};

/// Normalized category grouping key
///
/// Records without a category share the single `Uncategorized` key so they
/// land in one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Category(CategoryId),
    Uncategorized,
}

impl CategoryKey {
    pub fn category_id(&self) -> Option<CategoryId> {
        match self {
            Self::Category(id) => Some(*id),
            Self::Uncategorized => None,
        }
    }
}

impl From<Option<CategoryId>> for CategoryKey {
    fn from(id: Option<CategoryId>) -> Self {
        id.map_or(Self::Uncategorized, Self::Category)
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Category(id) => id.serialize(serializer),
            Self::Uncategorized => serializer.serialize_str("uncategorized"),
        }
    }
}

/// Running total and record count of one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub total: Money,
    pub count: usize,
}

/// Group records and sum a value per group
pub fn group_and_sum<'a, T, K, I, KF, VF>(records: I, key_fn: KF, value_fn: VF) -> HashMap<K, Money>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Eq + Hash,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> Money,
{
    let mut groups = HashMap::new();
    for record in records {
        *groups.entry(key_fn(record)).or_insert_with(Money::zero) += value_fn(record);
    }
    groups
}

/// Group records and keep both the sum and the number of records per group
pub fn group_and_count<'a, T, K, I, KF, VF>(
    records: I,
    key_fn: KF,
    value_fn: VF,
) -> HashMap<K, Bucket>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Eq + Hash,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> Money,
{
    let mut groups: HashMap<K, Bucket> = HashMap::new();
    for record in records {
        let bucket = groups.entry(key_fn(record)).or_default();
        bucket.total += value_fn(record);
        bucket.count += 1;
    }
    groups
}

/// Sign-agnostic totals per month, split by transaction type
///
/// Groups on the composite `(month, type)` key, then splits it into a month
/// map of type maps.
pub fn group_by_month_and_type<'a, I>(records: I) -> HashMap<u32, HashMap<TransactionType, Money>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let flat = group_and_sum(records, |t: &Transaction| (t.date.month(), t.kind), sign_agnostic);

    let mut nested: HashMap<u32, HashMap<TransactionType, Money>> = HashMap::new();
    for ((month, kind), total) in flat {
        nested.entry(month).or_default().insert(kind, total);
    }
    nested
}

/// Contribution of a transaction to a displayed total
pub fn sign_agnostic(txn: &Transaction) -> Money {
    txn.amount.abs()
}

/// Contribution of a transaction with its sign kept
pub fn raw_amount(txn: &Transaction) -> Money {
    txn.amount
}
