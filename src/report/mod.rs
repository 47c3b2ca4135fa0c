// src/report/mod.rs
use crate::normalize::ProduceRecord;
use std::cmp::Ordering;

pub mod render;

/// Sort by price ascending (stable, so equal prices keep listing order)
/// and split into (local, non_local). Every record lands in exactly one
/// of the two groups.
pub fn partition(mut records: Vec<ProduceRecord>) -> (Vec<ProduceRecord>, Vec<ProduceRecord>) {
    records.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
    records.into_iter().partition(|record| record.is_local)
}
