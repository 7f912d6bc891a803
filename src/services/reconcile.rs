//! Insert/update partitioning for incoming hourly batches.
//!
//! Each incoming record lands in exactly one of three buckets against the
//! rows already stored for its key: no stored row with the same hour means
//! insert, a stored row with at least one differing mutable field means
//! update, an identical row means leave it alone. The field comparison is
//! ordered and stops at the first difference.

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveValue::NotSet, Set};

use crate::entities::insumo::{self, Hour};
use crate::models::insumo::{InsumosKey, ValidInsumo};

/// An update ready to apply, paired with the hour its predicate targets.
#[derive(Debug, Clone)]
pub struct PlannedUpdate {
    pub hour: Hour,
    pub model: insumo::ActiveModel,
}

/// Outcome of reconciling one batch against the stored rows.
///
/// Hour lists are in payload-encounter order; records whose stored row was
/// identical appear nowhere.
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    pub to_insert: Vec<insumo::ActiveModel>,
    pub to_update: Vec<PlannedUpdate>,
    pub inserted_hours: Vec<u8>,
    pub updated_hours: Vec<u8>,
}

/// Partition a validated batch into inserts and updates.
///
/// `updated_at` on planned updates is stamped with `now`, i.e. at
/// comparison time, not when the statements later execute.
pub fn partition(
    key: &InsumosKey,
    incoming: &[ValidInsumo],
    existing: &[insumo::Model],
    now: DateTimeWithTimeZone,
) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    for rec in incoming {
        match existing.iter().find(|row| row.hour == rec.hour) {
            None => {
                plan.inserted_hours.push(rec.hour.index());
                plan.to_insert.push(full_row(key, rec));
            }
            Some(row) if differs(row, rec) => {
                let mut model = full_row(key, rec);
                model.updated_at = Set(now);
                plan.updated_hours.push(rec.hour.index());
                plan.to_update.push(PlannedUpdate {
                    hour: rec.hour,
                    model,
                });
            }
            Some(_) => {}
        }
    }

    plan
}

/// Ordered mutable-field comparison, short-circuiting at the first
/// difference. Key columns and timestamps never participate.
fn differs(existing: &insumo::Model, incoming: &ValidInsumo) -> bool {
    if existing.min != incoming.min {
        return true;
    }
    if existing.max != incoming.max {
        return true;
    }
    if existing.share_ft1 != incoming.share_ft1 {
        return true;
    }
    if existing.share_ft2 != incoming.share_ft2 {
        return true;
    }
    if existing.note != incoming.note {
        return true;
    }
    if existing.agc != incoming.agc {
        return true;
    }
    if existing.price_ft1 != incoming.price_ft1 {
        return true;
    }
    existing.price_ft2 != incoming.price_ft2
}

/// Full row for the record with the batch key attached. Timestamps are
/// left unset so inserts take the column defaults.
fn full_row(key: &InsumosKey, rec: &ValidInsumo) -> insumo::ActiveModel {
    insumo::ActiveModel {
        date: Set(key.date),
        unit_id: Set(key.unit_id),
        market: Set(key.market),
        hour: Set(rec.hour),
        min: Set(rec.min),
        max: Set(rec.max),
        share_ft1: Set(rec.share_ft1),
        share_ft2: Set(rec.share_ft2),
        note: Set(rec.note),
        agc: Set(rec.agc),
        price_ft1: Set(rec.price_ft1),
        price_ft2: Set(rec.price_ft2),
        created_at: NotSet,
        updated_at: NotSet,
    }
}
