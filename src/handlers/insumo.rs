//! Insumos read/write handlers.
//!
//! GET /insumos returns the stored hourly records for one
//! (date, unit_id, market) triple. POST /insumos reconciles an hourly
//! batch against the stored rows and applies the resulting insert/update
//! split, reporting which hours went which way.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use futures_util::future::try_join_all;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::{error, info};

use crate::entities::{insumo, prelude::Insumo};
use crate::models::error::ApiError;
use crate::models::insumo::{
    validate_write, DataEnvelope, InsumoEntry, InsumosQuery, InsumosReadBody, WriteReport,
};
use crate::services::reconcile;
use crate::AppState;

/// GET /insumos?date=&unit_id=&market=
///
/// # Response
/// - 200: all stored records for the triple, sorted ascending by hour
/// - 400: per-field validation errors
/// - 500: opaque storage failure
pub async fn get_insumos(
    State(state): State<AppState>,
    Query(query): Query<InsumosQuery>,
) -> Result<Json<DataEnvelope<InsumosReadBody>>, ApiError> {
    let key = query.validate().map_err(ApiError::Validation)?;

    info!(
        date = %key.date,
        unit_id = %key.unit_id,
        market = key.market.as_str(),
        "Fetching insumos"
    );

    let rows = Insumo::find()
        .filter(insumo::Column::Date.eq(key.date))
        .filter(insumo::Column::UnitId.eq(key.unit_id))
        .filter(insumo::Column::Market.eq(key.market))
        .all(&*state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching insumos");
            ApiError::Internal
        })?;

    let mut insumos: Vec<InsumoEntry> = rows
        .into_iter()
        .map(|row| InsumoEntry {
            hour: row.hour.index(),
            min: row.min.to_f64().unwrap_or(0.0),
            max: row.max.to_f64().unwrap_or(0.0),
            share_ft1: row.share_ft1.and_then(|d| d.to_f64()),
            share_ft2: row.share_ft2.and_then(|d| d.to_f64()),
            note: row.note,
            agc: row.agc,
            price_ft1: row.price_ft1.to_f64().unwrap_or(0.0),
            price_ft2: row.price_ft2.and_then(|d| d.to_f64()),
        })
        .collect();
    insumos.sort_by_key(|entry| entry.hour);

    Ok(Json(DataEnvelope {
        data: InsumosReadBody {
            date: key.date,
            market: key.market,
            unit_id: key.unit_id,
            insumos,
        },
    }))
}

/// POST /insumos
///
/// Validates the batch, fetches the stored rows for the payload's hours,
/// partitions incoming records into inserts and updates, then applies the
/// inserts as one batch and the updates concurrently.
///
/// # Response
/// - 200: `{ data: { inserted: [hours], updated: [hours] } }`
/// - 400: per-field validation errors, no partial validation success
/// - 500: opaque storage failure
pub async fn post_insumos(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<DataEnvelope<WriteReport>>, ApiError> {
    let write = validate_write(&body).map_err(ApiError::Validation)?;

    let hours: Vec<insumo::Hour> = write.insumos.iter().map(|rec| rec.hour).collect();

    let existing = Insumo::find()
        .filter(insumo::Column::Date.eq(write.key.date))
        .filter(insumo::Column::UnitId.eq(write.key.unit_id))
        .filter(insumo::Column::Market.eq(write.key.market))
        .filter(insumo::Column::Hour.is_in(hours))
        .all(&*state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching existing insumos");
            ApiError::Internal
        })?;

    let plan = reconcile::partition(
        &write.key,
        &write.insumos,
        &existing,
        Utc::now().fixed_offset(),
    );

    info!(
        date = %write.key.date,
        unit_id = %write.key.unit_id,
        market = write.key.market.as_str(),
        inserting = plan.to_insert.len(),
        updating = plan.to_update.len(),
        "Reconciled insumos batch"
    );

    let reconcile::ReconcilePlan {
        to_insert,
        to_update,
        inserted_hours,
        updated_hours,
    } = plan;

    if !to_insert.is_empty() {
        Insumo::insert_many(to_insert)
            .exec_without_returning(&*state.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error inserting insumos");
                ApiError::Internal
            })?;
    }

    if !to_update.is_empty() {
        // update predicate matches on (date, unit_id, hour) only; market is
        // written but never filtered on
        try_join_all(to_update.into_iter().map(|update| {
            Insumo::update_many()
                .set(update.model)
                .filter(insumo::Column::Date.eq(write.key.date))
                .filter(insumo::Column::UnitId.eq(write.key.unit_id))
                .filter(insumo::Column::Hour.eq(update.hour))
                .exec(&*state.db)
        }))
        .await
        .map_err(|e| {
            error!(error = %e, "Database error updating insumos");
            ApiError::Internal
        })?;
    }

    Ok(Json(DataEnvelope {
        data: WriteReport {
            inserted: inserted_hours,
            updated: updated_hours,
        },
    }))
}
