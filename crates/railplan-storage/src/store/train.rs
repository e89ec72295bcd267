use chrono::{NaiveDateTime, Utc};
use railplan_common::types::{format_train_code, Rail, Train, TrainStatus, UpdateTrainRequest};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::entities::train::{self, Column, Entity};
use crate::error::{Result, StorageError};
use crate::store::RailStore;

/// Equality filters for listing and export. `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct TrainFilter {
    pub rail: Option<Rail>,
    pub cargo: Option<String>,
    pub status: Option<TrainStatus>,
}

/// How a path segment addresses a train: by row id or by `TRN-NNN` code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainLookup {
    RowId(i64),
    Code(String),
}

impl TrainLookup {
    /// Numeric segments are row ids, anything else is a train code.
    ///
    /// # Examples
    ///
    /// ```
    /// use railplan_storage::TrainLookup;
    ///
    /// assert_eq!(TrainLookup::parse("4"), TrainLookup::RowId(4));
    /// assert_eq!(TrainLookup::parse("TRN-004"), TrainLookup::Code("TRN-004".into()));
    /// ```
    pub fn parse(segment: &str) -> Self {
        match segment.trim().parse::<i64>() {
            Ok(id) => TrainLookup::RowId(id),
            Err(_) => TrainLookup::Code(segment.trim().to_string()),
        }
    }
}

impl std::fmt::Display for TrainLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainLookup::RowId(id) => write!(f, "{id}"),
            TrainLookup::Code(code) => f.write_str(code),
        }
    }
}

/// A fully resolved train ready for insertion.
#[derive(Debug, Clone)]
pub struct NewTrain {
    pub rail: Rail,
    pub cargo: String,
    pub tonnage: i64,
    pub client: String,
    pub depart: NaiveDateTime,
    pub arrivee: NaiveDateTime,
    pub status: TrainStatus,
    pub notes: String,
}

/// Aggregate counters over every train.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainSummary {
    pub total: u64,
    pub scheduled: u64,
    pub en_route: u64,
    pub arrived: u64,
    pub alert: u64,
    pub tonnage_total: i64,
}

fn to_train(m: train::Model) -> Result<Train> {
    let rail = Rail::try_from(i64::from(m.rail)).map_err(|reason| StorageError::InvalidColumn {
        column: "rail",
        reason,
    })?;
    let status = m
        .status
        .parse::<TrainStatus>()
        .map_err(|reason| StorageError::InvalidColumn {
            column: "status",
            reason,
        })?;
    Ok(Train {
        id: m.id,
        train_id: m.train_id,
        rail,
        cargo: m.cargo,
        tonnage: m.tonnage,
        client: m.client,
        depart: m.depart,
        arrivee: m.arrivee,
        status,
        notes: m.notes,
        created_at: m.created_at.with_timezone(&Utc),
    })
}

fn rail_column_value(rail: Rail) -> i32 {
    i32::from(rail.number())
}

async fn find_model<C: ConnectionTrait>(
    conn: &C,
    lookup: &TrainLookup,
) -> Result<Option<train::Model>> {
    let model = match lookup {
        TrainLookup::RowId(id) => Entity::find_by_id(*id).one(conn).await?,
        TrainLookup::Code(code) => {
            Entity::find()
                .filter(Column::TrainId.eq(code.as_str()))
                .one(conn)
                .await?
        }
    };
    Ok(model)
}

/// First free `TRN-NNN` code starting at `count + 1`.
async fn next_free_code<C: ConnectionTrait>(conn: &C) -> Result<String> {
    let mut seq = Entity::find().count(conn).await? + 1;
    loop {
        let code = format_train_code(seq);
        let taken = Entity::find()
            .filter(Column::TrainId.eq(code.as_str()))
            .count(conn)
            .await?
            > 0;
        if !taken {
            return Ok(code);
        }
        seq += 1;
    }
}

impl RailStore {
    pub async fn list_trains(&self, filter: &TrainFilter) -> Result<Vec<Train>> {
        let mut q = Entity::find();
        if let Some(rail) = filter.rail {
            q = q.filter(Column::Rail.eq(rail_column_value(rail)));
        }
        if let Some(cargo) = &filter.cargo {
            q = q.filter(Column::Cargo.eq(cargo.as_str()));
        }
        if let Some(status) = filter.status {
            q = q.filter(Column::Status.eq(status.as_str()));
        }
        let rows = q
            .order_by(Column::Depart, Order::Asc)
            .order_by(Column::Id, Order::Asc)
            .all(self.db())
            .await?;
        rows.into_iter().map(to_train).collect()
    }

    pub async fn count_trains(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    pub async fn get_train(&self, lookup: &TrainLookup) -> Result<Option<Train>> {
        find_model(self.db(), lookup)
            .await?
            .map(to_train)
            .transpose()
    }

    /// Insert a train under the next free sequential code.
    ///
    /// Code allocation and insert share one transaction so two concurrent
    /// creations cannot pick the same code.
    pub async fn insert_train(&self, new: &NewTrain) -> Result<Train> {
        let txn = self.db().begin().await?;
        let code = next_free_code(&txn).await?;
        let am = train::ActiveModel {
            train_id: Set(code),
            rail: Set(rail_column_value(new.rail)),
            cargo: Set(new.cargo.clone()),
            tonnage: Set(new.tonnage),
            client: Set(new.client.clone()),
            depart: Set(new.depart),
            arrivee: Set(new.arrivee),
            status: Set(new.status.as_str().to_owned()),
            notes: Set(new.notes.clone()),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        let model = am.insert(&txn).await?;
        txn.commit().await?;
        to_train(model)
    }

    /// Apply the fields present in `update`; the identifier never changes.
    pub async fn update_train(
        &self,
        lookup: &TrainLookup,
        update: &UpdateTrainRequest,
    ) -> Result<Train> {
        let model = find_model(self.db(), lookup)
            .await?
            .ok_or_else(|| StorageError::NotFound {
                entity: "train",
                id: lookup.to_string(),
            })?;
        if update.is_empty() {
            return to_train(model);
        }

        let mut am: train::ActiveModel = model.into();
        if let Some(rail) = update.rail {
            am.rail = Set(rail_column_value(rail));
        }
        if let Some(cargo) = &update.cargo {
            am.cargo = Set(cargo.clone());
        }
        if let Some(tonnage) = update.tonnage {
            am.tonnage = Set(tonnage);
        }
        if let Some(client) = &update.client {
            am.client = Set(client.clone());
        }
        if let Some(depart) = update.depart {
            am.depart = Set(depart);
        }
        if let Some(arrivee) = update.arrivee {
            am.arrivee = Set(arrivee);
        }
        if let Some(status) = update.status {
            am.status = Set(status.as_str().to_owned());
        }
        if let Some(notes) = &update.notes {
            am.notes = Set(notes.clone());
        }
        let updated = am.update(self.db()).await?;
        to_train(updated)
    }

    /// Delete a train and return the removed record.
    pub async fn delete_train(&self, lookup: &TrainLookup) -> Result<Train> {
        let model = find_model(self.db(), lookup)
            .await?
            .ok_or_else(|| StorageError::NotFound {
                entity: "train",
                id: lookup.to_string(),
            })?;
        Entity::delete_by_id(model.id).exec(self.db()).await?;
        to_train(model)
    }

    pub async fn train_summary(&self) -> Result<TrainSummary> {
        let groups: Vec<(String, i64, Option<i64>)> = Entity::find()
            .select_only()
            .column(Column::Status)
            .column_as(Expr::col(Column::Id).count(), "train_count")
            .column_as(Expr::col(Column::Tonnage).sum(), "tonnage_sum")
            .group_by(Column::Status)
            .into_tuple()
            .all(self.db())
            .await?;

        let mut summary = TrainSummary::default();
        for (status, count, tonnage) in groups {
            let count = u64::try_from(count).unwrap_or_default();
            summary.total += count;
            summary.tonnage_total += tonnage.unwrap_or_default();
            match status.parse::<TrainStatus>() {
                Ok(TrainStatus::Scheduled) => summary.scheduled += count,
                Ok(TrainStatus::EnRoute) => summary.en_route += count,
                Ok(TrainStatus::Arrived) => summary.arrived += count,
                Ok(TrainStatus::Alert) => summary.alert += count,
                Err(_) => {
                    tracing::warn!(status = %status, count, "Trains with unknown status in summary");
                }
            }
        }
        Ok(summary)
    }
}
