use railplan_common::types::AlertConfig;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, Order, QueryOrder, TransactionTrait,
};

use crate::entities::alert_config::{self, Column, Entity};
use crate::error::Result;
use crate::store::RailStore;

fn to_config(m: alert_config::Model) -> AlertConfig {
    AlertConfig {
        id: Some(m.id),
        email: m.email,
        delay_min: m.delay_min,
        alert_types: m.alert_types,
    }
}

impl RailStore {
    /// The singleton alert configuration, if it was ever saved.
    pub async fn get_alert_config(&self) -> Result<Option<AlertConfig>> {
        Ok(Entity::find()
            .order_by(Column::Id, Order::Asc)
            .one(self.db())
            .await?
            .map(to_config))
    }

    /// Create the configuration row on first save, update it afterwards.
    pub async fn save_alert_config(
        &self,
        email: &str,
        delay_min: i32,
        alert_types: &str,
    ) -> Result<AlertConfig> {
        let txn = self.db().begin().await?;
        let existing = Entity::find()
            .order_by(Column::Id, Order::Asc)
            .one(&txn)
            .await?;
        let model = match existing {
            Some(m) => {
                let mut am: alert_config::ActiveModel = m.into();
                am.email = Set(email.to_owned());
                am.delay_min = Set(delay_min);
                am.alert_types = Set(alert_types.to_owned());
                am.update(&txn).await?
            }
            None => {
                tracing::info!("Creating alert configuration");
                let am = alert_config::ActiveModel {
                    email: Set(email.to_owned()),
                    delay_min: Set(delay_min),
                    alert_types: Set(alert_types.to_owned()),
                    ..Default::default()
                };
                am.insert(&txn).await?
            }
        };
        txn.commit().await?;
        Ok(to_config(model))
    }
}
