use crate::entities::alert_config;
use crate::{NewTrain, RailStore, TrainFilter, TrainLookup};
use railplan_common::datetime::parse_local;
use railplan_common::types::{Rail, TrainStatus, UpdateTrainRequest};
use sea_orm::{EntityTrait, PaginatorTrait};
use tempfile::TempDir;

async fn setup() -> (TempDir, RailStore) {
    let dir = TempDir::new().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("railplan.db").display()
    );
    let store = RailStore::new(&url, dir.path()).await.unwrap();
    (dir, store)
}

fn new_train(rail: i64, cargo: &str, tonnage: i64, depart: &str, status: TrainStatus) -> NewTrain {
    let depart = parse_local(depart).unwrap();
    NewTrain {
        rail: Rail::try_from(rail).unwrap(),
        cargo: cargo.to_string(),
        tonnage,
        client: "Saipol".to_string(),
        depart,
        arrivee: depart + chrono::Duration::hours(6),
        status,
        notes: String::new(),
    }
}

#[tokio::test]
async fn insert_assigns_sequential_codes() {
    let (_dir, store) = setup().await;

    let a = store
        .insert_train(&new_train(1, "Orge", 1800, "2025-02-18T06:00", TrainStatus::EnRoute))
        .await
        .unwrap();
    let b = store
        .insert_train(&new_train(2, "Blé", 2400, "2025-02-18T08:00", TrainStatus::Scheduled))
        .await
        .unwrap();

    assert_eq!(a.train_id, "TRN-001");
    assert_eq!(b.train_id, "TRN-002");
    assert!(b.id > a.id);
    assert_eq!(b.rail.number(), 2);
    assert_eq!(b.status, TrainStatus::Scheduled);
}

#[tokio::test]
async fn deleted_code_is_skipped_unless_count_recurs() {
    let (_dir, store) = setup().await;
    for depart in ["2025-02-18T06:00", "2025-02-18T07:00", "2025-02-18T08:00"] {
        store
            .insert_train(&new_train(1, "Maïs", 100, depart, TrainStatus::Scheduled))
            .await
            .unwrap();
    }

    // Removing a middle record: count + 1 == 3 is still taken, so 004 is next.
    store
        .delete_train(&TrainLookup::Code("TRN-002".into()))
        .await
        .unwrap();
    let next = store
        .insert_train(&new_train(1, "Maïs", 100, "2025-02-18T09:00", TrainStatus::Scheduled))
        .await
        .unwrap();
    assert_eq!(next.train_id, "TRN-004");

    // Removing the newest record makes its number come round again.
    store
        .delete_train(&TrainLookup::Code("TRN-004".into()))
        .await
        .unwrap();
    let reused = store
        .insert_train(&new_train(1, "Maïs", 100, "2025-02-18T10:00", TrainStatus::Scheduled))
        .await
        .unwrap();
    assert_eq!(reused.train_id, "TRN-004");
}

#[tokio::test]
async fn list_filters_and_orders_by_departure() {
    let (_dir, store) = setup().await;
    store
        .insert_train(&new_train(2, "Blé", 2400, "2025-02-18T12:00", TrainStatus::Scheduled))
        .await
        .unwrap();
    store
        .insert_train(&new_train(1, "Colza", 950, "2025-02-17T20:00", TrainStatus::Alert))
        .await
        .unwrap();
    store
        .insert_train(&new_train(2, "Blé", 1000, "2025-02-18T08:00", TrainStatus::EnRoute))
        .await
        .unwrap();

    let all = store.list_trains(&TrainFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].depart <= w[1].depart));
    assert_eq!(all[0].cargo, "Colza");

    let rail_two = store
        .list_trains(&TrainFilter {
            rail: Some(Rail::try_from(2).unwrap()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rail_two.len(), 2);
    assert!(rail_two.iter().all(|t| t.rail.number() == 2));
    assert_eq!(rail_two[0].tonnage, 1000);

    let wheat_en_route = store
        .list_trains(&TrainFilter {
            cargo: Some("Blé".into()),
            status: Some(TrainStatus::EnRoute),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(wheat_en_route.len(), 1);
    assert_eq!(wheat_en_route[0].status, TrainStatus::EnRoute);
}

#[tokio::test]
async fn update_applies_only_present_fields() {
    let (_dir, store) = setup().await;
    let created = store
        .insert_train(&new_train(3, "Tournesol", 3200, "2025-02-18T12:00", TrainStatus::Scheduled))
        .await
        .unwrap();

    let update = UpdateTrainRequest {
        status: Some(TrainStatus::Arrived),
        notes: Some("Quai 4".into()),
        ..Default::default()
    };
    let updated = store
        .update_train(&TrainLookup::RowId(created.id), &update)
        .await
        .unwrap();

    assert_eq!(updated.train_id, created.train_id);
    assert_eq!(updated.status, TrainStatus::Arrived);
    assert_eq!(updated.notes, "Quai 4");
    assert_eq!(updated.cargo, created.cargo);
    assert_eq!(updated.tonnage, created.tonnage);
    assert_eq!(updated.depart, created.depart);

    let by_code = store
        .get_train(&TrainLookup::Code(created.train_id.clone()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_code, updated);
}

#[tokio::test]
async fn missing_train_is_not_found() {
    let (_dir, store) = setup().await;

    let err = store
        .update_train(&TrainLookup::RowId(42), &UpdateTrainRequest::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = store
        .delete_train(&TrainLookup::Code("TRN-042".into()))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("TRN-042"));
}

#[tokio::test]
async fn summary_counts_every_status_and_tonnage() {
    let (_dir, store) = setup().await;
    let samples = [
        (TrainStatus::EnRoute, 1800),
        (TrainStatus::EnRoute, 2400),
        (TrainStatus::Scheduled, 1500),
        (TrainStatus::Alert, 950),
        (TrainStatus::Arrived, 3200),
    ];
    for (status, tonnage) in samples {
        store
            .insert_train(&new_train(1, "Orge", tonnage, "2025-02-18T06:00", status))
            .await
            .unwrap();
    }

    let summary = store.train_summary().await.unwrap();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.en_route, 2);
    assert_eq!(summary.scheduled, 1);
    assert_eq!(summary.alert, 1);
    assert_eq!(summary.arrived, 1);
    assert_eq!(
        summary.scheduled + summary.en_route + summary.arrived + summary.alert,
        summary.total
    );
    assert_eq!(summary.tonnage_total, 1800 + 2400 + 1500 + 950 + 3200);
}

#[tokio::test]
async fn summary_of_empty_table_is_zero() {
    let (_dir, store) = setup().await;
    let summary = store.train_summary().await.unwrap();
    assert_eq!(summary, Default::default());
}

#[tokio::test]
async fn saving_alert_config_twice_keeps_one_row() {
    let (_dir, store) = setup().await;
    assert!(store.get_alert_config().await.unwrap().is_none());

    let first = store
        .save_alert_config("ops@example.com", 30, "all")
        .await
        .unwrap();
    let second = store
        .save_alert_config("yard@example.com", 90, "delay")
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.email, "yard@example.com");
    assert_eq!(second.delay_min, 90);

    let rows = alert_config::Entity::find().count(&store.db).await.unwrap();
    assert_eq!(rows, 1);
    assert_eq!(store.get_alert_config().await.unwrap(), Some(second));
}
