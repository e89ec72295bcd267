use railplan_common::datetime::parse_local;
use railplan_common::types::{Rail, TrainStatus};
use railplan_storage::{NewTrain, RailStore};

/// Sample movements inserted on first startup.
struct SampleTrain {
    rail: i64,
    cargo: &'static str,
    tonnage: i64,
    client: &'static str,
    depart: &'static str,
    arrivee: &'static str,
    status: TrainStatus,
    notes: &'static str,
}

const SAMPLE_TRAINS: &[SampleTrain] = &[
    SampleTrain {
        rail: 1,
        cargo: "Orge",
        tonnage: 1800,
        client: "Groupe Limagrain",
        depart: "2025-02-18T06:00",
        arrivee: "2025-02-18T14:30",
        status: TrainStatus::EnRoute,
        notes: "",
    },
    SampleTrain {
        rail: 2,
        cargo: "Blé",
        tonnage: 2400,
        client: "Soufflet Agriculture",
        depart: "2025-02-18T08:00",
        arrivee: "2025-02-18T16:00",
        status: TrainStatus::EnRoute,
        notes: "",
    },
    SampleTrain {
        rail: 3,
        cargo: "Maïs",
        tonnage: 1500,
        client: "Agri Invest SAS",
        depart: "2025-02-18T10:00",
        arrivee: "2025-02-18T18:45",
        status: TrainStatus::Scheduled,
        notes: "",
    },
    SampleTrain {
        rail: 1,
        cargo: "Colza",
        tonnage: 950,
        client: "Oleon France",
        depart: "2025-02-17T20:00",
        arrivee: "2025-02-18T07:00",
        status: TrainStatus::Alert,
        notes: "Retard météo",
    },
    SampleTrain {
        rail: 2,
        cargo: "Tournesol",
        tonnage: 3200,
        client: "Saipol",
        depart: "2025-02-18T12:00",
        arrivee: "2025-02-19T04:00",
        status: TrainStatus::Scheduled,
        notes: "",
    },
];

/// Insert the sample trains when the table is empty. Returns how many were
/// inserted; codes come out as TRN-001..TRN-005 in declaration order.
pub async fn init_sample_trains(store: &RailStore) -> anyhow::Result<usize> {
    let existing = store.count_trains().await?;
    if existing > 0 {
        tracing::debug!(existing, "Trains already present, skipping sample data");
        return Ok(0);
    }

    for sample in SAMPLE_TRAINS {
        let new = NewTrain {
            rail: Rail::try_from(sample.rail).map_err(anyhow::Error::msg)?,
            cargo: sample.cargo.to_string(),
            tonnage: sample.tonnage,
            client: sample.client.to_string(),
            depart: parse_local(sample.depart).map_err(anyhow::Error::msg)?,
            arrivee: parse_local(sample.arrivee).map_err(anyhow::Error::msg)?,
            status: sample.status,
            notes: sample.notes.to_string(),
        };
        let train = store.insert_train(&new).await?;
        tracing::debug!(train_id = %train.train_id, "Sample train inserted");
    }

    tracing::info!(count = SAMPLE_TRAINS.len(), "Sample trains initialized");
    Ok(SAMPLE_TRAINS.len())
}
