//! Spreadsheet export of train lists.
//!
//! The file is `;`-separated UTF-8 with a byte-order mark so that Excel opens
//! accented labels correctly.

use chrono::NaiveDateTime;
use railplan_common::datetime::format_export;
use railplan_common::i18n::{csv_headers, rail_label, status_label};
use railplan_common::types::Train;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const DELIMITER: u8 = b';';

/// Render `trains` as CSV: header row, then one row per train in order.
pub fn trains_to_csv(trains: &[Train], locale: &str) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(UTF8_BOM.to_vec());
    wtr.write_record(csv_headers(locale))?;
    for train in trains {
        wtr.write_record([
            train.train_id.clone(),
            rail_label(locale, i64::from(train.rail)),
            train.cargo.clone(),
            train.tonnage.to_string(),
            train.client.clone(),
            format_export(&train.depart),
            format_export(&train.arrivee),
            status_label(locale, train.status).to_string(),
            train.notes.clone(),
        ])?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

/// `railplan_export_YYYYMMDD_HHMM.csv`
pub fn export_filename(now: NaiveDateTime) -> String {
    format!("railplan_export_{}.csv", now.format("%Y%m%d_%H%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use railplan_common::datetime::parse_local;
    use railplan_common::types::{Rail, TrainStatus};

    fn sample(code: &str, rail: i64, notes: &str) -> Train {
        Train {
            id: 1,
            train_id: code.to_string(),
            rail: Rail::try_from(rail).unwrap(),
            cargo: "Blé".to_string(),
            tonnage: 2100,
            client: "Coopérative Beauce".to_string(),
            depart: parse_local("2025-02-18T08:15").unwrap(),
            arrivee: parse_local("2025-02-18T17:00").unwrap(),
            status: TrainStatus::EnRoute,
            notes: notes.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn starts_with_bom_and_localized_header() {
        let bytes = trains_to_csv(&[], "fr").unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(
            text.trim_end(),
            "ID Convoi;Ligne;Marchandise;Tonnage (t);Client;Date Départ;Date Arrivée;Statut;Notes"
        );
    }

    #[test]
    fn row_uses_line_name_and_export_dates() {
        let bytes = trains_to_csv(&[sample("TRN-002", 2, "")], "fr").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "TRN-002;Ligne B — Est;Blé;2100;Coopérative Beauce;18/02/2025 08:15;18/02/2025 17:00;En route;"
        );
    }

    #[test]
    fn notes_containing_delimiter_are_quoted() {
        let bytes = trains_to_csv(&[sample("TRN-001", 1, "voie 2; quai 4")], "en").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"voie 2; quai 4\""));
        assert!(text.contains("Line A - North"));
    }

    #[test]
    fn filename_pattern() {
        let now = parse_local("2025-02-18T09:05").unwrap();
        assert_eq!(export_filename(now), "railplan_export_20250218_0905.csv");
    }
}
