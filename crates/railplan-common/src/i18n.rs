//! Lightweight i18n translation registry.
//!
//! Static translation map keyed by `(locale, message_key)`. Supported
//! locales: `fr`, `en`.

use crate::types::TrainStatus;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Default locale when none is configured.
pub const DEFAULT_LOCALE: &str = "fr";

/// Supported locales.
pub const SUPPORTED_LOCALES: &[&str] = &["fr", "en"];

/// Keys of the CSV export header, in column order.
pub const CSV_HEADER_KEYS: [&str; 9] = [
    "csv.train_id",
    "csv.line",
    "csv.cargo",
    "csv.tonnage",
    "csv.client",
    "csv.depart",
    "csv.arrivee",
    "csv.status",
    "csv.notes",
];

/// Central translation registry.
pub struct Translations {
    map: HashMap<(&'static str, &'static str), &'static str>,
}

impl Translations {
    /// Get a translated string for the given locale and key.
    /// Falls back to `en` if the locale is not found, then to the provided default.
    pub fn get<'a>(&self, locale: &str, key: &str, default: &'a str) -> &'a str {
        if let Some(&val) = self.map.get(&(locale, key)) {
            return val;
        }
        if locale != "en" {
            if let Some(&val) = self.map.get(&("en", key)) {
                return val;
            }
        }
        default
    }

    /// Get a translated template string for formatting.
    /// Returns `None` if no translation is found for any locale.
    pub fn get_template(&self, locale: &str, key: &str) -> Option<&'static str> {
        self.map
            .get(&(locale, key))
            .or_else(|| {
                if locale != "en" {
                    self.map.get(&("en", key))
                } else {
                    None
                }
            })
            .copied()
    }
}

/// Global translation singleton.
pub static TRANSLATIONS: LazyLock<Translations> = LazyLock::new(|| {
    let mut map = HashMap::new();

    macro_rules! t {
        ($locale:expr, $key:expr, $val:expr) => {
            map.insert(($locale, $key), $val);
        };
    }

    // ---- Yard lines ----
    t!("fr", "rail.1", "Ligne A — Nord");
    t!("fr", "rail.2", "Ligne B — Est");
    t!("fr", "rail.3", "Ligne C — Ouest");
    t!("fr", "rail.other", "Ligne {n}");
    t!("en", "rail.1", "Line A - North");
    t!("en", "rail.2", "Line B - East");
    t!("en", "rail.3", "Line C - West");
    t!("en", "rail.other", "Line {n}");

    // ---- Train status ----
    t!("fr", "status.scheduled", "Planifié");
    t!("fr", "status.en-route", "En route");
    t!("fr", "status.arrived", "Arrivé");
    t!("fr", "status.alert", "Alerte");
    t!("en", "status.scheduled", "Scheduled");
    t!("en", "status.en-route", "En route");
    t!("en", "status.arrived", "Arrived");
    t!("en", "status.alert", "Alert");

    t!("fr", "train.unknown_client", "Client inconnu");
    t!("en", "train.unknown_client", "Unknown client");

    // ---- CSV export header ----
    t!("fr", "csv.train_id", "ID Convoi");
    t!("fr", "csv.line", "Ligne");
    t!("fr", "csv.cargo", "Marchandise");
    t!("fr", "csv.tonnage", "Tonnage (t)");
    t!("fr", "csv.client", "Client");
    t!("fr", "csv.depart", "Date Départ");
    t!("fr", "csv.arrivee", "Date Arrivée");
    t!("fr", "csv.status", "Statut");
    t!("fr", "csv.notes", "Notes");
    t!("en", "csv.train_id", "Train ID");
    t!("en", "csv.line", "Line");
    t!("en", "csv.cargo", "Cargo");
    t!("en", "csv.tonnage", "Tonnage (t)");
    t!("en", "csv.client", "Client");
    t!("en", "csv.depart", "Departure");
    t!("en", "csv.arrivee", "Arrival");
    t!("en", "csv.status", "Status");
    t!("en", "csv.notes", "Notes");

    // ---- Test alert email ----
    t!("fr", "mail.test.subject", "[RailPlan] ✅ Test d'alerte");
    t!(
        "fr",
        "mail.test.body",
        "Bonjour,\n\nCeci est un email de test de votre système RailPlan.\nLes alertes sont correctement configurées.\n\n— RailPlan Système"
    );
    t!("en", "mail.test.subject", "[RailPlan] ✅ Alert test");
    t!(
        "en",
        "mail.test.body",
        "Hello,\n\nThis is a test email from your RailPlan system.\nAlerts are correctly configured.\n\n— RailPlan System"
    );

    // ---- API messages ----
    t!("fr", "api.email_not_configured", "Aucun email configuré");
    t!("en", "api.email_not_configured", "No email configured");

    Translations { map }
});

/// Returns `locale` when supported, otherwise the default locale.
pub fn normalize_locale(locale: &str) -> &'static str {
    SUPPORTED_LOCALES
        .iter()
        .find(|l| l.eq_ignore_ascii_case(locale))
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// Display name of a yard line.
///
/// # Examples
///
/// ```
/// use railplan_common::i18n::rail_label;
///
/// assert_eq!(rail_label("fr", 2), "Ligne B — Est");
/// assert_eq!(rail_label("en", 1), "Line A - North");
/// assert_eq!(rail_label("fr", 7), "Ligne 7");
/// ```
pub fn rail_label(locale: &str, rail: i64) -> String {
    let key = match rail {
        1 => "rail.1",
        2 => "rail.2",
        3 => "rail.3",
        _ => {
            let template = TRANSLATIONS
                .get_template(locale, "rail.other")
                .unwrap_or("Line {n}");
            return template.replace("{n}", &rail.to_string());
        }
    };
    TRANSLATIONS.get(locale, key, "").to_string()
}

pub fn status_label(locale: &str, status: TrainStatus) -> &'static str {
    let key = match status {
        TrainStatus::Scheduled => "status.scheduled",
        TrainStatus::EnRoute => "status.en-route",
        TrainStatus::Arrived => "status.arrived",
        TrainStatus::Alert => "status.alert",
    };
    TRANSLATIONS.get(locale, key, status.as_str())
}

pub fn csv_headers(locale: &str) -> [&'static str; 9] {
    CSV_HEADER_KEYS.map(|key| TRANSLATIONS.get(locale, key, key))
}
