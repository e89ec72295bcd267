use railplan_common::types::{Rail, TrainStatus};
use railplan_storage::TrainFilter;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Value the web page sends for "no filter".
const ALL: &str = "all";

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrainQueryParams {
    /// Line number 1-3, or `all`
    #[param(required = false, example = "2")]
    pub rail: Option<String>,
    /// Exact cargo type, or `all`
    #[param(required = false, example = "Blé")]
    pub cargo: Option<String>,
    /// `scheduled`, `en-route`, `arrived`, `alert` or `all`
    #[param(required = false, example = "en-route")]
    pub status: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

impl TrainQueryParams {
    /// Resolve to a storage filter; an unknown rail or status is an error.
    pub fn to_filter(&self) -> Result<TrainFilter, String> {
        let rail = active(&self.rail).map(str::parse::<Rail>).transpose()?;
        let status = active(&self.status)
            .map(str::parse::<TrainStatus>)
            .transpose()?;
        Ok(TrainFilter {
            rail,
            cargo: active(&self.cargo).map(str::to_string),
            status,
        })
    }
}
