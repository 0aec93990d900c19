use serde::Serialize;

use crate::environment::types::Alert;
use crate::store::Signal;

/// At most one alert is shown at a time
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AlertState {
    pub alert: Option<Alert>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AlertSignal {
    CreateAlert(Alert),
    ClearAlert,
}

pub fn reduce(state: &AlertState, signal: &Signal) -> AlertState {
    match signal {
        Signal::Alert(AlertSignal::CreateAlert(alert)) => AlertState {
            alert: Some(alert.clone()),
        },
        Signal::Alert(AlertSignal::ClearAlert) => AlertState { alert: None },
        _ => state.clone(),
    }
}
