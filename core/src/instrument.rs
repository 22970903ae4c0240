//! Vaulted instrument types, actions, and state slice.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::RequestError;

/// A vaulted payment instrument stored with the payment host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Vault token identifying the instrument.
    pub bigpay_token: String,
    /// Provider that vaulted the instrument.
    pub provider: String,
    /// Last four digits of the card number.
    pub last4: String,
    /// Card expiry month.
    pub expiry_month: u8,
    /// Card expiry year.
    pub expiry_year: u16,
}

/// Metadata accompanying instrument responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentMeta {
    /// Short-lived token authorizing vault access.
    pub vault_access_token: Option<String>,
}

/// Instrument operation lifecycle actions. Deletions carry the identifier of
/// the affected instrument so statuses and errors can be parameterized by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstrumentAction {
    /// An instrument load has been issued.
    LoadInstrumentsRequested,
    /// An instrument load completed.
    LoadInstrumentsSucceeded {
        /// The vaulted instruments.
        vaulted_instruments: Vec<Instrument>,
        /// Vault access metadata.
        meta: InstrumentMeta,
    },
    /// An instrument load failed.
    LoadInstrumentsFailed(RequestError),
    /// An instrument deletion has been issued.
    DeleteInstrumentRequested {
        /// Vault token of the instrument being deleted.
        instrument_id: String,
    },
    /// An instrument deletion completed.
    DeleteInstrumentSucceeded {
        /// Vault token of the deleted instrument.
        instrument_id: String,
        /// Vault access metadata.
        meta: InstrumentMeta,
    },
    /// An instrument deletion failed.
    DeleteInstrumentFailed {
        /// Vault token of the instrument that could not be deleted.
        instrument_id: String,
        /// The failure.
        error: RequestError,
    },
}

/// Last failure per instrument operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstrumentErrors {
    /// Last load failure.
    pub load_error: Option<RequestError>,
    /// Last deletion failure.
    pub delete_error: Option<RequestError>,
    /// Instrument whose deletion last failed.
    pub failed_instrument: Option<String>,
}

/// In-flight flags per instrument operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstrumentStatuses {
    /// An instrument load is in flight.
    pub is_loading: bool,
    /// An instrument deletion is in flight.
    pub is_deleting: bool,
    /// Instrument currently being deleted.
    pub deleting_instrument: Option<String>,
}

/// Instrument slice state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstrumentState {
    /// Vaulted instruments.
    pub data: Vec<Instrument>,
    /// Last failure per operation.
    pub errors: InstrumentErrors,
    /// In-flight flag per operation.
    pub statuses: InstrumentStatuses,
    /// Vault access metadata.
    pub meta: Option<InstrumentMeta>,
}

/// Reduce the instrument slice.
#[must_use]
pub fn reduce(state: &InstrumentState, action: &Action) -> InstrumentState {
    InstrumentState {
        data: data_reducer(&state.data, action),
        errors: errors_reducer(&state.errors, action),
        statuses: statuses_reducer(&state.statuses, action),
        meta: meta_reducer(&state.meta, action),
    }
}

fn data_reducer(data: &[Instrument], action: &Action) -> Vec<Instrument> {
    match action {
        Action::Instrument(InstrumentAction::LoadInstrumentsSucceeded {
            vaulted_instruments,
            ..
        }) => vaulted_instruments.clone(),

        Action::Instrument(InstrumentAction::DeleteInstrumentSucceeded {
            instrument_id, ..
        }) => data
            .iter()
            .filter(|instrument| instrument.bigpay_token != *instrument_id)
            .cloned()
            .collect(),

        _ => data.to_vec(),
    }
}

fn meta_reducer(meta: &Option<InstrumentMeta>, action: &Action) -> Option<InstrumentMeta> {
    match action {
        Action::Instrument(
            InstrumentAction::LoadInstrumentsSucceeded { meta: next, .. }
            | InstrumentAction::DeleteInstrumentSucceeded { meta: next, .. },
        ) => Some(next.clone()),

        _ => meta.clone(),
    }
}

fn errors_reducer(errors: &InstrumentErrors, action: &Action) -> InstrumentErrors {
    let Action::Instrument(action) = action else {
        return errors.clone();
    };

    match action {
        InstrumentAction::LoadInstrumentsRequested
        | InstrumentAction::LoadInstrumentsSucceeded { .. } => InstrumentErrors {
            load_error: None,
            ..errors.clone()
        },

        InstrumentAction::LoadInstrumentsFailed(error) => InstrumentErrors {
            load_error: Some(error.clone()),
            ..errors.clone()
        },

        InstrumentAction::DeleteInstrumentRequested { .. }
        | InstrumentAction::DeleteInstrumentSucceeded { .. } => InstrumentErrors {
            delete_error: None,
            failed_instrument: None,
            ..errors.clone()
        },

        InstrumentAction::DeleteInstrumentFailed {
            instrument_id,
            error,
        } => InstrumentErrors {
            delete_error: Some(error.clone()),
            failed_instrument: Some(instrument_id.clone()),
            ..errors.clone()
        },
    }
}

fn statuses_reducer(statuses: &InstrumentStatuses, action: &Action) -> InstrumentStatuses {
    let Action::Instrument(action) = action else {
        return statuses.clone();
    };

    match action {
        InstrumentAction::LoadInstrumentsRequested => InstrumentStatuses {
            is_loading: true,
            ..statuses.clone()
        },

        InstrumentAction::LoadInstrumentsSucceeded { .. }
        | InstrumentAction::LoadInstrumentsFailed(_) => InstrumentStatuses {
            is_loading: false,
            ..statuses.clone()
        },

        InstrumentAction::DeleteInstrumentRequested { instrument_id } => InstrumentStatuses {
            is_deleting: true,
            deleting_instrument: Some(instrument_id.clone()),
            ..statuses.clone()
        },

        InstrumentAction::DeleteInstrumentSucceeded { .. }
        | InstrumentAction::DeleteInstrumentFailed { .. } => InstrumentStatuses {
            is_deleting: false,
            deleting_instrument: None,
            ..statuses.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instrument(token: &str) -> Instrument {
        Instrument {
            bigpay_token: token.to_string(),
            provider: "braintree".to_string(),
            last4: "4111".to_string(),
            expiry_month: 2,
            expiry_year: 2027,
        }
    }

    fn meta() -> InstrumentMeta {
        InstrumentMeta {
            vault_access_token: Some("vat-123".to_string()),
        }
    }

    #[test]
    fn load_succeeded_replaces_data_and_meta() {
        let next = reduce(
            &InstrumentState::default(),
            &Action::Instrument(InstrumentAction::LoadInstrumentsSucceeded {
                vaulted_instruments: vec![instrument("bt-1"), instrument("bt-2")],
                meta: meta(),
            }),
        );
        assert_eq!(next.data.len(), 2);
        assert_eq!(next.meta, Some(meta()));
        assert!(!next.statuses.is_loading);
    }

    #[test]
    fn delete_succeeded_removes_only_the_deleted_instrument() {
        let prior = InstrumentState {
            data: vec![instrument("bt-1"), instrument("bt-2")],
            ..InstrumentState::default()
        };
        let next = reduce(
            &prior,
            &Action::Instrument(InstrumentAction::DeleteInstrumentSucceeded {
                instrument_id: "bt-1".to_string(),
                meta: meta(),
            }),
        );
        assert_eq!(next.data, vec![instrument("bt-2")]);
    }

    #[test]
    fn delete_requested_tracks_the_affected_instrument() {
        let next = reduce(
            &InstrumentState::default(),
            &Action::Instrument(InstrumentAction::DeleteInstrumentRequested {
                instrument_id: "bt-1".to_string(),
            }),
        );
        assert!(next.statuses.is_deleting);
        assert_eq!(next.statuses.deleting_instrument, Some("bt-1".to_string()));
    }

    #[test]
    fn delete_failed_records_the_failed_instrument() {
        let error = RequestError::new(500, "gateway error".to_string());
        let next = reduce(
            &InstrumentState::default(),
            &Action::Instrument(InstrumentAction::DeleteInstrumentFailed {
                instrument_id: "bt-1".to_string(),
                error: error.clone(),
            }),
        );
        assert_eq!(next.errors.delete_error, Some(error));
        assert_eq!(next.errors.failed_instrument, Some("bt-1".to_string()));
        assert_eq!(next.statuses.deleting_instrument, None);
    }

    #[test]
    fn unknown_action_returns_unchanged_state() {
        let prior = InstrumentState {
            data: vec![instrument("bt-1")],
            ..InstrumentState::default()
        };
        let next = reduce(
            &prior,
            &Action::Checkout(crate::checkout::CheckoutAction::LoadCheckoutRequested),
        );
        assert_eq!(next, prior);
    }
}
