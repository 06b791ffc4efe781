//! Response payloads returned by [`LineageService`](crate::LineageService).
//!
//! Expected "no data" outcomes are reported through `return_code` inside the
//! payload rather than as errors.

use serde::{Deserialize, Serialize};

use crate::catalog::{DatasetEntry, DependentRecord};
use crate::config::{MSG_NONE_FOUND, MSG_NO_COMMON_PARENTS};
use crate::resolver::DependencyReport;

/// Status embedded in a response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum ReturnCode {
    Ok,
    NotFound,
}

impl ReturnCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            ReturnCode::Ok => 200,
            ReturnCode::NotFound => 404,
        }
    }
}

impl From<ReturnCode> for u16 {
    fn from(code: ReturnCode) -> Self {
        code.as_u16()
    }
}

impl TryFrom<u16> for ReturnCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            200 => Ok(ReturnCode::Ok),
            404 => Ok(ReturnCode::NotFound),
            other => Err(format!("unsupported return code {other}")),
        }
    }
}

/// Result of a lineage query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageResponse {
    pub return_code: ReturnCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub report: Option<DependencyReport>,
}

impl LineageResponse {
    pub fn found(report: DependencyReport) -> Self {
        Self {
            return_code: ReturnCode::Ok,
            message: None,
            report: Some(report),
        }
    }

    pub fn empty(return_code: ReturnCode, message: impl Into<String>) -> Self {
        Self {
            return_code,
            message: Some(message.into()),
            report: None,
        }
    }
}

/// Result of a common-ancestor query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorResponse {
    pub return_code: ReturnCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_parents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AncestorResponse {
    pub fn from_parents(parents: impl IntoIterator<Item = String>) -> Self {
        let parents: Vec<String> = parents.into_iter().collect();
        if parents.is_empty() {
            Self {
                return_code: ReturnCode::NotFound,
                common_parents: None,
                error_message: Some(MSG_NO_COMMON_PARENTS.to_string()),
            }
        } else {
            Self {
                return_code: ReturnCode::Ok,
                common_parents: Some(parents),
                error_message: None,
            }
        }
    }
}

/// Datasets depending on another dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentsResponse {
    pub count: usize,
    pub dependents: Vec<DependentRecord>,
}

impl From<Vec<DependentRecord>> for DependentsResponse {
    fn from(dependents: Vec<DependentRecord>) -> Self {
        Self {
            count: dependents.len(),
            dependents,
        }
    }
}

/// A single dataset lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetResponse {
    pub return_code: ReturnCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetEntry>,
}

impl DatasetResponse {
    pub fn from_lookup(dataset: Option<DatasetEntry>, key: &str) -> Self {
        match dataset {
            Some(dataset) => Self {
                return_code: ReturnCode::Ok,
                message: None,
                dataset: Some(dataset),
            },
            None => Self {
                return_code: ReturnCode::NotFound,
                message: Some(format!("nothing found for {key}")),
                dataset: None,
            },
        }
    }
}

/// Latest dataset of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LatestResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LatestResponse {
    pub fn from_urn(urn: Option<String>) -> Self {
        match urn {
            Some(urn) => Self {
                urn: Some(urn),
                message: None,
            },
            None => Self {
                urn: None,
                message: Some(MSG_NONE_FOUND.to_string()),
            },
        }
    }
}

/// Urns matching a property pattern. Both fields are absent for a blank pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertySearchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urns: Option<Vec<String>>,
}

impl From<Vec<String>> for PropertySearchResponse {
    fn from(urns: Vec<String>) -> Self {
        Self {
            count: Some(urns.len()),
            urns: Some(urns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_code_serializes_as_number() {
        let response = LineageResponse::empty(ReturnCode::NotFound, "missing");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["return_code"], 404);
        assert_eq!(json["message"], "missing");
        assert!(json.get("dependencies").is_none());
    }

    #[test]
    fn test_return_code_round_trip() {
        let code: ReturnCode = serde_json::from_str("200").unwrap();
        assert_eq!(code, ReturnCode::Ok);
        assert!(serde_json::from_str::<ReturnCode>("500").is_err());
    }

    #[test]
    fn test_empty_ancestors_are_not_found() {
        let response = AncestorResponse::from_parents(Vec::new());
        assert_eq!(response.return_code, ReturnCode::NotFound);
        assert_eq!(response.error_message.as_deref(), Some(MSG_NO_COMMON_PARENTS));
    }
}
