//! Protection policies: a descriptive payload plus tags, no membership.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use steward_gateway::{ParentSummary, ResourceKind, Tag};

use super::{model_tags, require_name, view_tags};
use crate::adapter::{ResourceAdapter, ResourceView, non_blank};
use crate::error::{LifecycleError, Result};

/// Caller-facing policy model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default)]
    pub policy_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub remediation_enabled: bool,
    #[serde(default)]
    pub exclude_resource_tags: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_set_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl PolicyModel {
    pub fn new(policy_name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            policy_name: policy_name.into(),
            resource_type: resource_type.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Remote payload of a policy.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicySpec {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    resource_type: String,
    #[serde(default)]
    remediation_enabled: bool,
    #[serde(default)]
    exclude_resource_tags: bool,
    #[serde(default)]
    resource_set_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyAdapter;

impl ResourceAdapter for PolicyAdapter {
    type Model = PolicyModel;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Policy
    }

    fn identifier<'m>(&self, model: &'m PolicyModel) -> Option<&'m str> {
        non_blank(model.id.as_deref())
    }

    fn build_spec(&self, model: &PolicyModel) -> Result<Value> {
        require_name("policyName", &model.policy_name)?;
        if model.resource_type.trim().is_empty() {
            return Err(LifecycleError::invalid_request(
                "resourceType must not be empty",
            ));
        }
        let spec = PolicySpec {
            name: model.policy_name.trim().to_string(),
            description: model.description.clone(),
            resource_type: model.resource_type.clone(),
            remediation_enabled: model.remediation_enabled,
            exclude_resource_tags: model.exclude_resource_tags,
            resource_set_ids: model.resource_set_ids.clone(),
        };
        Ok(serde_json::to_value(spec)?)
    }

    fn desired_tags(&self, model: &PolicyModel) -> Result<Option<BTreeMap<String, String>>> {
        model_tags(model.tags.as_ref())
    }

    fn assemble(&self, view: ResourceView) -> Result<PolicyModel> {
        let ResourceView { record, tags, .. } = view;
        let spec: PolicySpec = serde_json::from_value(record.spec).map_err(|e| {
            LifecycleError::internal(format!("malformed policy payload for {}: {e}", record.id))
        })?;
        Ok(PolicyModel {
            id: Some(record.id),
            arn: Some(record.arn),
            policy_name: spec.name,
            description: spec.description,
            resource_type: spec.resource_type,
            remediation_enabled: spec.remediation_enabled,
            exclude_resource_tags: spec.exclude_resource_tags,
            resource_set_ids: spec.resource_set_ids,
            tags: view_tags(tags),
        })
    }

    fn summarize(&self, summary: &ParentSummary) -> Result<PolicyModel> {
        Ok(PolicyModel {
            id: Some(summary.id.clone()),
            arn: Some(summary.arn.clone()),
            policy_name: summary.name.clone(),
            ..PolicyModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;
    use steward_gateway::ParentRecord;

    #[test]
    fn test_build_spec_uses_name_key() {
        let model = PolicyModel::new("baseline", "AWS::EC2::Instance");
        let spec = PolicyAdapter.build_spec(&model).unwrap();
        assert_eq!(spec["name"], "baseline");
        assert_eq!(spec["resourceType"], "AWS::EC2::Instance");
        assert_eq!(spec["remediationEnabled"], false);
    }

    #[test]
    fn test_blank_name_is_invalid_request() {
        let model = PolicyModel::new("   ", "AWS::EC2::Instance");
        let err = PolicyAdapter.build_spec(&model).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_duplicate_tag_keys_rejected() {
        let model = PolicyModel::new("p", "t")
            .with_tags(vec![Tag::new("env", "a"), Tag::new("env", "b")]);
        let err = PolicyAdapter.desired_tags(&model).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_assemble_round_trips_payload() {
        let model = PolicyModel {
            description: Some("shield".into()),
            remediation_enabled: true,
            resource_set_ids: vec!["rs-1".into()],
            ..PolicyModel::new("baseline", "AWS::EC2::Instance")
        };
        let spec = PolicyAdapter.build_spec(&model).unwrap();
        let record = ParentRecord::new("p-1", "arn:p-1", "t1", ResourceKind::Policy, spec);
        let mut tags = BTreeMap::new();
        tags.insert("env".to_string(), "prod".to_string());

        let assembled = PolicyAdapter
            .assemble(ResourceView {
                record,
                tags,
                membership: None,
            })
            .unwrap();

        assert_eq!(assembled.id.as_deref(), Some("p-1"));
        assert_eq!(assembled.description.as_deref(), Some("shield"));
        assert!(assembled.remediation_enabled);
        assert_eq!(assembled.resource_set_ids, vec!["rs-1".to_string()]);
        assert_eq!(assembled.tags, Some(vec![Tag::new("env", "prod")]));
    }

    #[test]
    fn test_assemble_without_tags_yields_none() {
        let record = ParentRecord::new(
            "p-1",
            "arn:p-1",
            "t1",
            ResourceKind::Policy,
            json!({"name": "baseline"}),
        );
        let assembled = PolicyAdapter
            .assemble(ResourceView {
                record,
                tags: BTreeMap::new(),
                membership: None,
            })
            .unwrap();
        assert_eq!(assembled.tags, None);
    }

    #[test]
    fn test_malformed_payload_is_internal_failure() {
        let record = ParentRecord::new("p-1", "arn:p-1", "t1", ResourceKind::Policy, json!(42));
        let err = PolicyAdapter
            .assemble(ResourceView {
                record,
                tags: BTreeMap::new(),
                membership: None,
            })
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InternalFailure);
    }

    #[test]
    fn test_model_uses_camel_case() {
        let model: PolicyModel = serde_json::from_value(json!({
            "policyName": "baseline",
            "resourceType": "AWS::EC2::Instance",
            "excludeResourceTags": true
        }))
        .unwrap();
        assert!(model.exclude_resource_tags);
        assert_eq!(PolicyAdapter.identifier(&model), None);
    }
}
