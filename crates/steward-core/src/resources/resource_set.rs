//! Resource sets: a named payload whose membership is a set of resource URIs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use steward_gateway::{ParentSummary, ResourceKind, Tag};

use super::{model_tags, require_name, view_tags};
use crate::adapter::{ResourceAdapter, ResourceView, non_blank};
use crate::error::{LifecycleError, Result};

/// Caller-facing resource set model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSetModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub resource_type_list: Vec<String>,
    /// Member resource URIs. `None` means the set should be empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl ResourceSetModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = Some(resources.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSetSpec {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    resource_type_list: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceSetAdapter;

impl ResourceAdapter for ResourceSetAdapter {
    type Model = ResourceSetModel;

    fn kind(&self) -> ResourceKind {
        ResourceKind::ResourceSet
    }

    fn has_membership(&self) -> bool {
        true
    }

    fn identifier<'m>(&self, model: &'m ResourceSetModel) -> Option<&'m str> {
        non_blank(model.id.as_deref())
    }

    fn build_spec(&self, model: &ResourceSetModel) -> Result<Value> {
        require_name("name", &model.name)?;
        let spec = ResourceSetSpec {
            name: model.name.trim().to_string(),
            description: model.description.clone(),
            resource_type_list: model.resource_type_list.clone(),
        };
        Ok(serde_json::to_value(spec)?)
    }

    fn desired_tags(&self, model: &ResourceSetModel) -> Result<Option<BTreeMap<String, String>>> {
        model_tags(model.tags.as_ref())
    }

    fn desired_membership(&self, model: &ResourceSetModel) -> Option<BTreeSet<String>> {
        model
            .resources
            .as_ref()
            .map(|uris| uris.iter().cloned().collect())
    }

    fn assemble(&self, view: ResourceView) -> Result<ResourceSetModel> {
        let ResourceView {
            record,
            tags,
            membership,
        } = view;
        let spec: ResourceSetSpec = serde_json::from_value(record.spec).map_err(|e| {
            LifecycleError::internal(format!(
                "malformed resource set payload for {}: {e}",
                record.id
            ))
        })?;
        let resources = membership
            .filter(|members| !members.is_empty())
            .map(|members| members.into_iter().collect());

        Ok(ResourceSetModel {
            id: Some(record.id),
            arn: Some(record.arn),
            name: spec.name,
            description: spec.description,
            resource_type_list: spec.resource_type_list,
            resources,
            tags: view_tags(tags),
        })
    }

    fn summarize(&self, summary: &ParentSummary) -> Result<ResourceSetModel> {
        Ok(ResourceSetModel {
            id: Some(summary.id.clone()),
            arn: Some(summary.arn.clone()),
            name: summary.name.clone(),
            ..ResourceSetModel::default()
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
    fn test_desired_membership_dedups() {
        let model = ResourceSetModel::new("web").with_resources(["arn:a", "arn:b", "arn:a"]);
        let desired = ResourceSetAdapter.desired_membership(&model).unwrap();
        assert_eq!(desired.len(), 2);

        let empty = ResourceSetModel::new("web");
        assert_eq!(ResourceSetAdapter.desired_membership(&empty), None);
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = ResourceSetAdapter
            .build_spec(&ResourceSetModel::new(""))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_blank_identifier_is_absent() {
        let model = ResourceSetModel::new("web").with_id("  ");
        assert_eq!(ResourceSetAdapter.identifier(&model), None);
        let model = ResourceSetModel::new("web").with_id("rs-1");
        assert_eq!(ResourceSetAdapter.identifier(&model), Some("rs-1"));
    }

    #[test]
    fn test_assemble_sorts_members_and_collapses_empty() {
        let record = ParentRecord::new(
            "rs-1",
            "arn:rs-1",
            "t1",
            ResourceKind::ResourceSet,
            json!({"name": "web", "resourceTypeList": ["AWS::EC2::Instance"]}),
        );
        let membership: BTreeSet<String> = ["arn:b", "arn:a"].into_iter().map(String::from).collect();

        let model = ResourceSetAdapter
            .assemble(ResourceView {
                record: record.clone(),
                tags: BTreeMap::new(),
                membership: Some(membership),
            })
            .unwrap();
        assert_eq!(
            model.resources,
            Some(vec!["arn:a".to_string(), "arn:b".to_string()])
        );
        assert_eq!(model.resource_type_list, vec!["AWS::EC2::Instance".to_string()]);
        assert_eq!(model.tags, None);

        let model = ResourceSetAdapter
            .assemble(ResourceView {
                record,
                tags: BTreeMap::new(),
                membership: Some(BTreeSet::new()),
            })
            .unwrap();
        assert_eq!(model.resources, None);
    }

    #[test]
    fn test_summarize_fills_identity() {
        let summary = ParentSummary {
            id: "rs-9".into(),
            arn: "arn:rs-9".into(),
            name: "db".into(),
            kind: ResourceKind::ResourceSet,
        };
        let model = ResourceSetAdapter.summarize(&summary).unwrap();
        assert_eq!(model.id.as_deref(), Some("rs-9"));
        assert_eq!(model.name, "db");
        assert_eq!(model.resources, None);
    }
}
