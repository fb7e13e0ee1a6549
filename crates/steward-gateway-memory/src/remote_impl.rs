//! Implementation of the RemoteGateway trait for InMemoryGateway.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;

use steward_gateway::{
    BatchOutcome, FailedItem, Page, ParentRecord, ParentSummary, RemoteError, RemoteGateway,
    ResourceKind, Tag,
};

use crate::gateway::{InMemoryGateway, decode_cursor, make_parent_key, paginate};

/// Reason code reported for item URIs that are not ARNs.
const NOT_VALID_ARN: &str = "NOT_VALID_ARN";

/// Extracts the mandatory, non-blank name from a payload.
fn extract_name(spec: &Value) -> Result<String, RemoteError> {
    if !spec.is_object() {
        return Err(RemoteError::invalid_input("payload must be a JSON object"));
    }
    spec.get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .ok_or_else(|| RemoteError::invalid_input("payload requires a non-empty name"))
}

impl InMemoryGateway {
    fn name_taken(&self, kind: ResourceKind, name: &str, except_id: Option<&str>) -> bool {
        self.parents.pin().iter().any(|(_, record)| {
            record.kind == kind
                && record.name() == Some(name)
                && Some(record.id.as_str()) != except_id
        })
    }

    fn ensure_membership_parent(&self, id: &str) -> Result<(), RemoteError> {
        if self.membership.pin().get(id).is_some() {
            Ok(())
        } else {
            Err(RemoteError::not_found(ResourceKind::ResourceSet.as_str(), id))
        }
    }

    fn ensure_item_limit(&self, items: &[String]) -> Result<(), RemoteError> {
        let max = self.options.max_batch_items;
        if items.len() > max {
            return Err(RemoteError::limit_exceeded(format!(
                "{} items exceeds the per-call maximum of {max}",
                items.len()
            )));
        }
        Ok(())
    }

    fn ensure_tag_limit(&self, count: usize) -> Result<(), RemoteError> {
        let max = self.options.max_tags_per_call;
        if count > max {
            return Err(RemoteError::limit_exceeded(format!(
                "{count} tags exceeds the per-call maximum of {max}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn create_parent(
        &self,
        kind: ResourceKind,
        spec: &Value,
    ) -> Result<ParentRecord, RemoteError> {
        let name = extract_name(spec)?;
        let _write = self.write_lock.lock().await;

        if self.name_taken(kind, &name, None) {
            return Err(RemoteError::invalid_operation(format!(
                "a {kind} named {name} already exists"
            )));
        }

        let id = uuid::Uuid::new_v4().simple().to_string();
        let arn = self.make_arn(kind, &id);
        let record = ParentRecord::new(&id, &arn, Self::next_token(), kind, spec.clone());

        self.parents
            .pin()
            .insert(make_parent_key(kind, &id), record.clone());
        if kind == ResourceKind::ResourceSet {
            self.membership.pin().insert(id.clone(), BTreeSet::new());
        }
        self.tags.pin().insert(arn, BTreeMap::new());

        debug!(kind = %kind, id = %id, "Created parent");
        Ok(record)
    }

    async fn get_parent(&self, kind: ResourceKind, id: &str) -> Result<ParentRecord, RemoteError> {
        self.parents
            .pin()
            .get(&make_parent_key(kind, id))
            .cloned()
            .ok_or_else(|| RemoteError::not_found(kind.as_str(), id))
    }

    async fn update_parent(
        &self,
        kind: ResourceKind,
        id: &str,
        spec: &Value,
        update_token: &str,
    ) -> Result<ParentRecord, RemoteError> {
        let name = extract_name(spec)?;
        let _write = self.write_lock.lock().await;

        let key = make_parent_key(kind, id);
        let existing = self
            .parents
            .pin()
            .get(&key)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(kind.as_str(), id))?;

        if existing.update_token != update_token {
            return Err(RemoteError::stale_token(id, update_token));
        }
        if self.name_taken(kind, &name, Some(id)) {
            return Err(RemoteError::invalid_operation(format!(
                "a {kind} named {name} already exists"
            )));
        }

        let record = ParentRecord {
            spec: spec.clone(),
            update_token: Self::next_token(),
            last_updated: OffsetDateTime::now_utc(),
            ..existing
        };
        self.parents.pin().insert(key, record.clone());

        debug!(kind = %kind, id = %id, "Updated parent");
        Ok(record)
    }

    async fn delete_parent(&self, kind: ResourceKind, id: &str) -> Result<(), RemoteError> {
        let _write = self.write_lock.lock().await;

        let removed = self
            .parents
            .pin()
            .remove(&make_parent_key(kind, id))
            .cloned()
            .ok_or_else(|| RemoteError::not_found(kind.as_str(), id))?;

        self.membership.pin().remove(id);
        self.tags.pin().remove(&removed.arn);

        debug!(kind = %kind, id = %id, "Deleted parent");
        Ok(())
    }

    async fn list_parents(
        &self,
        kind: ResourceKind,
        cursor: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<Page<ParentSummary>, RemoteError> {
        let size = self.page_size(page_size)?;
        let offset = decode_cursor(cursor)?;

        let mut summaries: Vec<ParentSummary> = self
            .parents
            .pin()
            .iter()
            .filter(|(_, record)| record.kind == kind)
            .map(|(_, record)| ParentSummary::from(record))
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let (items, next_cursor) = paginate(&summaries, offset, size);
        Ok(Page { items, next_cursor })
    }

    async fn list_membership(
        &self,
        id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<String>, RemoteError> {
        let offset = decode_cursor(cursor)?;
        let items: Vec<String> = self
            .membership
            .pin()
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .ok_or_else(|| RemoteError::not_found(ResourceKind::ResourceSet.as_str(), id))?;

        let (items, next_cursor) = paginate(&items, offset, self.options.max_page_size as usize);
        Ok(Page { items, next_cursor })
    }

    async fn associate_items(
        &self,
        id: &str,
        items: &[String],
    ) -> Result<BatchOutcome, RemoteError> {
        self.ensure_item_limit(items)?;
        let _write = self.write_lock.lock().await;
        self.ensure_membership_parent(id)?;

        let guard = self.membership.pin();
        let mut members = guard.get(id).cloned().unwrap_or_default();
        let mut outcome = BatchOutcome::succeeded();
        for item in items {
            if item.starts_with("arn:") {
                members.insert(item.clone());
            } else {
                outcome.failed_items.push(FailedItem::new(item, NOT_VALID_ARN));
            }
        }
        guard.insert(id.to_string(), members);

        Ok(outcome)
    }

    async fn disassociate_items(
        &self,
        id: &str,
        items: &[String],
    ) -> Result<BatchOutcome, RemoteError> {
        self.ensure_item_limit(items)?;
        let _write = self.write_lock.lock().await;
        self.ensure_membership_parent(id)?;

        let guard = self.membership.pin();
        let mut members = guard.get(id).cloned().unwrap_or_default();
        let mut outcome = BatchOutcome::succeeded();
        for item in items {
            if item.starts_with("arn:") {
                members.remove(item);
            } else {
                outcome.failed_items.push(FailedItem::new(item, NOT_VALID_ARN));
            }
        }
        guard.insert(id.to_string(), members);

        Ok(outcome)
    }

    async fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, RemoteError> {
        self.tags
            .pin()
            .get(arn)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(key, value)| Tag::new(key, value))
                    .collect()
            })
            .ok_or_else(|| RemoteError::not_found("arn", arn))
    }

    async fn add_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), RemoteError> {
        self.ensure_tag_limit(tags.len())?;
        if tags.iter().any(|tag| tag.key.trim().is_empty()) {
            return Err(RemoteError::invalid_input("tag keys must not be empty"));
        }
        let _write = self.write_lock.lock().await;

        let guard = self.tags.pin();
        let mut entries = guard
            .get(arn)
            .cloned()
            .ok_or_else(|| RemoteError::not_found("arn", arn))?;
        for tag in tags {
            entries.insert(tag.key.clone(), tag.value.clone());
        }
        guard.insert(arn.to_string(), entries);
        Ok(())
    }

    async fn remove_tags(&self, arn: &str, keys: &[String]) -> Result<(), RemoteError> {
        self.ensure_tag_limit(keys.len())?;
        let _write = self.write_lock.lock().await;

        let guard = self.tags.pin();
        let mut entries = guard
            .get(arn)
            .cloned()
            .ok_or_else(|| RemoteError::not_found("arn", arn))?;
        for key in keys {
            entries.remove(key);
        }
        guard.insert(arn.to_string(), entries);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}
