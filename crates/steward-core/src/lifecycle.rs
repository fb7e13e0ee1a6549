//! Lifecycle orchestration.
//!
//! [`Lifecycle`] drives the create/read/update/delete/list state machine of
//! one resource family against a [`RemoteGateway`]. Every operation is a
//! single pass of sequential remote calls; nothing is retried here.

use std::collections::{BTreeMap, BTreeSet};

use steward_gateway::{DynGateway, ParentRecord, RemoteGateway, ResourceKind};
use tracing::{debug, info, warn};

use crate::adapter::{ResourceAdapter, ResourceView};
use crate::error::{LifecycleError, Result};
use crate::membership::MembershipReconciler;
use crate::pagination::{collect_membership, collect_pages};
use crate::settings::{ReconcileSettings, SnapshotPolicy};
use crate::tags::TagReconciler;

/// CRUD-L orchestrator for the family described by `A`.
pub struct Lifecycle<A: ResourceAdapter> {
    gateway: DynGateway,
    adapter: A,
    settings: ReconcileSettings,
}

impl<A: ResourceAdapter> Lifecycle<A> {
    pub fn new(gateway: DynGateway, adapter: A) -> Self {
        Self::with_settings(gateway, adapter, ReconcileSettings::default())
    }

    pub fn with_settings(gateway: DynGateway, adapter: A, settings: ReconcileSettings) -> Self {
        Self {
            gateway,
            adapter,
            settings,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    fn kind(&self) -> ResourceKind {
        self.adapter.kind()
    }

    fn remote(&self) -> &dyn RemoteGateway {
        self.gateway.as_ref()
    }

    fn members(&self) -> MembershipReconciler<'_> {
        MembershipReconciler::new(self.remote(), self.settings.membership_batch_size)
    }

    fn tags(&self) -> TagReconciler<'_> {
        TagReconciler::new(self.remote(), self.settings.tag_batch_size)
    }

    fn require_id<'m>(&self, model: &'m A::Model) -> Result<&'m str> {
        self.adapter
            .identifier(model)
            .ok_or_else(|| LifecycleError::missing_identifier(self.kind()))
    }

    /// Creates the parent, then converges its membership and tags.
    ///
    /// If convergence fails the new parent is deleted on a best-effort basis
    /// and [`LifecycleError::PostCreateReconciliation`] is returned.
    ///
    /// # Errors
    ///
    /// Invalid models fail with `InvalidRequest` before any remote call.
    pub async fn create(&self, desired: &A::Model) -> Result<A::Model> {
        let kind = self.kind();
        let spec = self.adapter.build_spec(desired)?;
        let desired_tags = self.adapter.desired_tags(desired)?;
        let desired_members = self.adapter.desired_membership(desired);

        let record = self.remote().create_parent(kind, &spec).await?;
        info!(kind = %kind, id = %record.id, "Parent created");

        if let Err(err) = self
            .converge_new(&record, desired_members.as_ref(), desired_tags.as_ref())
            .await
        {
            warn!(kind = %kind, id = %record.id, error = %err, "Post-create reconciliation failed");
            self.compensate(&record.id).await;
            return Err(LifecycleError::post_create(record.id, err));
        }

        let id = record.id.clone();
        match self.project(record, desired_tags, desired_members) {
            Ok(model) => Ok(model),
            Err(err) => {
                warn!(kind = %kind, id = %id, error = %err, "Created resource could not be assembled");
                self.compensate(&id).await;
                Err(assembly_failure(err))
            }
        }
    }

    async fn converge_new(
        &self,
        record: &ParentRecord,
        members: Option<&BTreeSet<String>>,
        tags: Option<&BTreeMap<String, String>>,
    ) -> Result<()> {
        if self.adapter.has_membership() {
            self.members().reconcile(&record.id, members).await?;
        }
        let tagger = self.tags();
        let current = tagger.current(&record.arn).await?;
        tagger.reconcile(&record.arn, &current, tags).await?;
        Ok(())
    }

    /// Best-effort delete of a parent whose creation could not be completed.
    /// The failure of this call never replaces the error that triggered it.
    async fn compensate(&self, id: &str) {
        let kind = self.kind();
        match self.remote().delete_parent(kind, id).await {
            Ok(()) => info!(kind = %kind, id = %id, "Compensating delete succeeded"),
            Err(err) => warn!(
                kind = %kind,
                id = %id,
                error = %err,
                "Compensating delete failed; resource may be left behind"
            ),
        }
    }

    /// Reads the current remote state of the model's parent.
    pub async fn read(&self, model: &A::Model) -> Result<A::Model> {
        let kind = self.kind();
        let id = self.require_id(model)?;

        let record = self.remote().get_parent(kind, id).await?;
        let tags = self.tags().current(&record.arn).await?;
        let membership = if self.adapter.has_membership() {
            Some(collect_membership(self.remote(), &record.id).await?)
        } else {
            None
        };
        debug!(kind = %kind, id = %id, tags = tags.len(), "Parent read");

        self.adapter
            .assemble(ResourceView {
                record,
                tags,
                membership,
            })
            .map_err(assembly_failure)
    }

    /// Writes the descriptive payload, then converges membership and tags.
    ///
    /// A rejected write returns immediately; in particular a stale update
    /// token surfaces as [`LifecycleError::Conflict`] and no membership or tag
    /// call is made.
    pub async fn update(&self, desired: &A::Model, previous: Option<&A::Model>) -> Result<A::Model> {
        let kind = self.kind();
        let id = self.require_id(desired)?;
        let spec = self.adapter.build_spec(desired)?;
        let desired_tags = self.adapter.desired_tags(desired)?;
        let desired_members = self.adapter.desired_membership(desired);
        let trusted_tags = match (self.settings.snapshot_policy, previous) {
            (SnapshotPolicy::TrustPrevious, Some(previous)) => {
                Some(self.adapter.desired_tags(previous)?.unwrap_or_default())
            }
            _ => None,
        };

        let current = self.remote().get_parent(kind, id).await?;
        let record = self
            .remote()
            .update_parent(kind, id, &spec, &current.update_token)
            .await?;
        info!(kind = %kind, id = %id, "Parent updated");

        if self.adapter.has_membership() {
            self.members().reconcile(id, desired_members.as_ref()).await?;
        }

        let tagger = self.tags();
        let current_tags = match trusted_tags {
            Some(tags) => {
                debug!(kind = %kind, id = %id, "Diffing tags against previous model");
                tags
            }
            None => tagger.current(&record.arn).await?,
        };
        tagger
            .reconcile(&record.arn, &current_tags, desired_tags.as_ref())
            .await?;

        self.project(record, desired_tags, desired_members)
            .map_err(assembly_failure)
    }

    /// Deletes the model's parent. A missing parent is reported as `NotFound`.
    pub async fn delete(&self, model: &A::Model) -> Result<()> {
        let kind = self.kind();
        let id = self.require_id(model)?;
        self.remote().delete_parent(kind, id).await?;
        info!(kind = %kind, id = %id, "Parent deleted");
        Ok(())
    }

    /// Lists every parent of this family as minimal models.
    pub async fn list(&self) -> Result<Vec<A::Model>> {
        let kind = self.kind();
        let page_size = self.settings.list_page_size;
        let gateway = self.remote();

        let summaries = collect_pages(kind.as_str(), move |cursor| async move {
            gateway
                .list_parents(kind, cursor.as_deref(), Some(page_size))
                .await
        })
        .await?;

        debug!(kind = %kind, count = summaries.len(), "Parents listed");
        summaries
            .iter()
            .map(|summary| self.adapter.summarize(summary))
            .collect()
    }

    /// Model of a freshly written parent, from the record and the state just
    /// converged to.
    fn project(
        &self,
        record: ParentRecord,
        tags: Option<BTreeMap<String, String>>,
        members: Option<BTreeSet<String>>,
    ) -> Result<A::Model> {
        let membership = self
            .adapter
            .has_membership()
            .then(|| members.unwrap_or_default());
        self.adapter.assemble(ResourceView {
            record,
            tags: tags.unwrap_or_default(),
            membership,
        })
    }
}

fn assembly_failure(err: LifecycleError) -> LifecycleError {
    match err {
        LifecycleError::InternalFailure { .. } => err,
        other => LifecycleError::internal(format!("result assembly failed: {other}")),
    }
}
