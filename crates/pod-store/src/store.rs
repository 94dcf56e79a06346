use std::sync::Arc;

use pod_domain::{
    ColumnRef, Condition, DeleteOp, InsertOp, PodLocation, Row, SelectOp, Table, UpdateOp,
};
use pod_sparql::SparqlTranslator;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::{
    config::StoreConfig,
    engine::{SparqlEngine, TermKind},
    error::{Result, StoreError},
    normalize, planner, preflight,
    results::MutationOutcome,
    session::{FetchRequest, Session},
    transport,
};

/// The Pod dialect executor.
///
/// Owns the session, the SPARQL engine, and the translator; decides per
/// request whether it is engine-native or needs the fallback planner, and
/// runs the container/resource lifecycle around writes.
pub struct PodStore {
    session: Arc<dyn Session>,
    engine: Arc<dyn SparqlEngine>,
    translator: SparqlTranslator,
    location: PodLocation,
    config: StoreConfig,
    concurrency_limiter: Arc<Semaphore>,
}

impl PodStore {
    pub fn new(
        session: Arc<dyn Session>,
        engine: Arc<dyn SparqlEngine>,
        location: PodLocation,
        config: StoreConfig,
    ) -> Self {
        let max_concurrent = config.max_concurrent_operations.max(1);
        Self {
            session,
            engine,
            translator: SparqlTranslator::new(),
            location,
            config,
            concurrency_limiter: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    pub fn location(&self) -> &PodLocation {
        &self.location
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// Register a prefix for every statement compiled from now on.
    pub fn add_prefix(&self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.translator.add_prefix(prefix, uri);
    }

    async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        self.concurrency_limiter
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| StoreError::SemaphoreClosed)
    }

    /// Execute a select, natively when possible.
    pub async fn select(&self, op: SelectOp) -> Result<Vec<Row>> {
        planner::validate_projection(&op)?;
        let _permit = self.acquire().await?;
        if op.requires_fallback() {
            self.select_fallback(op).await
        } else {
            self.select_native(op).await
        }
    }

    async fn select_native(&self, op: SelectOp) -> Result<Vec<Row>> {
        let resource = self.location.resource_url(&op.table);
        let query = self.translator.select(&op, &self.location)?;
        tracing::debug!(resource = %resource, "Dispatching native select");
        let bindings = self
            .engine
            .query_bindings(&query, &resource, self.session.as_ref())
            .await?;
        let rows = normalize::rows_from_bindings(bindings, &op.alias);
        Ok(normalize::project(rows, op.fields.as_deref()))
    }

    /// Plain column fetch of one table, used as the base and joined input
    /// of the fallback planner.
    async fn fetch_table_rows(
        &self,
        table: &Table,
        alias: &str,
        filter: Option<&Condition>,
    ) -> Result<Vec<Row>> {
        let mut base = SelectOp::new(table.clone());
        base.alias = alias.to_string();
        base.filter = filter.cloned();
        let resource = self.location.resource_url(table);
        let query = self.translator.select(&base, &self.location)?;
        let bindings = self
            .engine
            .query_bindings(&query, &resource, self.session.as_ref())
            .await?;
        Ok(normalize::rows_from_bindings(bindings, alias))
    }

    /// Joins, group-by, and aggregates run in process: fetch the base
    /// rows, merge joins one at a time, evaluate post-filters, reduce, and
    /// re-apply the modifiers the base fetch dropped.
    async fn select_fallback(&self, op: SelectOp) -> Result<Vec<Row>> {
        tracing::debug!(table = %op.table.name(), "Request needs the fallback planner");
        let mut rows = self
            .fetch_table_rows(&op.table, &op.alias, op.filter.as_ref())
            .await?;

        let mut residual_pairs = Vec::new();
        for join in &op.joins {
            let (base_ref, join_ref) = planner::join_sides(join, &op.alias)?;
            let keys = planner::collect_join_keys(&rows, base_ref);
            let joined_id = join.table.id_column_name();
            let joined_rows = if join_ref.name == joined_id || join_ref.name == "id" {
                self.fetch_table_rows(&join.table, &join.alias, None).await?
            } else if keys.is_empty() {
                Vec::new()
            } else {
                let filter = Condition::InList {
                    column: ColumnRef {
                        qualifier: None,
                        name: join_ref.name.clone(),
                    },
                    values: keys,
                    negated: false,
                };
                self.fetch_table_rows(&join.table, &join.alias, Some(&filter))
                    .await?
            };
            rows = planner::merge_join(rows, joined_rows, join, base_ref, join_ref);
            residual_pairs.extend(join.conditions.iter().skip(1).cloned());
        }

        rows.retain(|r| {
            op.join_filters.iter().all(|c| planner::eval_condition(r, c))
                && residual_pairs.iter().all(|p| planner::eval_join_condition(r, p))
        });

        let mut rows = if !op.group_by.is_empty() || op.has_aggregates() {
            planner::group_and_aggregate(rows, &op)?
        } else {
            normalize::project(rows, op.fields.as_deref())
        };

        if op.distinct {
            rows = planner::apply_distinct(rows);
        }
        planner::apply_order(&mut rows, &op.order_by);
        Ok(planner::apply_page(rows, op.offset, op.limit))
    }

    /// Insert one or many rows. An empty batch causes no HTTP traffic.
    pub async fn insert(&self, op: InsertOp) -> Result<Vec<MutationOutcome>> {
        if op.rows.is_empty() {
            return Ok(Vec::new());
        }
        let statement = self.translator.insert(&op, &self.location)?;

        let _permit = self.acquire().await?;
        let container = self.location.container_url(&op.table);
        let resource = self.location.resource_url(&op.table);
        preflight::ensure_container(self.session.as_ref(), &container).await?;
        preflight::ensure_resource(self.session.as_ref(), &resource).await?;

        // Existing-subject scan over the raw body, before any SPARQL
        let current = self.read_resource_body(&resource).await?;
        for subject in &statement.subjects {
            if current.contains(subject.as_str()) {
                return Err(StoreError::ResourceExists {
                    subject: subject.clone(),
                    resource: resource.clone(),
                });
            }
        }

        let status = self.apply_update(&resource, &statement.update).await?;
        tracing::debug!(resource = %resource, rows = statement.subjects.len(), "Inserted rows");
        Ok(statement
            .subjects
            .into_iter()
            .map(|subject| MutationOutcome {
                success: true,
                source: resource.clone(),
                subject: Some(subject),
                status: Some(status),
            })
            .collect())
    }

    /// Update matching rows.
    ///
    /// An id-narrowed where skips discovery; anything else selects the
    /// matching subjects first and rewrites them one at a time, in the
    /// order the discovery select returned them.
    pub async fn update(&self, op: UpdateOp) -> Result<Vec<MutationOutcome>> {
        if op.changes.is_empty() {
            return Ok(Vec::new());
        }
        let _permit = self.acquire().await?;
        let resource = self.location.resource_url(&op.table);
        if !preflight::resource_exists(self.session.as_ref(), &resource).await? {
            return Err(StoreError::NotFound(resource));
        }

        let subjects = self.resolve_subjects(&op.table, &op.filter, &resource).await?;
        if subjects.is_empty() {
            return Ok(Vec::new());
        }

        let mut outcomes = Vec::with_capacity(subjects.len());
        for subject in subjects {
            let statement = self
                .translator
                .update_subject(&op.table, &op.changes, &subject)?;
            let status = self.apply_update(&resource, &statement).await?;
            outcomes.push(MutationOutcome {
                success: true,
                source: resource.clone(),
                subject: Some(subject),
                status: Some(status),
            });
        }
        Ok(outcomes)
    }

    /// Delete matching rows. A missing resource is a silent no-op reported
    /// as a successful 404 outcome.
    pub async fn delete(&self, op: DeleteOp) -> Result<Vec<MutationOutcome>> {
        let _permit = self.acquire().await?;
        let resource = self.location.resource_url(&op.table);
        if !preflight::resource_exists(self.session.as_ref(), &resource).await? {
            return Ok(vec![MutationOutcome {
                success: true,
                source: resource,
                subject: None,
                status: Some(404),
            }]);
        }

        let Some(filter) = &op.filter else {
            let statement = self.translator.delete_class(&op.table);
            let status = self.apply_update(&resource, &statement).await?;
            return Ok(vec![MutationOutcome {
                success: true,
                source: resource,
                subject: None,
                status: Some(status),
            }]);
        };

        let subjects = self.resolve_subjects(&op.table, filter, &resource).await?;
        if subjects.is_empty() {
            return Ok(Vec::new());
        }

        let mut outcomes = Vec::with_capacity(subjects.len());
        for subject in subjects {
            let statement = self.translator.delete_subject(&subject);
            let status = self.apply_update(&resource, &statement).await?;
            outcomes.push(MutationOutcome {
                success: true,
                source: resource.clone(),
                subject: Some(subject),
                status: Some(status),
            });
        }
        Ok(outcomes)
    }

    /// Turn a where clause into subject IRIs: directly for id equality and
    /// id IN, through a discovery select otherwise.
    async fn resolve_subjects(
        &self,
        table: &Table,
        filter: &Condition,
        resource: &str,
    ) -> Result<Vec<String>> {
        if let Some(ids) = filter.id_values(table.id_column_name()) {
            return Ok(ids
                .iter()
                .map(|id| self.location.subject_uri(table, id))
                .collect());
        }

        let query = self
            .translator
            .subject_select(table, Some(filter), &self.location)?;
        let bindings = self
            .engine
            .query_bindings(&query, resource, self.session.as_ref())
            .await?;
        Ok(bindings
            .into_iter()
            .filter_map(|binding| {
                binding
                    .get("subject")
                    .filter(|term| term.kind == TermKind::Iri)
                    .map(|term| term.value.clone())
            })
            .collect())
    }

    async fn read_resource_body(&self, resource: &str) -> Result<String> {
        let response = self
            .session
            .fetch(
                FetchRequest::get(resource)
                    .header("Accept", "text/turtle")
                    .timeout(self.config.timeouts.query_timeout()),
            )
            .await?;
        if response.status == 404 {
            return Ok(String::new());
        }
        if !response.is_success() {
            return Err(response.into_transport_error());
        }
        Ok(response.body)
    }

    async fn apply_update(&self, resource: &str, update: &str) -> Result<u16> {
        transport::apply_sparql_update(
            self.session.as_ref(),
            self.engine.as_ref(),
            &self.config.conflict_retry,
            resource,
            update,
            self.config.timeouts.update_timeout(),
        )
        .await
    }
}
