use crate::error::{AppError, AppResult};
use crate::models::report::{self, ReportStatus};
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// Optional listing filters. Dates bound `created_at`, with `to` inclusive
/// for the whole day.
#[derive(Debug, Default, Clone)]
pub struct ReportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub incident_type: Option<String>,
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct ReportStats {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub severe: u64,
}

#[derive(Clone)]
pub struct ReportService {
    db: DatabaseConnection,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Files a new report in `pending` status and returns the stored row.
    pub async fn create(
        &self,
        school_id: i32,
        director_id: Option<i32>,
        incident_type: &str,
        severity: &str,
        description: &str,
    ) -> AppResult<report::Model> {
        let row = report::ActiveModel {
            school_id: Set(school_id),
            director_id: Set(director_id),
            incident_type: Set(incident_type.to_string()),
            severity: Set(severity.to_string()),
            description: Set(description.to_string()),
            status: Set(ReportStatus::Pending.as_str().to_string()),
            document_path: Set(None),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(report_id = row.id, school_id, "report filed");
        Ok(row)
    }

    pub async fn get(&self, id: i32) -> AppResult<report::Model> {
        report::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn set_status(&self, id: i32, status: ReportStatus) -> AppResult<report::Model> {
        let row = self.get(id).await?;
        let mut active: report::ActiveModel = row.into();
        active.status = Set(status.as_str().to_string());
        let updated = active.update(&self.db).await?;
        tracing::info!(report_id = id, status = %status, "report status updated");
        Ok(updated)
    }

    /// Records the rendered document for a report. A report gets at most one
    /// document; a second attach is rejected.
    pub async fn attach_document(&self, id: i32, path: &str) -> AppResult<report::Model> {
        let row = self.get(id).await?;
        if row.document_path.is_some() {
            return Err(AppError::Validation(
                "report already has a document attached".into(),
            ));
        }
        let mut active: report::ActiveModel = row.into();
        active.document_path = Set(Some(path.to_string()));
        Ok(active.update(&self.db).await?)
    }

    /// Newest-first page of reports matching the filter.
    pub async fn list(
        &self,
        filter: &ReportFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<report::Model>, u64)> {
        let mut query = report::Entity::find().order_by_desc(report::Column::CreatedAt);

        if let Some(from) = filter.from {
            query = query.filter(report::Column::CreatedAt.gte(from.and_time(NaiveTime::MIN)));
        }
        if let Some(to) = filter.to {
            if let Some(next_day) = to.succ_opt() {
                query = query.filter(report::Column::CreatedAt.lt(next_day.and_time(NaiveTime::MIN)));
            }
        }
        if let Some(incident_type) = &filter.incident_type {
            query = query.filter(report::Column::IncidentType.eq(incident_type.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(report::Column::Status.eq(status.as_str()));
        }

        let paginator = query.paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    pub async fn stats(&self) -> AppResult<ReportStats> {
        let total = report::Entity::find().count(&self.db).await?;
        let pending = self.count_by_status(ReportStatus::Pending).await?;
        let in_progress = self.count_by_status(ReportStatus::InProgress).await?;
        let resolved = self.count_by_status(ReportStatus::Resolved).await?;
        let severe = report::Entity::find()
            .filter(report::Column::Severity.eq("SEVERE"))
            .count(&self.db)
            .await?;

        Ok(ReportStats {
            total,
            pending,
            in_progress,
            resolved,
            severe,
        })
    }

    async fn count_by_status(&self, status: ReportStatus) -> AppResult<u64> {
        Ok(report::Entity::find()
            .filter(report::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await?)
    }
}
