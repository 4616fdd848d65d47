//! Postgres implementation of [`Store`] on top of SeaORM

use crate::db::models::*;
use crate::db::{AppraisalFilter, DbPool, PublicationFilter, Store};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use uuid::Uuid;

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }
}

#[async_trait]
impl Store for Repository {
    async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Users
    // ========================================================================

    async fn insert_user(&self, user: User) -> Result<User> {
        let email = user.email.clone();
        user.into_active_model()
            .reset_all()
            .insert(self.conn())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateEmail { email },
                _ => e.into(),
            })
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        UserEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        UserEntity::find()
            .order_by_desc(UserColumn::CreatedAt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn update_user(&self, user: User) -> Result<User> {
        user.into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let result = UserEntity::delete_by_id(id).exec(self.conn()).await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_users(&self) -> Result<u64> {
        UserEntity::find().count(self.conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // Appraisals
    // ========================================================================

    async fn insert_appraisal(&self, appraisal: Appraisal) -> Result<Appraisal> {
        appraisal
            .into_active_model()
            .reset_all()
            .insert(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn find_appraisal(&self, id: Uuid) -> Result<Option<Appraisal>> {
        AppraisalEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn list_appraisals(&self, filter: &AppraisalFilter) -> Result<Vec<Appraisal>> {
        let mut query = AppraisalEntity::find();

        if let Some(faculty_id) = filter.faculty_id {
            query = query.filter(AppraisalColumn::FacultyId.eq(faculty_id));
        }
        if let Some(ref status) = filter.status {
            query = query.filter(AppraisalColumn::Status.eq(status.as_str()));
        }
        if let Some(ref year) = filter.academic_year {
            query = query.filter(AppraisalColumn::AcademicYear.eq(year.as_str()));
        }

        query
            .order_by_desc(AppraisalColumn::CreatedAt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn update_appraisal(&self, appraisal: Appraisal) -> Result<Appraisal> {
        appraisal
            .into_active_model()
            .reset_all()
            .update(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Comments
    // ========================================================================

    async fn insert_comment(&self, comment: AdminComment) -> Result<AdminComment> {
        comment
            .into_active_model()
            .reset_all()
            .insert(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn list_comments(&self, appraisal_id: Uuid) -> Result<Vec<AdminComment>> {
        AdminCommentEntity::find()
            .filter(AdminCommentColumn::AppraisalId.eq(appraisal_id))
            .order_by_asc(AdminCommentColumn::CreatedAt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Publications
    // ========================================================================

    async fn insert_publications(&self, publications: Vec<Publication>) -> Result<Vec<Publication>> {
        let txn = self.conn().begin().await?;
        let mut inserted = Vec::with_capacity(publications.len());

        for publication in publications {
            let row = publication.into_active_model().reset_all().insert(&txn).await?;
            inserted.push(row);
        }

        txn.commit().await?;
        Ok(inserted)
    }

    async fn list_publications(&self, filter: &PublicationFilter) -> Result<Vec<Publication>> {
        let mut query = PublicationEntity::find();

        if let Some(faculty_id) = filter.faculty_id {
            query = query.filter(PublicationColumn::FacultyId.eq(faculty_id));
        }
        if let Some(ref source) = filter.source {
            query = query.filter(PublicationColumn::Source.eq(source.as_str()));
        }
        if let Some(year) = filter.year {
            query = query.filter(PublicationColumn::Year.eq(year));
        }

        let mut publications = query
            .order_by_desc(PublicationColumn::CreatedAt)
            .all(self.conn())
            .await?;

        // Undated entries sort last
        publications.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(publications)
    }
}
