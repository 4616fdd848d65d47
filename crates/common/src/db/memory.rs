//! In-process [`Store`] used for local development and tests

use crate::db::models::{AdminComment, Appraisal, Publication, User};
use crate::db::{AppraisalFilter, PublicationFilter, Store};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Tables kept in insertion order
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    appraisals: RwLock<Vec<Appraisal>>,
    comments: RwLock<Vec<AdminComment>>,
    publications: RwLock<Vec<Publication>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail { email: user.email });
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.iter().rev().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::UserNotFound {
                id: user.id.to_string(),
            })?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        let deleted = users.len() < before;
        drop(users);

        if deleted {
            // Mirror the ON DELETE CASCADE of the relational schema
            let mut appraisals = self.appraisals.write().await;
            let orphaned: Vec<Uuid> = appraisals
                .iter()
                .filter(|a| a.faculty_id == id)
                .map(|a| a.id)
                .collect();
            appraisals.retain(|a| a.faculty_id != id);
            drop(appraisals);

            self.comments
                .write()
                .await
                .retain(|c| !orphaned.contains(&c.appraisal_id));
            self.publications.write().await.retain(|p| p.faculty_id != id);
        }

        Ok(deleted)
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn insert_appraisal(&self, appraisal: Appraisal) -> Result<Appraisal> {
        self.appraisals.write().await.push(appraisal.clone());
        Ok(appraisal)
    }

    async fn find_appraisal(&self, id: Uuid) -> Result<Option<Appraisal>> {
        Ok(self
            .appraisals
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list_appraisals(&self, filter: &AppraisalFilter) -> Result<Vec<Appraisal>> {
        let mut appraisals: Vec<Appraisal> = self
            .appraisals
            .read()
            .await
            .iter()
            .rev()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        appraisals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(appraisals)
    }

    async fn update_appraisal(&self, appraisal: Appraisal) -> Result<Appraisal> {
        let mut appraisals = self.appraisals.write().await;
        let slot = appraisals
            .iter_mut()
            .find(|a| a.id == appraisal.id)
            .ok_or_else(|| AppError::AppraisalNotFound {
                id: appraisal.id.to_string(),
            })?;
        *slot = appraisal.clone();
        Ok(appraisal)
    }

    async fn insert_comment(&self, comment: AdminComment) -> Result<AdminComment> {
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, appraisal_id: Uuid) -> Result<Vec<AdminComment>> {
        let mut comments: Vec<AdminComment> = self
            .comments
            .read()
            .await
            .iter()
            .filter(|c| c.appraisal_id == appraisal_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn insert_publications(&self, publications: Vec<Publication>) -> Result<Vec<Publication>> {
        self.publications
            .write()
            .await
            .extend(publications.iter().cloned());
        Ok(publications)
    }

    async fn list_publications(&self, filter: &PublicationFilter) -> Result<Vec<Publication>> {
        let mut publications: Vec<Publication> = self
            .publications
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        publications.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(publications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(email: &str) -> User {
        let now = chrono::Utc::now().into();
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Test".to_string(),
            role: "faculty".to_string(),
            department: "CSE".to_string(),
            designation: "Faculty".to_string(),
            employee_id: String::new(),
            phone: String::new(),
            password_hash: String::new(),
            is_active: true,
            form_header: json!({}),
            part_a: json!({}),
            part_b: json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.insert_user(user("a@x.edu")).await.unwrap();

        let err = store.insert_user(user("a@x.edu")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail { .. }));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_user_reports_missing() {
        let store = MemoryStore::new();
        let u = store.insert_user(user("b@x.edu")).await.unwrap();

        assert!(store.delete_user(u.id).await.unwrap());
        assert!(!store.delete_user(u.id).await.unwrap());
        assert!(store.find_user(u.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_row() {
        let store = MemoryStore::new();
        let mut u = store.insert_user(user("c@x.edu")).await.unwrap();
        u.role = "hod".to_string();
        store.update_user(u.clone()).await.unwrap();

        let found = store.find_user_by_email("c@x.edu").await.unwrap().unwrap();
        assert_eq!(found.role, "hod");
    }
}
