use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use guest_rsvp_model::{GuestId, GuestResponse, GuestSubmission};

use crate::error::DatabaseError;
use crate::GuestStore;

/// Process-local store. Records are kept in insertion order.
#[derive(Default)]
pub struct MemoryGuestStore {
    guests: RwLock<Vec<GuestResponse>>,
}

#[async_trait]
impl GuestStore for MemoryGuestStore {
    async fn insert(&self, submission: GuestSubmission) -> Result<GuestResponse, DatabaseError> {
        let mut guests = self.guests.write()?;
        let record = GuestResponse::from_submission(GuestId::generate(), submission, Utc::now());
        guests.push(record.clone());
        drop(guests);
        Ok(record)
    }

    async fn list_newest_first(&self) -> Result<Vec<GuestResponse>, DatabaseError> {
        let guests = self.guests.read()?;
        let mut newest_first: Vec<GuestResponse> = guests.iter().rev().cloned().collect();
        drop(guests);
        // stable, so equal timestamps keep the later insert first
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(newest_first)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use guest_rsvp_model::{DayOfMonth, TimeSlot};

    use super::*;

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = MemoryGuestStore::default();
        let submission = GuestSubmission {
            name: "Jeanne".to_owned(),
            available_days: vec![DayOfMonth::new(14).unwrap()],
            available_time: vec![TimeSlot::Afternoon],
            ..GuestSubmission::default()
        };
        let stored = store.insert(submission.clone()).await.unwrap();
        assert_eq!(stored.submission(), submission);
        assert_eq!(stored.created_at, stored.updated_at);

        let listed = store.list_newest_first().await.unwrap();
        assert_eq!(listed, vec![stored]);
    }

    #[tokio::test]
    async fn ids_are_unique_and_duplicates_allowed() {
        let store = MemoryGuestStore::default();
        let submission = GuestSubmission {
            needs_accommodation: true,
            ..GuestSubmission::default()
        };
        let first = store.insert(submission.clone()).await.unwrap();
        let second = store.insert(submission).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.list_newest_first().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn newest_first() {
        let store = MemoryGuestStore::default();
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            let stored = store
                .insert(GuestSubmission {
                    name: name.to_owned(),
                    ..GuestSubmission::default()
                })
                .await
                .unwrap();
            ids.push(stored.id);
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        let listed: Vec<_> = store
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|guest| guest.id)
            .collect();
        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn same_instant_keeps_later_insert_first() {
        let store = MemoryGuestStore::default();
        let first = store.insert(GuestSubmission::default()).await.unwrap();
        let second = store.insert(GuestSubmission::default()).await.unwrap();
        let listed = store.list_newest_first().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = MemoryGuestStore::default();
        assert!(store.list_newest_first().await.unwrap().is_empty());
    }
}
