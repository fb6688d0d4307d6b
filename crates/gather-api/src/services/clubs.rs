// Club service
//
// Club creation enrolls the creator as the first member and promotes a plain
// user to club_manager; admins and existing managers keep their role.

use std::sync::Arc;

use gather_core::{Club, Result, UserRole};
use gather_storage::{ClubFilter, CreateClub, StorageBackend};
use uuid::Uuid;

pub struct ClubService {
    storage: Arc<StorageBackend>,
}

impl ClubService {
    pub fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    /// Create a club on behalf of its manager.
    pub async fn create(&self, input: CreateClub, creator_role: UserRole) -> Result<Club> {
        let manager_id = input.manager_id;
        let row = self.storage.create_club(input).await?;
        let club = Club::from(row);

        // The creator becomes the first member; the club was just created so
        // neither NotFound nor AlreadyMember can fire here.
        self.storage.join_club(manager_id, club.id).await?;

        if creator_role == UserRole::User {
            self.storage
                .set_user_role(manager_id, UserRole::ClubManager)
                .await?;
            tracing::info!(user_id = %manager_id, club_id = %club.id, "promoted user to club_manager");
        }

        Ok(club)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Club>> {
        Ok(self.storage.get_club(id).await?.map(Club::from))
    }

    /// Clubs, newest first, each with its member count.
    pub async fn list_with_member_counts(&self, filter: ClubFilter) -> Result<Vec<(Club, i64)>> {
        let rows = self.storage.list_clubs(filter).await?;
        self.with_member_counts(rows).await
    }

    /// Clubs the user belongs to, most recently joined first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<(Club, i64)>> {
        let rows = self.storage.list_clubs_for_user(user_id).await?;
        self.with_member_counts(rows).await
    }

    pub async fn member_count(&self, club_id: Uuid) -> Result<i64> {
        self.storage.count_members_for_club(club_id).await
    }

    /// Whether the user holds a membership in the club.
    pub async fn is_member(&self, user_id: Uuid, club_id: Uuid) -> Result<bool> {
        Ok(self
            .storage
            .get_membership(user_id, club_id)
            .await?
            .is_some())
    }

    async fn with_member_counts(
        &self,
        rows: Vec<gather_storage::ClubRow>,
    ) -> Result<Vec<(Club, i64)>> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let club = Club::from(row);
            let members = self.member_count(club.id).await?;
            out.push((club, members));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gather_storage::CreateUser;

    fn service() -> (ClubService, Arc<StorageBackend>) {
        let storage = Arc::new(StorageBackend::in_memory());
        (ClubService::new(storage.clone()), storage)
    }

    async fn seed_user(storage: &StorageBackend, email: &str, role: UserRole) -> Uuid {
        storage
            .create_user(CreateUser {
                email: email.to_string(),
                password_hash: "x".to_string(),
                first_name: "Club".to_string(),
                last_name: "Founder".to_string(),
                role,
                bio: None,
                city: None,
                interests: Vec::new(),
            })
            .await
            .unwrap()
            .id
    }

    fn club_input(manager_id: Uuid) -> CreateClub {
        CreateClub {
            name: "River cleanup crew".to_string(),
            description: "Weekly cleanups along the riverbank and canals".to_string(),
            city: "Utrecht".to_string(),
            category: "sustainable".to_string(),
            manager_id,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn creator_is_enrolled_and_promoted() {
        let (service, storage) = service();
        let user = seed_user(&storage, "founder@example.com", UserRole::User).await;

        let club = service
            .create(club_input(user), UserRole::User)
            .await
            .unwrap();

        assert!(service.is_member(user, club.id).await.unwrap());
        assert_eq!(service.member_count(club.id).await.unwrap(), 1);

        let row = storage.get_user(user).await.unwrap().unwrap();
        assert_eq!(UserRole::from(row.role.as_str()), UserRole::ClubManager);
    }

    #[tokio::test]
    async fn admin_keeps_role_on_create() {
        let (service, storage) = service();
        let admin = seed_user(&storage, "admin@example.com", UserRole::Admin).await;

        service
            .create(club_input(admin), UserRole::Admin)
            .await
            .unwrap();

        let row = storage.get_user(admin).await.unwrap().unwrap();
        assert_eq!(UserRole::from(row.role.as_str()), UserRole::Admin);
    }

    #[tokio::test]
    async fn member_counts_follow_joins() {
        let (service, storage) = service();
        let founder = seed_user(&storage, "f@example.com", UserRole::User).await;
        let joiner = seed_user(&storage, "j@example.com", UserRole::User).await;

        let club = service
            .create(club_input(founder), UserRole::User)
            .await
            .unwrap();
        storage.join_club(joiner, club.id).await.unwrap();

        let listed = service
            .list_with_member_counts(ClubFilter::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1, 2);

        let joined = service.list_for_user(joiner).await.unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].0.id, club.id);
    }
}
