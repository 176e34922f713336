//! Shared fixtures for unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use common::{
    Resident, ResidentStore, ResidentSummary, Role,
    error::DatabaseResult,
};
use uuid::Uuid;

use crate::jwt::{JwtConfig, JwtService};

pub const TEST_PRIVATE_KEY: &str = include_str!("../../../fixtures/jwt/test_rsa_private.pem");
pub const TEST_PUBLIC_KEY: &str = include_str!("../../../fixtures/jwt/test_rsa_public.pem");
pub const OTHER_PRIVATE_KEY: &str = include_str!("../../../fixtures/jwt/other_rsa_private.pem");

pub fn test_jwt_service() -> JwtService {
    JwtService::new(JwtConfig {
        private_key: TEST_PRIVATE_KEY.to_string(),
        public_key: TEST_PUBLIC_KEY.to_string(),
        access_token_expiry: 3_600,
    })
    .unwrap()
}

pub fn resident(full_name: &str, email: &str, password: &str, role: Role) -> Resident {
    Resident {
        id: Uuid::new_v4(),
        full_name: full_name.to_string(),
        phone: "0912345678".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
        apartment_id: Some("A101".to_string()),
        id_number: "001090000001".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        temporary_status: false,
    }
}

/// Resident store kept in memory
#[derive(Clone, Default)]
pub struct MemoryResidents {
    inner: Arc<Mutex<HashMap<Uuid, Resident>>>,
}

impl MemoryResidents {
    pub fn with(residents: impl IntoIterator<Item = Resident>) -> Self {
        let store = Self::default();
        store
            .inner
            .lock()
            .unwrap()
            .extend(residents.into_iter().map(|r| (r.id, r)));
        store
    }

    pub fn get(&self, id: Uuid) -> Option<Resident> {
        self.inner.lock().unwrap().get(&id).cloned()
    }
}

impl ResidentStore for MemoryResidents {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Resident>> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Resident>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values()
            .find(|r| r.email == email)
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> DatabaseResult<Vec<ResidentSummary>> {
        let mut found: Vec<ResidentSummary> = self
            .inner
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.role == role)
            .map(Resident::summary)
            .collect();
        found.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(found)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> DatabaseResult<bool> {
        match self.inner.lock().unwrap().get_mut(&id) {
            Some(resident) => {
                resident.password = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
