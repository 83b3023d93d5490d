pub mod grades;
pub mod my_enrollments;
pub mod register;
pub mod roster;
pub mod withdraw;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::requests::{RegisterRequest, UpdateGradesRequest};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn register(
        &self,
        offering_id: i64,
        register_data: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::register(self, offering_id, register_data, request).await
    }

    pub async fn withdraw(
        &self,
        offering_id: i64,
        withdraw_data: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        withdraw::withdraw(self, offering_id, withdraw_data, request).await
    }

    pub async fn get_roster(
        &self,
        offering_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        roster::get_roster(self, offering_id, request).await
    }

    pub async fn update_grades(
        &self,
        offering_id: i64,
        update_data: UpdateGradesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grades::update_grades(self, offering_id, update_data, request).await
    }

    pub async fn my_enrollments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        my_enrollments::my_enrollments(self, request).await
    }
}
