pub mod current;
pub mod semesters;
pub mod years;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::terms::requests::{CreateAcademicYearRequest, CreateSemesterRequest};
use crate::storage::Storage;

pub struct TermService {
    storage: Option<Arc<dyn Storage>>,
}

impl TermService {
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

    pub async fn list_academic_years(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        years::list_academic_years(self, request).await
    }

    pub async fn create_academic_year(
        &self,
        year_data: CreateAcademicYearRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        years::create_academic_year(self, year_data, request).await
    }

    pub async fn set_current_academic_year(
        &self,
        year_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        years::set_current_academic_year(self, year_id, request).await
    }

    pub async fn list_semesters(
        &self,
        academic_year_id: Option<i64>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        semesters::list_semesters(self, academic_year_id, request).await
    }

    pub async fn create_semester(
        &self,
        semester_data: CreateSemesterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        semesters::create_semester(self, semester_data, request).await
    }

    pub async fn set_current_semester(
        &self,
        semester_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        semesters::set_current_semester(self, semester_id, request).await
    }

    pub async fn get_current_term(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        current::get_current_term(self, request).await
    }
}
