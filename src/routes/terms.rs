use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::terms::requests::{
    CreateAcademicYearRequest, CreateSemesterRequest, SemesterListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::TermService;
use crate::utils::SafeIDI64;

// 懒加载的全局 TermService 实例
static TERM_SERVICE: Lazy<TermService> = Lazy::new(TermService::new_lazy);

// HTTP处理程序
pub async fn list_academic_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    TERM_SERVICE.list_academic_years(&req).await
}

pub async fn create_academic_year(
    req: HttpRequest,
    year_data: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    TERM_SERVICE
        .create_academic_year(year_data.into_inner(), &req)
        .await
}

pub async fn set_current_academic_year(
    req: HttpRequest,
    year_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    TERM_SERVICE.set_current_academic_year(year_id.0, &req).await
}

pub async fn list_semesters(
    req: HttpRequest,
    query: web::Query<SemesterListParams>,
) -> ActixResult<HttpResponse> {
    TERM_SERVICE
        .list_semesters(query.into_inner().academic_year_id, &req)
        .await
}

pub async fn create_semester(
    req: HttpRequest,
    semester_data: web::Json<CreateSemesterRequest>,
) -> ActixResult<HttpResponse> {
    TERM_SERVICE
        .create_semester(semester_data.into_inner(), &req)
        .await
}

pub async fn set_current_semester(
    req: HttpRequest,
    semester_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    TERM_SERVICE.set_current_semester(semester_id.0, &req).await
}

pub async fn get_current_term(req: HttpRequest) -> ActixResult<HttpResponse> {
    TERM_SERVICE.get_current_term(&req).await
}

// 配置路由
pub fn configure_term_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/terms")
            .wrap(middlewares::RequireJWT)
            .route("/current", web::get().to(get_current_term))
            .service(
                web::resource("/years")
                    .route(web::get().to(list_academic_years))
                    .route(
                        web::post()
                            .to(create_academic_year)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                // 切换当前学年，事务内清掉其他学年的标志
                web::resource("/years/{id}/current").route(
                    web::put()
                        .to(set_current_academic_year)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/semesters")
                    .route(web::get().to(list_semesters))
                    .route(
                        web::post()
                            .to(create_semester)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/semesters/{id}/current").route(
                    web::put()
                        .to(set_current_semester)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
