use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{RegisterRequest, UpdateGradesRequest};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EnrollmentService 实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

// HTTP处理程序
// 学生自选时请求体可以为空，管理员代选时带 student_id
pub async fn register(
    req: HttpRequest,
    offering_id: SafeIDI64,
    register_data: Option<web::Json<RegisterRequest>>,
) -> ActixResult<HttpResponse> {
    let register_data = register_data
        .map(|data| data.into_inner())
        .unwrap_or(RegisterRequest { student_id: None });
    ENROLLMENT_SERVICE
        .register(offering_id.0, register_data, &req)
        .await
}

pub async fn withdraw(
    req: HttpRequest,
    offering_id: SafeIDI64,
    withdraw_data: Option<web::Json<RegisterRequest>>,
) -> ActixResult<HttpResponse> {
    let withdraw_data = withdraw_data
        .map(|data| data.into_inner())
        .unwrap_or(RegisterRequest { student_id: None });
    ENROLLMENT_SERVICE
        .withdraw(offering_id.0, withdraw_data, &req)
        .await
}

pub async fn get_roster(req: HttpRequest, offering_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_roster(offering_id.0, &req).await
}

pub async fn update_grades(
    req: HttpRequest,
    offering_id: SafeIDI64,
    update_data: web::Json<UpdateGradesRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_grades(offering_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn my_enrollments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.my_enrollments(&req).await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                // 开放选课时的突发流量由限流中间件兜着
                web::resource("/offerings/{id}/register").route(
                    web::post()
                        .to(register)
                        .wrap(middlewares::RateLimit::enrollment()),
                ),
            )
            .route("/offerings/{id}/withdraw", web::post().to(withdraw))
            .service(
                web::resource("/offerings/{id}/roster").route(
                    web::get()
                        .to(get_roster)
                        // 教师看自己开课的花名册，管理员看全部
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/offerings/{id}/grades").route(
                    web::put()
                        .to(update_grades)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/my").route(
                    web::get()
                        .to(my_enrollments)
                        // 学生查询自己的课表
                        .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                ),
            ),
    );
}
