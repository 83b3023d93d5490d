use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::offerings::requests::{
    CreateOfferingRequest, OfferingListParams, UpdateOfferingRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::OfferingService;
use crate::utils::SafeIDI64;

// 懒加载的全局 OfferingService 实例
static OFFERING_SERVICE: Lazy<OfferingService> = Lazy::new(OfferingService::new_lazy);

// HTTP处理程序
pub async fn list_offerings(
    req: HttpRequest,
    query: web::Query<OfferingListParams>,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE
        .list_offerings(query.into_inner(), &req)
        .await
}

pub async fn create_offering(
    req: HttpRequest,
    offering_data: web::Json<CreateOfferingRequest>,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE
        .create_offering(offering_data.into_inner(), &req)
        .await
}

pub async fn get_offering(req: HttpRequest, offering_id: SafeIDI64) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE.get_offering(offering_id.0, &req).await
}

pub async fn update_offering(
    req: HttpRequest,
    offering_id: SafeIDI64,
    update_data: web::Json<UpdateOfferingRequest>,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE
        .update_offering(offering_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_offering(
    req: HttpRequest,
    offering_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE.delete_offering(offering_id.0, &req).await
}

// 配置路由
pub fn configure_offering_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/offerings")
            .wrap(middlewares::RequireJWT)
            .service(
                // 选课页对所有登录用户开放，开课管理是管理员操作
                web::resource("")
                    .route(web::get().to(list_offerings))
                    .route(
                        web::post()
                            .to(create_offering)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_offering))
                    .route(
                        web::put()
                            .to(update_offering)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_offering)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
