pub mod auth;

pub mod users;

pub mod departments;

pub mod terms;

pub mod courses;

pub mod offerings;

pub mod enrollments;

pub mod students;

pub mod teachers;

pub mod assignments;

pub mod attendance;

pub mod dashboard;

pub use assignments::configure_assignment_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use dashboard::configure_dashboard_routes;
pub use departments::configure_department_routes;
pub use enrollments::configure_enrollment_routes;
pub use offerings::configure_offering_routes;
pub use students::configure_student_routes;
pub use teachers::configure_teacher_routes;
pub use terms::configure_term_routes;
pub use users::configure_user_routes;
