use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

// Roles reconocidos por el sistema.
pub const ROL_ADMIN: &str = "admin";
pub const ROL_ALUMNADO: &str = "alumnado";
pub const ROL_ALUMNO: &str = "alumno";

pub const ROLES_PERMITIDOS: [&str; 3] = [ROL_ADMIN, ROL_ALUMNADO, ROL_ALUMNO];
