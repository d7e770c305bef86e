use serde::Deserialize;
use sqlx::FromRow;

// ============================================
// DTOs para requests
// ============================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub usuario: Option<String>,
    pub password: Option<String>,
    pub dni: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "nombreCompleto")]
    pub nombre_completo: Option<String>,
    pub rol: Option<String>,
    pub curso: Option<String>,
    #[serde(rename = "estadoCuenta")]
    pub estado_cuenta: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterAlumnoRequest {
    pub usuario: Option<String>,
    pub password: Option<String>,
    pub dni: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "nombreCompleto")]
    pub nombre_completo: Option<String>,
    pub curso: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub usuario: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordSelfRequest {
    #[serde(rename = "passwordActual")]
    pub password_actual: Option<String>,
    #[serde(rename = "passwordNueva")]
    pub password_nueva: Option<String>,
}

// Proyección mínima para el login.
#[derive(Debug, FromRow)]
pub struct CredencialesRow {
    pub id_usuario: i32,
    pub contrasena_hash: String,
    pub rol: String,
    pub estado_cuenta: String,
}
