use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Proyección para el panel de administración: usuario + nombre del curso.
#[derive(Serialize, FromRow)]
pub struct UsuarioConCurso {
    pub id_usuario: i32,
    pub usuario: String,
    pub nombre_completo: String,
    pub email: String,
    pub dni: String,
    pub rol: String,
    pub curso: Option<String>,
    pub estado_cuenta: String,
}

// Proyección reducida para el Departamento de Alumnado y el panel del alumno.
#[derive(Serialize, FromRow)]
pub struct AlumnoRow {
    pub id_usuario: i32,
    pub usuario: String,
    pub nombre_completo: String,
    pub dni: String,
    pub curso: Option<String>,
    pub estado_cuenta: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUsuarioRequest {
    #[serde(rename = "nombreCompleto")]
    pub nombre_completo: Option<String>,
    pub email: Option<String>,
    pub dni: Option<String>,
    pub rol: Option<String>,
    pub curso: Option<String>,
    #[serde(rename = "estadoCuenta")]
    pub estado_cuenta: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordAdminRequest {
    pub password: Option<String>,
}
