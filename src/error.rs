use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validacion(String),

    #[error("Usuario o contraseña incorrectos.")]
    Credenciales,

    // Cuenta existente con credenciales válidas pero bloqueada por estado.
    #[error("{0}")]
    CuentaBloqueada(String),

    #[error("{0}")]
    NoEncontrado(String),

    #[error("{0}")]
    Conflicto(String),

    #[error("Error interno del servidor.")]
    BaseDeDatos(#[from] sqlx::Error),

    #[error("Error interno del servidor.")]
    Hash(#[from] bcrypt::BcryptError),

    // Operación abortada por el límite de tiempo del request.
    #[error("Error interno del servidor.")]
    TiempoAgotado,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validacion(_) | ApiError::Credenciales => StatusCode::BAD_REQUEST,
            ApiError::CuentaBloqueada(_) => StatusCode::FORBIDDEN,
            ApiError::NoEncontrado(_) => StatusCode::NOT_FOUND,
            ApiError::Conflicto(_) => StatusCode::CONFLICT,
            ApiError::BaseDeDatos(_) | ApiError::Hash(_) | ApiError::TiempoAgotado => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::BaseDeDatos(err) => tracing::error!("error de base de datos: {err:?}"),
            ApiError::Hash(err) => tracing::error!("error de hash de contraseña: {err:?}"),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(json!({
            "ok": false,
            "message": self.to_string(),
        }))
    }
}

// Nombre de la constraint UNIQUE violada (código 23505), si corresponde.
pub fn violacion_unica(err: &sqlx::Error) -> Option<&str> {
    violacion_con_codigo(err, "23505")
}

// Nombre de la constraint FOREIGN KEY violada (código 23503), si corresponde.
pub fn violacion_fk(err: &sqlx::Error) -> Option<&str> {
    violacion_con_codigo(err, "23503")
}

fn violacion_con_codigo<'a>(err: &'a sqlx::Error, codigo: &str) -> Option<&'a str> {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(codigo) => db.constraint(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codigos_de_estado_por_variante() {
        assert_eq!(
            ApiError::Validacion("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Credenciales.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::CuentaBloqueada("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NoEncontrado("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflicto("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::BaseDeDatos(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn el_error_interno_no_filtra_detalles() {
        let err = ApiError::BaseDeDatos(sqlx::Error::PoolClosed);
        assert_eq!(err.to_string(), "Error interno del servidor.");
    }

    #[test]
    fn errores_no_database_no_clasifican() {
        assert!(violacion_unica(&sqlx::Error::PoolClosed).is_none());
        assert!(violacion_fk(&sqlx::Error::RowNotFound).is_none());
    }
}
