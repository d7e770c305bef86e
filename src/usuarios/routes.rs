use crate::auth::estado::EstadoCuenta;
use crate::auth::password::{self, LARGO_MINIMO_PASSWORD};
use crate::auth::routes::campo;
use crate::catalogo::routes::resolver_curso;
use crate::error::{violacion_unica, ApiError};
use crate::models::{AppState, ROLES_PERMITIDOS, ROL_ALUMNO};
use crate::usuarios::models::*;
use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;

// Clave duplicada en `usuarios`: el mensaje depende de qué constraint
// saltó, leída de forma estructurada del driver.
pub(crate) fn clasificar_duplicado(err: sqlx::Error) -> ApiError {
    let mensaje = match violacion_unica(&err) {
        Some("uq_usuarios_usuario") => "El nombre de usuario ya está en uso.",
        Some("uq_usuarios_email") => "El email ya está en uso.",
        Some("uq_usuarios_dni") => "El DNI ya está registrado.",
        Some(_) => "Ya existe un registro con alguno de los datos únicos.",
        None => return err.into(),
    };
    ApiError::Conflicto(mensaje.to_string())
}

#[get("/api/usuarios")]
pub async fn list_usuarios(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, UsuarioConCurso>(
        "SELECT u.id_usuario, u.usuario, u.nombre_completo, u.email, u.dni, u.rol, \
                c.nombre_curso AS curso, u.estado_cuenta \
         FROM usuarios u \
         LEFT JOIN cursos c ON u.id_curso = c.id_curso \
         ORDER BY u.id_usuario ASC",
    )
    .fetch_all(&data.pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": rows })))
}

#[put("/api/usuarios/{id}")]
pub async fn update_usuario(
    path: web::Path<i32>,
    data: web::Data<AppState>,
    body: web::Json<UpdateUsuarioRequest>,
) -> Result<HttpResponse, ApiError> {
    let id_usuario = path.into_inner();
    let r = body.into_inner();

    let (nombre_completo, email, dni, rol, estado_cuenta) = match (
        campo(&r.nombre_completo),
        campo(&r.email),
        campo(&r.dni),
        campo(&r.rol),
        campo(&r.estado_cuenta),
    ) {
        (Some(n), Some(e), Some(d), Some(rl), Some(s)) => (n, e, d, rl, s),
        _ => {
            return Err(ApiError::Validacion(
                "Faltan datos obligatorios para la actualización.".to_string(),
            ))
        }
    };

    if !ROLES_PERMITIDOS.contains(&rol) {
        return Err(ApiError::Validacion(
            "Rol inválido para la actualización de usuario.".to_string(),
        ));
    }

    if EstadoCuenta::parse(estado_cuenta).is_none() {
        return Err(ApiError::Validacion(
            "Estado de cuenta inválido.".to_string(),
        ));
    }

    // Un alumno siempre queda asociado a un curso; cualquier otro rol
    // pierde la asociación.
    let id_curso = if rol == ROL_ALUMNO {
        let Some(curso) = campo(&r.curso) else {
            return Err(ApiError::Validacion(
                "Para el rol \"alumno\" el curso es obligatorio.".to_string(),
            ));
        };
        Some(resolver_curso(&data.pool, curso).await?)
    } else {
        None
    };

    let result = sqlx::query(
        "UPDATE usuarios \
         SET nombre_completo = $1, email = $2, dni = $3, rol = $4, \
             id_curso = $5, estado_cuenta = $6 \
         WHERE id_usuario = $7",
    )
    .bind(nombre_completo)
    .bind(email)
    .bind(dni)
    .bind(rol)
    .bind(id_curso)
    .bind(estado_cuenta)
    .execute(&data.pool)
    .await
    .map_err(clasificar_duplicado)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Usuario no encontrado.".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Usuario actualizado correctamente.",
    })))
}

#[delete("/api/usuarios/{id}")]
pub async fn delete_usuario(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id_usuario = path.into_inner();

    let result = sqlx::query("DELETE FROM usuarios WHERE id_usuario = $1")
        .bind(id_usuario)
        .execute(&data.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Usuario no encontrado.".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Usuario eliminado correctamente.",
    })))
}

#[put("/api/usuarios/{id}/password")]
pub async fn password_admin(
    path: web::Path<i32>,
    data: web::Data<AppState>,
    body: web::Json<PasswordAdminRequest>,
) -> Result<HttpResponse, ApiError> {
    let id_usuario = path.into_inner();

    // Pisa la contraseña sin pedir la actual: es la vía del panel admin.
    let nueva = match campo(&body.password) {
        Some(p) if p.chars().count() >= LARGO_MINIMO_PASSWORD => p,
        _ => {
            return Err(ApiError::Validacion(
                "La contraseña nueva es obligatoria y debe tener al menos 8 caracteres."
                    .to_string(),
            ))
        }
    };

    password::set_password(&data.pool, id_usuario, nueva).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Contraseña reiniciada correctamente.",
    })))
}

#[post("/api/usuarios/{id}/reset-password")]
pub async fn reset_password(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id_usuario = path.into_inner();

    let temporal = password::temp_password();
    password::set_password(&data.pool, id_usuario, &temporal).await?;

    tracing::info!(id_usuario, "contraseña reiniciada con temporal");

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": format!("Contraseña reiniciada. Nueva contraseña temporal: {temporal}"),
    })))
}

#[get("/api/alumnos")]
pub async fn list_alumnos(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, AlumnoRow>(
        "SELECT u.id_usuario, u.usuario, u.nombre_completo, u.dni, \
                c.nombre_curso AS curso, u.estado_cuenta \
         FROM usuarios u \
         LEFT JOIN cursos c ON u.id_curso = c.id_curso \
         WHERE u.rol = 'alumno' \
         ORDER BY c.nombre_curso, u.nombre_completo",
    )
    .fetch_all(&data.pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": rows })))
}

#[get("/api/alumnos/{idUsuario}")]
pub async fn get_alumno(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id_usuario = path.into_inner();

    let alumno = sqlx::query_as::<_, AlumnoRow>(
        "SELECT u.id_usuario, u.usuario, u.nombre_completo, u.dni, \
                c.nombre_curso AS curso, u.estado_cuenta \
         FROM usuarios u \
         LEFT JOIN cursos c ON u.id_curso = c.id_curso \
         WHERE u.rol = 'alumno' AND u.id_usuario = $1 \
         LIMIT 1",
    )
    .bind(id_usuario)
    .fetch_optional(&data.pool)
    .await?
    .ok_or_else(|| ApiError::NoEncontrado("Alumno no encontrado.".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": alumno })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_usuarios)
        .service(update_usuario)
        .service(delete_usuario)
        .service(password_admin)
        .service(reset_password)
        .service(list_alumnos)
        .service(get_alumno);
}
