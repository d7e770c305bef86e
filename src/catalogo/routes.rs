use crate::catalogo::models::*;
use crate::error::{violacion_fk, violacion_unica, ApiError};
use crate::models::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

// Traducción de un nombre de curso al id que referencia `usuarios.id_curso`.
// Usada también por el registro de usuarios.
pub(crate) async fn resolver_curso(pool: &PgPool, nombre: &str) -> Result<i32, ApiError> {
    sqlx::query_scalar::<_, i32>("SELECT id_curso FROM cursos WHERE nombre_curso = $1")
        .bind(nombre)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            ApiError::Validacion(format!(
                "El curso \"{nombre}\" no existe en la tabla cursos."
            ))
        })
}

fn conflicto_unico(err: sqlx::Error, constraint: &str, mensaje: &str) -> ApiError {
    if violacion_unica(&err) == Some(constraint) {
        return ApiError::Conflicto(mensaje.to_string());
    }
    err.into()
}

fn conflicto_referencial(err: sqlx::Error, constraint: &str, mensaje: &str) -> ApiError {
    if violacion_fk(&err) == Some(constraint) {
        return ApiError::Conflicto(mensaje.to_string());
    }
    err.into()
}

// ============================================
// CURSOS
// ============================================

#[get("/api/cursos")]
pub async fn list_cursos(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, Curso>(
        "SELECT id_curso, nombre_curso FROM cursos ORDER BY nombre_curso ASC",
    )
    .fetch_all(&data.pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": rows })))
}

#[post("/api/cursos")]
pub async fn create_curso(
    data: web::Data<AppState>,
    body: web::Json<CursoIn>,
) -> Result<HttpResponse, ApiError> {
    let Some(nombre) = nombre_recortado(body.nombre_curso.as_deref()) else {
        return Err(ApiError::Validacion(
            "El nombre de curso es obligatorio.".to_string(),
        ));
    };

    let id_curso = sqlx::query_scalar::<_, i32>(
        "INSERT INTO cursos (nombre_curso) VALUES ($1) RETURNING id_curso",
    )
    .bind(&nombre)
    .fetch_one(&data.pool)
    .await
    .map_err(|err| {
        conflicto_unico(err, "uq_cursos_nombre", "Ya existe un curso con ese nombre.")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "message": "Curso creado correctamente.",
        "id_curso": id_curso,
    })))
}

#[put("/api/cursos/{id}")]
pub async fn update_curso(
    path: web::Path<i32>,
    data: web::Data<AppState>,
    body: web::Json<CursoIn>,
) -> Result<HttpResponse, ApiError> {
    let id_curso = path.into_inner();

    let Some(nombre) = nombre_recortado(body.nombre_curso.as_deref()) else {
        return Err(ApiError::Validacion(
            "El nombre de curso es obligatorio.".to_string(),
        ));
    };

    let result = sqlx::query("UPDATE cursos SET nombre_curso = $1 WHERE id_curso = $2")
        .bind(&nombre)
        .bind(id_curso)
        .execute(&data.pool)
        .await
        .map_err(|err| {
            conflicto_unico(err, "uq_cursos_nombre", "Ya existe otro curso con ese nombre.")
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Curso no encontrado.".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Curso actualizado correctamente.",
    })))
}

#[delete("/api/cursos/{id}")]
pub async fn delete_curso(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id_curso = path.into_inner();

    let result = sqlx::query("DELETE FROM cursos WHERE id_curso = $1")
        .bind(id_curso)
        .execute(&data.pool)
        .await
        .map_err(|err| {
            conflicto_referencial(
                err,
                "fk_usuarios_curso",
                "No se puede eliminar el curso porque hay alumnos asociados.",
            )
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Curso no encontrado.".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Curso eliminado correctamente.",
    })))
}

// ============================================
// MATERIAS
// ============================================

#[get("/api/materias")]
pub async fn list_materias(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, Materia>(
        "SELECT id_materia, nombre_materia FROM materias ORDER BY nombre_materia ASC",
    )
    .fetch_all(&data.pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true, "data": rows })))
}

#[post("/api/materias")]
pub async fn create_materia(
    data: web::Data<AppState>,
    body: web::Json<MateriaIn>,
) -> Result<HttpResponse, ApiError> {
    let Some(nombre) = nombre_recortado(body.nombre_materia.as_deref()) else {
        return Err(ApiError::Validacion(
            "El nombre de la materia es obligatorio.".to_string(),
        ));
    };

    let id_materia = sqlx::query_scalar::<_, i32>(
        "INSERT INTO materias (nombre_materia) VALUES ($1) RETURNING id_materia",
    )
    .bind(&nombre)
    .fetch_one(&data.pool)
    .await
    .map_err(|err| {
        conflicto_unico(
            err,
            "uq_materias_nombre",
            "Ya existe una materia con ese nombre.",
        )
    })?;

    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "message": "Materia creada correctamente.",
        "id_materia": id_materia,
    })))
}

#[put("/api/materias/{id}")]
pub async fn update_materia(
    path: web::Path<i32>,
    data: web::Data<AppState>,
    body: web::Json<MateriaIn>,
) -> Result<HttpResponse, ApiError> {
    let id_materia = path.into_inner();

    let Some(nombre) = nombre_recortado(body.nombre_materia.as_deref()) else {
        return Err(ApiError::Validacion(
            "El nombre de la materia es obligatorio.".to_string(),
        ));
    };

    let result = sqlx::query("UPDATE materias SET nombre_materia = $1 WHERE id_materia = $2")
        .bind(&nombre)
        .bind(id_materia)
        .execute(&data.pool)
        .await
        .map_err(|err| {
            conflicto_unico(
                err,
                "uq_materias_nombre",
                "Ya existe otra materia con ese nombre.",
            )
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Materia no encontrada.".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Materia actualizada correctamente.",
    })))
}

#[delete("/api/materias/{id}")]
pub async fn delete_materia(
    path: web::Path<i32>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id_materia = path.into_inner();

    // A diferencia de los cursos, acá no hay chequeo previo de referencias:
    // si algún boletín apunta a la materia, la FK de la base lo bloquea.
    let result = sqlx::query("DELETE FROM materias WHERE id_materia = $1")
        .bind(id_materia)
        .execute(&data.pool)
        .await
        .map_err(|err| {
            conflicto_referencial(
                err,
                "fk_boletines_materia",
                "No se puede eliminar la materia porque hay boletines asociados.",
            )
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Materia no encontrada.".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Materia eliminada correctamente.",
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_cursos)
        .service(create_curso)
        .service(update_curso)
        .service(delete_curso)
        .service(list_materias)
        .service(create_materia)
        .service(update_materia)
        .service(delete_materia);
}
