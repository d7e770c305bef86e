use crate::boletines::models::*;
use crate::error::{violacion_fk, ApiError};
use crate::models::AppState;
use actix_web::{get, put, web, HttpResponse};
use chrono::{Datelike, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::time::Duration;

// Límite por request para el guardado completo: si expira a mitad de la
// transacción, la conexión se descarta y el servidor revierte lo pendiente.
const TIMEOUT_GUARDADO: Duration = Duration::from_secs(30);

const SQL_UPSERT_BOLETIN: &str = "\
    INSERT INTO boletines ( \
        id_usuario, id_materia, anio_lectivo, \
        p1_1c, p2_1c, nf_1c, p1_2c, p2_2c, nf_2c, \
        nota_anual, diciembre_acreditacion, feb_mar_recuperatorio, nota_definitiva \
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
    ON CONFLICT (id_usuario, id_materia, anio_lectivo) DO UPDATE SET \
        p1_1c = EXCLUDED.p1_1c, \
        p2_1c = EXCLUDED.p2_1c, \
        nf_1c = EXCLUDED.nf_1c, \
        p1_2c = EXCLUDED.p1_2c, \
        p2_2c = EXCLUDED.p2_2c, \
        nf_2c = EXCLUDED.nf_2c, \
        nota_anual = EXCLUDED.nota_anual, \
        diciembre_acreditacion = EXCLUDED.diciembre_acreditacion, \
        feb_mar_recuperatorio = EXCLUDED.feb_mar_recuperatorio, \
        nota_definitiva = EXCLUDED.nota_definitiva";

fn clasificar_guardado(err: sqlx::Error) -> ApiError {
    match violacion_fk(&err) {
        Some("fk_boletines_materia") => ApiError::Conflicto(
            "No se puede guardar el boletín: alguna de las materias no existe.".to_string(),
        ),
        Some("fk_boletines_usuario") => ApiError::Conflicto(
            "No se puede guardar el boletín: el alumno no existe.".to_string(),
        ),
        _ => err.into(),
    }
}

// Guarda el boletín completo de un año en una única transacción: un upsert
// por materia, clave (id_usuario, id_materia, anio_lectivo). Cualquier fallo
// revierte el lote entero y deja el estado previo intacto.
pub async fn guardar_boletin(
    pool: &PgPool,
    id_usuario: i32,
    anio: i32,
    materias: &[MateriaNotas],
) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    for materia in materias {
        if let Err(err) = sqlx::query(SQL_UPSERT_BOLETIN)
            .bind(id_usuario)
            .bind(materia.id_materia)
            .bind(anio)
            .bind(materia.p1_1c)
            .bind(materia.p2_1c)
            .bind(materia.nf_1c)
            .bind(materia.p1_2c)
            .bind(materia.p2_2c)
            .bind(materia.nf_2c)
            .bind(materia.nota_anual)
            .bind(materia.diciembre_acreditacion)
            .bind(materia.feb_mar_recuperatorio)
            .bind(materia.nota_definitiva)
            .execute(&mut *tx)
            .await
        {
            let _ = tx.rollback().await;
            return Err(clasificar_guardado(err));
        }
    }

    tx.commit().await?;
    Ok(())
}

#[get("/api/boletines/{idUsuario}")]
pub async fn get_boletin(
    path: web::Path<i32>,
    query: web::Query<AnioQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id_usuario = path.into_inner();
    let anio = query.anio.unwrap_or_else(|| Utc::now().year());

    let rows = sqlx::query_as::<_, BoletinRow>(
        "SELECT b.id_boletin, b.id_materia, m.nombre_materia, b.anio_lectivo, \
                b.p1_1c, b.p2_1c, b.nf_1c, b.p1_2c, b.p2_2c, b.nf_2c, \
                b.nota_anual, b.diciembre_acreditacion, b.feb_mar_recuperatorio, \
                b.nota_definitiva \
         FROM boletines b \
         INNER JOIN materias m ON b.id_materia = m.id_materia \
         WHERE b.id_usuario = $1 AND b.anio_lectivo = $2 \
         ORDER BY m.nombre_materia",
    )
    .bind(id_usuario)
    .bind(anio)
    .fetch_all(&data.pool)
    .await?;

    // Un alumno sin notas cargadas para el año devuelve la lista vacía.
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "anio": anio,
        "data": rows,
    })))
}

#[put("/api/boletines/{idUsuario}")]
pub async fn save_boletin(
    path: web::Path<i32>,
    data: web::Data<AppState>,
    body: web::Json<BoletinUpsert>,
) -> Result<HttpResponse, ApiError> {
    let id_usuario = path.into_inner();
    let r = body.into_inner();

    let anio = match r.anio {
        Some(anio) if anio != 0 => anio,
        _ => {
            return Err(ApiError::Validacion(
                "Se requiere el año lectivo y al menos una materia.".to_string(),
            ))
        }
    };

    if r.materias.is_empty() {
        return Err(ApiError::Validacion(
            "Se requiere el año lectivo y al menos una materia.".to_string(),
        ));
    }

    validar_notas(&r.materias)?;

    match tokio::time::timeout(
        TIMEOUT_GUARDADO,
        guardar_boletin(&data.pool, id_usuario, anio, &r.materias),
    )
    .await
    {
        Ok(resultado) => resultado?,
        Err(_) => {
            tracing::error!(id_usuario, anio, "timeout guardando el boletín");
            return Err(ApiError::TiempoAgotado);
        }
    }

    tracing::info!(
        id_usuario,
        anio,
        materias = r.materias.len(),
        "boletín guardado"
    );

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Boletín guardado/actualizado correctamente.",
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(get_boletin).service(save_boletin);
}
