use crate::auth::estado::{self, EstadoCuenta};
use crate::auth::models::*;
use crate::auth::password::{self, LARGO_MINIMO_PASSWORD};
use crate::catalogo::routes::resolver_curso;
use crate::error::ApiError;
use crate::models::{AppState, ROLES_PERMITIDOS, ROL_ALUMNO};
use crate::usuarios::routes::clasificar_duplicado;
use actix_web::{post, put, web, HttpResponse};
use serde_json::json;

// Campo obligatorio del body: presente y no vacío.
pub(crate) fn campo(valor: &Option<String>) -> Option<&str> {
    match valor.as_deref() {
        Some(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}

#[post("/api/register")]
pub async fn register(
    data: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let r = body.into_inner();

    let (usuario, password, dni, email, nombre_completo, rol) = match (
        campo(&r.usuario),
        campo(&r.password),
        campo(&r.dni),
        campo(&r.email),
        campo(&r.nombre_completo),
        campo(&r.rol),
    ) {
        (Some(u), Some(p), Some(d), Some(e), Some(n), Some(rl)) => (u, p, d, e, n, rl),
        _ => {
            return Err(ApiError::Validacion(
                "Faltan datos obligatorios (usuario, contraseña, DNI, email, nombre completo y rol)."
                    .to_string(),
            ))
        }
    };

    if password.chars().count() < LARGO_MINIMO_PASSWORD {
        return Err(ApiError::Validacion(
            "La contraseña debe tener al menos 8 caracteres.".to_string(),
        ));
    }

    if !ROLES_PERMITIDOS.contains(&rol) {
        return Err(ApiError::Validacion(
            "Rol inválido para creación de usuario desde administración.".to_string(),
        ));
    }

    // Resolver curso -> id_curso (solo obligatorio para alumnos)
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

    // Desde administración la cuenta nace aprobada, salvo que el caller
    // mande un estado reconocido.
    let estado_final = r
        .estado_cuenta
        .as_deref()
        .and_then(EstadoCuenta::parse)
        .unwrap_or(EstadoCuenta::Aprobado);

    let hash = password::hash_password(password)?;

    if let Err(err) = sqlx::query(
        "INSERT INTO usuarios \
           (usuario, contrasena_hash, nombre_completo, email, dni, rol, id_curso, estado_cuenta) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(usuario)
    .bind(&hash)
    .bind(nombre_completo)
    .bind(email)
    .bind(dni)
    .bind(rol)
    .bind(id_curso)
    .bind(estado_final.as_str())
    .execute(&data.pool)
    .await
    {
        return Err(clasificar_duplicado(err));
    }

    tracing::info!(usuario, rol, "usuario creado desde administración");

    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "message": "Usuario creado correctamente desde administración.",
    })))
}

#[post("/api/register-alumno")]
pub async fn register_alumno(
    data: web::Data<AppState>,
    body: web::Json<RegisterAlumnoRequest>,
) -> Result<HttpResponse, ApiError> {
    let r = body.into_inner();

    let (usuario, password, dni, email, nombre_completo, curso) = match (
        campo(&r.usuario),
        campo(&r.password),
        campo(&r.dni),
        campo(&r.email),
        campo(&r.nombre_completo),
        campo(&r.curso),
    ) {
        (Some(u), Some(p), Some(d), Some(e), Some(n), Some(c)) => (u, p, d, e, n, c),
        _ => {
            return Err(ApiError::Validacion(
                "Faltan datos obligatorios.".to_string(),
            ))
        }
    };

    if password.chars().count() < LARGO_MINIMO_PASSWORD {
        return Err(ApiError::Validacion(
            "La contraseña debe tener al menos 8 caracteres.".to_string(),
        ));
    }

    let id_curso = resolver_curso(&data.pool, curso).await?;

    let hash = password::hash_password(password)?;

    // El autoregistro siempre crea un alumno pendiente de aprobación.
    if let Err(err) = sqlx::query(
        "INSERT INTO usuarios \
           (usuario, contrasena_hash, nombre_completo, email, dni, rol, id_curso, estado_cuenta) \
         VALUES ($1, $2, $3, $4, $5, 'alumno', $6, 'pendiente')",
    )
    .bind(usuario)
    .bind(&hash)
    .bind(nombre_completo)
    .bind(email)
    .bind(dni)
    .bind(id_curso)
    .execute(&data.pool)
    .await
    {
        return Err(clasificar_duplicado(err));
    }

    tracing::info!(usuario, "alumno registrado, pendiente de aprobación");

    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "message": "Usuario registrado correctamente. Pendiente de aprobación.",
    })))
}

#[post("/api/login")]
pub async fn login(
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let r = body.into_inner();

    let (Some(usuario), Some(password)) = (campo(&r.usuario), campo(&r.password)) else {
        return Err(ApiError::Validacion(
            "Usuario y contraseña son obligatorios.".to_string(),
        ));
    };

    let fila = sqlx::query_as::<_, CredencialesRow>(
        "SELECT id_usuario, contrasena_hash, rol, estado_cuenta \
         FROM usuarios WHERE usuario = $1 LIMIT 1",
    )
    .bind(usuario)
    .fetch_optional(&data.pool)
    .await?;

    // Usuario inexistente y contraseña incorrecta responden exactamente lo
    // mismo: no se revela si la cuenta existe.
    let Some(cred) = fila else {
        return Err(ApiError::Credenciales);
    };

    if !password::verify_password(password, &cred.contrasena_hash)? {
        return Err(ApiError::Credenciales);
    }

    estado::evaluar_ingreso(&cred.estado_cuenta)?;

    tracing::info!(id_usuario = cred.id_usuario, rol = %cred.rol, "login correcto");

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Login correcto.",
        "idUsuario": cred.id_usuario,
        "rol": cred.rol,
    })))
}

#[put("/api/usuarios/{id}/password-self")]
pub async fn password_self(
    path: web::Path<i32>,
    data: web::Data<AppState>,
    body: web::Json<PasswordSelfRequest>,
) -> Result<HttpResponse, ApiError> {
    let id_usuario = path.into_inner();
    let r = body.into_inner();

    let (Some(actual), Some(nueva)) = (campo(&r.password_actual), campo(&r.password_nueva)) else {
        return Err(ApiError::Validacion(
            "Debés completar la contraseña actual y la nueva contraseña.".to_string(),
        ));
    };

    if nueva.chars().count() < LARGO_MINIMO_PASSWORD {
        return Err(ApiError::Validacion(
            "La nueva contraseña debe tener al menos 8 caracteres.".to_string(),
        ));
    }

    let hash_actual = sqlx::query_scalar::<_, String>(
        "SELECT contrasena_hash FROM usuarios WHERE id_usuario = $1 LIMIT 1",
    )
    .bind(id_usuario)
    .fetch_optional(&data.pool)
    .await?
    .ok_or_else(|| ApiError::NoEncontrado("Usuario no encontrado.".to_string()))?;

    // Verificar contraseña actual antes de pisar la almacenada.
    if !password::verify_password(actual, &hash_actual)? {
        return Err(ApiError::Validacion(
            "La contraseña actual no es correcta.".to_string(),
        ));
    }

    password::set_password(&data.pool, id_usuario, nueva).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Contraseña actualizada correctamente.",
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(register_alumno)
        .service(login)
        .service(password_self);
}
