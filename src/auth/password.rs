use rand::Rng;
use sqlx::PgPool;

use crate::error::ApiError;

// Factor de trabajo fijo para bcrypt.
pub const COSTO_BCRYPT: u32 = 10;

pub const LARGO_MINIMO_PASSWORD: usize = 8;

pub fn hash_password(plano: &str) -> Result<String, ApiError> {
    Ok(bcrypt::hash(plano, COSTO_BCRYPT)?)
}

pub fn verify_password(plano: &str, hash: &str) -> Result<bool, ApiError> {
    Ok(bcrypt::verify(plano, hash)?)
}

// Contraseña temporal con el formato "Temp" + 6 dígitos. El texto plano se
// devuelve al llamador, que debe hacérselo llegar al usuario por otra vía.
pub fn temp_password() -> String {
    let numero: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    format!("Temp{numero}")
}

pub async fn set_password(pool: &PgPool, id_usuario: i32, plano: &str) -> Result<(), ApiError> {
    let hash = hash_password(plano)?;

    let result = sqlx::query("UPDATE usuarios SET contrasena_hash = $1 WHERE id_usuario = $2")
        .bind(&hash)
        .bind(id_usuario)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NoEncontrado("Usuario no encontrado.".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_y_verify_cierran_el_ciclo() {
        let hash = hash_password("password1").unwrap();
        assert!(verify_password("password1", &hash).unwrap());
        assert!(!verify_password("password2", &hash).unwrap());
    }

    #[test]
    fn el_hash_no_contiene_el_texto_plano() {
        let hash = hash_password("MiClaveSecreta").unwrap();
        assert!(!hash.contains("MiClaveSecreta"));
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn temp_password_tiene_el_formato_esperado() {
        for _ in 0..20 {
            let pass = temp_password();
            assert_eq!(pass.len(), 10);
            assert!(pass.starts_with("Temp"));
            assert!(pass[4..].chars().all(|c| c.is_ascii_digit()));
            // El primer dígito nunca es cero: el número está en [100000, 999999].
            assert_ne!(pass.as_bytes()[4], b'0');
        }
    }
}
