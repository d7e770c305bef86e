use crate::error::ApiError;

pub const ESTADO_PENDIENTE: &str = "pendiente";
pub const ESTADO_APROBADO: &str = "aprobado";
pub const ESTADO_DESHABILITADO: &str = "deshabilitado";

pub const MSG_PENDIENTE: &str =
    "Tu cuenta está pendiente de aprobación. Consultá con el Departamento de Alumnado o el administrador.";
pub const MSG_DESHABILITADO: &str =
    "Tu cuenta está deshabilitada. Consultá con el Departamento de Alumnado o el administrador.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoCuenta {
    Pendiente,
    Aprobado,
    Deshabilitado,
}

impl EstadoCuenta {
    pub fn parse(valor: &str) -> Option<Self> {
        match valor {
            ESTADO_PENDIENTE => Some(EstadoCuenta::Pendiente),
            ESTADO_APROBADO => Some(EstadoCuenta::Aprobado),
            ESTADO_DESHABILITADO => Some(EstadoCuenta::Deshabilitado),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoCuenta::Pendiente => ESTADO_PENDIENTE,
            EstadoCuenta::Aprobado => ESTADO_APROBADO,
            EstadoCuenta::Deshabilitado => ESTADO_DESHABILITADO,
        }
    }
}

// Puerta de ingreso sobre el estado almacenado. Se evalúa recién después de
// verificar las credenciales: los casos de usuario inexistente y contraseña
// incorrecta ya devolvieron el mismo mensaje genérico.
pub fn evaluar_ingreso(estado: &str) -> Result<(), ApiError> {
    match EstadoCuenta::parse(estado) {
        Some(EstadoCuenta::Aprobado) => Ok(()),
        Some(EstadoCuenta::Pendiente) => Err(ApiError::CuentaBloqueada(MSG_PENDIENTE.to_string())),
        Some(EstadoCuenta::Deshabilitado) => {
            Err(ApiError::CuentaBloqueada(MSG_DESHABILITADO.to_string()))
        }
        None => Err(ApiError::CuentaBloqueada(format!(
            "Cuenta en estado \"{estado}\". Consulte con el administrador."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn aprobado_permite_ingresar() {
        assert!(evaluar_ingreso(ESTADO_APROBADO).is_ok());
    }

    #[test]
    fn pendiente_y_deshabilitado_rechazan_con_403() {
        for estado in [ESTADO_PENDIENTE, ESTADO_DESHABILITADO] {
            let err = evaluar_ingreso(estado).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn los_mensajes_de_rechazo_son_distinguibles() {
        let pendiente = evaluar_ingreso(ESTADO_PENDIENTE).unwrap_err().to_string();
        let deshabilitado = evaluar_ingreso(ESTADO_DESHABILITADO)
            .unwrap_err()
            .to_string();
        assert_ne!(pendiente, deshabilitado);
        assert!(pendiente.contains("pendiente de aprobación"));
        assert!(deshabilitado.contains("deshabilitada"));
    }

    #[test]
    fn estado_desconocido_incluye_el_valor_literal() {
        let err = evaluar_ingreso("suspendido").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(err.to_string().contains("\"suspendido\""));
        assert!(err.to_string().contains("administrador"));
    }

    #[test]
    fn parse_reconoce_solo_los_tres_estados() {
        assert_eq!(
            EstadoCuenta::parse("pendiente"),
            Some(EstadoCuenta::Pendiente)
        );
        assert_eq!(EstadoCuenta::parse("aprobado"), Some(EstadoCuenta::Aprobado));
        assert_eq!(
            EstadoCuenta::parse("deshabilitado"),
            Some(EstadoCuenta::Deshabilitado)
        );
        assert_eq!(EstadoCuenta::parse("APROBADO"), None);
        assert_eq!(EstadoCuenta::parse(""), None);
    }
}
