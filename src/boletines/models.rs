use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;

pub const NOTA_MINIMA: i32 = 1;
pub const NOTA_MAXIMA: i32 = 10;

// Una fila del boletín de un alumno, ya unida con el nombre de la materia.
#[derive(Debug, Serialize, FromRow)]
pub struct BoletinRow {
    pub id_boletin: i32,
    pub id_materia: i32,
    pub nombre_materia: String,
    pub anio_lectivo: i32,
    pub p1_1c: Option<i32>,
    pub p2_1c: Option<i32>,
    pub nf_1c: Option<i32>,
    pub p1_2c: Option<i32>,
    pub p2_2c: Option<i32>,
    pub nf_2c: Option<i32>,
    pub nota_anual: Option<i32>,
    pub diciembre_acreditacion: Option<i32>,
    pub feb_mar_recuperatorio: Option<i32>,
    pub nota_definitiva: Option<i32>,
}

// Notas de una materia dentro del PUT del boletín. Un campo ausente o null
// significa "sin calificar" y pisa lo que hubiera.
#[derive(Debug, Deserialize)]
pub struct MateriaNotas {
    pub id_materia: i32,
    pub p1_1c: Option<i32>,
    pub p2_1c: Option<i32>,
    pub nf_1c: Option<i32>,
    pub p1_2c: Option<i32>,
    pub p2_2c: Option<i32>,
    pub nf_2c: Option<i32>,
    pub nota_anual: Option<i32>,
    pub diciembre_acreditacion: Option<i32>,
    pub feb_mar_recuperatorio: Option<i32>,
    pub nota_definitiva: Option<i32>,
}

impl MateriaNotas {
    pub fn campos(&self) -> [(&'static str, Option<i32>); 10] {
        [
            ("p1_1c", self.p1_1c),
            ("p2_1c", self.p2_1c),
            ("nf_1c", self.nf_1c),
            ("p1_2c", self.p1_2c),
            ("p2_2c", self.p2_2c),
            ("nf_2c", self.nf_2c),
            ("nota_anual", self.nota_anual),
            ("diciembre_acreditacion", self.diciembre_acreditacion),
            ("feb_mar_recuperatorio", self.feb_mar_recuperatorio),
            ("nota_definitiva", self.nota_definitiva),
        ]
    }
}

#[derive(Debug, Deserialize)]
pub struct BoletinUpsert {
    pub anio: Option<i32>,
    #[serde(default)]
    pub materias: Vec<MateriaNotas>,
}

#[derive(Debug, Deserialize)]
pub struct AnioQuery {
    pub anio: Option<i32>,
}

// Revalidación defensiva del lote completo antes de abrir la transacción:
// una sola nota fuera de rango rechaza el PUT entero.
pub fn validar_notas(materias: &[MateriaNotas]) -> Result<(), ApiError> {
    for materia in materias {
        for (campo, valor) in materia.campos() {
            if let Some(nota) = valor {
                if !(NOTA_MINIMA..=NOTA_MAXIMA).contains(&nota) {
                    return Err(ApiError::Validacion(format!(
                        "La nota \"{campo}\" de la materia {} debe ser un entero entre 1 y 10.",
                        materia.id_materia
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn materia_vacia(id_materia: i32) -> MateriaNotas {
        serde_json::from_value(serde_json::json!({ "id_materia": id_materia }))
            .expect("materia mínima")
    }

    #[test]
    fn sin_notas_es_valido() {
        let materias = vec![materia_vacia(1), materia_vacia(2)];
        assert!(validar_notas(&materias).is_ok());
    }

    #[test]
    fn acepta_los_bordes_del_rango() {
        let mut materia = materia_vacia(4);
        materia.nf_1c = Some(NOTA_MINIMA);
        materia.nota_definitiva = Some(NOTA_MAXIMA);
        assert!(validar_notas(&[materia]).is_ok());
    }

    #[test]
    fn rechaza_fuera_de_rango_e_identifica_el_campo() {
        let mut materia = materia_vacia(2);
        materia.p1_1c = Some(11);
        let err = validar_notas(&[materia]).unwrap_err();
        assert!(err.to_string().contains("p1_1c"));
        assert!(err.to_string().contains("materia 2"));

        let mut materia = materia_vacia(3);
        materia.nota_anual = Some(0);
        assert!(validar_notas(&[materia]).is_err());

        let mut materia = materia_vacia(3);
        materia.feb_mar_recuperatorio = Some(-4);
        assert!(validar_notas(&[materia]).is_err());
    }

    #[test]
    fn una_materia_invalida_rechaza_el_lote_entero() {
        let buena = materia_vacia(1);
        let mut mala = materia_vacia(2);
        mala.p2_2c = Some(12);
        let otra_buena = materia_vacia(3);
        assert!(validar_notas(&[buena, mala, otra_buena]).is_err());
    }

    #[test]
    fn los_campos_ausentes_del_json_quedan_sin_calificar() {
        let materia: MateriaNotas =
            serde_json::from_value(serde_json::json!({ "id_materia": 4, "nf_1c": 7 }))
                .expect("json parcial");
        assert_eq!(materia.nf_1c, Some(7));
        assert_eq!(materia.p1_1c, None);
        assert_eq!(materia.nota_definitiva, None);
    }

    #[test]
    fn body_sin_materias_deserializa_a_lista_vacia() {
        let body: BoletinUpsert =
            serde_json::from_value(serde_json::json!({ "anio": 2025 })).expect("body sin materias");
        assert_eq!(body.anio, Some(2025));
        assert!(body.materias.is_empty());
    }
}
