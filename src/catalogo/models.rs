use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, FromRow)]
pub struct Curso {
    pub id_curso: i32,
    pub nombre_curso: String,
}

#[derive(Serialize, FromRow)]
pub struct Materia {
    pub id_materia: i32,
    pub nombre_materia: String,
}

#[derive(Debug, Deserialize)]
pub struct CursoIn {
    #[serde(rename = "nombreCurso")]
    pub nombre_curso: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MateriaIn {
    #[serde(rename = "nombreMateria")]
    pub nombre_materia: Option<String>,
}

// Los nombres del catálogo se comparan y guardan sin espacios alrededor.
pub fn nombre_recortado(valor: Option<&str>) -> Option<String> {
    let v = valor?.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorta_espacios_alrededor() {
        assert_eq!(nombre_recortado(Some("  5to A  ")), Some("5to A".to_string()));
        assert_eq!(nombre_recortado(Some("Matemática")), Some("Matemática".to_string()));
    }

    #[test]
    fn rechaza_vacio_y_solo_espacios() {
        assert_eq!(nombre_recortado(Some("")), None);
        assert_eq!(nombre_recortado(Some("   ")), None);
        assert_eq!(nombre_recortado(None), None);
    }
}
