//! Armador de la matriz de parámetros.
//!
//! Combina las listas de candidatos por slot en el conjunto de
//! combinaciones válidas. Cada fuente de iteración aporta sus filas; el
//! producto cartesiano entre fuentes produce un `InputSet` por elemento.
//!
//! Los grupos de vectores se truncan al largo del vector más corto. Los
//! matches sobrantes se descartan en silencio: comportamiento heredado,
//! pendiente de confirmación (ver DESIGN.md) antes de convertirlo en error.

use indexmap::IndexMap;
use log::debug;

use crate::model::{InputSet, ProcessorSpec};

/// Genera todas las combinaciones de entrada para una sesión ya matcheada.
///
/// Cualquier slot requerido sin candidatos corta la sesión entera: lista
/// vacía, nunca error. El orden de salida sigue el orden de declaración de
/// las fuentes y, dentro de cada fuente, el orden de fila.
pub fn generate_parameter_matrix(spec: &ProcessorSpec,
                                 artefacts_by_input: &IndexMap<String, Vec<String>>)
                                 -> Vec<InputSet> {
    // Chequear presencia de todos los requeridos antes de armar nada.
    for (name, input) in &spec.inputs {
        let empty = artefacts_by_input.get(name).map(|v| v.is_empty()).unwrap_or(true);
        if empty && input.required {
            debug!("required input has no matches, session yields nothing:{name}");
            return Vec::new();
        }
    }

    // Por fuente: truncar el grupo al vector más corto y transponer a filas.
    let mut headers: Vec<&str> = Vec::new();
    let mut dimension_rows: Vec<Vec<Vec<&str>>> = Vec::new();
    for source in spec.iteration_sources() {
        let members = spec.group_members(source);
        let vectors: Vec<&[String]> = members.iter()
                                             .map(|m| {
                                                 artefacts_by_input.get(&m.name)
                                                                   .map(|v| v.as_slice())
                                                                   .unwrap_or(&[])
                                             })
                                             .collect();
        let min_len = vectors.iter().map(|v| v.len()).min().unwrap_or(0);
        for v in &vectors {
            if v.len() > min_len {
                debug!("truncating input vector from {} to {} entries:{}", v.len(), min_len, source);
            }
        }

        let rows: Vec<Vec<&str>> = (0..min_len).map(|row| {
                                                   vectors.iter().map(|v| v[row].as_str()).collect()
                                               })
                                               .collect();

        headers.extend(members.iter().map(|m| m.name.as_str()));
        dimension_rows.push(rows);
    }

    // Producto cartesiano entre fuentes; sin fuentes queda la fila vacía
    // (procesador sin entradas), que el llamador descarta.
    let mut matrix: Vec<Vec<&str>> = vec![Vec::new()];
    for rows in &dimension_rows {
        let mut next = Vec::with_capacity(matrix.len() * rows.len());
        for prefix in &matrix {
            for row in rows {
                let mut combined = prefix.clone();
                combined.extend(row.iter().copied());
                next.push(combined);
            }
        }
        matrix = next;
    }

    matrix.into_iter()
          .map(|row| {
              let mut set = InputSet::new();
              for (slot, path) in headers.iter().copied().zip(row) {
                  set.insert(slot, path);
              }
              set
          })
          .collect()
}
