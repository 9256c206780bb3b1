//! Constantes del motor de construcción.
//!
//! Valores fijos que participan en la generación de etiquetas y en los
//! defaults de recursos de ejecución. Cambiarlos altera las etiquetas y los
//! descriptores producidos, no la lógica de emparejamiento.

/// Versión lógica del motor. Va en cada `TaskDescriptor` emitido para que el
/// consumidor pueda distinguir descriptores de versiones incompatibles.
pub const ENGINE_VERSION: &str = "R1.0";

/// Separador de segmentos en las etiquetas de assessor.
pub const LABEL_SEPARATOR: &str = "-x-";

/// Caracteres del GUID incluidos en la etiqueta.
pub const GUID_LABEL_CHARS: usize = 8;

/// Tope del lazo de generación/re-chequeo de IDs únicos.
pub const MAX_LABEL_ATTEMPTS: u32 = 100;

/// Defaults de requisitos de ejecución cuando la definición no los declara.
pub const DEFAULT_WALLTIME: &str = "0-2";
pub const DEFAULT_MEMORY: &str = "16G";
pub const DEFAULT_PPN: u32 = 1;
