//! Traducción de patrones glob (estilo fnmatch) a regex ancladas.
//!
//! Los tipos de scan y los tracers se declaran con comodines `*` y `?`; todo
//! lo demás es literal. La regex resultante ancla contra la cadena completa,
//! así que `T1*` acepta `T1w` pero no `xT1w`, y el match distingue
//! mayúsculas.

use regex::Regex;

/// Construye la regex anclada equivalente al glob.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut literal = String::new();
    out.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if ch == '*' { ".*" } else { "." });
            }
            c => literal.push(c),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}

/// Matchea `value` contra un glob. Un patrón invalidable no matchea nada.
pub fn glob_match(pattern: &str, value: &str) -> bool {
    Regex::new(&glob_to_regex(pattern)).map(|re| re.is_match(value))
                                       .unwrap_or(false)
}

/// Primer patrón que matchea gana; `None` si ninguno matchea.
pub fn first_match<'a>(patterns: &'a [String], value: &str) -> Option<&'a str> {
    patterns.iter()
            .map(|p| p.as_str())
            .find(|p| glob_match(p, value))
}

/// ¿Algún patrón de la lista matchea `value`?
pub fn matches_any(patterns: &[String], value: &str) -> bool {
    first_match(patterns, value).is_some()
}
