/// Acquisition channel catalog: (code, label).
pub const SOURCE_CATALOG: &[(&str, &str)] = &[
    ("01", "Redes sociales y sitio web"),
    ("02", "Recomendación"),
    ("03", "Publicidad tradicional y admisiones"),
    ("04", "Alianzas educativas"),
    ("05", "Alianzas empresariales y convenios"),
    ("06", "Activaciones"),
    ("07", "Eventos de prospección"),
];

pub fn is_source_code(code: &str) -> bool {
    SOURCE_CATALOG.iter().any(|(known, _)| *known == code)
}

/// Catalog label for a code; free-text sources (imports) come back unchanged.
pub fn source_name(code: &str) -> &str {
    SOURCE_CATALOG
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::{is_source_code, source_name};

    #[test]
    fn source_name_resolves_catalog_codes() {
        assert_eq!(source_name("02"), "Recomendación");
        assert!(is_source_code("07"));
    }

    #[test]
    fn source_name_passes_through_free_text() {
        assert_eq!(source_name("Imported"), "Imported");
        assert!(!is_source_code("Imported"));
    }
}
