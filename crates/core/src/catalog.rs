//! Fixed catalog of daily speech challenges.
//!
//! Static configuration data, not user-editable. Entries are grouped into
//! three tiers: level 1 "Romper el Hielo", level 2 "Interacciones Breves",
//! level 3 "Compromiso a Largo Plazo". The assignment engine filters by the
//! account's current level and picks uniformly at random; the selected
//! entry's text is copied into the assignment row.

/// One challenge definition in the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub level: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: &'static str,
    pub duration: &'static str,
    pub difficulty: &'static str,
}

/// The complete challenge catalog, levels 1 through 3.
pub const CHALLENGE_CATALOG: [CatalogEntry; 8] = [
    // NIVEL 1: Romper el Hielo
    CatalogEntry {
        level: 1,
        title: "El Saludo Diario",
        description: "Saluda con contacto visual y una ligera sonrisa a una persona con la que normalmente no interactúas",
        kind: "non_verbal",
        duration: "1 día",
        difficulty: "Baja",
    },
    CatalogEntry {
        level: 1,
        title: "El Pequeño Desvío",
        description: "Modifica ligeramente una rutina diaria (camino diferente, pedir café diferente)",
        kind: "non_verbal",
        duration: "1 día",
        difficulty: "Baja",
    },
    CatalogEntry {
        level: 1,
        title: "Contacto Visual Sostenido",
        description: "Mantén contacto visual durante el 70% de una interacción breve",
        kind: "non_verbal",
        duration: "1 día",
        difficulty: "Media",
    },
    // NIVEL 2: Interacciones Breves
    CatalogEntry {
        level: 2,
        title: "La Pregunta de Servicio",
        description: "Haz una pregunta de seguimiento a un empleado de servicio",
        kind: "verbal_short",
        duration: "1 día",
        difficulty: "Media",
    },
    CatalogEntry {
        level: 2,
        title: "El Elogio Genuino",
        description: "Haz un cumplido sincero a una persona desconocida",
        kind: "verbal_short",
        duration: "1 día",
        difficulty: "Media",
    },
    CatalogEntry {
        level: 2,
        title: "El 'Por Favor' Ampliado",
        description: "Añade un pequeño detalle personal cuando pidas algo",
        kind: "verbal_short",
        duration: "1 día",
        difficulty: "Media",
    },
    // NIVEL 3: Compromiso a Largo Plazo
    CatalogEntry {
        level: 3,
        title: "Clases o Clubes con Interés",
        description: "Apúntate a un curso o club sobre algo que te interese",
        kind: "long_term",
        duration: "7 días",
        difficulty: "Alta",
    },
    CatalogEntry {
        level: 3,
        title: "El 'Escucha Activa' Extrema",
        description: "Concéntrate al 100% en lo que dice alguien y haz preguntas de seguimiento",
        kind: "long_term",
        duration: "3 días",
        difficulty: "Alta",
    },
];

/// All catalog entries at exactly the given level.
#[must_use]
pub fn entries_for_level(level: u32) -> Vec<&'static CatalogEntry> {
    CHALLENGE_CATALOG
        .iter()
        .filter(|entry| entry.level == level)
        .collect()
}

/// The highest level present in the catalog.
///
/// An account whose completed history reaches this level has a next level
/// with no entries; daily assignment is a terminal failure from then on.
#[must_use]
pub fn max_level() -> u32 {
    CHALLENGE_CATALOG
        .iter()
        .map(|entry| entry.level)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_spans_three_levels() {
        assert_eq!(CHALLENGE_CATALOG.len(), 8);
        assert_eq!(entries_for_level(1).len(), 3);
        assert_eq!(entries_for_level(2).len(), 3);
        assert_eq!(entries_for_level(3).len(), 2);
        assert_eq!(max_level(), 3);
    }

    #[test]
    fn no_entries_beyond_max_level() {
        assert!(entries_for_level(max_level() + 1).is_empty());
    }

    #[test]
    fn every_entry_has_text_and_kind() {
        for entry in &CHALLENGE_CATALOG {
            assert!(entry.level >= 1);
            assert!(!entry.title.is_empty());
            assert!(!entry.description.is_empty());
            assert!(["non_verbal", "verbal_short", "long_term"].contains(&entry.kind));
        }
    }
}
