#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessUnit {
    pub id: &'static str,
    pub name: &'static str,
    pub level: &'static str,
}

pub const BUSINESS_UNITS: &[BusinessUnit] = &[
    BusinessUnit {
        id: "beeplay",
        name: "Beeplay",
        level: "Maternal",
    },
    BusinessUnit {
        id: "nuevo_beeplay",
        name: "Nuevo Beeplay",
        level: "Maternal y Kinder",
    },
    BusinessUnit {
        id: "liceo_los_cabos",
        name: "Liceo Los Cabos",
        level: "Kinder - Preparatoria",
    },
    BusinessUnit {
        id: "liceo_universitario",
        name: "Liceo Universitario",
        level: "Universidad",
    },
];

pub fn business_unit(id: &str) -> Option<&'static BusinessUnit> {
    BUSINESS_UNITS.iter().find(|unit| unit.id == id)
}

#[cfg(test)]
mod tests {
    use super::business_unit;

    #[test]
    fn business_unit_lookup() {
        let unit = business_unit("beeplay").expect("known unit");
        assert_eq!(unit.name, "Beeplay");
        assert!(business_unit("unknown").is_none());
    }
}
