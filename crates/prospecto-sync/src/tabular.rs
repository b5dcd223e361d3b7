//! Column sniffing for semi-structured spreadsheet rows.
//!
//! Real lead exports arrive with inconsistent, often Spanish column headers
//! ("Nombre completo", "Correo Electronico", "Cel"). Extraction is
//! best-effort by contract: a row never fails, it just yields empty fields
//! plus a warning.

/// Source label stamped on rows whose export did not carry a campaign column.
pub const DEFAULT_SOURCE: &str = "Imported";

// Short headers like "Cel" or "Tel" are abbreviations of a rule substring;
// the reverse containment test below needs a floor so one-letter headers do
// not match everything.
const MIN_ABBREV_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl Cell {
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(value) => value.clone(),
            Cell::Number(value) => format_number(*value),
            Cell::Bool(value) => value.to_string(),
            Cell::Empty => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().trim().is_empty()
    }
}

// Spreadsheet numbers are floats; phone columns must not come out as
// "5551234567.0".
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// One spreadsheet row: (header, cell) pairs in original column order.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<(String, Cell)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: impl Into<String>, cell: Cell) {
        self.cells.push((header.into(), cell));
    }

    pub fn cells(&self) -> &[(String, Cell)] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, Cell)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Cell)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateField {
    Name,
    Email,
    Phone,
    Source,
}

impl CandidateField {
    const fn as_str(self) -> &'static str {
        match self {
            CandidateField::Name => "name",
            CandidateField::Email => "email",
            CandidateField::Phone => "phone",
            CandidateField::Source => "source",
        }
    }
}

// Evaluated in this order, first matching column per field wins.
const FIELD_RULES: &[(CandidateField, &[&str])] = &[
    (CandidateField::Name, &["name", "nombre"]),
    (CandidateField::Email, &["email", "correo", "mail"]),
    (
        CandidateField::Phone,
        &["phone", "telefono", "teléfono", "celular", "móvil", "movil"],
    ),
    (
        CandidateField::Source,
        &[
            "campaign",
            "campaña",
            "source",
            "origen",
            "platform",
            "plataforma",
            "company",
            "empresa",
        ],
    ),
];

/// Trim, lowercase, collapse whitespace runs to single underscores.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_ws = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            if !prev_ws {
                out.push('_');
            }
            prev_ws = true;
        } else {
            out.extend(ch.to_lowercase());
            prev_ws = false;
        }
    }
    out
}

fn header_matches(normalized: &str, substrings: &[&str]) -> bool {
    substrings.iter().any(|sub| {
        normalized.contains(sub) || (normalized.len() >= MIN_ABBREV_LEN && sub.contains(normalized))
    })
}

fn matching_columns(row: &Row, substrings: &[&str]) -> Vec<usize> {
    row.cells
        .iter()
        .enumerate()
        .filter(|(_, (header, _))| header_matches(&normalize_header(header), substrings))
        .map(|(index, _)| index)
        .collect()
}

/// Contact fields extracted from one row, pre-normalization, plus warnings
/// for anything the sniffer had to guess about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadCandidate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub source: String,
    pub warnings: Vec<String>,
}

pub fn extract_candidate(row: &Row) -> LeadCandidate {
    let mut warnings = Vec::new();
    let mut values: [String; 4] = Default::default();

    for (slot, (field, substrings)) in FIELD_RULES.iter().enumerate() {
        let matches = matching_columns(row, substrings);
        if matches.len() > 1 {
            let used = &row.cells[matches[0]].0;
            let ignored: Vec<&str> = matches[1..]
                .iter()
                .map(|index| row.cells[*index].0.as_str())
                .collect();
            warnings.push(format!(
                "{} matched by several columns ({}); using \"{}\"",
                field.as_str(),
                ignored.join(", "),
                used
            ));
        }
        if let Some(index) = matches.first() {
            values[slot] = row.cells[*index].1.as_text();
        }
    }

    let [mut name, mut email, phone, source_raw] = values;

    // A mislabeled email column sometimes holds the person's name.
    if name.is_empty() && !email.is_empty() && !email.contains('@') {
        name = std::mem::take(&mut email);
    }

    // Nothing matched at all: take the first non-blank cell in column order.
    if name.is_empty() && email.is_empty() && phone.is_empty() {
        if let Some(value) = row
            .cells
            .iter()
            .map(|(_, cell)| cell.as_text())
            .find(|value| !value.trim().is_empty())
        {
            if value.contains('@') {
                email = value;
            } else {
                name = value;
            }
        }
    }

    let source = if source_raw.is_empty() {
        DEFAULT_SOURCE.to_string()
    } else {
        source_raw
    };

    LeadCandidate {
        name,
        email: email.trim().to_string(),
        phone,
        source,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_candidate, normalize_header, Cell, Row, DEFAULT_SOURCE};

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(header, value)| {
                let cell = if value.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(value.to_string())
                };
                (header.to_string(), cell)
            })
            .collect()
    }

    #[test]
    fn normalize_header_collapses_whitespace() {
        assert_eq!(normalize_header("  Full  Name "), "full_name");
        assert_eq!(normalize_header("Correo Electronico"), "correo_electronico");
    }

    #[test]
    fn extracts_multilingual_headers() {
        let candidate = extract_candidate(&row(&[
            ("Full Name", "jane doe"),
            ("Correo Electronico", "jane@x.com"),
            ("Cel", "5551234567"),
        ]));
        assert_eq!(candidate.name, "jane doe");
        assert_eq!(candidate.email, "jane@x.com");
        assert_eq!(candidate.phone, "5551234567");
        assert_eq!(candidate.source, DEFAULT_SOURCE);
    }

    #[test]
    fn numeric_phone_cells_keep_their_digits() {
        let mut r = Row::new();
        r.push("Nombre", Cell::Text("ana".to_string()));
        r.push("Telefono", Cell::Number(5551234567.0));
        let candidate = extract_candidate(&r);
        assert_eq!(candidate.phone, "5551234567");
    }

    #[test]
    fn swaps_name_and_email_when_email_holds_a_name() {
        let candidate = extract_candidate(&row(&[("Name", ""), ("Email", "Roberto Garcia")]));
        assert_eq!(candidate.name, "Roberto Garcia");
        assert_eq!(candidate.email, "");
    }

    #[test]
    fn falls_back_to_first_non_empty_cell() {
        let candidate = extract_candidate(&row(&[
            ("Col A", ""),
            ("Col B", "maria lopez"),
            ("Col C", "extra"),
        ]));
        assert_eq!(candidate.name, "maria lopez");
        assert_eq!(candidate.email, "");

        let candidate = extract_candidate(&row(&[("Col A", "maria@x.com")]));
        assert_eq!(candidate.email, "maria@x.com");
        assert_eq!(candidate.name, "");
    }

    #[test]
    fn source_column_is_recognized_and_defaulted() {
        let candidate = extract_candidate(&row(&[
            ("Nombre", "ana"),
            ("Campaña", "Facebook Ads Q3"),
        ]));
        assert_eq!(candidate.source, "Facebook Ads Q3");

        let candidate = extract_candidate(&row(&[("Nombre", "ana"), ("Campaña", "")]));
        assert_eq!(candidate.source, DEFAULT_SOURCE);
    }

    #[test]
    fn first_match_wins_and_extra_matches_warn() {
        let candidate = extract_candidate(&row(&[
            ("Nombre", "ana"),
            ("Segundo Nombre", "maria"),
        ]));
        assert_eq!(candidate.name, "ana");
        assert_eq!(candidate.warnings.len(), 1);
        assert!(candidate.warnings[0].contains("Segundo Nombre"));
    }

    #[test]
    fn all_blank_row_yields_empty_candidate_without_warnings_about_fields() {
        let candidate = extract_candidate(&row(&[("Col A", ""), ("Col B", "")]));
        assert_eq!(candidate.name, "");
        assert_eq!(candidate.email, "");
        assert_eq!(candidate.phone, "");
        assert_eq!(candidate.source, DEFAULT_SOURCE);
    }

    #[test]
    fn email_value_is_trimmed() {
        let candidate = extract_candidate(&row(&[("Email", "  jane@x.com  ")]));
        assert_eq!(candidate.email, "jane@x.com");
    }
}
